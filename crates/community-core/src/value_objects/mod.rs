//! Value objects - immutable types that represent domain concepts

mod content;
mod snowflake;

pub use content::{ContentKind, Visibility};
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
