//! Configuration structs

mod app_config;

pub use app_config::{
    AccountsConfig, AppConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtConfig,
    RateLimitConfig, RedisConfig, ServerConfig,
};
