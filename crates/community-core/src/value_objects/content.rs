//! Content kinds and visibility predicates shared by posts, comments and replies

use serde::{Deserialize, Serialize};
use std::fmt;

/// The three kinds of content node that carry a like-set and a visibility flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Comment,
    Reply,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [Self::Post, Self::Comment, Self::Reply];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Comment => "comment",
            Self::Reply => "reply",
        }
    }

    /// Resolve the plural collection name used in URLs (`posts`, `comments`, `replies`)
    pub fn from_collection(segment: &str) -> Option<Self> {
        match segment {
            "posts" => Some(Self::Post),
            "comments" => Some(Self::Comment),
            "replies" => Some(Self::Reply),
            _ => None,
        }
    }

    pub fn collection(self) -> &'static str {
        match self {
            Self::Post => "posts",
            Self::Comment => "comments",
            Self::Reply => "replies",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit visibility predicate for content queries.
///
/// Every listing takes one of these so the hidden/shown choice is made by
/// the caller instead of by a default scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Shown,
    Hidden,
    All,
}

impl Visibility {
    /// Whether a row with the given `is_hidden` flag passes this predicate
    #[inline]
    pub fn admits(self, is_hidden: bool) -> bool {
        match self {
            Self::Shown => !is_hidden,
            Self::Hidden => is_hidden,
            Self::All => true,
        }
    }

    /// The `is_hidden` value to filter on, `None` meaning no filter
    pub fn hidden_filter(self) -> Option<bool> {
        match self {
            Self::Shown => Some(false),
            Self::Hidden => Some(true),
            Self::All => None,
        }
    }

    /// Whether using this predicate requires moderator rights
    #[inline]
    pub fn is_privileged(self) -> bool {
        !matches!(self, Self::Shown)
    }
}
