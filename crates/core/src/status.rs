//! Lifecycle status shared by topics, posts, and comments.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_REMOVED: &str = "removed";

/// Content status. The only legal transition is `Active -> Removed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentStatus {
    Active,
    Removed,
}

impl ContentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Active => STATUS_ACTIVE,
            ContentStatus::Removed => STATUS_REMOVED,
        }
    }

    pub fn is_active(self) -> bool {
        self == ContentStatus::Active
    }

    /// Whether moving from `self` to `next` is permitted.
    pub fn can_transition_to(self, next: ContentStatus) -> bool {
        matches!(
            (self, next),
            (ContentStatus::Active, ContentStatus::Removed)
        )
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_ACTIVE => Ok(ContentStatus::Active),
            STATUS_REMOVED => Ok(ContentStatus::Removed),
            other => Err(format!("Unknown content status '{other}'")),
        }
    }
}
