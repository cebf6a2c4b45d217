//! Forum entities and their creation inputs.
//!
//! These are the storage-agnostic shapes the lifecycle engine works with.
//! Persistence backends convert their own row types into these.

use serde::{Deserialize, Serialize};

use crate::status::ContentStatus;
use crate::types::{DbId, Timestamp};

/// A registered forum user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub bio: String,
    pub created_at: Timestamp,
}

/// A topic groups posts. `post_count` is a derived aggregate of its active posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Topic {
    pub id: DbId,
    pub name: String,
    pub description: String,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub status: ContentStatus,
    pub post_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Post {
    pub id: DbId,
    pub topic_id: DbId,
    pub created_by: DbId,
    pub title: String,
    pub body: String,
    pub created_at: Timestamp,
    pub status: ContentStatus,
}

/// A comment on a post. `parent_id` links a reply to a top-level comment
/// on the same post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub post_id: DbId,
    pub commented_by: DbId,
    pub parent_id: Option<DbId>,
    pub body: String,
    pub created_at: Timestamp,
    pub status: ContentStatus,
}

/// DTO for registering a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    #[serde(default)]
    pub bio: Option<String>,
}

/// DTO for creating a topic.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTopic {
    pub name: String,
    pub description: String,
}

/// DTO for creating a post. The parent topic comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub body: String,
}

/// DTO for creating a comment. The parent post comes from the route.
#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub body: String,
    #[serde(default)]
    pub parent_id: Option<DbId>,
}

/// Something with a recorded creator that can be soft-deleted.
pub trait Owned {
    const ENTITY: &'static str;

    fn id(&self) -> DbId;
    fn owner_id(&self) -> DbId;
    fn status(&self) -> ContentStatus;
}

impl Owned for Topic {
    const ENTITY: &'static str = "Topic";

    fn id(&self) -> DbId {
        self.id
    }
    fn owner_id(&self) -> DbId {
        self.created_by
    }
    fn status(&self) -> ContentStatus {
        self.status
    }
}

impl Owned for Post {
    const ENTITY: &'static str = "Post";

    fn id(&self) -> DbId {
        self.id
    }
    fn owner_id(&self) -> DbId {
        self.created_by
    }
    fn status(&self) -> ContentStatus {
        self.status
    }
}

impl Owned for Comment {
    const ENTITY: &'static str = "Comment";

    fn id(&self) -> DbId {
        self.id
    }
    fn owner_id(&self) -> DbId {
        self.commented_by
    }
    fn status(&self) -> ContentStatus {
        self.status
    }
}
