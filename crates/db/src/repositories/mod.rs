//! Repository layer: one zero-sized struct per table, each taking the pool
//! explicitly.

pub mod comment_repo;
pub mod post_repo;
pub mod topic_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use post_repo::PostRepo;
pub use topic_repo::TopicRepo;
pub use user_repo::UserRepo;

use forum_core::search::escape_like;
use forum_core::store::ListFilter;

/// WHERE-clause fragments and bind values shared by the topic and post
/// listings.
///
/// `searchable` is the SQL expression the text query is matched against.
/// Conditions are numbered from `first_param`; the returned index is the
/// next free placeholder.
pub(crate) struct ListClause {
    pub conditions: Vec<String>,
    pub pattern: Option<String>,
    pub query: Option<String>,
    pub next_param: usize,
}

impl ListClause {
    pub(crate) fn build(filter: &ListFilter, searchable: &str, first_param: usize) -> Self {
        let mut conditions = Vec::new();
        let mut param_idx = first_param;

        if !filter.include_removed {
            conditions.push("status = 'active'".to_string());
        }

        let (pattern, query) = match filter.text.as_deref() {
            Some(q) => {
                // Substring hit, or pg_trgm word similarity for near misses.
                conditions.push(format!(
                    "(({searchable}) ILIKE ${} ESCAPE '\\' OR ${} <% ({searchable}))",
                    param_idx,
                    param_idx + 1
                ));
                param_idx += 2;
                (Some(format!("%{}%", escape_like(q))), Some(q.to_string()))
            }
            None => (None, None),
        };

        Self {
            conditions,
            pattern,
            query,
            next_param: param_idx,
        }
    }

    /// Render as a `WHERE ...` clause, or an empty string.
    pub(crate) fn where_clause(&self, leading: &[String]) -> String {
        let all: Vec<&str> = leading
            .iter()
            .chain(self.conditions.iter())
            .map(String::as_str)
            .collect();
        if all.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", all.join(" AND "))
        }
    }
}
