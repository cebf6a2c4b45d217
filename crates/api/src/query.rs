//! Shared query parameter types for API handlers.

use forum_core::search::SearchRequest;
use serde::Deserialize;

/// Query string accepted by topic and post listings
/// (`?q=&include_removed=&limit=&offset=`).
///
/// A missing or blank `q` lists everything in scope. Limit and offset are
/// clamped by the core.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    #[serde(default)]
    pub include_removed: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl From<ListParams> for SearchRequest {
    fn from(params: ListParams) -> Self {
        SearchRequest {
            query: params.q,
            include_removed: params.include_removed,
            limit: params.limit,
            offset: params.offset,
        }
    }
}
