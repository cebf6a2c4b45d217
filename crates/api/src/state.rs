use std::sync::Arc;

use forum_core::lifecycle::ForumService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the service holds an `Arc` to its store and the config
/// is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Forum operations over the configured store.
    pub forum: ForumService,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
}
