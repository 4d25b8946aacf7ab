use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ml::MlClient;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: the pool and the HTTP client are reference-counted.
#[derive(Clone)]
pub struct AppState {
    pub pool: unievent_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Client for the external prediction model.
    pub ml: MlClient,
}
