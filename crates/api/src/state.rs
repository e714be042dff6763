use std::sync::Arc;

use crate::config::ServerConfig;
use crate::upload::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, the only handle to the database.
    pub pool: haosenyi_db::DbPool,
    /// Server configuration (JWT secret, directories, environment).
    pub config: Arc<ServerConfig>,
    /// On-disk storage for uploaded images.
    pub uploads: Arc<UploadStore>,
}

impl AppState {
    pub fn new(pool: haosenyi_db::DbPool, config: ServerConfig) -> Self {
        let uploads = Arc::new(UploadStore::new(config.upload_dir.clone()));
        Self {
            pool,
            config: Arc::new(config),
            uploads,
        }
    }
}
