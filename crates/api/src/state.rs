use std::sync::Arc;

use archsite_core::error::CoreError;
use archsite_db::DbPool;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Pools are created once at startup and injected here. Either may be absent
/// when its credential is not configured; the routes that need it then
/// answer 503.
#[derive(Clone)]
pub struct AppState {
    /// Elevated-credential pool for admin routes.
    pub service_pool: Option<DbPool>,
    /// Restricted-credential pool for public routes.
    pub public_pool: Option<DbPool>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn service_db(&self) -> AppResult<&DbPool> {
        self.service_pool.as_ref().ok_or_else(|| {
            AppError::Core(CoreError::Unavailable(
                "Admin database connection is not configured".into(),
            ))
        })
    }

    pub fn public_db(&self) -> AppResult<&DbPool> {
        self.public_pool.as_ref().ok_or_else(|| {
            AppError::Core(CoreError::Unavailable(
                "Public database connection is not configured".into(),
            ))
        })
    }
}
