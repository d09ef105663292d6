use std::sync::Arc;

use activity_lock_core::collaborators::{FormConfigStore, OptionCatalog};
use activity_lock_core::LockDecisionEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Stateless decision engine shared by every request.
    pub engine: Arc<LockDecisionEngine>,
    /// Persisted per-form handler settings.
    pub forms: Arc<dyn FormConfigStore>,
    /// Activity types and statuses offered when configuring a handler.
    pub catalog: Arc<dyn OptionCatalog>,
}
