use axum::routing::get;
use axum::Router;

use crate::handlers::crm_options;
use crate::state::AppState;

/// Routes mounted at `/crm`.
///
/// ```text
/// GET    /activity-types        list_activity_types
/// GET    /activity-statuses     list_activity_statuses
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/activity-types", get(crm_options::list_activity_types))
        .route("/activity-statuses", get(crm_options::list_activity_statuses))
}
