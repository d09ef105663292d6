use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{activity_check, handler_settings};
use crate::state::AppState;

/// Routes mounted at `/activity-lock`.
///
/// ```text
/// POST   /check                 check_activity
/// ```
pub fn check_router() -> Router<AppState> {
    Router::new().route("/check", post(activity_check::check_activity))
}

/// Routes mounted at `/forms/{form_id}/activity-lock`.
///
/// ```text
/// GET    /handler               get_handler
/// PUT    /handler               upsert_handler
/// DELETE /handler               delete_handler
/// GET    /settings              client_settings
/// POST   /render                render_lock
/// POST   /validate              validate_submission
/// ```
pub fn form_router() -> Router<AppState> {
    Router::new()
        .route(
            "/handler",
            get(handler_settings::get_handler)
                .put(handler_settings::upsert_handler)
                .delete(handler_settings::delete_handler),
        )
        .route("/settings", get(handler_settings::client_settings))
        .route("/render", post(activity_check::render_lock))
        .route("/validate", post(activity_check::validate_submission))
}
