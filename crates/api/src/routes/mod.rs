pub mod activity_lock;
pub mod crm;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /activity-lock/check                             remote decision call (POST)
///
/// /forms/{form_id}/activity-lock/handler           get, upsert (PUT), remove (DELETE)
/// /forms/{form_id}/activity-lock/settings          client settings (GET)
/// /forms/{form_id}/activity-lock/render            render-time lock signal (POST)
/// /forms/{form_id}/activity-lock/validate          submission-time validation (POST)
///
/// /crm/activity-types                              active activity types
/// /crm/activity-statuses                           active activity statuses
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/activity-lock", activity_lock::check_router())
        .nest("/forms/{form_id}/activity-lock", activity_lock::form_router())
        .nest("/crm", crm::router())
}
