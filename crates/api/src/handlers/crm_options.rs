//! Option lists for configuring a lock handler.
//!
//! A CRM failure yields an empty list so the configuration screen still
//! renders; the failure is logged.

use activity_lock_core::collaborators::{LookupResult, OptionValue};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::response::DataResponse;
use crate::state::AppState;

fn or_empty(result: LookupResult<Vec<OptionValue>>, what: &'static str) -> Vec<OptionValue> {
    result.unwrap_or_else(|err| {
        tracing::error!(error = %err, what, "Failed to load CRM options");
        Vec::new()
    })
}

/// GET /api/v1/crm/activity-types
pub async fn list_activity_types(State(state): State<AppState>) -> impl IntoResponse {
    let data = or_empty(state.catalog.activity_types().await, "activity types");
    Json(DataResponse { data })
}

/// GET /api/v1/crm/activity-statuses
pub async fn list_activity_statuses(State(state): State<AppState>) -> impl IntoResponse {
    let data = or_empty(state.catalog.activity_statuses().await, "activity statuses");
    Json(DataResponse { data })
}
