//! Handlers for a form's persisted lock-handler settings.

use activity_lock_core::fields::FieldMapping;
use activity_lock_core::{CoreError, LockHandlerSettings, LockRuleConfig};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::load_settings;
use crate::response::DataResponse;
use crate::state::AppState;

/// Path the form client posts its checks to.
pub const CHECK_URL: &str = "/api/v1/activity-lock/check";

/// Request body for `PUT .../handler`; the form id comes from the path.
#[derive(Debug, Deserialize)]
pub struct HandlerSettingsBody {
    #[serde(flatten)]
    pub fields: FieldMapping,
    #[serde(flatten)]
    pub rule: LockRuleConfig,
}

/// GET /api/v1/forms/{form_id}/activity-lock/handler
pub async fn get_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let settings = load_settings(&state, &form_id).await?;
    Ok(Json(DataResponse { data: settings }))
}

/// PUT /api/v1/forms/{form_id}/activity-lock/handler
///
/// Create or replace the handler. Rejected with 400 when no activity type is
/// selected, a field mapping is blank or the relationship type is invalid.
pub async fn upsert_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(input): Json<HandlerSettingsBody>,
) -> AppResult<impl IntoResponse> {
    let settings = LockHandlerSettings {
        form_id,
        fields: input.fields,
        rule: input.rule,
    };
    settings.validate()?;

    let saved = state.forms.save(&settings).await?;
    tracing::info!(
        form_id = %saved.form_id,
        activity_types = saved.rule.activity_type_ids.len(),
        check_employer = saved.rule.check_employer,
        "Activity lock handler updated",
    );

    Ok(Json(DataResponse { data: saved }))
}

/// DELETE /api/v1/forms/{form_id}/activity-lock/handler
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if !state.forms.remove(&form_id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Activity lock handler",
            id: form_id,
        }));
    }

    tracing::info!(form_id = %form_id, "Activity lock handler removed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/forms/{form_id}/activity-lock/settings
///
/// Field mapping and check URL for the form client.
pub async fn client_settings(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let settings = load_settings(&state, &form_id).await?;
    Ok(Json(DataResponse {
        data: settings.client_settings(CHECK_URL),
    }))
}
