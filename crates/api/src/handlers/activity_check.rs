//! Handlers that run the lock decision.
//!
//! - `POST /activity-lock/check` is the remote decision call made by the
//!   form client while the user types.
//! - `POST /forms/{form_id}/activity-lock/render` tells the form layer
//!   whether to render the form locked from prefilled values.
//! - `POST /forms/{form_id}/activity-lock/validate` re-checks at submission.

use std::collections::HashMap;

use activity_lock_core::fields::FieldRegistry;
use activity_lock_core::{CoreError, IdentityField, IdentityInput, LockHandlerSettings};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::handlers::load_settings;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Remote decision call
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "webform_id")]
    pub form_id: String,
}

impl CheckRequest {
    fn identity(&self) -> IdentityInput {
        IdentityInput::new(&self.first_name, &self.last_name, &self.email)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckResponse {
    pub activity_exists: bool,
    pub message: String,
}

/// POST /api/v1/activity-lock/check
///
/// 400 when an identity field or the form id is missing, 404 when the form
/// has no lock handler, 400 when the handler has no activity types.
pub async fn check_activity(
    State(state): State<AppState>,
    Json(input): Json<CheckRequest>,
) -> AppResult<Json<CheckResponse>> {
    let identity = input.identity();
    identity.ensure_complete()?;
    if input.form_id.trim().is_empty() {
        return Err(CoreError::Validation("Missing required fields: form_id".into()).into());
    }

    let settings = load_settings(&state, &input.form_id).await?;
    settings.rule.ensure_actionable()?;

    let decision = state.engine.decide(&identity, &settings.rule).await;
    tracing::debug!(
        form_id = %input.form_id,
        locked = decision.locked,
        "Activity check completed",
    );

    Ok(Json(CheckResponse {
        activity_exists: decision.locked,
        message: decision.message,
    }))
}

// ---------------------------------------------------------------------------
// Host form layer
// ---------------------------------------------------------------------------

/// Values of a rendered or submitted form keyed by input name.
#[derive(Debug, Default, Deserialize)]
pub struct FormValues {
    #[serde(default)]
    pub values: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderResponse {
    pub lock: bool,
    pub message: String,
    /// Inputs that stay editable while the form is locked.
    pub editable_fields: Vec<String>,
}

/// Resolve the identity carried by `values` using the form's field mapping.
async fn identity_for(
    state: &AppState,
    form_id: &str,
    values: &FormValues,
) -> AppResult<(LockHandlerSettings, FieldRegistry, IdentityInput)> {
    let settings = load_settings(state, form_id).await?;
    let registry = FieldRegistry::from_mapping(&settings.fields)?;
    let identity = registry.identity_from(
        values
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    Ok((settings, registry, identity))
}

/// POST /api/v1/forms/{form_id}/activity-lock/render
///
/// Missing identity values are not an error: the form renders unlocked.
pub async fn render_lock(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(input): Json<FormValues>,
) -> AppResult<Json<RenderResponse>> {
    let (settings, registry, identity) = identity_for(&state, &form_id, &input).await?;

    let editable_fields = IdentityField::ALL
        .iter()
        .filter_map(|f| registry.name_of(*f).map(str::to_string))
        .collect();

    let decision = state.engine.decide(&identity, &settings.rule).await;
    if decision.locked {
        tracing::info!(form_id = %form_id, "Form rendered locked");
    }

    Ok(Json(RenderResponse {
        lock: decision.locked,
        message: decision.message,
        editable_fields,
    }))
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/v1/forms/{form_id}/activity-lock/validate
///
/// 200 `{valid: true}` when the submission may proceed, 422 with the
/// rendered lock message when it must be rejected. Incomplete identity skips
/// the check.
pub async fn validate_submission(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(input): Json<FormValues>,
) -> AppResult<impl IntoResponse> {
    let (settings, _, identity) = identity_for(&state, &form_id, &input).await?;

    let decision = state.engine.decide(&identity, &settings.rule).await;
    if !decision.locked {
        return Ok((
            StatusCode::OK,
            Json(ValidationResponse {
                valid: true,
                message: None,
            }),
        ));
    }

    tracing::info!(form_id = %form_id, "Submission rejected by activity lock");
    Ok((
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ValidationResponse {
            valid: false,
            message: Some(decision.message),
        }),
    ))
}
