pub mod activity_check;
pub mod crm_options;
pub mod handler_settings;

use activity_lock_core::{CoreError, LockHandlerSettings};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load a form's handler settings or fail with 404.
pub(crate) async fn load_settings(state: &AppState, form_id: &str) -> AppResult<LockHandlerSettings> {
    state
        .forms
        .load(form_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Activity lock handler",
                id: form_id.to_string(),
            })
        })
}
