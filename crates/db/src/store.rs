//! [`FormConfigStore`] backed by the `form_lock_handlers` table.

use activity_lock_core::collaborators::{FormConfigStore, LookupResult};
use activity_lock_core::{LockHandlerSettings, LookupError};
use async_trait::async_trait;

use crate::models::form_lock_handler::UpsertFormLockHandler;
use crate::repositories::FormLockHandlerRepo;
use crate::DbPool;

#[derive(Clone)]
pub struct PgFormConfigStore {
    pool: DbPool,
}

impl PgFormConfigStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Classify a sqlx error for the core's lookup taxonomy.
fn lookup_error(err: sqlx::Error) -> LookupError {
    match err {
        sqlx::Error::PoolTimedOut => LookupError::Timeout,
        sqlx::Error::Database(db_err) => LookupError::Api {
            code: db_err.code().map(|c| c.into_owned()).unwrap_or_default(),
            message: db_err.message().to_string(),
        },
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            LookupError::Malformed(err.to_string())
        }
        other => LookupError::Transport(other.to_string()),
    }
}

#[async_trait]
impl FormConfigStore for PgFormConfigStore {
    async fn load(&self, form_id: &str) -> LookupResult<Option<LockHandlerSettings>> {
        let Some(row) = FormLockHandlerRepo::find_by_form_id(&self.pool, form_id)
            .await
            .map_err(lookup_error)?
        else {
            return Ok(None);
        };

        LockHandlerSettings::try_from(row)
            .map(Some)
            .map_err(|e| LookupError::Malformed(e.to_string()))
    }

    async fn save(&self, settings: &LockHandlerSettings) -> LookupResult<LockHandlerSettings> {
        let row = FormLockHandlerRepo::upsert(&self.pool, &UpsertFormLockHandler::from(settings))
            .await
            .map_err(lookup_error)?;
        tracing::info!(form_id = %row.form_id, "Activity lock handler saved");

        LockHandlerSettings::try_from(row).map_err(|e| LookupError::Malformed(e.to_string()))
    }

    async fn remove(&self, form_id: &str) -> LookupResult<bool> {
        FormLockHandlerRepo::delete(&self.pool, form_id)
            .await
            .map_err(lookup_error)
    }

    async fn ping(&self) -> LookupResult<()> {
        crate::health_check(&self.pool).await.map_err(lookup_error)
    }
}
