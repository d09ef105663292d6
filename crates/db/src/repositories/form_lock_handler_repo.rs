//! Repository for the `form_lock_handlers` table.

use sqlx::PgPool;

use crate::models::form_lock_handler::{FormLockHandler, UpsertFormLockHandler};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, form_id, first_name_field, last_name_field, email_field, \
    activity_type_ids, status_ids, check_employer, relationship_type_id, \
    lock_message, lock_message_format, created_at, updated_at";

/// Provides read and upsert operations for lock-handler settings.
pub struct FormLockHandlerRepo;

impl FormLockHandlerRepo {
    /// Find the handler attached to a form, if any.
    pub async fn find_by_form_id(
        pool: &PgPool,
        form_id: &str,
    ) -> Result<Option<FormLockHandler>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM form_lock_handlers WHERE form_id = $1");
        sqlx::query_as::<_, FormLockHandler>(&query)
            .bind(form_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or replace the handler for `body.form_id`.
    pub async fn upsert(
        pool: &PgPool,
        body: &UpsertFormLockHandler,
    ) -> Result<FormLockHandler, sqlx::Error> {
        let query = format!(
            "INSERT INTO form_lock_handlers
                (form_id, first_name_field, last_name_field, email_field,
                 activity_type_ids, status_ids, check_employer, relationship_type_id,
                 lock_message, lock_message_format)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (form_id)
             DO UPDATE SET
                first_name_field     = EXCLUDED.first_name_field,
                last_name_field      = EXCLUDED.last_name_field,
                email_field          = EXCLUDED.email_field,
                activity_type_ids    = EXCLUDED.activity_type_ids,
                status_ids           = EXCLUDED.status_ids,
                check_employer       = EXCLUDED.check_employer,
                relationship_type_id = EXCLUDED.relationship_type_id,
                lock_message         = EXCLUDED.lock_message,
                lock_message_format  = EXCLUDED.lock_message_format,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, FormLockHandler>(&query)
            .bind(&body.form_id)
            .bind(&body.first_name_field)
            .bind(&body.last_name_field)
            .bind(&body.email_field)
            .bind(&body.activity_type_ids)
            .bind(&body.status_ids)
            .bind(body.check_employer)
            .bind(body.relationship_type_id)
            .bind(&body.lock_message)
            .bind(&body.lock_message_format)
            .fetch_one(pool)
            .await
    }

    /// Remove a form's handler. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, form_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM form_lock_handlers WHERE form_id = $1")
            .bind(form_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
