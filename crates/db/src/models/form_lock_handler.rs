//! Activity-lock handler settings model.
//!
//! Maps to the `form_lock_handlers` table.

use activity_lock_core::fields::FieldMapping;
use activity_lock_core::{CoreError, DbId, LockHandlerSettings, LockRuleConfig, MessageFormat};
use serde::Serialize;
use sqlx::FromRow;

use super::Timestamp;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `form_lock_handlers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormLockHandler {
    pub id: DbId,
    pub form_id: String,
    pub first_name_field: String,
    pub last_name_field: String,
    pub email_field: String,
    pub activity_type_ids: Vec<DbId>,
    pub status_ids: Vec<DbId>,
    pub check_employer: bool,
    pub relationship_type_id: DbId,
    pub lock_message: String,
    pub lock_message_format: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<FormLockHandler> for LockHandlerSettings {
    type Error = CoreError;

    fn try_from(row: FormLockHandler) -> Result<Self, Self::Error> {
        let format: MessageFormat = row.lock_message_format.parse()?;
        Ok(LockHandlerSettings {
            form_id: row.form_id,
            fields: FieldMapping {
                first_name_field: row.first_name_field,
                last_name_field: row.last_name_field,
                email_field: row.email_field,
            },
            rule: LockRuleConfig {
                activity_type_ids: row.activity_type_ids.into_iter().collect(),
                status_ids: row.status_ids.into_iter().collect(),
                check_employer: row.check_employer,
                employer_relationship_type_id: row.relationship_type_id,
                lock_message: row.lock_message,
                lock_message_format: format,
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Upsert DTO
// ---------------------------------------------------------------------------

/// Column values written by an upsert, derived from validated settings.
#[derive(Debug, Clone)]
pub struct UpsertFormLockHandler {
    pub form_id: String,
    pub first_name_field: String,
    pub last_name_field: String,
    pub email_field: String,
    pub activity_type_ids: Vec<DbId>,
    pub status_ids: Vec<DbId>,
    pub check_employer: bool,
    pub relationship_type_id: DbId,
    pub lock_message: String,
    pub lock_message_format: String,
}

impl From<&LockHandlerSettings> for UpsertFormLockHandler {
    fn from(s: &LockHandlerSettings) -> Self {
        Self {
            form_id: s.form_id.clone(),
            first_name_field: s.fields.first_name_field.clone(),
            last_name_field: s.fields.last_name_field.clone(),
            email_field: s.fields.email_field.clone(),
            activity_type_ids: s.rule.activity_type_ids.iter().copied().collect(),
            status_ids: s.rule.status_ids.iter().copied().collect(),
            check_employer: s.rule.check_employer,
            relationship_type_id: s.rule.employer_relationship_type_id,
            lock_message: s.rule.lock_message.clone(),
            lock_message_format: s.rule.lock_message_format.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::Utc;

    use super::*;

    fn row() -> FormLockHandler {
        FormLockHandler {
            id: 1,
            form_id: "event_signup".into(),
            first_name_field: "first".into(),
            last_name_field: "last".into(),
            email_field: "mail".into(),
            activity_type_ids: vec![5, 7, 5],
            status_ids: vec![],
            check_employer: true,
            relationship_type_id: 4,
            lock_message: "Already signed up".into(),
            lock_message_format: "plain_text".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn row_converts_to_settings() {
        let settings = LockHandlerSettings::try_from(row()).unwrap();

        assert_eq!(settings.form_id, "event_signup");
        assert_eq!(settings.fields.email_field, "mail");
        assert_eq!(settings.rule.activity_type_ids.len(), 2);
        assert!(settings.rule.status_ids.is_empty());
        assert!(settings.rule.check_employer);
        assert_eq!(settings.rule.lock_message_format, MessageFormat::PlainText);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let mut r = row();
        r.lock_message_format = "markdown".into();
        assert_matches!(LockHandlerSettings::try_from(r), Err(CoreError::Validation(_)));
    }

    #[test]
    fn upsert_dto_round_trips_settings() {
        let settings = LockHandlerSettings::try_from(row()).unwrap();
        let dto = UpsertFormLockHandler::from(&settings);

        assert_eq!(dto.activity_type_ids, vec![5, 7]);
        assert_eq!(dto.lock_message_format, "plain_text");
        assert_eq!(dto.relationship_type_id, 4);
    }
}
