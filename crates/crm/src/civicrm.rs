//! CiviCRM-backed implementations of the lock core's collaborator traits.

use activity_lock_core::collaborators::{
    ActivityQuery, ActivityRecord, ActivityStore, ContactDirectory, LookupResult, OptionCatalog,
    OptionValue, RelationshipStore,
};
use activity_lock_core::{DbId, IdentityInput, LookupError, Subject};
use async_trait::async_trait;
use serde_json::Value;

use crate::api::{int_field, string_field, CiviCrmApi, CrmError};
use crate::config::CrmConfig;
use crate::queries;

pub struct CiviCrm {
    api: CiviCrmApi,
}

impl CiviCrm {
    pub fn new(config: CrmConfig) -> Result<Self, CrmError> {
        Ok(Self {
            api: CiviCrmApi::new(config)?,
        })
    }

    pub fn from_api(api: CiviCrmApi) -> Self {
        Self { api }
    }

    async fn option_values(&self, group: &str) -> Result<Vec<OptionValue>, CrmError> {
        let rows = self
            .api
            .call("OptionValue", "get", &queries::option_values(group))
            .await?;
        Ok(rows.iter().filter_map(parse_option_value).collect())
    }
}

/// First row's `id` as a subject; rows without a usable id are skipped.
fn first_subject(rows: &[Value], key: &str) -> Option<Subject> {
    rows.iter().find_map(|row| int_field(row, key)).map(Subject)
}

/// First contact whose chained `api.Email.get` found at least one address.
pub fn first_with_linked_email(rows: &[Value]) -> Option<Subject> {
    rows.iter()
        .filter(|row| {
            row.get("api.Email.get")
                .and_then(|chained| int_field(chained, "count"))
                .is_some_and(|count| count > 0)
        })
        .find_map(|row| int_field(row, "id"))
        .map(Subject)
}

pub fn parse_activity(row: &Value) -> Option<ActivityRecord> {
    Some(ActivityRecord {
        id: int_field(row, "id")?,
        activity_type_id: int_field(row, "activity_type_id")?,
        status_id: int_field(row, "status_id")?,
    })
}

pub fn parse_option_value(row: &Value) -> Option<OptionValue> {
    Some(OptionValue {
        value: int_field(row, "value")?,
        label: string_field(row, "label")?,
    })
}

#[async_trait]
impl ContactDirectory for CiviCrm {
    async fn find_by_primary_email(&self, identity: &IdentityInput) -> LookupResult<Option<Subject>> {
        let rows = self
            .api
            .call("Contact", "get", &queries::contact_by_primary_email(identity))
            .await?;
        Ok(first_subject(&rows, "id"))
    }

    async fn find_by_linked_email(&self, identity: &IdentityInput) -> LookupResult<Option<Subject>> {
        let rows = self
            .api
            .call("Contact", "get", &queries::contact_by_linked_email(identity))
            .await?;
        Ok(first_with_linked_email(&rows))
    }
}

#[async_trait]
impl ActivityStore for CiviCrm {
    async fn query(&self, query: &ActivityQuery) -> LookupResult<Vec<ActivityRecord>> {
        let rows = self
            .api
            .call("Activity", "get", &queries::activities(query))
            .await?;

        let records: Vec<ActivityRecord> = rows.iter().filter_map(parse_activity).collect();
        if records.len() < rows.len() {
            return Err(LookupError::Malformed(
                "activity row without id, type or status".into(),
            ));
        }
        Ok(records)
    }
}

#[async_trait]
impl OptionCatalog for CiviCrm {
    async fn activity_types(&self) -> LookupResult<Vec<OptionValue>> {
        Ok(self.option_values(queries::ACTIVITY_TYPE_GROUP).await?)
    }

    async fn activity_statuses(&self) -> LookupResult<Vec<OptionValue>> {
        Ok(self.option_values(queries::ACTIVITY_STATUS_GROUP).await?)
    }
}

#[async_trait]
impl RelationshipStore for CiviCrm {
    async fn find_active(
        &self,
        subject: Subject,
        relationship_type_id: DbId,
    ) -> LookupResult<Option<Subject>> {
        let rows = self
            .api
            .call(
                "Relationship",
                "get",
                &queries::active_relationship(subject, relationship_type_id),
            )
            .await?;
        Ok(first_subject(&rows, "contact_id_b"))
    }
}
