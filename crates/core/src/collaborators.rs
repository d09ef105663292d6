//! Capability interfaces for the systems the lock core depends on.
//!
//! Implementations live outside this crate (CRM REST adapter, PostgreSQL
//! settings store). Every lookup returns a typed [`LookupError`] on failure;
//! deciding what a failure means is left to the resolvers.

use std::collections::BTreeSet;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::LookupError;
use crate::identity::IdentityInput;
use crate::rule::{LockHandlerSettings, MessageFormat};
use crate::types::{DbId, Subject};

pub type LookupResult<T> = Result<T, LookupError>;

// ---------------------------------------------------------------------------
// Contacts
// ---------------------------------------------------------------------------

/// Contact lookup by name and email.
///
/// The backing system keeps email addresses in two places, so two strategies
/// are exposed separately and composed by the identity resolver.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Exact match on first name, last name and the contact's primary email.
    async fn find_by_primary_email(&self, identity: &IdentityInput) -> LookupResult<Option<Subject>>;

    /// Match on first and last name joined against the separate email
    /// association records.
    async fn find_by_linked_email(&self, identity: &IdentityInput) -> LookupResult<Option<Subject>>;
}

// ---------------------------------------------------------------------------
// Activities
// ---------------------------------------------------------------------------

/// How a subject participates in an activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityRole {
    Target,
    Assignee,
    Source,
}

impl ActivityRole {
    /// Evaluation order used by the existence checker. Not semantically
    /// significant: the result is an OR over all roles.
    pub const ALL: [ActivityRole; 3] = [
        ActivityRole::Target,
        ActivityRole::Assignee,
        ActivityRole::Source,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ActivityRole::Target => "target",
            ActivityRole::Assignee => "assignee",
            ActivityRole::Source => "source",
        }
    }
}

impl fmt::Display for ActivityRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role query, built fresh per role per check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub subject: Subject,
    pub role: ActivityRole,
    pub activity_type_ids: BTreeSet<DbId>,
    /// `None` means any status qualifies.
    pub status_ids: Option<BTreeSet<DbId>>,
}

impl ActivityQuery {
    pub fn new(
        subject: Subject,
        role: ActivityRole,
        activity_type_ids: &BTreeSet<DbId>,
        status_ids: &BTreeSet<DbId>,
    ) -> Self {
        Self {
            subject,
            role,
            activity_type_ids: activity_type_ids.clone(),
            status_ids: (!status_ids.is_empty()).then(|| status_ids.clone()),
        }
    }

    /// Whether a record with this type and status satisfies the filter.
    pub fn accepts(&self, activity_type_id: DbId, status_id: DbId) -> bool {
        self.activity_type_ids.contains(&activity_type_id)
            && self
                .status_ids
                .as_ref()
                .map_or(true, |statuses| statuses.contains(&status_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: DbId,
    pub activity_type_id: DbId,
    pub status_id: DbId,
}

#[async_trait]
pub trait ActivityStore: Send + Sync {
    async fn query(&self, query: &ActivityQuery) -> LookupResult<Vec<ActivityRecord>>;
}

// ---------------------------------------------------------------------------
// Relationships
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Counterpart (second party) of the first active relationship of the
    /// given type where `subject` is the first party.
    async fn find_active(
        &self,
        subject: Subject,
        relationship_type_id: DbId,
    ) -> LookupResult<Option<Subject>>;
}

// ---------------------------------------------------------------------------
// Option catalog
// ---------------------------------------------------------------------------

/// An active option value (activity type or status) offered for selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub value: DbId,
    pub label: String,
}

/// Choices offered when a form's lock handler is configured.
#[async_trait]
pub trait OptionCatalog: Send + Sync {
    async fn activity_types(&self) -> LookupResult<Vec<OptionValue>>;
    async fn activity_statuses(&self) -> LookupResult<Vec<OptionValue>>;
}

// ---------------------------------------------------------------------------
// Markup
// ---------------------------------------------------------------------------

/// Turns an authored message into markup that is safe to display.
pub trait MarkupRenderer: Send + Sync {
    fn render(&self, text: &str, format: MessageFormat) -> String;
}

// ---------------------------------------------------------------------------
// Form configuration
// ---------------------------------------------------------------------------

#[async_trait]
pub trait FormConfigStore: Send + Sync {
    /// Settings of the form's lock handler, or `None` when the form has no
    /// handler.
    async fn load(&self, form_id: &str) -> LookupResult<Option<LockHandlerSettings>>;

    /// Create or replace the form's handler settings.
    async fn save(&self, settings: &LockHandlerSettings) -> LookupResult<LockHandlerSettings>;

    /// Detach the handler from a form. `false` if there was none.
    async fn remove(&self, form_id: &str) -> LookupResult<bool>;

    /// Reachability probe used by the health endpoint.
    async fn ping(&self) -> LookupResult<()> {
        Ok(())
    }
}
