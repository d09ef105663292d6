//! Identity, activity and employer lookups with the fail-open policy applied.
//!
//! Each resolver wraps one collaborator. A collaborator failure is logged
//! here, with the context needed to trace it, and then treated as "no match".
//! Nothing in this module retries.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::collaborators::{
    ActivityQuery, ActivityRole, ActivityStore, ContactDirectory, RelationshipStore,
};
use crate::identity::IdentityInput;
use crate::types::{DbId, Subject};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Maps name + email to at most one contact.
#[derive(Clone)]
pub struct IdentityResolver {
    directory: Arc<dyn ContactDirectory>,
}

impl IdentityResolver {
    pub fn new(directory: Arc<dyn ContactDirectory>) -> Self {
        Self { directory }
    }

    /// Primary-email match first, then the linked email records. First hit
    /// wins; `None` means nobody matched (or the lookup failed).
    pub async fn resolve(&self, identity: &IdentityInput) -> Option<Subject> {
        match self.directory.find_by_primary_email(identity).await {
            Ok(Some(subject)) => return Some(subject),
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = %e, strategy = "primary_email", "Error finding contact");
                return None;
            }
        }

        match self.directory.find_by_linked_email(identity).await {
            Ok(found) => found,
            Err(e) => {
                tracing::error!(error = %e, strategy = "linked_email", "Error finding contact");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Activity existence
// ---------------------------------------------------------------------------

/// Answers "does this subject have a qualifying activity in any role?".
#[derive(Clone)]
pub struct ActivityExistenceChecker {
    store: Arc<dyn ActivityStore>,
}

impl ActivityExistenceChecker {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// OR over target, assignee and source; stops at the first role with a
    /// match. A failed role query counts as no match for that role only.
    pub async fn exists(
        &self,
        subject: Subject,
        activity_type_ids: &BTreeSet<DbId>,
        status_ids: &BTreeSet<DbId>,
    ) -> bool {
        for role in ActivityRole::ALL {
            let query = ActivityQuery::new(subject, role, activity_type_ids, status_ids);
            match self.store.query(&query).await {
                Ok(records) if !records.is_empty() => {
                    tracing::debug!(
                        %subject,
                        %role,
                        matches = records.len(),
                        "Qualifying activity found"
                    );
                    return true;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, %subject, %role, "Error checking activities");
                }
            }
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Employer fallback
// ---------------------------------------------------------------------------

/// Resolves the organisation a contact works for.
#[derive(Clone)]
pub struct EmployerFallbackResolver {
    relationships: Arc<dyn RelationshipStore>,
}

impl EmployerFallbackResolver {
    pub fn new(relationships: Arc<dyn RelationshipStore>) -> Self {
        Self { relationships }
    }

    pub async fn employer_of(&self, subject: Subject, relationship_type_id: DbId) -> Option<Subject> {
        match self
            .relationships
            .find_active(subject, relationship_type_id)
            .await
        {
            Ok(employer) => employer,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    %subject,
                    relationship_type_id,
                    "Error finding employer"
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
