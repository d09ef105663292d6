//! In-memory CRM used by the engine tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use activity_lock_core::collaborators::{
    ActivityQuery, ActivityRecord, ActivityRole, ActivityStore, ContactDirectory, LookupResult,
    RelationshipStore,
};
use activity_lock_core::markup::BuiltinMarkupRenderer;
use activity_lock_core::{DbId, IdentityInput, LockDecisionEngine, LookupError, Subject};
use async_trait::async_trait;

pub struct Contact {
    pub id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub primary_email: Option<String>,
    pub other_emails: Vec<String>,
}

/// Call counters for every collaborator method.
#[derive(Default)]
pub struct Calls {
    pub primary_lookups: AtomicUsize,
    pub linked_lookups: AtomicUsize,
    pub activity_queries: AtomicUsize,
    pub relationship_lookups: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.primary_lookups.load(Ordering::SeqCst)
            + self.linked_lookups.load(Ordering::SeqCst)
            + self.activity_queries.load(Ordering::SeqCst)
            + self.relationship_lookups.load(Ordering::SeqCst)
    }

    pub fn relationships(&self) -> usize {
        self.relationship_lookups.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeCrm {
    pub contacts: Vec<Contact>,
    pub activities: Vec<(ActivityRole, Subject, ActivityRecord)>,
    /// `(contact_a, relationship_type_id, contact_b, is_active)`
    pub relationships: Vec<(DbId, DbId, DbId, bool)>,
    pub fail_contacts: bool,
    pub calls: Calls,
    pub queried_subjects: Mutex<Vec<Subject>>,
}

impl FakeCrm {
    pub fn with_contact(mut self, id: DbId, first: &str, last: &str, email: &str) -> Self {
        self.contacts.push(Contact {
            id,
            first_name: first.into(),
            last_name: last.into(),
            primary_email: Some(email.into()),
            other_emails: Vec::new(),
        });
        self
    }

    pub fn with_activity(
        mut self,
        role: ActivityRole,
        subject: DbId,
        activity_type_id: DbId,
        status_id: DbId,
    ) -> Self {
        let id = self.activities.len() as DbId + 1;
        self.activities.push((
            role,
            Subject(subject),
            ActivityRecord {
                id,
                activity_type_id,
                status_id,
            },
        ));
        self
    }

    pub fn with_employer(mut self, contact: DbId, relationship_type_id: DbId, employer: DbId) -> Self {
        self.relationships
            .push((contact, relationship_type_id, employer, true));
        self
    }

    pub fn engine(self: &Arc<Self>) -> LockDecisionEngine {
        LockDecisionEngine::from_collaborators(
            self.clone(),
            self.clone(),
            self.clone(),
            Arc::new(BuiltinMarkupRenderer),
        )
    }

    fn matches_name(contact: &Contact, identity: &IdentityInput) -> bool {
        contact.first_name == identity.first_name && contact.last_name == identity.last_name
    }
}

#[async_trait]
impl ContactDirectory for FakeCrm {
    async fn find_by_primary_email(&self, identity: &IdentityInput) -> LookupResult<Option<Subject>> {
        self.calls.primary_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_contacts {
            return Err(LookupError::Timeout);
        }
        Ok(self
            .contacts
            .iter()
            .find(|c| {
                Self::matches_name(c, identity)
                    && c.primary_email.as_deref() == Some(identity.email.as_str())
            })
            .map(|c| Subject(c.id)))
    }

    async fn find_by_linked_email(&self, identity: &IdentityInput) -> LookupResult<Option<Subject>> {
        self.calls.linked_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_contacts {
            return Err(LookupError::Timeout);
        }
        Ok(self
            .contacts
            .iter()
            .find(|c| Self::matches_name(c, identity) && c.other_emails.contains(&identity.email))
            .map(|c| Subject(c.id)))
    }
}

#[async_trait]
impl ActivityStore for FakeCrm {
    async fn query(&self, query: &ActivityQuery) -> LookupResult<Vec<ActivityRecord>> {
        self.calls.activity_queries.fetch_add(1, Ordering::SeqCst);
        self.queried_subjects.lock().unwrap().push(query.subject);
        Ok(self
            .activities
            .iter()
            .filter(|(role, subject, rec)| {
                *role == query.role
                    && *subject == query.subject
                    && query.accepts(rec.activity_type_id, rec.status_id)
            })
            .map(|(_, _, rec)| rec.clone())
            .collect())
    }
}

#[async_trait]
impl RelationshipStore for FakeCrm {
    async fn find_active(
        &self,
        subject: Subject,
        relationship_type_id: DbId,
    ) -> LookupResult<Option<Subject>> {
        self.calls.relationship_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .relationships
            .iter()
            .find(|(a, rel_type, _, active)| {
                *a == subject.id() && *rel_type == relationship_type_id && *active
            })
            .map(|(_, _, b, _)| Subject(*b)))
    }
}

pub fn jane() -> IdentityInput {
    IdentityInput::new("Jane", "Doe", "jane@x.com")
}
