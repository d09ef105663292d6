use std::fmt;

use serde::{Deserialize, Serialize};

/// CRM record identifiers (contacts, activity types, statuses, relationship
/// types) are integers.
pub type DbId = i64;

/// A resolved contact in the backing CRM.
///
/// Produced by the identity resolver and consumed by the activity checker and
/// the employer fallback. Lives for a single decision only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subject(pub DbId);

impl Subject {
    pub fn id(self) -> DbId {
        self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<DbId> for Subject {
    fn from(id: DbId) -> Self {
        Self(id)
    }
}
