//! Lock decision engine.
//!
//! Composes the resolvers into a single yes/no answer for a form:
//!
//! 1. incomplete identity or no activity types -> unlocked, no lookups;
//! 2. no matching contact -> unlocked;
//! 3. qualifying activity for the contact -> locked;
//! 4. employer check enabled and the employer qualifies -> locked;
//! 5. otherwise unlocked.
//!
//! The engine holds no mutable state and can be shared across requests.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::collaborators::{ActivityStore, ContactDirectory, MarkupRenderer, RelationshipStore};
use crate::identity::IdentityInput;
use crate::resolver::{ActivityExistenceChecker, EmployerFallbackResolver, IdentityResolver};
use crate::rule::LockRuleConfig;

/// Outcome of one decision. `message` is empty unless `locked`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockDecision {
    pub locked: bool,
    pub message: String,
}

impl LockDecision {
    pub fn unlocked() -> Self {
        Self::default()
    }

    pub fn locked(message: String) -> Self {
        Self {
            locked: true,
            message,
        }
    }
}

/// Which path produced a lock; logged with every positive decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LockReason {
    Contact,
    Employer,
}

#[derive(Clone)]
pub struct LockDecisionEngine {
    identities: IdentityResolver,
    activities: ActivityExistenceChecker,
    employers: EmployerFallbackResolver,
    renderer: Arc<dyn MarkupRenderer>,
}

impl LockDecisionEngine {
    pub fn new(
        identities: IdentityResolver,
        activities: ActivityExistenceChecker,
        employers: EmployerFallbackResolver,
        renderer: Arc<dyn MarkupRenderer>,
    ) -> Self {
        Self {
            identities,
            activities,
            employers,
            renderer,
        }
    }

    /// Build an engine straight from collaborator implementations.
    pub fn from_collaborators(
        contacts: Arc<dyn ContactDirectory>,
        activities: Arc<dyn ActivityStore>,
        relationships: Arc<dyn RelationshipStore>,
        renderer: Arc<dyn MarkupRenderer>,
    ) -> Self {
        Self::new(
            IdentityResolver::new(contacts),
            ActivityExistenceChecker::new(activities),
            EmployerFallbackResolver::new(relationships),
            renderer,
        )
    }

    pub async fn decide(&self, identity: &IdentityInput, config: &LockRuleConfig) -> LockDecision {
        if !identity.is_complete() || !config.is_actionable() {
            return LockDecision::unlocked();
        }

        let Some(subject) = self.identities.resolve(identity).await else {
            tracing::debug!("No matching contact, form stays unlocked");
            return LockDecision::unlocked();
        };

        let reason = if self
            .activities
            .exists(subject, &config.activity_type_ids, &config.status_ids)
            .await
        {
            Some(LockReason::Contact)
        } else if config.check_employer {
            match self
                .employers
                .employer_of(subject, config.employer_relationship_type_id)
                .await
            {
                Some(employer)
                    if self
                        .activities
                        .exists(employer, &config.activity_type_ids, &config.status_ids)
                        .await =>
                {
                    Some(LockReason::Employer)
                }
                _ => None,
            }
        } else {
            None
        };

        match reason {
            Some(reason) => {
                tracing::info!(%subject, ?reason, "Activity lock applies");
                LockDecision::locked(
                    self.renderer
                        .render(config.effective_message(), config.lock_message_format),
                )
            }
            None => LockDecision::unlocked(),
        }
    }
}
