//! Activity-lock core.
//!
//! Decides whether a form should be locked because the person filling it in
//! (or their employer) already has a qualifying activity in the CRM:
//!
//! - [`identity`] / [`fields`]: the three identity inputs and how forms name them.
//! - [`rule`]: per-form lock rule and persisted handler settings.
//! - [`collaborators`]: capability traits for the CRM, settings store and
//!   markup rendering.
//! - [`resolver`]: fail-open identity, activity and employer lookups.
//! - [`engine`]: the [`LockDecisionEngine`].
//! - [`markup`]: built-in lock message sanitizer.

pub mod collaborators;
pub mod engine;
pub mod error;
pub mod fields;
pub mod identity;
pub mod markup;
pub mod resolver;
pub mod rule;
pub mod types;

pub use engine::{LockDecision, LockDecisionEngine};
pub use error::{CoreError, LookupError};
pub use identity::{IdentityField, IdentityInput};
pub use rule::{ClientSettings, LockHandlerSettings, LockRuleConfig, MessageFormat};
pub use types::{DbId, Subject};
