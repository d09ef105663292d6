//! Lock rule configuration and the persisted per-form handler settings.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::fields::FieldMapping;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// CiviCRM's stock "Employee of" relationship type.
pub const DEFAULT_RELATIONSHIP_TYPE_ID: DbId = 4;

pub const DEFAULT_LOCK_MESSAGE: &str =
    "This form is currently locked because a matching activity already exists in our system.";

/// Used when a handler exists but its message was left blank.
pub const FALLBACK_LOCK_MESSAGE: &str = "Form is locked";

// ---------------------------------------------------------------------------
// MessageFormat
// ---------------------------------------------------------------------------

/// Text format the lock message is authored in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageFormat {
    PlainText,
    #[default]
    BasicHtml,
    RestrictedHtml,
    FullHtml,
}

impl MessageFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageFormat::PlainText => "plain_text",
            MessageFormat::BasicHtml => "basic_html",
            MessageFormat::RestrictedHtml => "restricted_html",
            MessageFormat::FullHtml => "full_html",
        }
    }
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plain_text" => Ok(MessageFormat::PlainText),
            "basic_html" => Ok(MessageFormat::BasicHtml),
            "restricted_html" => Ok(MessageFormat::RestrictedHtml),
            "full_html" => Ok(MessageFormat::FullHtml),
            other => Err(CoreError::Validation(format!(
                "Unknown lock message format '{other}'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// LockRuleConfig
// ---------------------------------------------------------------------------

/// The rule evaluated by the decision engine for one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRuleConfig {
    /// Activity types that qualify. Must be non-empty for a lock to apply.
    #[serde(default)]
    pub activity_type_ids: BTreeSet<DbId>,
    /// Statuses that qualify. Empty means any status.
    #[serde(default)]
    pub status_ids: BTreeSet<DbId>,
    #[serde(default)]
    pub check_employer: bool,
    #[serde(default = "default_relationship_type_id")]
    pub employer_relationship_type_id: DbId,
    #[serde(default = "default_lock_message")]
    pub lock_message: String,
    #[serde(default)]
    pub lock_message_format: MessageFormat,
}

fn default_relationship_type_id() -> DbId {
    DEFAULT_RELATIONSHIP_TYPE_ID
}

fn default_lock_message() -> String {
    DEFAULT_LOCK_MESSAGE.to_string()
}

impl LockRuleConfig {
    pub fn new(activity_type_ids: impl IntoIterator<Item = DbId>) -> Self {
        Self {
            activity_type_ids: activity_type_ids.into_iter().collect(),
            status_ids: BTreeSet::new(),
            check_employer: false,
            employer_relationship_type_id: DEFAULT_RELATIONSHIP_TYPE_ID,
            lock_message: DEFAULT_LOCK_MESSAGE.to_string(),
            lock_message_format: MessageFormat::default(),
        }
    }

    pub fn with_statuses(mut self, status_ids: impl IntoIterator<Item = DbId>) -> Self {
        self.status_ids = status_ids.into_iter().collect();
        self
    }

    pub fn with_employer(mut self, relationship_type_id: DbId) -> Self {
        self.check_employer = true;
        self.employer_relationship_type_id = relationship_type_id;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>, format: MessageFormat) -> Self {
        self.lock_message = message.into();
        self.lock_message_format = format;
        self
    }

    /// A rule without activity types can never lock.
    pub fn is_actionable(&self) -> bool {
        !self.activity_type_ids.is_empty()
    }

    pub fn ensure_actionable(&self) -> Result<(), CoreError> {
        if self.is_actionable() {
            Ok(())
        } else {
            Err(CoreError::Configuration(
                "Handler not properly configured - activity types required".into(),
            ))
        }
    }

    /// Message text to render, falling back when the stored one is blank.
    pub fn effective_message(&self) -> &str {
        if self.lock_message.trim().is_empty() {
            FALLBACK_LOCK_MESSAGE
        } else {
            &self.lock_message
        }
    }
}

// ---------------------------------------------------------------------------
// LockHandlerSettings
// ---------------------------------------------------------------------------

/// Everything a form's activity-lock handler stores: the rule plus the
/// machine names of the identity fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHandlerSettings {
    pub form_id: String,
    #[serde(flatten)]
    pub fields: FieldMapping,
    #[serde(flatten)]
    pub rule: LockRuleConfig,
}

impl LockHandlerSettings {
    /// Validation applied when settings are saved.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.form_id.trim().is_empty() {
            return Err(CoreError::Validation("form_id is required".into()));
        }
        if self.rule.activity_type_ids.is_empty() {
            return Err(CoreError::Validation(
                "At least one activity type must be selected".into(),
            ));
        }
        if self.rule.employer_relationship_type_id < 1 {
            return Err(CoreError::Validation(
                "relationship_type_id must be at least 1".into(),
            ));
        }
        self.fields.validate()
    }

    /// What a page hosting this form needs to run the interaction controller.
    pub fn client_settings(&self, check_url: impl Into<String>) -> ClientSettings {
        ClientSettings {
            form_id: self.form_id.clone(),
            check_url: check_url.into(),
            fields: self.fields.clone(),
        }
    }
}

/// Client-facing subset of [`LockHandlerSettings`]: no rule details leak to
/// the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSettings {
    pub form_id: String,
    /// Where the remote decision call is posted.
    pub check_url: String,
    #[serde(flatten)]
    pub fields: FieldMapping,
}
