use std::time::Duration;

use activity_lock_core::fields::FieldMapping;
use activity_lock_core::ClientSettings;

/// Quiet period after the last edit before a check is sent.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Per-form controller settings.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Absolute URL of the remote decision call.
    pub endpoint: String,
    pub form_id: String,
    pub fields: FieldMapping,
    pub debounce: Duration,
}

impl ControllerConfig {
    pub fn new(endpoint: impl Into<String>, form_id: impl Into<String>, fields: FieldMapping) -> Self {
        Self {
            endpoint: endpoint.into(),
            form_id: form_id.into(),
            fields,
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Build from the settings published by the server for a form.
    pub fn from_settings(base_url: &str, settings: ClientSettings) -> Self {
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), settings.check_url);
        Self::new(endpoint, settings.form_id, settings.fields)
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}
