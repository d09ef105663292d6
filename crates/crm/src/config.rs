use std::time::Duration;

/// Connection settings for the CiviCRM APIv3 REST endpoint.
#[derive(Debug, Clone)]
pub struct CrmConfig {
    /// Full REST endpoint URL, e.g. `https://crm.example.org/civicrm/ajax/rest`.
    pub rest_url: String,
    /// Per-user API key (`api_key`).
    pub api_key: String,
    /// Site key (`key`).
    pub site_key: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl CrmConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                                   |
    /// |------------------------|-------------------------------------------|
    /// | `CIVICRM_REST_URL`     | `http://localhost/civicrm/ajax/rest`      |
    /// | `CIVICRM_API_KEY`      | empty                                     |
    /// | `CIVICRM_SITE_KEY`     | empty                                     |
    /// | `CIVICRM_TIMEOUT_SECS` | `10`                                      |
    pub fn from_env() -> Self {
        let rest_url = std::env::var("CIVICRM_REST_URL")
            .unwrap_or_else(|_| "http://localhost/civicrm/ajax/rest".into());
        let api_key = std::env::var("CIVICRM_API_KEY").unwrap_or_default();
        let site_key = std::env::var("CIVICRM_SITE_KEY").unwrap_or_default();

        let timeout_secs: u64 = std::env::var("CIVICRM_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".into())
            .parse()
            .expect("CIVICRM_TIMEOUT_SECS must be a valid u64");

        Self {
            rest_url,
            api_key,
            site_key,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
