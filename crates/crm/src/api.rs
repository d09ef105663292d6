//! Low-level client for the CiviCRM APIv3 REST endpoint.
//!
//! Every call is a `POST` with form fields `entity`, `action`, `json`,
//! `api_key` and `key`. The reply is a JSON envelope:
//!
//! ```text
//! { "is_error": 0, "count": 1, "values": [ { ... } ] }
//! { "is_error": 1, "error_message": "...", "error_code": "..." }
//! ```

use activity_lock_core::LookupError;
use serde::Deserialize;
use serde_json::Value;

use crate::config::CrmConfig;

/// Errors from the CiviCRM REST layer.
#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// CiviCRM returned a non-2xx status code.
    #[error("CiviCRM HTTP error ({status}): {body}")]
    Http { status: u16, body: String },

    /// The envelope reported `is_error: 1`.
    #[error("CiviCRM API error ({code}): {message}")]
    Api { code: String, message: String },

    /// The body was not a recognisable APIv3 envelope.
    #[error("Unexpected CiviCRM response: {0}")]
    Malformed(String),
}

impl From<CrmError> for LookupError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::Request(e) if e.is_timeout() => LookupError::Timeout,
            CrmError::Request(e) => LookupError::Transport(e.to_string()),
            CrmError::Http { status, body } => LookupError::Api {
                code: status.to_string(),
                message: body,
            },
            CrmError::Api { code, message } => LookupError::Api { code, message },
            CrmError::Malformed(msg) => LookupError::Malformed(msg),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    is_error: i64,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    error_code: Option<Value>,
    #[serde(default)]
    values: Value,
}

/// Parse a raw APIv3 reply into its result rows.
///
/// `values` comes back either as an array (`sequential: 1`) or as an object
/// keyed by id; both are flattened into a list.
pub fn parse_envelope(body: &str) -> Result<Vec<Value>, CrmError> {
    let raw: RawEnvelope =
        serde_json::from_str(body).map_err(|e| CrmError::Malformed(e.to_string()))?;

    if raw.is_error != 0 {
        let code = match raw.error_code {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => "unknown".to_string(),
        };
        return Err(CrmError::Api {
            code,
            message: raw.error_message.unwrap_or_default(),
        });
    }

    match raw.values {
        Value::Array(rows) => Ok(rows),
        Value::Object(map) => Ok(map.into_iter().map(|(_, v)| v).collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(CrmError::Malformed(format!("values is not a list: {other}"))),
    }
}

/// Read an integer field that APIv3 may send as a number or a numeric string.
pub fn int_field(row: &Value, key: &str) -> Option<i64> {
    match row.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a string field, accepting numbers as well.
pub fn string_field(row: &Value, key: &str) -> Option<String> {
    match row.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// HTTP client for a single CiviCRM site.
pub struct CiviCrmApi {
    client: reqwest::Client,
    config: CrmConfig,
}

impl CiviCrmApi {
    pub fn new(config: CrmConfig) -> Result<Self, CrmError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: CrmConfig) -> Self {
        Self { client, config }
    }

    /// Run `entity.action` with the given parameters and return the rows.
    pub async fn call(
        &self,
        entity: &str,
        action: &str,
        params: &Value,
    ) -> Result<Vec<Value>, CrmError> {
        let json = params.to_string();
        let form = [
            ("entity", entity),
            ("action", action),
            ("json", json.as_str()),
            ("api_key", self.config.api_key.as_str()),
            ("key", self.config.site_key.as_str()),
        ];

        let response = self
            .client
            .post(&self.config.rest_url)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CrmError::Http {
                status: status.as_u16(),
                body,
            });
        }

        tracing::trace!(entity, action, "CiviCRM call completed");
        parse_envelope(&body)
    }
}
