//! Remote decision call.

use std::time::Duration;

use activity_lock_core::{ClientSettings, IdentityInput, LockDecision};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server answered {status}: {body}")]
    Status { status: u16, body: String },
}

/// Sends one check for a form and returns the server's decision.
#[async_trait]
pub trait DecisionClient: Send + Sync {
    async fn check(
        &self,
        form_id: &str,
        identity: &IdentityInput,
    ) -> Result<LockDecision, TransportError>;
}

#[derive(Debug, Serialize)]
struct CheckPayload<'a> {
    first_name: &'a str,
    last_name: &'a str,
    email: &'a str,
    form_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CheckReply {
    activity_exists: bool,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

/// [`DecisionClient`] posting JSON to the check endpoint.
#[derive(Debug, Clone)]
pub struct HttpDecisionClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpDecisionClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, endpoint))
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Fetch the settings a page needs to attach a controller to `form_id`.
    pub async fn fetch_settings(
        client: &reqwest::Client,
        base_url: &str,
        form_id: &str,
    ) -> Result<ClientSettings, TransportError> {
        let url = format!(
            "{}/api/v1/forms/{form_id}/activity-lock/settings",
            base_url.trim_end_matches('/')
        );
        let response = ensure_success(client.get(url).send().await?).await?;
        let envelope: DataEnvelope<ClientSettings> = response.json().await?;
        Ok(envelope.data)
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl DecisionClient for HttpDecisionClient {
    async fn check(
        &self,
        form_id: &str,
        identity: &IdentityInput,
    ) -> Result<LockDecision, TransportError> {
        let payload = CheckPayload {
            first_name: &identity.first_name,
            last_name: &identity.last_name,
            email: &identity.email,
            form_id,
        };

        let response = self.client.post(&self.endpoint).json(&payload).send().await?;
        let reply: CheckReply = ensure_success(response).await?.json().await?;

        Ok(if reply.activity_exists {
            LockDecision::locked(reply.message)
        } else {
            LockDecision::unlocked()
        })
    }
}
