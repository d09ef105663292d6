//! Shared harness for the HTTP integration tests.
//!
//! The router is built with the production middleware stack; the CRM and the
//! settings store are replaced by in-memory fakes.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use activity_lock_api::config::ServerConfig;
use activity_lock_api::router::build_app_router;
use activity_lock_api::state::AppState;
use activity_lock_core::collaborators::{
    ActivityQuery, ActivityRecord, ActivityStore, ContactDirectory, FormConfigStore,
    LookupResult, OptionCatalog, OptionValue, RelationshipStore,
};
use activity_lock_core::fields::FieldMapping;
use activity_lock_core::markup::BuiltinMarkupRenderer;
use activity_lock_core::{
    DbId, IdentityInput, LockDecisionEngine, LockHandlerSettings, LockRuleConfig, LookupError,
    MessageFormat, Subject,
};
use activity_lock_crm::CrmConfig;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const FIRST: &str = "civicrm_1_contact_1_contact_first_name";
pub const LAST: &str = "civicrm_1_contact_1_contact_last_name";
pub const EMAIL: &str = "civicrm_1_contact_1_email_email";

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

/// CRM with one known person (Jane Doe, jane@x.com, contact 12).
#[derive(Default)]
pub struct FakeCrm {
    /// Subjects that have a qualifying activity of any type and status.
    pub with_activity: HashSet<DbId>,
    /// Employer (relationship counterpart) of contact 12.
    pub employer: Option<DbId>,
    pub fail_catalog: bool,
    pub lookups: AtomicUsize,
}

impl FakeCrm {
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactDirectory for FakeCrm {
    async fn find_by_primary_email(&self, identity: &IdentityInput) -> LookupResult<Option<Subject>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok((identity == &jane()).then_some(Subject(12)))
    }

    async fn find_by_linked_email(&self, _identity: &IdentityInput) -> LookupResult<Option<Subject>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(None)
    }
}

#[async_trait]
impl ActivityStore for FakeCrm {
    async fn query(&self, query: &ActivityQuery) -> LookupResult<Vec<ActivityRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if !self.with_activity.contains(&query.subject.id()) {
            return Ok(Vec::new());
        }
        let activity_type_id = *query.activity_type_ids.iter().next().unwrap_or(&0);
        Ok(vec![ActivityRecord {
            id: 1,
            activity_type_id,
            status_id: 2,
        }])
    }
}

#[async_trait]
impl RelationshipStore for FakeCrm {
    async fn find_active(&self, subject: Subject, _type_id: DbId) -> LookupResult<Option<Subject>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.employer.filter(|_| subject == Subject(12)).map(Subject))
    }
}

#[async_trait]
impl OptionCatalog for FakeCrm {
    async fn activity_types(&self) -> LookupResult<Vec<OptionValue>> {
        if self.fail_catalog {
            return Err(LookupError::Transport("connection refused".into()));
        }
        Ok(vec![
            OptionValue {
                value: 1,
                label: "Meeting".into(),
            },
            OptionValue {
                value: 5,
                label: "Event Registration".into(),
            },
        ])
    }

    async fn activity_statuses(&self) -> LookupResult<Vec<OptionValue>> {
        if self.fail_catalog {
            return Err(LookupError::Timeout);
        }
        Ok(vec![OptionValue {
            value: 2,
            label: "Completed".into(),
        }])
    }
}

/// Settings store backed by a map.
#[derive(Default)]
pub struct MemoryForms {
    pub handlers: Mutex<HashMap<String, LockHandlerSettings>>,
    pub down: bool,
}

impl MemoryForms {
    pub fn with(settings: LockHandlerSettings) -> Self {
        let forms = Self::default();
        forms
            .handlers
            .lock()
            .unwrap()
            .insert(settings.form_id.clone(), settings);
        forms
    }

    fn check(&self) -> LookupResult<()> {
        if self.down {
            Err(LookupError::Transport("database unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl FormConfigStore for MemoryForms {
    async fn load(&self, form_id: &str) -> LookupResult<Option<LockHandlerSettings>> {
        self.check()?;
        Ok(self.handlers.lock().unwrap().get(form_id).cloned())
    }

    async fn save(&self, settings: &LockHandlerSettings) -> LookupResult<LockHandlerSettings> {
        self.check()?;
        self.handlers
            .lock()
            .unwrap()
            .insert(settings.form_id.clone(), settings.clone());
        Ok(settings.clone())
    }

    async fn remove(&self, form_id: &str) -> LookupResult<bool> {
        self.check()?;
        Ok(self.handlers.lock().unwrap().remove(form_id).is_some())
    }

    async fn ping(&self) -> LookupResult<()> {
        self.check()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn jane() -> IdentityInput {
    IdentityInput::new("Jane", "Doe", "jane@x.com")
}

pub fn mapping() -> FieldMapping {
    FieldMapping {
        first_name_field: FIRST.into(),
        last_name_field: LAST.into(),
        email_field: EMAIL.into(),
    }
}

/// Handler for `event_signup` locking on activity type 5.
pub fn event_signup() -> LockHandlerSettings {
    LockHandlerSettings {
        form_id: "event_signup".into(),
        fields: mapping(),
        rule: LockRuleConfig::new([5])
            .with_message("<p>Already registered</p>", MessageFormat::BasicHtml),
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:8080".to_string()],
        request_timeout_secs: 30,
        crm: CrmConfig {
            rest_url: "http://127.0.0.1:9/civicrm/ajax/rest".into(),
            api_key: String::new(),
            site_key: String::new(),
            timeout: std::time::Duration::from_secs(1),
        },
    }
}

/// Build the full application router over the given fakes.
pub fn build_test_app(crm: Arc<FakeCrm>, forms: Arc<MemoryForms>) -> Router {
    let config = test_config();
    let engine = LockDecisionEngine::from_collaborators(
        crm.clone(),
        crm.clone(),
        crm.clone(),
        Arc::new(BuiltinMarkupRenderer),
    );

    let state = AppState {
        config: Arc::new(config.clone()),
        engine: Arc::new(engine),
        forms,
        catalog: crm,
    };

    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, body: Option<&Value>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(&body)).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(&body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
