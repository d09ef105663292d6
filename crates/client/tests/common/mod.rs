//! Scripted decision client and form fixtures for the controller tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use activity_lock_client::{
    ControllerConfig, DecisionClient, FormModel, InteractionController, TransportError,
};
use activity_lock_core::fields::{FieldMapping, FieldRegistry};
use activity_lock_core::{IdentityInput, LockDecision};
use async_trait::async_trait;
use tokio::sync::Notify;

pub const DEBOUNCE: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub enum Reply {
    Locked(String),
    Unlocked,
    Fail,
}

/// Answers every check with the current [`Reply`], optionally waiting on a
/// gate first so a call can be held in flight.
pub struct ScriptedClient {
    pub calls: Mutex<Vec<(String, IdentityInput)>>,
    pub reply: Mutex<Reply>,
    pub gate: Option<Arc<Notify>>,
}

impl ScriptedClient {
    pub fn replying(reply: Reply) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Mutex::new(reply),
            gate: None,
        }
    }

    pub fn gated(reply: Reply, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::replying(reply)
        }
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_identity(&self) -> Option<IdentityInput> {
        self.calls.lock().unwrap().last().map(|(_, identity)| identity.clone())
    }
}

#[async_trait]
impl DecisionClient for ScriptedClient {
    async fn check(
        &self,
        form_id: &str,
        identity: &IdentityInput,
    ) -> Result<LockDecision, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((form_id.to_string(), identity.clone()));

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let reply = self.reply.lock().unwrap().clone();
        match reply {
            Reply::Locked(message) => Ok(LockDecision::locked(message)),
            Reply::Unlocked => Ok(LockDecision::unlocked()),
            Reply::Fail => Err(TransportError::Status {
                status: 502,
                body: "bad gateway".into(),
            }),
        }
    }
}

pub fn mapping() -> FieldMapping {
    FieldMapping {
        first_name_field: "first_name".into(),
        last_name_field: "last_name".into(),
        email_field: "email".into(),
    }
}

/// Form with the three identity inputs (empty) and a comments box.
pub fn empty_form() -> Arc<FormModel> {
    let registry = FieldRegistry::from_mapping(&mapping()).unwrap();
    Arc::new(
        FormModel::new(registry)
            .with_input("first_name", "")
            .with_input("last_name", "")
            .with_input("email", "")
            .with_input("comments", ""),
    )
}

pub fn jane_form() -> Arc<FormModel> {
    let form = empty_form();
    form.set_value("first_name", "Jane");
    form.set_value("last_name", "Doe");
    form.set_value("email", "jane@x.com");
    form
}

pub fn controller(client: Arc<ScriptedClient>, form: Arc<FormModel>) -> InteractionController {
    let config = ControllerConfig::new("http://localhost/check", "event_signup", mapping());
    InteractionController::new(config, client, form).unwrap()
}

/// Type into an input and fire its change event.
pub fn edit(controller: &InteractionController, form: &FormModel, name: &str, value: &str) {
    form.set_value(name, value);
    controller.on_field_event(name);
}

/// Let the debounce timer fire and the resulting call complete.
pub async fn settle() {
    tokio::time::sleep(DEBOUNCE + Duration::from_millis(100)).await;
}
