//! Per-form interaction controller.
//!
//! Edits to the tracked inputs restart a debounce timer. When it fires the
//! controller reads the three values and posts a check unless a value is
//! empty, the values equal the last checked ones, or a check is already in
//! flight. The answer locks or unlocks the form; a failed call leaves the
//! form as it was.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use activity_lock_core::fields::FieldRegistry;
use activity_lock_core::{CoreError, IdentityField, IdentityInput};
use tokio_util::sync::CancellationToken;

use crate::config::ControllerConfig;
use crate::session::{CheckSession, ControllerState};
use crate::surface::FormSurface;
use crate::transport::DecisionClient;

struct Inner {
    config: ControllerConfig,
    registry: FieldRegistry,
    client: Arc<dyn DecisionClient>,
    surface: Arc<dyn FormSurface>,
    session: Mutex<CheckSession>,
}

/// Cheap to clone; clones drive the same form.
#[derive(Clone)]
pub struct InteractionController {
    inner: Arc<Inner>,
}

impl InteractionController {
    pub fn new(
        config: ControllerConfig,
        client: Arc<dyn DecisionClient>,
        surface: Arc<dyn FormSurface>,
    ) -> Result<Self, CoreError> {
        let registry = FieldRegistry::from_mapping(&config.fields)?;
        Ok(Self {
            inner: Arc::new(Inner {
                config,
                registry,
                client,
                surface,
                session: Mutex::new(CheckSession::default()),
            }),
        })
    }

    pub fn state(&self) -> ControllerState {
        self.inner.session().state
    }

    pub fn is_checking(&self) -> bool {
        self.inner.session().is_checking
    }

    /// Change or blur event on any input. Untracked inputs are ignored.
    /// Returns whether a check was scheduled.
    pub fn on_field_event(&self, input_name: &str) -> bool {
        if !self.inner.registry.is_tracked(input_name) {
            return false;
        }
        self.notify_change();
        true
    }

    /// Restart the debounce timer. Must be called inside a tokio runtime.
    pub fn notify_change(&self) {
        let token = self.inner.session().restart_debounce();
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(inner.config.debounce) => {
                    inner.fire(token).await;
                }
            }
        });
    }

    /// Check the current values right away, skipping the debounce. Same
    /// drop rules as a fired timer.
    pub async fn check_now(&self) {
        self.inner.run_check().await;
    }
}

impl Inner {
    fn session(&self) -> MutexGuard<'_, CheckSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_values(&self) -> IdentityInput {
        IdentityInput::new(
            self.surface.value(IdentityField::FirstName),
            self.surface.value(IdentityField::LastName),
            self.surface.value(IdentityField::Email),
        )
    }

    async fn fire(&self, token: CancellationToken) {
        {
            let mut session = self.session();
            if token.is_cancelled() {
                return;
            }
            session.pending = None;
        }
        self.run_check().await;
    }

    async fn run_check(&self) {
        let values = self.current_values();
        let started = self.session().begin(values);
        let Some(identity) = started else {
            tracing::trace!(form_id = %self.config.form_id, "Activity check skipped");
            return;
        };

        let outcome = match self.client.check(&self.config.form_id, &identity).await {
            Ok(decision) if decision.locked => {
                self.surface.lock(&decision.message);
                Some(true)
            }
            Ok(_) => {
                self.surface.unlock();
                Some(false)
            }
            Err(err) => {
                tracing::warn!(
                    form_id = %self.config.form_id,
                    error = %err,
                    "Activity check failed, form left unchanged",
                );
                None
            }
        };

        self.session().finish(outcome);
    }
}
