//! What the controller needs from a rendered form.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use activity_lock_core::fields::FieldRegistry;
use activity_lock_core::IdentityField;

/// A rendered form the controller can read and lock.
pub trait FormSurface: Send + Sync {
    /// Current value of a tracked input; empty when the input is absent.
    fn value(&self, field: IdentityField) -> String;

    /// Show `message`, disable every input except the tracked ones and hide
    /// the submit controls. Safe to call on an already locked form.
    fn lock(&self, message: &str);

    /// Undo [`lock`](Self::lock). No-op when the form is not locked.
    fn unlock(&self);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    pub value: String,
    pub disabled: bool,
}

#[derive(Debug)]
struct FormView {
    inputs: BTreeMap<String, Input>,
    lock_message: Option<String>,
    submit_visible: bool,
}

/// In-memory form: named inputs, a lock message slot and submit controls.
#[derive(Debug)]
pub struct FormModel {
    registry: FieldRegistry,
    view: Mutex<FormView>,
}

impl FormModel {
    pub fn new(registry: FieldRegistry) -> Self {
        Self {
            registry,
            view: Mutex::new(FormView {
                inputs: BTreeMap::new(),
                lock_message: None,
                submit_visible: true,
            }),
        }
    }

    pub fn with_input(self, name: &str, value: &str) -> Self {
        self.set_value(name, value);
        self
    }

    /// Set an input's value, adding the input if needed. Returns the identity
    /// field when the input is one of the tracked ones.
    pub fn set_value(&self, name: &str, value: &str) -> Option<IdentityField> {
        let mut view = self.view();
        view.inputs.entry(name.to_string()).or_default().value = value.to_string();
        self.registry.identify(name)
    }

    pub fn input(&self, name: &str) -> Option<Input> {
        self.view().inputs.get(name).cloned()
    }

    pub fn is_locked(&self) -> bool {
        self.view().lock_message.is_some()
    }

    pub fn lock_message(&self) -> Option<String> {
        self.view().lock_message.clone()
    }

    pub fn submit_visible(&self) -> bool {
        self.view().submit_visible
    }

    fn view(&self) -> MutexGuard<'_, FormView> {
        self.view.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FormSurface for FormModel {
    fn value(&self, field: IdentityField) -> String {
        let Some(registered) = self.registry.get(field) else {
            return String::new();
        };
        let view = self.view();
        registered
            .aliases
            .iter()
            .find_map(|alias| view.inputs.get(alias))
            .map(|input| input.value.clone())
            .unwrap_or_default()
    }

    fn lock(&self, message: &str) {
        let mut view = self.view();
        view.lock_message = Some(message.to_string());
        for (name, input) in view.inputs.iter_mut() {
            input.disabled = !self.registry.is_tracked(name);
        }
        view.submit_visible = false;
    }

    fn unlock(&self) {
        let mut view = self.view();
        if view.lock_message.take().is_none() {
            return;
        }
        for input in view.inputs.values_mut() {
            input.disabled = false;
        }
        view.submit_visible = true;
    }
}
