//! Per-form check session.

use activity_lock_core::IdentityInput;
use tokio_util::sync::CancellationToken;

/// Where a form's controller currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Nothing checked yet, nothing pending.
    Idle,
    /// An edit arrived; waiting for the debounce timer.
    PendingDebounce,
    /// Remote decision call in flight.
    Checking,
    Locked,
    /// Last check answered "not locked". Behaves like `Idle`.
    Unlocked,
}

/// Mutable state of one form's controller.
#[derive(Debug)]
pub struct CheckSession {
    pub state: ControllerState,
    /// Values sent with the most recent call, successful or not.
    pub last_checked: Option<IdentityInput>,
    /// At most one call in flight; triggers arriving meanwhile are dropped.
    pub is_checking: bool,
    /// Cancels the pending debounce timer.
    pub pending: Option<CancellationToken>,
    /// Outcome last applied to the form.
    pub locked: Option<bool>,
}

impl Default for CheckSession {
    fn default() -> Self {
        Self {
            state: ControllerState::Idle,
            last_checked: None,
            is_checking: false,
            pending: None,
            locked: None,
        }
    }
}

impl CheckSession {
    /// Replace any pending timer with a fresh one and return its token.
    pub fn restart_debounce(&mut self) -> CancellationToken {
        if let Some(previous) = self.pending.take() {
            previous.cancel();
        }
        let token = CancellationToken::new();
        self.pending = Some(token.clone());
        if !self.is_checking {
            self.state = ControllerState::PendingDebounce;
        }
        token
    }

    /// State to return to when nothing is pending or in flight.
    pub fn resting_state(&self) -> ControllerState {
        match self.locked {
            None => ControllerState::Idle,
            Some(true) => ControllerState::Locked,
            Some(false) => ControllerState::Unlocked,
        }
    }

    /// Settle after a timer fired without starting a call.
    pub fn settle(&mut self) {
        if !self.is_checking {
            self.state = self.resting_state();
        }
    }

    /// Start a check for `values`, or `None` if the trigger is dropped.
    pub fn begin(&mut self, values: IdentityInput) -> Option<IdentityInput> {
        if !values.is_complete()
            || self.last_checked.as_ref() == Some(&values)
            || self.is_checking
        {
            self.settle();
            return None;
        }
        self.is_checking = true;
        self.last_checked = Some(values.clone());
        self.state = ControllerState::Checking;
        Some(values)
    }

    /// Record the end of the in-flight call. `outcome` is `None` when the
    /// call failed and the form was left untouched.
    pub fn finish(&mut self, outcome: Option<bool>) {
        self.is_checking = false;
        if outcome.is_some() {
            self.locked = outcome;
        }
        self.state = if self.pending.is_some() {
            ControllerState::PendingDebounce
        } else {
            self.resting_state()
        };
    }
}
