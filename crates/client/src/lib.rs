//! Form-side half of the activity lock.
//!
//! An [`InteractionController`] watches the three identity inputs of one
//! form, debounces edits, posts the remote decision call and applies the
//! answer to a [`FormSurface`]. Each form instance gets its own controller,
//! so several forms can live on one page.

pub mod config;
pub mod controller;
pub mod session;
pub mod surface;
pub mod transport;

pub use config::ControllerConfig;
pub use controller::InteractionController;
pub use session::ControllerState;
pub use surface::{FormModel, FormSurface};
pub use transport::{DecisionClient, HttpDecisionClient, TransportError};
