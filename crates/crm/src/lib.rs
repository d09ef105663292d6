//! CiviCRM adapter for the activity lock.
//!
//! [`CiviCrm`] implements the core's `ContactDirectory`, `ActivityStore` and
//! `RelationshipStore` over the APIv3 REST endpoint, plus `OptionCatalog` for
//! the activity types and statuses offered when a handler is configured.

pub mod api;
pub mod civicrm;
pub mod config;
pub mod queries;

pub use api::{CiviCrmApi, CrmError};
pub use civicrm::CiviCrm;
pub use config::CrmConfig;
