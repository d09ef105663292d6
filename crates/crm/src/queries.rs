//! APIv3 parameter builders.
//!
//! Kept separate from the transport so the exact requests sent to CiviCRM
//! can be asserted without a server.

use activity_lock_core::collaborators::{ActivityQuery, ActivityRole};
use activity_lock_core::{DbId, IdentityInput, Subject};
use serde_json::{json, Value};

/// Option groups listed for handler configuration.
pub const ACTIVITY_TYPE_GROUP: &str = "activity_type";
pub const ACTIVITY_STATUS_GROUP: &str = "activity_status";

/// `Contact.get` matching the contact's own email field.
pub fn contact_by_primary_email(identity: &IdentityInput) -> Value {
    json!({
        "sequential": 1,
        "first_name": identity.first_name,
        "last_name": identity.last_name,
        "email": identity.email,
        "return": ["id"],
    })
}

/// `Contact.get` chained with `Email.get`, for addresses stored only as
/// separate email records.
pub fn contact_by_linked_email(identity: &IdentityInput) -> Value {
    json!({
        "sequential": 1,
        "first_name": identity.first_name,
        "last_name": identity.last_name,
        "return": ["id"],
        "api.Email.get": {
            "contact_id": "$value.id",
            "email": identity.email,
        },
    })
}

/// Contact-id parameter selecting the role the subject plays.
pub fn role_param(role: ActivityRole) -> &'static str {
    match role {
        ActivityRole::Target => "target_contact_id",
        ActivityRole::Assignee => "assignee_contact_id",
        ActivityRole::Source => "source_contact_id",
    }
}

/// `Activity.get` for one role. Only existence matters, so one row is enough.
pub fn activities(query: &ActivityQuery) -> Value {
    let mut params = json!({
        "sequential": 1,
        "activity_type_id": { "IN": query.activity_type_ids },
        "return": ["id", "activity_type_id", "status_id"],
        "options": { "limit": 1 },
    });
    params[role_param(query.role)] = json!(query.subject.id());
    if let Some(statuses) = &query.status_ids {
        params["status_id"] = json!({ "IN": statuses });
    }
    params
}

/// `Relationship.get` for the subject's active relationships of one type.
pub fn active_relationship(subject: Subject, relationship_type_id: DbId) -> Value {
    json!({
        "sequential": 1,
        "contact_id_a": subject.id(),
        "relationship_type_id": relationship_type_id,
        "is_active": 1,
        "return": ["contact_id_b"],
        "options": { "limit": 1 },
    })
}

/// `OptionValue.get` for an option group, active values sorted by weight.
pub fn option_values(group: &str) -> Value {
    json!({
        "sequential": 1,
        "option_group_id": group,
        "is_active": 1,
        "return": ["value", "label"],
        "options": { "sort": "weight", "limit": 0 },
    })
}
