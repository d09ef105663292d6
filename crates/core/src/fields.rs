//! Typed registry of the form fields that carry the identity values.
//!
//! Host forms name inputs in several ways (`first_name`,
//! `elements[first_name]`, `edit-first-name`). The registry resolves every
//! accepted spelling once, when the form is built, so lookups afterwards are
//! plain map hits keyed by [`IdentityField`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::identity::{IdentityField, IdentityInput};

/// Machine names of the three tracked form fields. Blank until configured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub first_name_field: String,
    pub last_name_field: String,
    pub email_field: String,
}

impl FieldMapping {
    pub fn name_of(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::FirstName => &self.first_name_field,
            IdentityField::LastName => &self.last_name_field,
            IdentityField::Email => &self.email_field,
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        for field in IdentityField::ALL {
            if self.name_of(field).trim().is_empty() {
                return Err(CoreError::Validation(format!(
                    "A form field must be mapped to {field}"
                )));
            }
        }
        Ok(())
    }
}

/// Identity field resolved from a [`FieldMapping`] with every accepted alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredField {
    pub field: IdentityField,
    /// Configured machine name, e.g. `civicrm_1_contact_1_contact_first_name`.
    pub name: String,
    /// Every spelling a host form may use for this input.
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FieldRegistry {
    fields: BTreeMap<IdentityField, RegisteredField>,
    by_alias: BTreeMap<String, IdentityField>,
}

impl FieldRegistry {
    pub fn from_mapping(mapping: &FieldMapping) -> Result<Self, CoreError> {
        mapping.validate()?;

        let mut registry = Self::default();
        for field in IdentityField::ALL {
            let name = mapping.name_of(field).trim().to_string();
            let aliases = aliases_for(&name);
            for alias in &aliases {
                registry.by_alias.insert(alias.clone(), field);
            }
            registry.fields.insert(
                field,
                RegisteredField {
                    field,
                    name,
                    aliases,
                },
            );
        }
        Ok(registry)
    }

    pub fn get(&self, field: IdentityField) -> Option<&RegisteredField> {
        self.fields.get(&field)
    }

    /// Configured machine name of `field`.
    pub fn name_of(&self, field: IdentityField) -> Option<&str> {
        self.fields.get(&field).map(|f| f.name.as_str())
    }

    /// Map any accepted spelling of an input name back to its identity field.
    pub fn identify(&self, input_name: &str) -> Option<IdentityField> {
        self.by_alias.get(input_name).copied()
    }

    pub fn is_tracked(&self, input_name: &str) -> bool {
        self.by_alias.contains_key(input_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredField> {
        self.fields.values()
    }

    /// Collect the identity values out of submitted form values keyed by
    /// input name. Untracked inputs are ignored; missing ones stay empty.
    pub fn identity_from<'a, I>(&self, values: I) -> IdentityInput
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut identity = IdentityInput::default();
        for (name, value) in values {
            let slot = match self.identify(name) {
                Some(IdentityField::FirstName) => &mut identity.first_name,
                Some(IdentityField::LastName) => &mut identity.last_name,
                Some(IdentityField::Email) => &mut identity.email,
                None => continue,
            };
            *slot = value.to_string();
        }
        identity
    }
}

fn aliases_for(name: &str) -> Vec<String> {
    let dashed = name.replace('_', "-");
    vec![
        name.to_string(),
        format!("elements[{name}]"),
        format!("edit-{dashed}"),
    ]
}
