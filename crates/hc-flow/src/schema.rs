//! Data schemas for flow forms
//!
//! A [`DataSchema`] is an ordered set of fields, each marked required or
//! optional and validated by a [`Validator`]. It plays two roles: it is
//! serialized into the form the frontend renders, and it validates the
//! input submitted back before a flow step sees it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::selector::Selector;

/// Schema validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("expected a dictionary")]
    NotAMapping,

    #[error("required key not provided @ data['{0}']")]
    Required(String),

    #[error("extra keys not allowed @ data['{0}']")]
    ExtraKey(String),

    #[error("{message} for dictionary value @ data['{key}']")]
    InvalidValue { key: String, message: String },
}

/// Value validator attached to a schema field
#[derive(Debug, Clone, PartialEq)]
pub enum Validator {
    Selector(Selector),
    /// Plain integer, no bounds
    Int,
}

impl Validator {
    fn validate(&self, value: &Value) -> Result<Value, String> {
        match self {
            Validator::Selector(selector) => selector.validate(value),
            Validator::Int => match value {
                Value::Number(n) if n.is_i64() => Ok(value.clone()),
                _ => Err("expected int".to_string()),
            },
        }
    }
}

impl From<Selector> for Validator {
    fn from(selector: Selector) -> Self {
        Validator::Selector(selector)
    }
}

/// Whether a field must be submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// One field of a [`DataSchema`]
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub presence: Presence,
    pub validator: Validator,
    /// Filled in when the key is absent from the submission
    pub default: Option<Value>,
    /// Pre-filled in the rendered form, never applied on submission
    pub suggested_value: Option<Value>,
}

impl SchemaField {
    pub fn required(validator: impl Into<Validator>) -> Self {
        Self {
            presence: Presence::Required,
            validator: validator.into(),
            default: None,
            suggested_value: None,
        }
    }

    pub fn optional(validator: impl Into<Validator>) -> Self {
        Self {
            presence: Presence::Optional,
            ..Self::required(validator)
        }
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn suggested_value(mut self, value: impl Into<Value>) -> Self {
        self.suggested_value = Some(value.into());
        self
    }
}

/// Ordered form schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSchema {
    fields: IndexMap<String, SchemaField>,
}

impl DataSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, replacing any earlier field with the same name
    pub fn field(mut self, name: impl Into<String>, field: SchemaField) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn get(&self, name: &str) -> Option<&SchemaField> {
        self.fields.get(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &SchemaField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate submitted input, returning the normalized data.
    ///
    /// Output keys follow schema order; absent optional keys with a default
    /// are filled in.
    pub fn validate(&self, input: &Value) -> Result<Map<String, Value>, SchemaError> {
        let input = input.as_object().ok_or(SchemaError::NotAMapping)?;

        if let Some(extra) = input.keys().find(|k| !self.fields.contains_key(*k)) {
            return Err(SchemaError::ExtraKey(extra.clone()));
        }

        let mut output = Map::new();
        for (name, field) in &self.fields {
            match input.get(name) {
                Some(value) => {
                    let value = field.validator.validate(value).map_err(|message| {
                        SchemaError::InvalidValue {
                            key: name.clone(),
                            message,
                        }
                    })?;
                    output.insert(name.clone(), value);
                }
                None => match (field.presence, &field.default) {
                    (_, Some(default)) => {
                        output.insert(name.clone(), default.clone());
                    }
                    (Presence::Required, None) => {
                        return Err(SchemaError::Required(name.clone()));
                    }
                    (Presence::Optional, None) => {}
                },
            }
        }
        Ok(output)
    }

    /// Serialize for the frontend form renderer
    pub fn to_form_fields(&self) -> Vec<FormField> {
        self.fields
            .iter()
            .map(|(name, field)| {
                let (selector, field_type) = match &field.validator {
                    Validator::Selector(selector) => (Some(selector.clone()), None),
                    Validator::Int => (None, Some("integer".to_string())),
                };
                FormField {
                    name: name.clone(),
                    field_type,
                    required: (field.presence == Presence::Required).then_some(true),
                    optional: (field.presence == Presence::Optional).then_some(true),
                    default: field.default.clone(),
                    description: field.suggested_value.clone().map(|suggested_value| {
                        FieldDescription {
                            suggested_value: Some(suggested_value),
                        }
                    }),
                    selector,
                }
            })
            .collect()
    }
}

/// Form field as sent to the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<FieldDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<Selector>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_value: Option<Value>,
}
