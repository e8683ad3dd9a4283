//! Flow step results
//!
//! Flow handlers return a [`StepResult`]. The flow manager finishes it
//! (persisting entries where needed) and hands the frontend a
//! [`FlowResult`].

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::schema::{DataSchema, FormField};

/// Outcome of a single flow step
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// Show (or re-show) a form
    ShowForm(FormStep),
    /// Finish the flow with data for the entry
    CreateEntry { title: String, data: Map<String, Value> },
    /// Finish the flow without creating anything
    Abort { reason: String },
}

/// A form to render
#[derive(Debug, Clone, PartialEq)]
pub struct FormStep {
    pub step_id: String,
    pub data_schema: DataSchema,
    pub errors: HashMap<String, String>,
    pub description_placeholders: Option<HashMap<String, String>>,
    pub last_step: Option<bool>,
}

impl FormStep {
    pub fn new(step_id: impl Into<String>, data_schema: DataSchema) -> Self {
        Self {
            step_id: step_id.into(),
            data_schema,
            errors: HashMap::new(),
            description_placeholders: None,
            last_step: None,
        }
    }

    /// Attach an error to a field, or to the whole form with key `base`
    pub fn error(mut self, field: impl Into<String>, code: impl Into<String>) -> Self {
        self.errors.insert(field.into(), code.into());
        self
    }

    pub fn errors(mut self, errors: HashMap<String, String>) -> Self {
        self.errors = errors;
        self
    }

    pub fn last_step(mut self, last_step: bool) -> Self {
        self.last_step = Some(last_step);
        self
    }
}

impl StepResult {
    pub fn show_form(form: FormStep) -> Self {
        StepResult::ShowForm(form)
    }

    pub fn create_entry(title: impl Into<String>, data: Map<String, Value>) -> Self {
        StepResult::CreateEntry {
            title: title.into(),
            data,
        }
    }

    pub fn abort(reason: impl Into<String>) -> Self {
        StepResult::Abort {
            reason: reason.into(),
        }
    }
}

/// Result type discriminator on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowResultType {
    Form,
    CreateEntry,
    Abort,
}

/// Result of a config flow step as sent to the frontend
#[derive(Debug, Clone, Serialize)]
pub struct FlowResult {
    /// Flow ID
    pub flow_id: String,
    /// Handler (integration domain)
    pub handler: String,
    #[serde(rename = "type")]
    pub result_type: FlowResultType,
    /// Current step ID (for form type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    /// Form schema; empty when not a form
    pub data_schema: Vec<FormField>,
    /// Errors from the previous submission (null if none)
    pub errors: Option<HashMap<String, String>>,
    /// Description placeholders for the form (null if none)
    pub description_placeholders: Option<HashMap<String, String>>,
    /// Title (for create_entry type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Abort reason (for abort type)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<u32>,
    /// Entry data (for create_entry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// The created or updated config entry (for create_entry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Whether this is the last step (submit vs next button in frontend)
    pub last_step: Option<bool>,
    /// Preview component to display in frontend
    pub preview: Option<String>,
}

impl FlowResult {
    fn base(flow_id: &str, handler: &str, result_type: FlowResultType) -> Self {
        Self {
            flow_id: flow_id.to_string(),
            handler: handler.to_string(),
            result_type,
            step_id: None,
            data_schema: Vec::new(),
            errors: None,
            description_placeholders: None,
            title: None,
            reason: None,
            version: None,
            minor_version: None,
            data: None,
            result: None,
            last_step: None,
            preview: None,
        }
    }

    pub fn form(flow_id: &str, handler: &str, form: &FormStep) -> Self {
        Self {
            step_id: Some(form.step_id.clone()),
            data_schema: form.data_schema.to_form_fields(),
            errors: (!form.errors.is_empty()).then(|| form.errors.clone()),
            description_placeholders: form.description_placeholders.clone(),
            last_step: form.last_step,
            ..Self::base(flow_id, handler, FlowResultType::Form)
        }
    }

    pub fn create_entry(
        flow_id: &str,
        handler: &str,
        title: String,
        data: Map<String, Value>,
        result: Option<Value>,
    ) -> Self {
        Self {
            title: Some(title),
            data: Some(data),
            result,
            ..Self::base(flow_id, handler, FlowResultType::CreateEntry)
        }
    }

    pub fn abort(flow_id: &str, handler: &str, reason: String) -> Self {
        Self {
            reason: Some(reason),
            ..Self::base(flow_id, handler, FlowResultType::Abort)
        }
    }

    /// Error code attached to the whole form, if any
    pub fn base_error(&self) -> Option<&str> {
        self.errors
            .as_ref()
            .and_then(|errors| errors.get("base"))
            .map(String::as_str)
    }
}
