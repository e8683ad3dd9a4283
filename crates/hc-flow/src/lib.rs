//! Data entry flows
//!
//! Wizard-style flows that render forms, validate what the user submits and
//! finish by creating or updating a config entry.
//!
//! # Key Types
//!
//! - [`Selector`] - Input widget specification with value validation
//! - [`DataSchema`] - Ordered form schema (required/optional fields)
//! - [`FlowHandler`] - One setup or options flow of an integration
//! - [`ConfigFlowFactory`] - Creates the flows of an integration domain
//! - [`FlowManager`] - Runs flows and persists their results

pub mod error;
pub mod handler;
pub mod manager;
pub mod result;
pub mod schema;
pub mod selector;

pub use error::{FlowError, FlowOutcome};
pub use handler::{ConfigFlowFactory, ConfigFlowHandler, FlowHandler, STEP_INIT, STEP_USER};
pub use manager::FlowManager;
pub use result::{FlowResult, FlowResultType, FormStep, StepResult};
pub use schema::{
    DataSchema, FieldDescription, FormField, Presence, SchemaError, SchemaField, Validator,
};
pub use selector::{
    NumberSelectorConfig, NumberSelectorMode, Selector, TemplateSelectorConfig,
    TextSelectorConfig, TextSelectorType,
};
