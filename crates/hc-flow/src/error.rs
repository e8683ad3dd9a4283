//! Flow errors

use hc_config_entries::ConfigEntriesError;
use thiserror::Error;

use crate::schema::SchemaError;

/// Errors raised while driving a flow
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Invalid handler specified: {0}")]
    UnknownHandler(String),

    #[error("Invalid flow specified: {0}")]
    UnknownFlow(String),

    #[error("Handler {handler} doesn't support step {step_id}")]
    UnknownStep { handler: String, step_id: String },

    #[error("Config entry not found: {0}")]
    UnknownEntry(String),

    #[error("Integration {0} does not support options")]
    OptionsNotSupported(String),

    #[error("Schema validation failed: {0}")]
    InvalidData(#[from] SchemaError),

    #[error(transparent)]
    ConfigEntries(#[from] ConfigEntriesError),
}

pub type FlowOutcome<T> = Result<T, FlowError>;
