//! Frontend strings for the config and options flows
//!
//! `strings.json` is embedded at build time and parsed once on first use.
//!
//! Flow results carry only codes and field names; a host rendering the
//! form turns them into text here:
//!
//! ```
//! use huggingchat_conversation::translations;
//!
//! // `errors["base"]` of a rejected sign-in
//! assert_eq!(
//!     translations::config_error("invalid_auth"),
//!     Some("Invalid authentication")
//! );
//! // label for the `email` field of the `user` step
//! assert!(translations::field_label("config", "user", "email").is_some());
//! ```

use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

static STRINGS: OnceLock<Value> = OnceLock::new();

fn strings() -> &'static Value {
    STRINGS.get_or_init(|| {
        serde_json::from_str(include_str!("../strings.json")).unwrap_or_else(|e| {
            warn!("Failed to parse strings.json: {}", e);
            Value::Object(Default::default())
        })
    })
}

/// Look up a string by its dotted path, e.g. `config.error.invalid_auth`
pub fn get(path: &str) -> Option<&'static str> {
    path.split('.')
        .try_fold(strings(), |node, key| node.get(key))
        .and_then(Value::as_str)
}

/// Message for a config flow error code
pub fn config_error(code: &str) -> Option<&'static str> {
    get(&format!("config.error.{}", code))
}

/// Label of a field in a flow step. `flow` is `config` or `options`.
pub fn field_label(flow: &str, step_id: &str, field: &str) -> Option<&'static str> {
    get(&format!("{}.step.{}.data.{}", flow, step_id, field))
}
