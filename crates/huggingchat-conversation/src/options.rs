//! Conversation options and their defaults
//!
//! Entries store options as a loose JSON map. [`resolve`] overlays a stored
//! map on the defaults, and [`ConversationOptions`] is the typed view the
//! conversation agent reads.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::OnceLock;

use crate::constants::*;

static DEFAULT_OPTIONS: OnceLock<Map<String, Value>> = OnceLock::new();

/// Fallback options for an entry that has none yet
pub fn default_options() -> &'static Map<String, Value> {
    DEFAULT_OPTIONS.get_or_init(|| {
        let mut options = Map::new();
        options.insert(CONF_EMAIL.to_string(), json!(DEFAULT_EMAIL));
        options.insert(CONF_PASSWORD.to_string(), json!(DEFAULT_PASSWORD));
        options.insert(CONF_CHAT_MODEL.to_string(), json!(DEFAULT_CHAT_MODEL));
        options.insert(CONF_PROMPT.to_string(), json!(DEFAULT_PROMPT));
        options.insert(CONF_MAX_TOKENS.to_string(), json!(DEFAULT_MAX_TOKENS));
        options.insert(CONF_TOP_P.to_string(), json!(DEFAULT_TOP_P));
        options.insert(CONF_TEMPERATURE.to_string(), json!(DEFAULT_TEMPERATURE));
        options
    })
}

/// Effective options: for every key in `defaults`, the stored value if
/// present, else the default. Keys only in `stored` are dropped.
pub fn resolve(stored: &Map<String, Value>, defaults: &Map<String, Value>) -> Map<String, Value> {
    defaults
        .iter()
        .map(|(key, default)| {
            let value = stored.get(key).unwrap_or(default);
            (key.clone(), value.clone())
        })
        .collect()
}

/// Typed conversation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationOptions {
    pub chat_model: u32,
    pub prompt: String,
    pub max_tokens: i64,
    pub top_p: f64,
    pub temperature: f64,
}

impl Default for ConversationOptions {
    fn default() -> Self {
        Self {
            chat_model: DEFAULT_CHAT_MODEL,
            prompt: DEFAULT_PROMPT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            top_p: DEFAULT_TOP_P,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ConversationOptions {
    /// Read the options of an entry, falling back to defaults per key
    pub fn from_options(options: &Map<String, Value>) -> serde_json::Result<Self> {
        serde_json::from_value(Value::Object(resolve(options, default_options())))
    }

    /// Full option set as stored on an entry
    pub fn to_options(&self) -> Map<String, Value> {
        let mut options = Map::new();
        options.insert(CONF_CHAT_MODEL.to_string(), json!(self.chat_model));
        options.insert(CONF_PROMPT.to_string(), json!(self.prompt));
        options.insert(CONF_MAX_TOKENS.to_string(), json!(self.max_tokens));
        options.insert(CONF_TOP_P.to_string(), json!(self.top_p));
        options.insert(CONF_TEMPERATURE.to_string(), json!(self.temperature));
        options
    }
}
