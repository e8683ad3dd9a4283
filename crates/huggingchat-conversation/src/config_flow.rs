//! Config flow for HuggingChat Conversation
//!
//! Setup is a single `user` step: ask for the Hugging Face email and
//! password, sign in off the flow thread, and either create the entry or
//! show the form again with `invalid_auth`. Options are a single `init`
//! step seeded from the entry's current options.

use async_trait::async_trait;
use hc_config_entries::ConfigEntry;
use hc_flow::{
    DataSchema, FlowError, FlowHandler, FlowOutcome, FormStep, NumberSelectorConfig,
    SchemaField, Selector, StepResult, TemplateSelectorConfig, TextSelectorConfig,
    TextSelectorType, Validator, STEP_INIT, STEP_USER,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{error, info};

use crate::constants::*;
use crate::login::{validate_input, Login};
use crate::options::{default_options, resolve};

/// Schema of the setup form
pub fn step_user_data_schema() -> DataSchema {
    DataSchema::new()
        .field(
            CONF_EMAIL,
            SchemaField::required(Selector::Text(
                TextSelectorConfig::new(TextSelectorType::Email).autocomplete("email"),
            )),
        )
        .field(
            CONF_PASSWORD,
            SchemaField::required(Selector::Text(
                TextSelectorConfig::new(TextSelectorType::Password).autocomplete("password"),
            )),
        )
}

/// Schema of the options form.
///
/// Every field is optional. Suggested values come from `options`, or from
/// the defaults when `options` is empty or lacks the key.
pub fn option_schema(options: &Map<String, Value>) -> DataSchema {
    let resolved = resolve(options, default_options());
    let suggested = |key: &str| resolved.get(key).cloned().unwrap_or(Value::Null);
    let sampling = || {
        Selector::Number(NumberSelectorConfig::range(0.0, 1.0, SAMPLING_STEP))
    };

    DataSchema::new()
        .field(
            CONF_CHAT_MODEL,
            SchemaField::optional(Selector::Number(NumberSelectorConfig::range(
                0.0,
                f64::from(MAX_CHAT_MODEL),
                1.0,
            )))
            .suggested_value(suggested(CONF_CHAT_MODEL))
            .default(DEFAULT_CHAT_MODEL),
        )
        .field(
            CONF_PROMPT,
            SchemaField::optional(Selector::Template(TemplateSelectorConfig::default()))
                .suggested_value(suggested(CONF_PROMPT))
                .default(DEFAULT_PROMPT),
        )
        .field(
            CONF_MAX_TOKENS,
            SchemaField::optional(Validator::Int)
                .suggested_value(suggested(CONF_MAX_TOKENS))
                .default(DEFAULT_MAX_TOKENS),
        )
        .field(
            CONF_TOP_P,
            SchemaField::optional(sampling())
                .suggested_value(suggested(CONF_TOP_P))
                .default(DEFAULT_TOP_P),
        )
        .field(
            CONF_TEMPERATURE,
            SchemaField::optional(sampling())
                .suggested_value(suggested(CONF_TEMPERATURE))
                .default(DEFAULT_TEMPERATURE),
        )
}

fn unknown_step(handler: &str, step_id: &str) -> FlowError {
    FlowError::UnknownStep {
        handler: handler.to_string(),
        step_id: step_id.to_string(),
    }
}

/// Handle a config flow for HuggingChat Conversation
pub struct ConfigFlow {
    login: Arc<dyn Login>,
}

impl ConfigFlow {
    pub fn new(login: Arc<dyn Login>) -> Self {
        Self { login }
    }

    async fn async_step_user(
        &mut self,
        user_input: Option<Map<String, Value>>,
    ) -> FlowOutcome<StepResult> {
        let Some(user_input) = user_input else {
            return Ok(StepResult::show_form(FormStep::new(
                STEP_USER,
                step_user_data_schema(),
            )));
        };

        match validate_input(self.login.clone(), &user_input).await {
            Ok(()) => {
                info!("HuggingChat sign-in succeeded, creating entry");
                Ok(StepResult::create_entry(ENTRY_TITLE, user_input))
            }
            Err(err) => {
                error!("Unexpected exception while signing in to HuggingChat: {:?}", err);
                Ok(StepResult::show_form(
                    FormStep::new(STEP_USER, step_user_data_schema())
                        .error("base", ERROR_INVALID_AUTH),
                ))
            }
        }
    }
}

#[async_trait]
impl FlowHandler for ConfigFlow {
    async fn async_step(
        &mut self,
        step_id: &str,
        user_input: Option<Map<String, Value>>,
    ) -> FlowOutcome<StepResult> {
        match step_id {
            STEP_USER => self.async_step_user(user_input).await,
            other => Err(unknown_step(DOMAIN, other)),
        }
    }
}

/// HuggingChat options handler
pub struct OptionsFlow {
    entry_id: String,
    /// Options of the entry when the flow started
    options: Map<String, Value>,
}

impl OptionsFlow {
    pub fn new(entry: &ConfigEntry) -> Self {
        Self {
            entry_id: entry.entry_id.clone(),
            options: entry.options.clone(),
        }
    }

    async fn async_step_init(
        &mut self,
        user_input: Option<Map<String, Value>>,
    ) -> FlowOutcome<StepResult> {
        if let Some(user_input) = user_input {
            return Ok(StepResult::create_entry(ENTRY_TITLE, user_input));
        }
        Ok(StepResult::show_form(FormStep::new(
            STEP_INIT,
            option_schema(&self.options),
        )))
    }
}

#[async_trait]
impl FlowHandler for OptionsFlow {
    async fn async_step(
        &mut self,
        step_id: &str,
        user_input: Option<Map<String, Value>>,
    ) -> FlowOutcome<StepResult> {
        match step_id {
            STEP_INIT => self.async_step_init(user_input).await,
            other => Err(unknown_step(&self.entry_id, other)),
        }
    }
}
