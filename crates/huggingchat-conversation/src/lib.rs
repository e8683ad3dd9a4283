//! HuggingChat Conversation integration
//!
//! Configuration side of the HuggingChat conversation agent:
//!
//! - a setup flow that signs in with the user's Hugging Face credentials
//!   and creates the config entry,
//! - an options flow for the conversation parameters (model, prompt
//!   template, token limit, sampling).
//!
//! The sign-in client is supplied by the host through [`Login`].
//!
//! ```ignore
//! let manager = FlowManager::new(entries);
//! huggingchat_conversation::register(&manager, Arc::new(client));
//! let form = manager.async_init(DOMAIN).await?;
//! ```

pub mod config_flow;
pub mod constants;
pub mod login;
pub mod options;
pub mod translations;

use hc_config_entries::ConfigEntry;
use hc_flow::{ConfigFlowFactory, FlowHandler, FlowManager};
use std::sync::Arc;

pub use config_flow::{option_schema, step_user_data_schema, ConfigFlow, OptionsFlow};
pub use constants::{DOMAIN, ENTRY_TITLE, ERROR_INVALID_AUTH};
pub use login::{validate_input, Credentials, Login};
pub use options::{default_options, resolve, ConversationOptions};

/// Flow factory registered with the flow manager
pub struct HuggingChatConversation {
    login: Arc<dyn Login>,
}

impl HuggingChatConversation {
    pub fn new(login: Arc<dyn Login>) -> Self {
        Self { login }
    }
}

impl ConfigFlowFactory for HuggingChatConversation {
    fn domain(&self) -> &str {
        DOMAIN
    }

    fn version(&self) -> u32 {
        constants::CONFIG_FLOW_VERSION
    }

    fn create_flow(&self) -> Box<dyn FlowHandler> {
        Box::new(ConfigFlow::new(self.login.clone()))
    }

    fn create_options_flow(&self, entry: &ConfigEntry) -> Option<Box<dyn FlowHandler>> {
        Some(Box::new(OptionsFlow::new(entry)))
    }
}

/// Register the integration's flows
pub fn register(manager: &FlowManager, login: Arc<dyn Login>) {
    manager.register(Arc::new(HuggingChatConversation::new(login)));
}
