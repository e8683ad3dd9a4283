//! Flow handler traits
//!
//! Integrations implement [`FlowHandler`] for each of their flows and expose
//! them through a [`ConfigFlowFactory`]. The host talks to the flow manager
//! through [`ConfigFlowHandler`].

use async_trait::async_trait;
use hc_config_entries::ConfigEntry;
use serde_json::{Map, Value};

use crate::error::FlowOutcome;
use crate::result::{FlowResult, StepResult};

/// First step of a config flow started by the user
pub const STEP_USER: &str = "user";
/// First step of an options flow
pub const STEP_INIT: &str = "init";

/// A single stateful flow (setup or options)
#[async_trait]
pub trait FlowHandler: Send {
    /// Run `step_id`. `user_input` is `None` when the step is entered and
    /// holds schema-validated data on submission.
    async fn async_step(
        &mut self,
        step_id: &str,
        user_input: Option<Map<String, Value>>,
    ) -> FlowOutcome<StepResult>;
}

/// Creates the flows of one integration domain
pub trait ConfigFlowFactory: Send + Sync {
    /// Integration domain
    fn domain(&self) -> &str;

    /// Major version stamped on created entries
    fn version(&self) -> u32 {
        1
    }

    /// Minor version stamped on created entries
    fn minor_version(&self) -> u32 {
        1
    }

    /// New setup flow
    fn create_flow(&self) -> Box<dyn FlowHandler>;

    /// New options flow for `entry`, or `None` if the integration has none
    fn create_options_flow(&self, _entry: &ConfigEntry) -> Option<Box<dyn FlowHandler>> {
        None
    }
}

/// Host-facing interface for configuration flows
#[async_trait]
pub trait ConfigFlowHandler: Send + Sync {
    /// Start a new configuration flow for an integration
    ///
    /// # Arguments
    /// * `handler` - The integration domain
    /// * `show_advanced_options` - Whether to show advanced options in the flow
    async fn start_flow(
        &self,
        handler: &str,
        show_advanced_options: bool,
    ) -> Result<FlowResult, String>;

    /// Continue a flow with user input
    async fn progress_flow(
        &self,
        flow_id: &str,
        user_input: Option<Value>,
    ) -> Result<FlowResult, String>;

    /// Active flows as JSON values
    async fn list_flows(&self) -> Vec<Value>;
}
