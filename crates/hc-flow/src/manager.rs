//! Flow Manager
//!
//! Drives config flows and options flows step by step. Submitted input is
//! validated against the schema of the form last shown before the flow
//! handler sees it. A config flow that finishes with `CreateEntry` adds a
//! config entry; an options flow that finishes replaces the entry's options.
//!
//! Aborting never waits for a running step. The flow is flagged and
//! dropped from the map at once; a step still in flight finds the flag when
//! it returns and is discarded without touching any entry.

use async_trait::async_trait;
use dashmap::DashMap;
use hc_config_entries::{ConfigEntries, ConfigEntry, ConfigEntryUpdate};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use ulid::Ulid;

use crate::error::{FlowError, FlowOutcome};
use crate::handler::{ConfigFlowFactory, ConfigFlowHandler, FlowHandler, STEP_INIT, STEP_USER};
use crate::result::{FlowResult, StepResult};
use crate::schema::{DataSchema, SchemaError};

/// What finishing the flow does
#[derive(Debug, Clone, PartialEq, Eq)]
enum FlowKind {
    /// Creates a new entry for the handler domain
    Config { version: u32, minor_version: u32 },
    /// Replaces the options of `entry_id`
    Options { entry_id: String },
}

/// Active flow state
struct ActiveFlow {
    /// Integration domain for config flows, entry id for options flows
    handler: String,
    kind: FlowKind,
    flow: Box<dyn FlowHandler>,
    current_step: String,
    /// Schema of the form last shown
    data_schema: Option<DataSchema>,
    /// Set once the flow is finished
    finished: bool,
    /// Set by `async_abort`, read without the step lock
    aborted: Arc<AtomicBool>,
}

impl ActiveFlow {
    fn new(handler: String, kind: FlowKind, flow: Box<dyn FlowHandler>, step_id: &str) -> Self {
        Self {
            handler,
            kind,
            flow,
            current_step: step_id.to_string(),
            data_schema: None,
            finished: false,
            aborted: Arc::new(AtomicBool::new(false)),
        }
    }

    fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}

/// Map entry for a flow in progress
#[derive(Clone)]
struct FlowSlot {
    state: Arc<Mutex<ActiveFlow>>,
    aborted: Arc<AtomicBool>,
}

/// Manages active configuration and options flows
pub struct FlowManager {
    entries: Arc<ConfigEntries>,
    factories: DashMap<String, Arc<dyn ConfigFlowFactory>>,
    flows: DashMap<String, FlowSlot>,
}

impl FlowManager {
    pub fn new(entries: Arc<ConfigEntries>) -> Self {
        Self {
            entries,
            factories: DashMap::new(),
            flows: DashMap::new(),
        }
    }

    /// Config entries this manager finishes flows against
    pub fn entries(&self) -> &Arc<ConfigEntries> {
        &self.entries
    }

    /// Register the flows of an integration
    pub fn register(&self, factory: Arc<dyn ConfigFlowFactory>) {
        let domain = factory.domain().to_string();
        debug!("Registered config flow for domain: {}", domain);
        self.factories.insert(domain, factory);
    }

    fn factory(&self, domain: &str) -> FlowOutcome<Arc<dyn ConfigFlowFactory>> {
        self.factories
            .get(domain)
            .map(|f| f.value().clone())
            .ok_or_else(|| FlowError::UnknownHandler(domain.to_string()))
    }

    /// Start a setup flow for `handler` at the `user` step
    pub async fn async_init(&self, handler: &str) -> FlowOutcome<FlowResult> {
        let factory = self.factory(handler)?;
        let active = ActiveFlow::new(
            handler.to_string(),
            FlowKind::Config {
                version: factory.version(),
                minor_version: factory.minor_version(),
            },
            factory.create_flow(),
            STEP_USER,
        );
        self.start(active).await
    }

    /// Start an options flow for an existing entry at the `init` step
    pub async fn async_init_options(&self, entry_id: &str) -> FlowOutcome<FlowResult> {
        let entry = self
            .entries
            .get(entry_id)
            .ok_or_else(|| FlowError::UnknownEntry(entry_id.to_string()))?;
        let factory = self.factory(&entry.domain)?;
        let flow = factory
            .create_options_flow(&entry)
            .ok_or_else(|| FlowError::OptionsNotSupported(entry.domain.clone()))?;

        let active = ActiveFlow::new(
            entry.entry_id.clone(),
            FlowKind::Options {
                entry_id: entry.entry_id.clone(),
            },
            flow,
            STEP_INIT,
        );
        self.start(active).await
    }

    async fn start(&self, mut active: ActiveFlow) -> FlowOutcome<FlowResult> {
        let flow_id = Ulid::new().to_string().to_lowercase();
        info!(
            "Starting flow {} for {} at step {}",
            flow_id, active.handler, active.current_step
        );

        let result = self.run_step(&flow_id, &mut active, None).await?;
        if !active.finished {
            let aborted = active.aborted.clone();
            let slot = FlowSlot {
                state: Arc::new(Mutex::new(active)),
                aborted,
            };
            self.flows.insert(flow_id, slot);
        }
        Ok(result)
    }

    /// Continue a flow. `None` re-enters the current step.
    pub async fn async_configure(
        &self,
        flow_id: &str,
        user_input: Option<Value>,
    ) -> FlowOutcome<FlowResult> {
        let slot = self
            .flows
            .get(flow_id)
            .map(|f| f.value().clone())
            .ok_or_else(|| FlowError::UnknownFlow(flow_id.to_string()))?;

        let mut active = slot.state.lock().await;
        if active.finished || active.is_aborted() {
            return Err(FlowError::UnknownFlow(flow_id.to_string()));
        }

        let user_input = match user_input {
            Some(input) => Some(match &active.data_schema {
                Some(schema) => schema.validate(&input)?,
                None => input.as_object().cloned().ok_or(SchemaError::NotAMapping)?,
            }),
            None => None,
        };

        let result = self.run_step(flow_id, &mut active, user_input).await?;
        if active.finished {
            self.flows.remove(flow_id);
        }
        Ok(result)
    }

    /// Abort a flow, e.g. when the user closes the dialog.
    ///
    /// Returns without waiting for a step in progress; that step's result
    /// is dropped.
    pub async fn async_abort(&self, flow_id: &str) -> FlowOutcome<()> {
        let (_, slot) = self
            .flows
            .remove(flow_id)
            .ok_or_else(|| FlowError::UnknownFlow(flow_id.to_string()))?;
        slot.aborted.store(true, Ordering::SeqCst);
        info!("Aborted flow {}", flow_id);
        Ok(())
    }

    /// Number of flows in progress
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Flows in progress
    pub async fn async_progress(&self) -> Vec<Value> {
        let slots: Vec<(String, FlowSlot)> = self
            .flows
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        let mut flows = Vec::with_capacity(slots.len());
        for (flow_id, slot) in slots {
            let active = slot.state.lock().await;
            if active.finished || active.is_aborted() {
                continue;
            }
            let source = match active.kind {
                FlowKind::Config { .. } => "user",
                FlowKind::Options { .. } => "options",
            };
            flows.push(json!({
                "flow_id": flow_id,
                "handler": active.handler,
                "step_id": active.current_step,
                "context": { "source": source },
            }));
        }
        flows
    }

    async fn run_step(
        &self,
        flow_id: &str,
        active: &mut ActiveFlow,
        user_input: Option<Map<String, Value>>,
    ) -> FlowOutcome<FlowResult> {
        let step_id = active.current_step.clone();
        debug!(
            "Running step {} of flow {} (input: {})",
            step_id,
            flow_id,
            user_input.is_some()
        );

        let step = active.flow.async_step(&step_id, user_input).await;
        if active.is_aborted() {
            info!("Discarding step {} of aborted flow {}", step_id, flow_id);
            active.finished = true;
            return Err(FlowError::UnknownFlow(flow_id.to_string()));
        }

        match step? {
            StepResult::ShowForm(form) => {
                let result = FlowResult::form(flow_id, &active.handler, &form);
                active.current_step = form.step_id;
                active.data_schema = Some(form.data_schema);
                Ok(result)
            }
            StepResult::CreateEntry { title, data } => {
                let result = self
                    .finish(flow_id, &active.handler, &active.kind, title, data)
                    .await?;
                active.finished = true;
                Ok(result)
            }
            StepResult::Abort { reason } => {
                info!("Flow {} aborted: {}", flow_id, reason);
                active.finished = true;
                Ok(FlowResult::abort(flow_id, &active.handler, reason))
            }
        }
    }

    async fn finish(
        &self,
        flow_id: &str,
        handler: &str,
        kind: &FlowKind,
        title: String,
        data: Map<String, Value>,
    ) -> FlowOutcome<FlowResult> {
        match kind {
            FlowKind::Config {
                version,
                minor_version,
            } => {
                let entry = ConfigEntry::new(handler, title.as_str())
                    .with_data(data.clone())
                    .with_version(*version, *minor_version);
                let entry = self.entries.add(entry).await?;
                info!(
                    "Flow {} created entry {} for {}",
                    flow_id, entry.entry_id, handler
                );

                let mut result = FlowResult::create_entry(
                    flow_id,
                    handler,
                    title,
                    data,
                    serde_json::to_value(&entry).ok(),
                );
                result.version = Some(entry.version);
                result.minor_version = Some(entry.minor_version);
                Ok(result)
            }
            FlowKind::Options { entry_id } => {
                let entry = self
                    .entries
                    .update(entry_id, ConfigEntryUpdate::new().options(data.clone()))
                    .await?;
                info!("Flow {} updated options of entry {}", flow_id, entry_id);

                Ok(FlowResult::create_entry(
                    flow_id,
                    handler,
                    entry.title.clone(),
                    data,
                    serde_json::to_value(&entry).ok(),
                ))
            }
        }
    }
}

#[async_trait]
impl ConfigFlowHandler for FlowManager {
    async fn start_flow(
        &self,
        handler: &str,
        _show_advanced_options: bool,
    ) -> Result<FlowResult, String> {
        self.async_init(handler).await.map_err(|e| e.to_string())
    }

    async fn progress_flow(
        &self,
        flow_id: &str,
        user_input: Option<Value>,
    ) -> Result<FlowResult, String> {
        self.async_configure(flow_id, user_input)
            .await
            .map_err(|e| e.to_string())
    }

    async fn list_flows(&self) -> Vec<Value> {
        self.async_progress().await
    }
}
