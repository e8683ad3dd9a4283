//! Credential check against HuggingChat
//!
//! The sign-in itself is done by an external client behind the [`Login`]
//! trait. It blocks on network I/O, so [`validate_input`] runs it on the
//! blocking thread pool.

use anyhow::Context;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Signs in to Hugging Face and grants HuggingChat access
pub trait Login: Send + Sync + 'static {
    /// Attempt a sign-in. May block; never called on an async worker.
    fn login(&self, credentials: &Credentials) -> anyhow::Result<()>;
}

impl<F> Login for F
where
    F: Fn(&Credentials) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn login(&self, credentials: &Credentials) -> anyhow::Result<()> {
        self(credentials)
    }
}

/// Sign-in request built from the setup form
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Build from setup form input
    pub fn from_input(input: &Map<String, Value>) -> anyhow::Result<Self> {
        serde_json::from_value(Value::Object(input.clone()))
            .context("setup input does not hold an email and password")
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"**REDACTED**")
            .finish()
    }
}

/// Validate that the setup input lets us sign in.
///
/// Every failure is returned as an error: a rejected sign-in, a transport
/// problem, malformed input, or the blocking task dying.
pub async fn validate_input(
    login: Arc<dyn Login>,
    input: &Map<String, Value>,
) -> anyhow::Result<()> {
    let credentials = Credentials::from_input(input)?;
    debug!("Signing in to HuggingChat as {}", credentials.email);

    tokio::task::spawn_blocking(move || login.login(&credentials))
        .await
        .context("HuggingChat sign-in task did not complete")?
}
