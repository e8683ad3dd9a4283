//! Test helpers: a scripted sign-in client and a flow manager on a temp dir

#![allow(dead_code)]

use hc_config_entries::ConfigEntries;
use hc_flow::FlowManager;
use hc_storage::Storage;
use huggingchat_conversation::{Credentials, Login};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub const EMAIL: &str = "user@example.com";
pub const PASSWORD: &str = "correct horse";

/// Install a log subscriber once per test binary (honours `RUST_LOG`)
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// How the scripted client answers
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Accept only [`EMAIL`] / [`PASSWORD`]
    Strict,
    /// Fail as if the network were down
    Unreachable,
    /// Panic inside the client
    Crash,
}

/// Scripted sign-in client that counts attempts
pub struct MockLogin {
    behavior: Behavior,
    attempts: AtomicUsize,
}

impl MockLogin {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            attempts: AtomicUsize::new(0),
        })
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Login for MockLogin {
    fn login(&self, credentials: &Credentials) -> anyhow::Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Strict => {
                anyhow::ensure!(
                    credentials.email == EMAIL && credentials.password == PASSWORD,
                    "Hugging Face rejected the credentials for {}",
                    credentials.email
                );
                Ok(())
            }
            Behavior::Unreachable => {
                Err(std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused").into())
            }
            Behavior::Crash => panic!("sign-in client crashed"),
        }
    }
}

pub struct Harness {
    dir: TempDir,
    pub manager: FlowManager,
    pub login: Arc<MockLogin>,
}

impl Harness {
    pub fn new(behavior: Behavior) -> Self {
        init_tracing();
        let dir = TempDir::new().unwrap();
        let entries = Arc::new(ConfigEntries::new(Arc::new(Storage::new(dir.path()))));
        let manager = FlowManager::new(entries);
        let login = MockLogin::new(behavior);
        huggingchat_conversation::register(&manager, login.clone());
        Self {
            dir,
            manager,
            login,
        }
    }

    pub fn config_dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}

pub fn credentials(email: &str, password: &str) -> Value {
    json!({"email": email, "password": password})
}

pub fn object(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}
