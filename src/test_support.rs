use std::collections::HashMap;
use std::env::VarError;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::{DatabaseSettings, Settings};
use crate::services::connectivity::{CheckError, Connector, Session};

pub(crate) const TEST_USER: &str = "admin";
pub(crate) const TEST_PASS: &str = "test-pass";

pub(crate) fn settings(endpoint: &str) -> Settings {
    let vars: HashMap<&str, String> = HashMap::from([
        ("ENDPOINT", endpoint.to_string()),
        ("USER", TEST_USER.to_string()),
        ("PASS", TEST_PASS.to_string()),
    ]);
    Settings::from_lookup(move |key| vars.get(key).cloned().ok_or(VarError::NotPresent))
        .expect("test settings")
}

/// Connector double: either hands out a session or fails with a freshly built driver error.
pub(crate) struct FakeConnector {
    failure: Option<Box<dyn Fn() -> sqlx::Error + Send + Sync>>,
    close_fails: bool,
    closed: Arc<AtomicBool>,
}

pub(crate) struct FakeSession {
    close_fails: bool,
    closed: Arc<AtomicBool>,
}

impl FakeConnector {
    pub(crate) fn succeeding() -> Self {
        Self { failure: None, close_fails: false, closed: Arc::new(AtomicBool::new(false)) }
    }

    pub(crate) fn failing<F>(make_error: F) -> Self
    where
        F: Fn() -> sqlx::Error + Send + Sync + 'static,
    {
        Self { failure: Some(Box::new(make_error)), ..Self::succeeding() }
    }

    pub(crate) fn with_close_error(mut self) -> Self {
        self.close_fails = true;
        self
    }

    pub(crate) fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Session = FakeSession;

    async fn connect(&self, _settings: &DatabaseSettings) -> Result<FakeSession, CheckError> {
        if let Some(make_error) = &self.failure {
            return Err(CheckError::from(make_error()));
        }
        Ok(FakeSession { close_fails: self.close_fails, closed: Arc::clone(&self.closed) })
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn close(self) -> Result<(), CheckError> {
        if self.close_fails {
            return Err(CheckError::from(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "connection reset during close",
            ))));
        }
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
