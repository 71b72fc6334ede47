use std::fmt;
use std::io::{self, Write};

use async_trait::async_trait;
use sqlx::mysql::MySqlConnection;
use sqlx::Connection;
use thiserror::Error;

use crate::core::config::{DatabaseSettings, EndpointError};
use crate::db;

const AUTH_SQLSTATE: &str = "28000";

/// A failed connect attempt. `Display` is the underlying error's own text.
#[derive(Debug, Error)]
pub(crate) enum CheckError {
    #[error(transparent)]
    Address(#[from] EndpointError),
    #[error(transparent)]
    Driver(#[from] sqlx::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureKind {
    Address,
    Resolution,
    Refused,
    Timeout,
    Authentication,
    Protocol,
    Other,
}

impl FailureKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::Resolution => "resolution",
            Self::Refused => "refused",
            Self::Timeout => "timeout",
            Self::Authentication => "authentication",
            Self::Protocol => "protocol",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CheckError {
    pub(crate) fn kind(&self) -> FailureKind {
        let err = match self {
            Self::Address(_) => return FailureKind::Address,
            Self::Driver(err) => err,
        };

        match err {
            sqlx::Error::Io(err) => match err.kind() {
                io::ErrorKind::ConnectionRefused => FailureKind::Refused,
                io::ErrorKind::TimedOut => FailureKind::Timeout,
                _ if is_lookup_failure(err) => FailureKind::Resolution,
                _ => FailureKind::Other,
            },
            sqlx::Error::Database(err) if err.code().as_deref() == Some(AUTH_SQLSTATE) => {
                FailureKind::Authentication
            }
            sqlx::Error::Protocol(_) | sqlx::Error::Tls(_) => FailureKind::Protocol,
            _ => FailureKind::Other,
        }
    }
}

// Resolver failures carry no dedicated `io::ErrorKind`, only the libc message, and the
// wording differs per platform.
const LOOKUP_MESSAGES: &[&str] = &[
    "lookup address",
    "Name or service not known",
    "Name does not resolve",
    "nodename nor servname provided",
    "No address associated with hostname",
];

fn is_lookup_failure(err: &io::Error) -> bool {
    let message = err.to_string();
    LOOKUP_MESSAGES.iter().any(|needle| message.contains(needle))
}

/// An open connection that must be released once the check has confirmed it.
#[async_trait]
pub(crate) trait Session: Send {
    async fn close(self) -> Result<(), CheckError>;
}

#[async_trait]
pub(crate) trait Connector: Send + Sync {
    type Session: Session;

    async fn connect(&self, settings: &DatabaseSettings) -> Result<Self::Session, CheckError>;
}

pub(crate) struct MySqlConnector;

#[async_trait]
impl Connector for MySqlConnector {
    type Session = MySqlConnection;

    async fn connect(&self, settings: &DatabaseSettings) -> Result<Self::Session, CheckError> {
        let options = db::connect_options(settings)?;
        Ok(db::open(&options).await?)
    }
}

#[async_trait]
impl Session for MySqlConnection {
    async fn close(self) -> Result<(), CheckError> {
        Ok(Connection::close(self).await?)
    }
}

#[derive(Debug)]
pub(crate) enum CheckOutcome {
    Connected,
    Failed(CheckError),
}

pub(crate) struct ConnectivityChecker<C> {
    settings: DatabaseSettings,
    connector: C,
}

impl ConnectivityChecker<MySqlConnector> {
    pub(crate) fn mysql(settings: DatabaseSettings) -> Self {
        Self::new(settings, MySqlConnector)
    }
}

impl<C: Connector> ConnectivityChecker<C> {
    pub(crate) fn new(settings: DatabaseSettings, connector: C) -> Self {
        Self { settings, connector }
    }

    /// Runs one connect attempt and writes the status lines to `out`.
    ///
    /// Connection failures are reported on `out` and returned as
    /// [`CheckOutcome::Failed`]; only a failure to write to `out` is an error.
    #[tracing::instrument(
        name = "connectivity_check",
        skip_all,
        fields(endpoint = %self.settings.endpoint, user = %self.settings.username)
    )]
    pub(crate) async fn run<W: Write>(&self, out: &mut W) -> io::Result<CheckOutcome> {
        let endpoint = &self.settings.endpoint;

        writeln!(out, "Connecting to {endpoint}")?;
        out.flush()?;

        let session = match self.connector.connect(&self.settings).await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(kind = %err.kind(), error = %err, "Connection attempt failed");
                writeln!(out, "Connection unsuccessful due to {err}")?;
                out.flush()?;
                return Ok(CheckOutcome::Failed(err));
            }
        };

        writeln!(out, "Connection successful to {endpoint}")?;
        out.flush()?;

        if let Err(err) = session.close().await {
            tracing::warn!(error = %err, "Failed to close connection cleanly");
        } else {
            tracing::debug!("Connection closed");
        }

        Ok(CheckOutcome::Connected)
    }
}
