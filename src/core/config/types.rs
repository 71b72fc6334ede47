use std::fmt;

use thiserror::Error;

use super::secret::Password;

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(super) database: DatabaseSettings,
    pub(super) telemetry: TelemetrySettings,
}

#[derive(Debug, Clone)]
pub(crate) struct DatabaseSettings {
    pub(crate) endpoint: Endpoint,
    pub(crate) username: String,
    pub(crate) password: Password,
}

#[derive(Debug, Clone)]
pub(crate) struct TelemetrySettings {
    pub(crate) log_level: String,
    pub(crate) json: bool,
}

/// Database address as given in `ENDPOINT`.
///
/// `Display` yields the raw value so status lines echo exactly what the caller passed in.
/// The value is only split into host and port when a connection is attempted, so a
/// malformed address surfaces as a failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Endpoint(pub(super) String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Address {
    pub(crate) host: String,
    /// Explicit port, if the endpoint carried one. `None` means the engine default.
    pub(crate) port: Option<u16>,
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),
    #[error("environment variable {0} is not valid unicode")]
    NotUnicode(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum EndpointError {
    #[error("invalid endpoint {0:?}")]
    Malformed(String),
    #[error("invalid port {port:?} in endpoint {endpoint:?}")]
    InvalidPort { endpoint: String, port: String },
}

impl Endpoint {
    pub(crate) fn address(&self) -> Result<Address, EndpointError> {
        let value = &self.0;
        let malformed = || EndpointError::Malformed(value.clone());
        let invalid_port =
            |port: &str| EndpointError::InvalidPort { endpoint: value.clone(), port: port.into() };

        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(malformed());
        }

        let (host, port) = if let Some(rest) = trimmed.strip_prefix('[') {
            let (host, tail) = rest.split_once(']').ok_or_else(malformed)?;
            let port = match tail {
                "" => None,
                _ => {
                    let port = tail.strip_prefix(':').ok_or_else(malformed)?;
                    Some(parse_port(port).ok_or_else(|| invalid_port(port))?)
                }
            };
            (host, port)
        } else {
            match trimmed.rsplit_once(':') {
                // several colons without brackets: a bare IPv6 address
                Some((host, _)) if host.contains(':') => (trimmed, None),
                Some((host, port)) => {
                    (host, Some(parse_port(port).ok_or_else(|| invalid_port(port))?))
                }
                None => (trimmed, None),
            }
        };

        if host.is_empty() {
            return Err(malformed());
        }

        Ok(Address { host: host.to_string(), port })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_port(value: &str) -> Option<u16> {
    value.parse::<u16>().ok().filter(|port| *port != 0)
}
