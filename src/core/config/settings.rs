use super::parsing::{optional, or_default, parse_bool, process_env, required, Lookup};
use super::secret::Password;
use super::types::{ConfigError, DatabaseSettings, Endpoint, Settings, TelemetrySettings};

impl Settings {
    pub(crate) fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(process_env)
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Lookup,
    {
        let endpoint = required(&lookup, "ENDPOINT")?;
        let username = required(&lookup, "USER")?;
        let password = required(&lookup, "PASS")?;

        let log_level = or_default(&lookup, "DBCHECK_LOG_LEVEL", "info");
        let json =
            optional(&lookup, "DBCHECK_LOG_JSON").map(|value| parse_bool(&value)).unwrap_or(false);

        Ok(Self {
            database: DatabaseSettings {
                endpoint: Endpoint(endpoint),
                username,
                password: Password::new(password),
            },
            telemetry: TelemetrySettings { log_level, json },
        })
    }

    pub(crate) fn database(&self) -> &DatabaseSettings {
        &self.database
    }

    pub(crate) fn telemetry(&self) -> &TelemetrySettings {
        &self.telemetry
    }
}
