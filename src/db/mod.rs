use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{ConnectOptions, Connection};

use crate::core::config::{DatabaseSettings, EndpointError};

pub(crate) const DEFAULT_MYSQL_PORT: u16 = 3306;

/// Builds driver options from settings. No database is selected and TLS, timeouts and
/// charset are left at the driver defaults. The session `SET` the driver would issue after
/// login is switched off, so a connect is a login handshake and nothing more.
pub(crate) fn connect_options(
    settings: &DatabaseSettings,
) -> Result<MySqlConnectOptions, EndpointError> {
    let address = settings.endpoint.address()?;

    Ok(MySqlConnectOptions::new()
        .host(&address.host)
        .port(address.port.unwrap_or(DEFAULT_MYSQL_PORT))
        .username(&settings.username)
        .password(settings.password.expose())
        .pipes_as_concat(false)
        .no_engine_substitution(false)
        .timezone(None::<String>)
        .set_names(false)
        .log_statements(tracing::log::LevelFilter::Off))
}

pub(crate) async fn open(options: &MySqlConnectOptions) -> Result<MySqlConnection, sqlx::Error> {
    MySqlConnection::connect_with(options).await
}
