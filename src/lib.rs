pub(crate) mod core;
pub(crate) mod db;
pub(crate) mod services;

#[cfg(test)]
mod test_support;

use crate::core::{config::Settings, telemetry};
use crate::services::connectivity::{CheckOutcome, ConnectivityChecker};

/// Runs the connectivity check against the endpoint named in the environment.
///
/// Only configuration and stdout write errors are returned. A failed connection is
/// reported on stdout and still yields `Ok(())`.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    telemetry::init_tracing(&settings)?;

    tracing::debug!(database = ?settings.database(), "Loaded settings");

    let checker = ConnectivityChecker::mysql(settings.database().clone());
    let mut stdout = std::io::stdout();

    match checker.run(&mut stdout).await? {
        CheckOutcome::Connected => tracing::info!("Connectivity check passed"),
        CheckOutcome::Failed(err) => {
            tracing::info!(kind = %err.kind(), "Connectivity check failed; exiting normally")
        }
    }

    Ok(())
}
