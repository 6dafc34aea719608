//! `credcycle probe`: connect to the decoded database address.
//!
//! Runs a full `Connector::connect`, so a credential-fetch or decode
//! failure is reported the same way an application would see it.

use std::time::Duration;

use crate::cli::{output, settings, Cli};
use crate::connector::{Connector, Driver, TcpDriver};
use crate::errors::{CredCycleError, Result};

/// Execute the `probe` command.
pub fn execute(cli: &Cli, timeout_secs: u64) -> Result<()> {
    let settings = settings(cli)?;

    let connector = Connector::new(
        settings.rds_source()?,
        TcpDriver::new(Duration::from_secs(timeout_secs)),
    )
    .with_classifier(settings.classifier()?);

    let conn = connector
        .connect()
        .map_err(|e| CredCycleError::CommandFailed(format!("probe failed: {e}")))?;
    drop(conn);

    let address = connector
        .source()
        .target()
        .map(|t| format!("{}:{}", t.host, t.port))
        .unwrap_or_default();
    output::success(&format!(
        "OK: {} reachable via {} driver",
        address,
        connector.driver().name()
    ));

    Ok(())
}
