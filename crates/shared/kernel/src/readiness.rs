//! Readiness polls used before running the test suites.

use crate::error::KernelError;
use crate::health::HttpProbe;
use crate::retry::{RetryPolicy, poll_until};
use fritz_process::{Docker, ProcessError, missing_containers};
use tracing::{debug, info};

/// Waits until every container in `expected` is listed with an "Up" status.
///
/// # Errors
/// [`KernelError::Timeout`] once the budget is spent, or a `docker ps` failure.
pub fn wait_for_containers(
    docker: &Docker<'_>,
    expected: &[String],
    policy: RetryPolicy,
) -> Result<u32, KernelError> {
    poll_until(policy, "containers to come up", |_| {
        let states = docker.containers()?;
        if states.is_empty() {
            info!("No containers are running yet");
            return Ok(false);
        }
        let missing = missing_containers(&states, expected);
        if missing.is_empty() {
            return Ok(true);
        }
        info!(?missing, "Waiting for containers");
        Ok(false)
    })
}

/// Waits until `process` shows up in `ps -ef` inside `container`.
///
/// A failing `docker exec` (container restarting) counts as not ready.
///
/// # Errors
/// [`KernelError::Timeout`] once the budget is spent, or if docker cannot be run at all.
pub fn wait_for_process(
    docker: &Docker<'_>,
    container: &str,
    process: &str,
    policy: RetryPolicy,
) -> Result<u32, KernelError> {
    poll_until(policy, format!("{process} in {container}"), |_| {
        match docker.exec_output(container, &["ps", "-ef"]) {
            Ok(listing) => Ok(listing.contains(process)),
            Err(err @ ProcessError::Failed { .. }) => {
                debug!(error = %err, "Process listing unavailable");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    })
}

/// Waits until `url` answers with a 2xx status.
///
/// Connection failures and other statuses count as not ready.
///
/// # Errors
/// [`KernelError::Timeout`] once the budget is spent.
pub fn wait_for_health(probe: &dyn HttpProbe, url: &str, policy: RetryPolicy) -> Result<u32, KernelError> {
    poll_until(policy, format!("{url} to respond"), |_| match probe.status(url) {
        Ok(status) if (200..300).contains(&status) => Ok(true),
        Ok(status) => {
            debug!(status, "Unexpected status");
            Ok(false)
        }
        Err(err) => {
            debug!(error = %err, "No response");
            Ok(false)
        }
    })
}
