use crate::Outcome;
use crate::models::args::TestArgs;
use crate::services::launcher::Launcher;
use anyhow::Result;
use fritz_kernel::readiness::{wait_for_containers, wait_for_health, wait_for_process};
use fritz_kernel::retry::RetryPolicy;
use fritz_process::ProcessError;
use tracing::warn;

/// `fritz test`: waits for the deployment, then runs both test suites.
///
/// A failing suite is reported through the returned [`Outcome`]; the other
/// suite still runs.
///
/// # Errors
/// Returns an error if the deployment never becomes ready or docker cannot be run.
pub fn run_tests(launcher: &Launcher<'_>, args: &TestArgs) -> Result<Outcome> {
    let settings = launcher.settings();
    let docker = launcher.docker();

    let expected = if args.no_kowalski {
        vec![settings.skyportal.web_container.clone()]
    } else {
        launcher.project().expected_containers()
    };

    println!("⏳ Waiting for containers...");
    wait_for_containers(&docker, &expected, RetryPolicy::from(settings.retry.containers))?;

    let mut outcome = Outcome::Success;

    if !args.no_kowalski {
        println!("🧪 Running Kowalski tests...");
        let result = docker.exec_shell(&settings.kowalski.api_container, &settings.kowalski.test_command);
        outcome = outcome.and(suite_outcome("Kowalski", result)?);
    }

    println!("⏳ Waiting for SkyPortal to serve requests...");
    wait_for_process(
        &docker,
        &settings.skyportal.web_container,
        &settings.skyportal.entry_process,
        RetryPolicy::from(settings.retry.web_process),
    )?;
    wait_for_health(launcher.probe(), &settings.skyportal.health_url, RetryPolicy::from(settings.retry.health))?;

    println!("🧪 Running SkyPortal tests...");
    let result = docker.exec_shell(&settings.skyportal.web_container, &settings.skyportal.test_command);
    outcome = outcome.and(suite_outcome("SkyPortal", result)?);

    match outcome {
        Outcome::Success => println!("✨ All tests passed."),
        Outcome::Failure => println!("❌ Some tests failed."),
    }
    Ok(outcome)
}

/// A suite that ran and failed is an [`Outcome::Failure`]; being unable to run it is an error.
fn suite_outcome(suite: &str, result: Result<(), ProcessError>) -> Result<Outcome> {
    match result {
        Ok(()) => Ok(Outcome::Success),
        Err(err @ ProcessError::Failed { .. }) => {
            warn!(suite, code = ?err.exit_code(), error = %err, "Test suite failed");
            Ok(Outcome::Failure)
        }
        Err(err) => Err(err.into()),
    }
}
