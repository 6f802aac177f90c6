use crate::handlers::prepare::prepare;
use crate::models::args::LaunchArgs;
use crate::services::launcher::Launcher;
use anyhow::{Context, Result};
use fritz_kernel::retry::{RetryPolicy, retry};
use fritz_kernel::token::retrieve_skyportal_token;
use fritz_process::DockerCompose;
use tracing::info;

/// `fritz build`: prepares the project and builds every image.
///
/// # Errors
/// Returns an error if any step fails.
pub fn build(launcher: &Launcher<'_>, args: &LaunchArgs) -> Result<()> {
    prepare(launcher, args)?;
    build_images(launcher, args)
}

/// Builds SkyPortal, runs first-time initialization if requested, then builds Kowalski.
///
/// # Errors
/// Returns an error if any build or initialization step fails.
pub fn build_images(launcher: &Launcher<'_>, args: &LaunchArgs) -> Result<()> {
    let skyportal = launcher.skyportal_compose(false);
    println!("🏗️ Building SkyPortal images...");
    skyportal.build()?;

    if args.init {
        initialize(launcher, &skyportal)?;
    }

    if !args.no_kowalski {
        println!("🏗️ Building Kowalski images...");
        launcher.kowalski_compose().build()?;
    }

    println!("✨ Build finished.");
    Ok(())
}

/// Seeds SkyPortal and hands its admin token to Kowalski.
fn initialize(launcher: &Launcher<'_>, skyportal: &DockerCompose<'_>) -> Result<()> {
    let settings = launcher.settings();
    let docker = launcher.docker();

    docker.ensure_network(&settings.network)?;
    println!("🚀 Starting SkyPortal for initialization...");
    skyportal.up()?;

    println!("🌱 Loading seed data...");
    retry(RetryPolicy::from(settings.retry.seed_data), "loading seed data", |attempt| {
        info!(attempt, "Loading seed data");
        Ok(docker.exec_shell(&settings.skyportal.web_container, &settings.skyportal.seed_command)?)
    })
    .context("SkyPortal seed data could not be loaded")?;

    println!("🔑 Exchanging tokens...");
    let token = retrieve_skyportal_token(&docker, &settings.skyportal)?;
    launcher.splitter().store_skyportal_token(&token)?;

    println!("🛑 Stopping SkyPortal...");
    skyportal.down()?;
    Ok(())
}
