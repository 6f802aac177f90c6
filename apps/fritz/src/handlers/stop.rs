use crate::models::args::StopArgs;
use crate::services::launcher::Launcher;
use anyhow::Result;

/// Shuts down SkyPortal, then Kowalski.
///
/// # Errors
/// Returns an error if a compose file is missing or `docker compose down` fails.
pub fn stop(launcher: &Launcher<'_>, args: &StopArgs) -> Result<()> {
    println!("🛑 Stopping SkyPortal...");
    launcher.skyportal_compose(false).down()?;

    if !args.no_kowalski {
        println!("🛑 Stopping Kowalski...");
        launcher.kowalski_compose().down()?;
    }

    println!("✨ Fritz stopped.");
    Ok(())
}
