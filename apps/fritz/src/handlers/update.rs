use crate::models::args::SourceArgs;
use crate::services::launcher::Launcher;
use anyhow::Result;

/// Pulls `source.repo`/`source.branch` and updates the submodules.
///
/// # Errors
/// Returns an error if either git command fails.
pub fn update(launcher: &Launcher<'_>, source: &SourceArgs, init: bool) -> Result<()> {
    let git = launcher.git();
    println!("⬇️ Pulling {} {}...", source.repo, source.branch);
    git.pull(&source.repo, &source.branch)?;
    println!("📦 Updating submodules...");
    git.update_submodules(init)?;
    Ok(())
}
