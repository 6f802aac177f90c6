use crate::models::args::ConfirmArgs;
use crate::services::launcher::Launcher;
use anyhow::Result;

/// `fritz prune`: removes unused docker objects after confirmation.
///
/// # Errors
/// Returns an error if the answer cannot be read or a prune command fails.
pub fn prune(launcher: &Launcher<'_>, args: &ConfirmArgs) -> Result<()> {
    let question = "Remove ALL unused docker images, containers, networks and volumes?";
    if !launcher.confirm(question, args.yes)? {
        println!("Aborted.");
        return Ok(());
    }

    println!("🧹 Pruning docker...");
    launcher.docker().prune()?;
    println!("✨ Docker pruned.");
    Ok(())
}
