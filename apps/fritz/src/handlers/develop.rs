use crate::Outcome;
use crate::services::launcher::Launcher;
use anyhow::Result;
use fritz_process::{CommandSpec, ensure_success};

/// `fritz develop`: installs the pre-commit hooks.
///
/// # Errors
/// Returns an error if `pip` or `pre-commit` fails.
pub fn develop(launcher: &Launcher<'_>) -> Result<()> {
    let root = launcher.project().root();
    println!("🔧 Installing pre-commit...");
    launcher.runner().check(&CommandSpec::new("pip").args(["install", "pre-commit"]).current_dir(root))?;
    launcher.runner().check(&CommandSpec::new("pre-commit").arg("install").current_dir(root))?;
    println!("✨ Pre-commit hooks installed.");
    Ok(())
}

/// `fritz lint`: runs every pre-commit hook on all files.
///
/// # Errors
/// Returns an error only if `pre-commit` cannot be started.
pub fn lint(launcher: &Launcher<'_>) -> Result<Outcome> {
    let spec = CommandSpec::new("pre-commit")
        .args(["run", "--all-files"])
        .current_dir(launcher.project().root());

    println!("🧹 Linting...");
    let output = launcher.runner().stream(&spec)?;
    if let Err(err) = ensure_success(&spec, output) {
        println!("❌ {err}");
        return Ok(Outcome::Failure);
    }
    println!("✨ Lint passed.");
    Ok(Outcome::Success)
}
