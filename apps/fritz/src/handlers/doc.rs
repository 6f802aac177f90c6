use crate::models::args::ConfirmArgs;
use crate::services::launcher::Launcher;
use anyhow::Result;
use fritz_process::CommandSpec;

/// `fritz doc`: builds the HTML documentation, optionally cleaning the previous build.
///
/// # Errors
/// Returns an error if `make` fails.
pub fn doc(launcher: &Launcher<'_>, args: &ConfirmArgs) -> Result<()> {
    let docs = launcher.project().docs_dir();
    let make = CommandSpec::new("make").current_dir(&docs);

    if launcher.confirm("Clean the previous documentation build first?", args.yes)? {
        println!("🧹 Cleaning documentation build...");
        launcher.runner().check(&make.clone().arg("clean"))?;
    }

    println!("📚 Building documentation...");
    launcher.runner().check(&make.arg("html"))?;
    println!("✨ Documentation built in {}", docs.display());
    Ok(())
}
