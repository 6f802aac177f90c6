use crate::handlers::update;
use crate::models::args::LaunchArgs;
use crate::services::launcher::Launcher;
use anyhow::Result;
use fritz_kernel::compose::write_compose;
use fritz_kernel::deps::check_dependencies;
use fritz_kernel::unified::UnifiedConfig;

/// Steps shared by `build` and `run`: submodules, dependency check, optional
/// update, config split and compose rendering.
///
/// # Errors
/// Returns an error if any step fails; later steps are not attempted.
pub fn prepare(launcher: &Launcher<'_>, args: &LaunchArgs) -> Result<()> {
    if !args.skip_submodules {
        println!("📦 Initializing submodules...");
        launcher.git().update_submodules(true)?;
    }

    println!("🔍 Checking dependencies...");
    check_dependencies(launcher.runner(), &launcher.settings().dependencies)?;

    if args.update {
        update::update(launcher, &args.source, true)?;
    }

    launcher.ensure_unified_config(args.yes)?;
    println!("🔑 Propagating {}...", launcher.settings().paths.unified_config.display());
    launcher.splitter().propagate()?;

    let config = UnifiedConfig::load(&launcher.project().unified_config())?;
    let compose = write_compose(launcher.project(), &config)?;
    println!("📝 Rendered {}", compose.display());
    Ok(())
}
