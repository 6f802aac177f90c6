use crate::handlers::build::build;
use crate::handlers::prepare::prepare;
use crate::models::args::LaunchArgs;
use crate::services::launcher::Launcher;
use anyhow::Result;
use fritz_kernel::compose::ComposeVars;
use fritz_kernel::unified::UnifiedConfig;

/// `fritz run`: prepares (or fully builds with `--init`) and starts the deployment.
///
/// # Errors
/// Returns an error if any step fails.
pub fn run(launcher: &Launcher<'_>, args: &LaunchArgs) -> Result<()> {
    if args.init {
        build(launcher, args)?;
    } else {
        prepare(launcher, args)?;
    }

    launcher.docker().ensure_network(&launcher.settings().network)?;

    if !args.no_kowalski {
        println!("🚀 Starting Kowalski...");
        launcher.kowalski_compose().up()?;
    }

    println!("🚀 Starting SkyPortal...");
    launcher.skyportal_compose(args.traefik).up()?;

    let config = UnifiedConfig::load(&launcher.project().unified_config())?;
    let public = ComposeVars::from_config(launcher.project(), &config);
    println!("\n✨ Fritz is running.");
    println!("🔗 SkyPortal: http://{}:{}", public.host, public.port);
    Ok(())
}
