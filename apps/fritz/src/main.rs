use clap::Parser;
use fritz::models::args::Cli;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    Ok(fritz::launch(&cli)?.exit_code())
}
