use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use initlatex::{args::Args, error, info, trace};

fn app(args: &Args) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to get current dir")?;

    let settings = initlatex::resolve_settings(args, &cwd)?;
    trace!("Resolved settings: {settings:?}");

    for path in initlatex::run(&settings, &cwd)? {
        info!(
            "Created {}",
            path.strip_prefix(&cwd).unwrap_or(&path).display()
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    match app(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !args.no_errors() {
                error!("{:#}", e);
            }
            ExitCode::FAILURE
        }
    }
}
