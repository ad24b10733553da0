use std::borrow::Cow;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use fwconv::registry::{builtin, load_registry, Registry};
use tracing_subscriber::EnvFilter;

mod check_cmd;
mod cli;
mod convert_cmd;
mod inspect_cmd;
mod path_guard;
mod vendors_cmd;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Convert(args) => convert_cmd::run_convert(args),
        Command::Vendors(args) => vendors_cmd::run_vendors(args),
        Command::Targets(args) => vendors_cmd::run_targets(args),
        Command::Inspect(args) => inspect_cmd::run_inspect(args),
        Command::Check(args) => check_cmd::run_check(args),
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// The registry named by `--matrix-file`, else the built-in one.
fn resolve_registry(path: Option<&Path>) -> Result<Cow<'static, Registry>> {
    match path {
        Some(path) => {
            let registry = load_registry(path)
                .with_context(|| format!("failed to load matrix file {}", path.display()))?;
            tracing::info!(path = %path.display(), "using conversion matrix from file");
            Ok(Cow::Owned(registry))
        }
        None => Ok(Cow::Borrowed(builtin())),
    }
}
