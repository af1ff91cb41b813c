//! envgroup - Versioned environment groups, synced into namespaces.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use envgroup::cli::output;
use envgroup::cli::{execute, Cli};
use envgroup::error::{ConfigError, Error, GroupError, StoreError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env("ENVGROUP_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("envgroup=debug")
        } else {
            EnvFilter::new("envgroup=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command) {
        output::error(&e.to_string());
        if let Some(hint) = hint(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

/// Suggested next step for errors a user can act on.
fn hint(e: &Error) -> Option<&'static str> {
    match e {
        Error::Config(ConfigError::NotInitialized) => Some("run: envgroup init"),
        Error::Config(ConfigError::AlreadyInitialized) => {
            Some("edit envgroup.toml or remove it to start over")
        }
        Error::Group(GroupError::InUse { .. }) => {
            Some("unlink it first, or rerun with --force")
        }
        Error::Group(GroupError::NotFound(_)) => Some("run: envgroup list"),
        Error::Store(StoreError::Conflict { .. }) => {
            Some("another writer created a version first; rerun to apply on top of it")
        }
        Error::Batch { source, .. } => hint(source),
        _ => None,
    }
}
