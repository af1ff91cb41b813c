//! Command-line interface.

pub mod completions;
pub mod deploy;
pub mod history;
pub mod init;
pub mod links;
pub mod list;
pub mod output;
pub mod put;
pub mod retire;
pub mod show;
pub mod sync;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::core::config::{Backend, Config};
use crate::core::store::{self, VersionedStore};
use crate::core::types::Labels;
use crate::core::validation::parse_assignment;
use crate::error::Result;

/// envgroup - Versioned environment groups for namespaces.
#[derive(Parser)]
#[command(
    name = "envgroup",
    about = "Versioned environment groups, synced into namespaces",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Write envgroup.toml in the current directory
    Init {
        /// Cluster identifier
        #[arg(long, default_value_t = 1)]
        cluster: u64,
        /// Store root (defaults to ~/.envgroup/store)
        #[arg(long)]
        store: Option<PathBuf>,
        /// Storage backend
        #[arg(long, value_enum, default_value_t = BackendArg::Filesystem)]
        backend: BackendArg,
    },

    /// Create the next version of a group if anything changed
    Put {
        /// Group name
        name: String,
        /// Variable assignment (KEY=VALUE), repeatable
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
        /// Secret assignment (KEY=VALUE), or KEY alone to be prompted
        #[arg(long = "secret", value_name = "KEY[=VALUE]")]
        secrets: Vec<String>,
        /// Label recorded on the new version (KEY=VALUE), repeatable
        #[arg(long = "label", value_name = "KEY=VALUE")]
        labels: Vec<String>,
        /// Remove keys not given on this command line
        #[arg(long)]
        hard: bool,
        /// Show what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show a group version (latest by default)
    Show {
        /// Group name
        name: String,
        /// Specific version
        #[arg(long)]
        version: Option<u64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List every version of a group
    History {
        /// Group name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List live groups
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Link the latest version of groups into a namespace
    Sync {
        /// Group names
        #[arg(required = true)]
        names: Vec<String>,
        /// Target namespace
        #[arg(short, long)]
        namespace: String,
        /// Label recorded on the links (KEY=VALUE), repeatable
        #[arg(long = "label", value_name = "KEY=VALUE")]
        labels: Vec<String>,
    },

    /// Show the groups linked into a namespace
    Links {
        /// Namespace
        #[arg(short, long)]
        namespace: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reconcile an app's environment for a deployment target
    Deploy {
        /// App name
        app: String,
        /// Deployment target identifier
        #[arg(long)]
        target: String,
        /// Namespace the app runs in
        #[arg(short, long)]
        namespace: String,
        /// Target is a preview environment
        #[arg(long)]
        preview: bool,
        /// Other group the app uses, repeatable
        #[arg(long = "group", value_name = "NAME")]
        groups: Vec<String>,
        /// Variable assignment (KEY=VALUE), repeatable
        #[arg(long = "var", value_name = "KEY=VALUE")]
        vars: Vec<String>,
        /// Secret assignment (KEY=VALUE), repeatable
        #[arg(long = "secret", value_name = "KEY=VALUE")]
        secrets: Vec<String>,
        /// Remove keys not given on this command line
        #[arg(long)]
        hard: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Retire a group, keeping its history
    Retire {
        /// Group name
        name: String,
        /// Unlink the group from every namespace first
        #[arg(short, long)]
        force: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Storage backend as accepted on the command line.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum BackendArg {
    Filesystem,
    Memory,
}

impl From<BackendArg> for Backend {
    fn from(value: BackendArg) -> Self {
        match value {
            BackendArg::Filesystem => Backend::Filesystem,
            BackendArg::Memory => Backend::Memory,
        }
    }
}

/// Execute a CLI command.
pub fn execute(command: Command) -> Result<()> {
    match command {
        Command::Init {
            cluster,
            store,
            backend,
        } => init::execute(cluster, store, backend.into()),
        Command::Put {
            name,
            vars,
            secrets,
            labels,
            hard,
            dry_run,
        } => put::execute(put::Args {
            name,
            vars,
            secrets,
            labels,
            hard,
            dry_run,
        }),
        Command::Show {
            name,
            version,
            json,
        } => show::execute(&name, version, json),
        Command::History { name, json } => history::execute(&name, json),
        Command::List { json } => list::execute(json),
        Command::Sync {
            names,
            namespace,
            labels,
        } => sync::execute(&names, &namespace, &labels),
        Command::Links { namespace, json } => links::execute(&namespace, json),
        Command::Deploy {
            app,
            target,
            namespace,
            preview,
            groups,
            vars,
            secrets,
            hard,
            json,
        } => deploy::execute(deploy::Args {
            app,
            target,
            namespace,
            preview,
            groups,
            vars,
            secrets,
            hard,
            json,
        }),
        Command::Retire { name, force, yes } => retire::execute(&name, force, yes),
        Command::Completions { shell } => completions::execute(shell),
    }
}

/// Load the config and open the store it names.
pub(crate) fn open_store() -> Result<(Config, Box<dyn VersionedStore>)> {
    let config = Config::load()?;
    let store = store::open(&config)?;
    Ok((config, store))
}

/// Parse repeated `KEY=VALUE` arguments into a map.
pub(crate) fn parse_pairs(raw: &[String]) -> Result<Labels> {
    raw.iter().map(|r| parse_assignment(r)).collect()
}
