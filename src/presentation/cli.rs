//! CLI Argument Parsing
//!
//! Global flags (--json, --color, --verbose, --config) are inherited by all
//! subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::value_objects::Profile;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// Indirector - host bootstrap and Companion automation
#[derive(Parser, Debug)]
#[command(name = "indirector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of colored output
    #[arg(long, global = true)]
    pub json: bool,

    /// Color output mode
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorWhen>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: ./indirector.toml, then ~/.config/indirector/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install Docker, provision datastores and (re)deploy the Compose stack
    Bootstrap {
        /// Deployment profile (vpn: project datastores + Tailscale; home: ~/.fcav datastore)
        #[arg(short, long, value_enum)]
        profile: Option<Profile>,

        /// Directory containing the Compose file
        #[arg(long, default_value = ".", value_name = "DIR")]
        project_dir: PathBuf,
    },

    /// Connect to the Companion WebSocket bridge and serve automations
    Companion {
        /// WebSocket URL of the Companion bridge
        #[arg(long)]
        url: Option<String>,

        /// Where to write VS Code snippets
        #[arg(long, value_name = "PATH", conflicts_with = "no_snippets")]
        snippets: Option<PathBuf>,

        /// Do not generate editor snippets
        #[arg(long)]
        no_snippets: bool,

        /// Log variable changes matching CONNECTION/PATTERN (name, prefix*, *suffix, re:REGEX)
        #[arg(long = "watch", value_name = "CONN/PATTERN")]
        watch: Vec<String>,
    },
}
