//! MyMind: household routine and mood CLI.
//!
//! # Usage
//!
//! ```text
//! mymind parent login <account> --password <pw>
//! mymind parent logout
//! mymind child login <child-id>
//! mymind children list [--json]
//! mymind children add --name <name> --birth YYYY-MM-DD --unique-id <id>
//! mymind children edit <unique-id> [--name <name>] [--birth YYYY-MM-DD]
//! mymind routines list <child> [--as parent|child] [--json]
//! mymind routines check <child> <routine-id> [--undo] [--as parent|child]
//! mymind routines edit <child> [--file <path>]
//! mymind routines diff <child> [--file <path>]
//! mymind routines save <child> [--file <path>] [--dry-run] [--force]
//! mymind routines discard <child>
//! mymind mood record <emotion> [--reason <text>]
//! mymind mood recommend <emotion>
//! mymind config show
//! ```

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    children::ChildrenCommand, config::ConfigCommand, login::ChildCommand,
    login::ParentCommand, mood::MoodCommand, routines::RoutinesCommand,
};
use mymind_core::Role;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "mymind",
    version,
    about = "Manage children's daily routines and mood check-ins",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parent account login and logout.
    Parent {
        #[command(subcommand)]
        command: ParentCommand,
    },

    /// Log in as a child on this device.
    Child {
        #[command(subcommand)]
        command: ChildCommand,
    },

    /// List, register and edit the logged-in parent's children.
    Children {
        #[command(subcommand)]
        command: ChildrenCommand,
    },

    /// View, check off and edit a child's routine list.
    Routines {
        #[command(subcommand)]
        command: RoutinesCommand,
    },

    /// Record how the logged-in child feels and get suggestions.
    Mood {
        #[command(subcommand)]
        command: MoodCommand,
    },

    /// Inspect local configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

// ---------------------------------------------------------------------------
// Shared Role argument
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse `Role` from `--as parent|child`.
#[derive(Debug, Clone, Copy)]
pub struct RoleArg(pub Role);

impl FromStr for RoleArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "parent" => Ok(Self(Role::Parent)),
            "child" => Ok(Self(Role::Child)),
            other => Err(format!("unknown role '{other}'; expected: parent, child")),
        }
    }
}

impl fmt::Display for RoleArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<RoleArg> for Role {
    fn from(r: RoleArg) -> Self {
        r.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Parent { command } => commands::login::run_parent(command),
        Commands::Child { command } => commands::login::run_child(command),
        Commands::Children { command } => commands::children::run(command),
        Commands::Routines { command } => commands::routines::run(command),
        Commands::Mood { command } => commands::mood::run(command),
        Commands::Config { command } => commands::config::run(command),
    }
}

/// Logs go to stderr so `--json` output stays clean.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
