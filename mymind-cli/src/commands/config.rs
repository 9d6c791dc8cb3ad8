//! `mymind config show`

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::Serialize;

use mymind_core::{storage, Role};

use super::Env;

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration and who is logged in.
    Show {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ConfigView {
    config_path: String,
    base_url: String,
    timeout_secs: u64,
    parent: Option<String>,
    child: Option<String>,
}

pub fn run(cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show(json),
    }
}

fn show(json: bool) -> Result<()> {
    let env = Env::load()?;
    let view = ConfigView {
        config_path: storage::config_path_at(&env.home).display().to_string(),
        base_url: env.config.base_url.clone(),
        timeout_secs: env.config.timeout_secs,
        parent: env.session.user_id(Role::Parent).map(|id| id.to_string()),
        child: env.session.user_id(Role::Child).map(|id| id.to_string()),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&view).context("failed to serialize config")?
        );
        return Ok(());
    }

    println!("config:   {}", view.config_path);
    println!("base_url: {}", view.base_url);
    println!("timeout:  {}s", view.timeout_secs);
    println!("parent:   {}", view.parent.as_deref().unwrap_or("(not logged in)"));
    println!("child:    {}", view.child.as_deref().unwrap_or("(not logged in)"));
    Ok(())
}
