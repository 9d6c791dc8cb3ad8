//! `mymind children list|add|edit`

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Subcommand};
use tabled::{settings::Style, Table, Tabled};

use mymind_core::{ChildInfo, Role};

use super::Env;

#[derive(Subcommand, Debug)]
pub enum ChildrenCommand {
    /// List children registered under the logged-in parent.
    List {
        /// Emit machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Register a new child.
    Add(AddArgs),

    /// Change a child's name or birth date.
    Edit(EditArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub name: String,

    /// Birth date as YYYY-MM-DD.
    #[arg(long, value_parser = parse_birth)]
    pub birth: NaiveDate,

    /// Id the child will use to log in.
    #[arg(long)]
    pub unique_id: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// The child's login id.
    pub unique_id: String,

    #[arg(long)]
    pub name: Option<String>,

    /// Birth date as YYYY-MM-DD.
    #[arg(long, value_parser = parse_birth)]
    pub birth: Option<NaiveDate>,
}

#[derive(Tabled)]
struct ChildRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "birth")]
    birth: String,
    #[tabled(rename = "login id")]
    unique_id: String,
    #[tabled(rename = "user id")]
    user_id: String,
}

pub fn run(cmd: ChildrenCommand) -> Result<()> {
    match cmd {
        ChildrenCommand::List { json } => list(json),
        ChildrenCommand::Add(args) => add(args),
        ChildrenCommand::Edit(args) => edit(args),
    }
}

fn list(json: bool) -> Result<()> {
    let env = Env::load()?;
    let children = env
        .client(Role::Parent)
        .list_children()
        .context("failed to load children")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&children).context("failed to serialize children")?
        );
        return Ok(());
    }

    if children.is_empty() {
        println!("No children registered. Run `mymind children add` first.");
        return Ok(());
    }

    let rows: Vec<ChildRow> = children
        .iter()
        .map(|c| ChildRow {
            name: c.name.clone(),
            birth: format!("{}-{}-{}", c.birth_year, c.birth_month, c.birth_day),
            unique_id: c.unique_id.clone(),
            user_id: c
                .user_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    Ok(())
}

fn add(args: AddArgs) -> Result<()> {
    let mut child = ChildInfo {
        name: args.name.trim().to_string(),
        unique_id: args.unique_id.trim().to_string(),
        ..ChildInfo::default()
    };
    set_birth(&mut child, args.birth);

    let missing = child.missing_fields();
    if !missing.is_empty() {
        anyhow::bail!("missing required fields: {}", missing.join(", "));
    }

    let env = Env::load()?;
    let reply = env
        .client(Role::Parent)
        .create_child(&child)
        .with_context(|| format!("failed to register '{}'", child.name))?;

    println!("✓ Registered '{}' (login id '{}')", child.name, child.unique_id);
    if let Some(msg) = reply.text() {
        println!("  {msg}");
    }
    Ok(())
}

fn edit(args: EditArgs) -> Result<()> {
    if args.name.is_none() && args.birth.is_none() {
        anyhow::bail!("nothing to change; pass --name and/or --birth");
    }

    let env = Env::load()?;
    let client = env.client(Role::Parent);
    let mut child = client
        .list_children()
        .context("failed to load children")?
        .into_iter()
        .find(|c| c.unique_id == args.unique_id)
        .with_context(|| format!("no child with login id '{}'", args.unique_id))?;

    if let Some(name) = args.name {
        child.name = name.trim().to_string();
    }
    if let Some(birth) = args.birth {
        set_birth(&mut child, birth);
    }
    let missing = child.missing_fields();
    if !missing.is_empty() {
        anyhow::bail!("missing required fields: {}", missing.join(", "));
    }

    client
        .update_child(&child)
        .with_context(|| format!("failed to update '{}'", child.unique_id))?;
    println!("✓ Updated '{}'", child.unique_id);
    Ok(())
}

fn set_birth(child: &mut ChildInfo, birth: NaiveDate) {
    child.birth_year = birth.year().to_string();
    child.birth_month = birth.month().to_string();
    child.birth_day = birth.day().to_string();
}

fn parse_birth(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{s}'; expected YYYY-MM-DD"))
}
