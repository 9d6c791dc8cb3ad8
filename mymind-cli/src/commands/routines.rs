//! `mymind routines list|check|edit|diff|save|discard`
//!
//! Editing spans several invocations: `edit` snapshots the server list and
//! writes a YAML working file, the user edits the file, and `save` pushes
//! the difference. `diff` and `save --dry-run` preview without writing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use mymind_client::ApiClient;
use mymind_core::{Role, RoutineId, RoutineItem, RoutineLog, UserId};
use mymind_sync::{
    pipeline::{self, SaveOptions, SaveReport},
    snapshot, AppliedOp, ListDiff, ReconcileError, SyncError,
};

use super::super::RoleArg;
use super::Env;

#[derive(Subcommand, Debug)]
pub enum RoutinesCommand {
    /// Show a child's routines with completion marks.
    List(ListArgs),

    /// Mark a routine done (or not done with --undo).
    Check(CheckArgs),

    /// Start editing: fetch the list and write it to a YAML working file.
    Edit(FileArgs),

    /// Show what `save` would change, against the live server list.
    Diff(FileArgs),

    /// Push the edited working file to the server.
    Save(SaveArgs),

    /// Abandon the edit in progress.
    Discard {
        /// The child's user id.
        child: String,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// The child's user id.
    pub child: String,

    /// Act as parent or child. Defaults to the parent when one is logged in.
    #[arg(long = "as", value_name = "ROLE")]
    pub role: Option<RoleArg>,

    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// The child's user id.
    pub child: String,

    pub routine_id: i64,

    /// Mark as not done.
    #[arg(long)]
    pub undo: bool,

    /// Act as parent or child. Defaults to the child when one is logged in.
    #[arg(long = "as", value_name = "ROLE")]
    pub role: Option<RoleArg>,
}

#[derive(Args, Debug)]
pub struct FileArgs {
    /// The child's user id.
    pub child: String,

    /// Working file. Defaults to ~/.mymind/edits/<child>.yaml
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SaveArgs {
    #[command(flatten)]
    pub target: FileArgs,

    /// Show what would be written without calling the server.
    #[arg(long)]
    pub dry_run: bool,

    /// Save even if the list changed on the server since `edit`.
    #[arg(long)]
    pub force: bool,
}

#[derive(Tabled)]
struct RoutineRow {
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "done")]
    done: String,
    #[tabled(rename = "title")]
    title: String,
    #[tabled(rename = "time")]
    time: String,
    #[tabled(rename = "day")]
    day: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoutineJson<'a> {
    #[serde(flatten)]
    item: &'a RoutineItem,
    is_completed: bool,
}

pub fn run(cmd: RoutinesCommand) -> Result<()> {
    match cmd {
        RoutinesCommand::List(args) => list(args),
        RoutinesCommand::Check(args) => check(args),
        RoutinesCommand::Edit(args) => edit(args),
        RoutinesCommand::Diff(args) => diff(args),
        RoutinesCommand::Save(args) => save(args),
        RoutinesCommand::Discard { child } => discard(child),
    }
}

/// `requested`, else `preferred` if logged in, else the other role.
fn pick_role(env: &Env, requested: Option<RoleArg>, preferred: Role) -> Role {
    if let Some(role) = requested {
        return role.into();
    }
    let other = match preferred {
        Role::Parent => Role::Child,
        Role::Child => Role::Parent,
    };
    if env.session.user_id(preferred).is_none() && env.session.user_id(other).is_some() {
        other
    } else {
        preferred
    }
}

fn list(args: ListArgs) -> Result<()> {
    let env = Env::load()?;
    let client = env.client(pick_role(&env, args.role, Role::Parent));
    let child = UserId::from(args.child.trim());

    let items = client
        .list_routines(&child)
        .with_context(|| format!("failed to load routines for {child}"))?;
    let logs = match client.list_routine_logs(&child) {
        Ok(logs) => logs,
        Err(e) => {
            tracing::warn!("could not load routine logs for {child}: {e}");
            Vec::new()
        }
    };
    let done = |item: &RoutineItem| {
        item.id
            .map(|id| RoutineLog::is_completed(&logs, id))
            .unwrap_or(false)
    };

    if args.json {
        let payload: Vec<RoutineJson<'_>> = items
            .iter()
            .map(|item| RoutineJson {
                item,
                is_completed: done(item),
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).context("failed to serialize routines")?
        );
        return Ok(());
    }

    if items.is_empty() {
        println!("No routines for {child}.");
        return Ok(());
    }

    let completed = items.iter().filter(|&i| done(i)).count();
    let rows: Vec<RoutineRow> = items
        .iter()
        .map(|item| RoutineRow {
            id: item.id.map(|id| id.to_string()).unwrap_or_default(),
            done: if done(item) {
                "✓".green().to_string()
            } else {
                "·".bright_black().to_string()
            },
            title: item.title.clone(),
            time: item.time.clone(),
            day: item
                .day_of_week
                .map(|d| d.to_string())
                .unwrap_or_default(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!("{completed}/{} done", items.len());
    Ok(())
}

fn check(args: CheckArgs) -> Result<()> {
    let env = Env::load()?;
    let client = env.client(pick_role(&env, args.role, Role::Child));
    let child = UserId::from(args.child.trim());
    let id = RoutineId(args.routine_id);

    client
        .set_routine_completed(id, &child, !args.undo)
        .with_context(|| format!("failed to update routine #{id}"))?;
    if args.undo {
        println!("✓ Routine #{id} marked not done");
    } else {
        println!("✓ Routine #{id} done");
    }
    Ok(())
}

fn working_path(env: &Env, owner: &UserId, file: Option<PathBuf>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path),
        None => Ok(snapshot::working_path_at(&env.home, owner)?),
    }
}

fn editor_client(env: &Env) -> ApiClient {
    env.client(Role::Parent)
}

fn edit(args: FileArgs) -> Result<()> {
    let env = Env::load()?;
    let owner = UserId::from(args.child.trim());
    let path = working_path(&env, &owner, args.file)?;
    let mut client = editor_client(&env);

    let snap = pipeline::begin_at(&env.home, &mut client, &owner, &path)
        .with_context(|| format!("failed to start editing routines for {owner}"))?;

    println!("✓ Editing {} routine(s) for {owner}", snap.items.len());
    println!("  Working file: {}", path.display());
    println!("  Edit it, then run `mymind routines save {owner}`.");
    Ok(())
}

fn diff(args: FileArgs) -> Result<()> {
    let env = Env::load()?;
    let owner = UserId::from(args.child.trim());
    let path = working_path(&env, &owner, args.file)?;
    let mut client = editor_client(&env);

    let result = pipeline::diff_at(&mut client, &owner, &path)
        .with_context(|| format!("diff failed for {owner}"))?;
    if result.is_empty() {
        println!("No differences for {owner}.");
        return Ok(());
    }
    print_diff(&result);
    Ok(())
}

fn save(args: SaveArgs) -> Result<()> {
    let env = Env::load()?;
    let owner = UserId::from(args.target.child.trim());
    let path = working_path(&env, &owner, args.target.file)?;
    let mut client = editor_client(&env);
    let opts = SaveOptions {
        dry_run: args.dry_run,
        force: args.force,
    };

    let report = match pipeline::save_at(&env.home, &mut client, &owner, &path, opts) {
        Ok(report) => report,
        Err(err) => {
            report_partial(&err, &path);
            return Err(err).with_context(|| format!("save failed for {owner}"));
        }
    };

    match report {
        SaveReport::Planned(result) => {
            if result.is_empty() {
                println!("[dry-run] ✓ {owner}: nothing to do");
            } else {
                println!("[dry-run] {owner}: {}", result.plan.summary());
                print_diff(&result);
            }
        }
        SaveReport::NothingToDo => println!("✓ {owner}: nothing to do"),
        SaveReport::Saved(outcome) => {
            println!(
                "✓ Saved routines for {owner} ({} change(s))",
                outcome.applied.len()
            );
            for op in &outcome.applied {
                println!("  {}", describe_op(op));
            }
            if let Some(e) = &outcome.refresh_error {
                println!(
                    "{} changes were saved but the list could not be re-fetched: {e}",
                    "warning:".yellow().bold()
                );
            }
        }
    }
    Ok(())
}

fn discard(child: String) -> Result<()> {
    let env = Env::load()?;
    let owner = UserId::from(child.trim());
    pipeline::discard_at(&env.home, &owner)
        .with_context(|| format!("failed to discard edit for {owner}"))?;
    println!("✓ Discarded edit for {owner}");
    Ok(())
}

fn print_diff(result: &ListDiff) {
    for line in &result.lines {
        println!("{line}");
    }
    if !result.unified_diff.is_empty() {
        println!();
        print!("{}", result.unified_diff);
        if !result.unified_diff.ends_with('\n') {
            println!();
        }
    }
}

fn describe_op(op: &AppliedOp) -> String {
    match op {
        AppliedOp::Created { id, title } => format!("+ created #{id} '{title}'"),
        AppliedOp::Updated { id } => format!("~ updated #{id}"),
        AppliedOp::Deleted { id } => format!("- deleted #{id}"),
    }
}

/// A failed pass may still have written something; say what, and that the
/// working file now carries the new ids.
fn report_partial(err: &SyncError, path: &Path) {
    let SyncError::Reconcile(inner @ ReconcileError::Remote { .. }) = err else {
        return;
    };
    let applied = inner.applied();
    if applied.is_empty() {
        return;
    }
    eprintln!(
        "{} {} change(s) reached the server before the failure:",
        "partial save:".yellow().bold(),
        applied.len()
    );
    for op in applied {
        eprintln!("  {}", describe_op(op));
    }
    eprintln!(
        "  {} was updated with the assigned ids; fix the problem and re-run save.",
        path.display()
    );
}
