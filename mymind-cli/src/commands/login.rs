//! `mymind parent login|logout` and `mymind child login`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use mymind_core::{Role, UserId};

use super::Env;

#[derive(Subcommand, Debug)]
pub enum ParentCommand {
    /// Log in with a parent account and remember it on this device.
    Login(ParentLoginArgs),

    /// Log out and forget the stored parent account.
    Logout,
}

#[derive(Args, Debug)]
pub struct ParentLoginArgs {
    /// Account name used at sign-up.
    pub account: String,

    #[arg(long, short = 'p')]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum ChildCommand {
    /// Log in as a child using the id a parent gave them.
    Login(ChildLoginArgs),
}

#[derive(Args, Debug)]
pub struct ChildLoginArgs {
    pub child_id: String,
}

pub fn run_parent(cmd: ParentCommand) -> Result<()> {
    match cmd {
        ParentCommand::Login(args) => parent_login(args),
        ParentCommand::Logout => parent_logout(),
    }
}

pub fn run_child(cmd: ChildCommand) -> Result<()> {
    match cmd {
        ChildCommand::Login(args) => child_login(args),
    }
}

fn parent_login(args: ParentLoginArgs) -> Result<()> {
    let account = args.account.trim();
    if account.is_empty() || args.password.is_empty() {
        anyhow::bail!("account and password are required");
    }

    let mut env = Env::load()?;
    let reply = env
        .client(Role::Parent)
        .parent_login(account, &args.password)
        .with_context(|| format!("login failed for '{account}'"))?;

    env.session.set(Role::Parent, UserId::from(account));
    env.save_session()?;

    println!("✓ Logged in as parent '{account}'");
    if let Some(msg) = reply.text() {
        println!("  {msg}");
    }
    Ok(())
}

fn parent_logout() -> Result<()> {
    let mut env = Env::load()?;
    let Some(account) = env.session.user_id(Role::Parent).cloned() else {
        println!("Not logged in as a parent.");
        return Ok(());
    };

    // The local account is forgotten even if the server call fails.
    let result = env.client(Role::Parent).parent_logout();
    env.session.clear(Role::Parent);
    env.save_session()?;

    match result {
        Ok(_) => println!("✓ Logged out '{account}'"),
        Err(e) => {
            tracing::warn!("server logout failed: {e}");
            println!("✓ Logged out '{account}' locally (server said: {e})");
        }
    }
    Ok(())
}

fn child_login(args: ChildLoginArgs) -> Result<()> {
    let child_id = args.child_id.trim();
    if child_id.is_empty() {
        anyhow::bail!("child id is required");
    }

    let mut env = Env::load()?;
    env.client(Role::Child)
        .child_login(child_id)
        .with_context(|| format!("child login failed for '{child_id}'"))?;

    env.session.set(Role::Child, UserId::from(child_id));
    env.save_session()?;

    println!("✓ Logged in as child '{child_id}'");
    Ok(())
}
