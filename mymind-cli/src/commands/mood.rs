//! `mymind mood record|recommend`

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use mymind_core::{Emotion, Role};

use super::Env;

#[derive(Subcommand, Debug)]
pub enum MoodCommand {
    /// Record how the logged-in child feels right now.
    Record(RecordArgs),

    /// Show activity suggestions for an emotion.
    Recommend {
        /// happy | sad | angry | sick (or the Korean label).
        emotion: Emotion,
    },
}

#[derive(Args, Debug)]
pub struct RecordArgs {
    /// happy | sad | angry | sick (or the Korean label).
    pub emotion: Emotion,

    /// Why the child feels this way.
    #[arg(long, short = 'r', default_value = "")]
    pub reason: String,
}

pub fn run(cmd: MoodCommand) -> Result<()> {
    match cmd {
        MoodCommand::Record(args) => record(args),
        MoodCommand::Recommend { emotion } => recommend(emotion),
    }
}

fn record(args: RecordArgs) -> Result<()> {
    let env = Env::load()?;
    let client = env.client(Role::Child);
    client
        .record_mood(args.emotion, args.reason.trim())
        .with_context(|| format!("failed to record mood {}", args.emotion))?;

    println!("✓ Recorded {} ({})", args.emotion.label(), args.emotion);
    Ok(())
}

fn recommend(emotion: Emotion) -> Result<()> {
    let env = Env::load()?;
    let role = if env.session.user_id(Role::Child).is_some() {
        Role::Child
    } else {
        Role::Parent
    };
    let items = env
        .client(role)
        .recommendations(emotion)
        .with_context(|| format!("failed to load recommendations for {emotion}"))?;

    if items.is_empty() {
        println!("No suggestions for {} yet.", emotion.label());
        return Ok(());
    }
    println!("{}", format!("Suggestions for {}", emotion.label()).bold());
    for (i, item) in items.iter().enumerate() {
        println!("  {}. {item}", i + 1);
    }
    Ok(())
}
