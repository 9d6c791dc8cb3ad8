//! MyMind core library: domain types, local config and session storage, errors.
//!
//! - [`types`]: routine, child, log and mood payloads shared by client and sync
//! - [`error`]: [`CoreError`]
//! - [`config`]: `~/.mymind/config.yaml`
//! - [`session`]: `~/.mymind/session.json` (logged-in parent / child ids)
//! - [`storage`]: path layout and atomic writes

pub mod config;
pub mod error;
pub mod session;
pub mod storage;
pub mod types;

pub use config::Config;
pub use error::CoreError;
pub use session::{Role, Session};
pub use types::{
    ChildInfo, DayOfWeek, Emotion, MoodEntry, RoutineId, RoutineItem, RoutineLog, UserId,
};
