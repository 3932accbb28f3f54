//! Owned state container for async, channel-fed state machines.
//!
//! A [`StateCtx`] owns exactly one [`State`]. Commands dispatched through it run as Tokio tasks
//! and report transitions through an updater; the owner applies them on [`StateCtx::sync`].

mod command;
mod ctx;
mod state;
mod task;

pub use command::{Command, CommandFuture};
pub use ctx::{SettlePolicy, StateCtx};
pub use state::{LatestOnlyUpdater, State, Updater};
pub use task::{TaskId, TaskIds};
