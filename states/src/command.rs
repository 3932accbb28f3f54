use std::future::Future;
use std::pin::Pin;

use crate::{LatestOnlyUpdater, State};

/// Future returned by [`Command::run`].
pub type CommandFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// A manual-only unit of async work dispatched through [`StateCtx::dispatch`](crate::StateCtx::dispatch).
///
/// Side effects (network IO) live here rather than in the state. The command never touches the
/// state directly; it reports transitions through the updater it is handed.
pub trait Command<S: State>: Send + 'static {
    /// Transition applied synchronously at dispatch, before the command is spawned.
    fn pending(&self) -> Option<S::Action> {
        None
    }

    fn run(self, updater: LatestOnlyUpdater<S::Action>) -> CommandFuture;
}
