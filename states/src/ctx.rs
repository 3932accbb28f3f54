use std::fmt;

use flume::{Receiver, Sender};
use log::{debug, warn};
use serde::Deserialize;
use tokio::task::JoinSet;

use crate::state::Envelope;
use crate::{Command, LatestOnlyUpdater, State, TaskId, TaskIds, Updater};

/// How settlements of overlapping dispatches of the same command type are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SettlePolicy {
    /// Only the most recently dispatched task of a command type may update the state.
    #[default]
    LatestOnly,
    /// Whichever task settles last overwrites the state, even if it was dispatched first.
    LastSettledWins,
}

/// Sole owner of a [`State`].
///
/// Commands run as spawned tasks and send their transitions through a channel; the owner folds
/// them into the state on [`StateCtx::sync`]. Nothing else holds a mutable reference, so the
/// state needs no lock.
pub struct StateCtx<S: State> {
    state: S,
    policy: SettlePolicy,
    tasks: TaskIds,
    send: Sender<Envelope<S::Action>>,
    recv: Receiver<Envelope<S::Action>>,
    task_set: JoinSet<()>,
}

impl<S: State + fmt::Debug> fmt::Debug for StateCtx<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateCtx")
            .field("state", &self.state)
            .field("policy", &self.policy)
            .field("queued", &self.recv.len())
            .field("tasks", &self.task_set.len())
            .finish()
    }
}

impl<S: State> Default for StateCtx<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: State> StateCtx<S> {
    pub fn new(state: S) -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            state,
            policy: SettlePolicy::default(),
            tasks: TaskIds::new(),
            send,
            recv,
            task_set: JoinSet::new(),
        }
    }

    pub fn with_policy(mut self, policy: SettlePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> SettlePolicy {
        self.policy
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Cloned view of the current state for readers.
    pub fn snapshot(&self) -> S {
        self.state.clone()
    }

    /// Applies `action` immediately, bypassing the channel.
    pub fn apply(&mut self, action: S::Action) {
        self.state.apply(action);
    }

    pub fn updater(&self) -> Updater<S::Action> {
        Updater::new(self.send.clone())
    }

    /// Applies the command's pending transition, then spawns it on the current Tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub fn dispatch<C: Command<S>>(&mut self, command: C) -> TaskId {
        let task = self.tasks.issue_for::<C>();
        debug!(
            "StateCtx: dispatching {} (generation {})",
            std::any::type_name::<C>(),
            task.generation()
        );

        if let Some(action) = command.pending() {
            self.state.apply(action);
        }

        let updater = LatestOnlyUpdater::new(task, self.send.clone());
        self.task_set.spawn(command.run(updater));
        task
    }

    /// Folds every queued update into the state and returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(Envelope { task, action }) = self.recv.try_recv() {
            if let Some(task) = task
                && self.policy == SettlePolicy::LatestOnly
                && !self.tasks.is_latest(task)
            {
                debug!(
                    "StateCtx: dropping stale update from generation {} (latest {:?})",
                    task.generation(),
                    self.tasks.latest(task.type_id()).map(|t| t.generation())
                );
                continue;
            }
            self.state.apply(action);
            applied += 1;
        }
        applied
    }

    pub fn task_count(&self) -> usize {
        self.task_set.len()
    }

    /// Waits for the next spawned task to finish, then syncs.
    ///
    /// Returns `false` when no task was running.
    pub async fn await_next(&mut self) -> bool {
        match self.task_set.join_next().await {
            Some(result) => {
                if let Err(err) = result {
                    warn!("StateCtx: command task ended abnormally: {err}");
                }
                self.sync();
                true
            }
            None => false,
        }
    }

    /// Syncs, awaits every spawned task and syncs after each one.
    pub async fn flush(&mut self) {
        self.sync();
        while self.await_next().await {}
        self.sync();
    }

    /// Aborts in-flight tasks and applies whatever they reported before stopping.
    pub async fn shutdown(&mut self) {
        self.task_set.abort_all();
        while self.task_set.join_next().await.is_some() {}
        self.sync();
    }
}
