use flume::Sender;
use log::warn;

use crate::TaskId;

/// A state owned by a [`StateCtx`](crate::StateCtx).
///
/// Every mutation is expressed as an `Action` and applied through [`State::apply`], which keeps
/// the owner the single mutation point. Readers work on a cloned snapshot.
pub trait State: Clone + Default + Send + 'static {
    /// Transition message understood by this state.
    type Action: Send + 'static;

    fn apply(&mut self, action: Self::Action);
}

/// Action on its way from a task back to the owning context.
pub(crate) struct Envelope<A> {
    pub(crate) task: Option<TaskId>,
    pub(crate) action: A,
}

/// Untagged update channel.
///
/// Anything sent through it is applied on the next `sync`, regardless of which task sent it.
pub struct Updater<A> {
    send: Sender<Envelope<A>>,
}

impl<A> Clone for Updater<A> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
        }
    }
}

impl<A: Send + 'static> Updater<A> {
    pub(crate) fn new(send: Sender<Envelope<A>>) -> Self {
        Self { send }
    }

    pub fn set(&self, action: A) {
        if self
            .send
            .send(Envelope { task: None, action })
            .is_err()
        {
            warn!("Updater: state context dropped, discarding update");
        }
    }
}

/// Update channel tagged with the [`TaskId`] of the command that owns it.
///
/// Under [`SettlePolicy::LatestOnly`](crate::SettlePolicy::LatestOnly) the context drops any
/// update whose task is no longer the latest one dispatched for its command type.
pub struct LatestOnlyUpdater<A> {
    task: TaskId,
    send: Sender<Envelope<A>>,
}

impl<A> Clone for LatestOnlyUpdater<A> {
    fn clone(&self) -> Self {
        Self {
            task: self.task,
            send: self.send.clone(),
        }
    }
}

impl<A: Send + 'static> LatestOnlyUpdater<A> {
    pub(crate) fn new(task: TaskId, send: Sender<Envelope<A>>) -> Self {
        Self { task, send }
    }

    /// The task this updater reports for.
    pub fn task(&self) -> TaskId {
        self.task
    }

    pub fn set(&self, action: A) {
        let envelope = Envelope {
            task: Some(self.task),
            action,
        };
        if self.send.send(envelope).is_err() {
            warn!(
                "LatestOnlyUpdater: state context dropped, discarding update for generation {}",
                self.task.generation()
            );
        }
    }
}
