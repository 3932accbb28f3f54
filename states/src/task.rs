//! Task identity for dispatched commands.
//!
//! - `TaskId`: combines the command's `TypeId` with a per-type generation counter
//! - `TaskIds`: issues generations and answers whether a task is still the latest of its type
//!
//! Generations only ever grow, so an update carrying an older generation than the latest
//! issued one belongs to a superseded dispatch.

use std::any::TypeId;
use std::collections::BTreeMap;

/// Unique identifier for a dispatched command.
///
/// # Example
///
/// ```ignore
/// let first = TaskId::new(TypeId::of::<FetchUserListCommand>(), 1);
/// let second = TaskId::new(TypeId::of::<FetchUserListCommand>(), 2);
///
/// assert_eq!(first.type_id(), second.type_id());
/// assert!(first.generation() < second.generation());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    type_id: TypeId,
    generation: u64,
}

impl TaskId {
    pub fn new(type_id: TypeId, generation: u64) -> Self {
        Self {
            type_id,
            generation,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Higher generation values indicate more recently dispatched commands.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Registry of the latest generation issued per command type.
#[derive(Debug, Clone, Default)]
pub struct TaskIds {
    latest: BTreeMap<TypeId, u64>,
}

impl TaskIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next generation for `type_id`.
    pub fn issue(&mut self, type_id: TypeId) -> TaskId {
        let generation = self.latest.entry(type_id).or_insert(0);
        *generation += 1;
        TaskId::new(type_id, *generation)
    }

    /// Issues the next generation for the command type `C`.
    pub fn issue_for<C: 'static>(&mut self) -> TaskId {
        self.issue(TypeId::of::<C>())
    }

    pub fn latest(&self, type_id: TypeId) -> Option<TaskId> {
        self.latest
            .get(&type_id)
            .map(|generation| TaskId::new(type_id, *generation))
    }

    pub fn is_latest(&self, task: TaskId) -> bool {
        self.latest.get(&task.type_id) == Some(&task.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ListCommand;
    struct DetailCommand;

    #[test]
    fn task_id_new_and_accessors() {
        let type_id = TypeId::of::<String>();
        let task_id = TaskId::new(type_id, 42);

        assert_eq!(task_id.type_id(), type_id);
        assert_eq!(task_id.generation(), 42);
    }

    #[test]
    fn task_id_equality() {
        let type_id = TypeId::of::<String>();

        let id1 = TaskId::new(type_id, 1);
        let id2 = TaskId::new(type_id, 1);
        let id3 = TaskId::new(type_id, 2);
        let id4 = TaskId::new(TypeId::of::<i32>(), 1);

        assert_eq!(id1, id2);
        assert_ne!(id1, id3); // Different generation
        assert_ne!(id1, id4); // Different type
    }

    #[test]
    fn issue_increments_per_type() {
        let mut ids = TaskIds::new();

        let list_1 = ids.issue_for::<ListCommand>();
        let list_2 = ids.issue_for::<ListCommand>();
        let detail_1 = ids.issue_for::<DetailCommand>();

        assert_eq!(list_1.generation(), 1);
        assert_eq!(list_2.generation(), 2);
        assert_eq!(detail_1.generation(), 1);
    }

    #[test]
    fn only_the_newest_generation_is_latest() {
        let mut ids = TaskIds::new();

        let first = ids.issue_for::<ListCommand>();
        assert!(ids.is_latest(first));

        let second = ids.issue_for::<ListCommand>();
        assert!(!ids.is_latest(first));
        assert!(ids.is_latest(second));
        assert_eq!(ids.latest(TypeId::of::<ListCommand>()), Some(second));
    }

    #[test]
    fn kinds_do_not_supersede_each_other() {
        let mut ids = TaskIds::new();

        let list = ids.issue_for::<ListCommand>();
        let detail = ids.issue_for::<DetailCommand>();

        assert!(ids.is_latest(list));
        assert!(ids.is_latest(detail));
    }

    #[test]
    fn unknown_task_is_not_latest() {
        let ids = TaskIds::new();
        let orphan = TaskId::new(TypeId::of::<ListCommand>(), 1);

        assert!(!ids.is_latest(orphan));
        assert_eq!(ids.latest(TypeId::of::<ListCommand>()), None);
    }
}
