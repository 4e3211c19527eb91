//! One admitted object moving through the download and process stages.

use std::time::Instant;

use crate::range::{object_name, ObjectIndex};

use super::budget::AdmissionPermit;

/// Lifecycle of a task. `Retrying` may repeat; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Downloading,
    Retrying,
    Fetched,
    Processing,
    Done,
}

impl TaskState {
    pub fn can_advance_to(self, next: TaskState) -> bool {
        use TaskState::*;
        matches!(
            (self, next),
            (Pending, Downloading)
                | (Downloading, Retrying | Fetched | Done)
                | (Retrying, Retrying | Fetched | Done)
                | (Fetched, Processing)
                | (Processing, Done)
        )
    }
}

/// Work for one object. Holds its admission permit until dropped.
#[derive(Debug)]
pub struct Task {
    index: ObjectIndex,
    object: String,
    state: TaskState,
    admitted_at: Instant,
    _permit: AdmissionPermit,
}

impl Task {
    pub fn admit(index: ObjectIndex, permit: AdmissionPermit) -> Self {
        Self {
            index,
            object: object_name(index),
            state: TaskState::Pending,
            admitted_at: Instant::now(),
            _permit: permit,
        }
    }

    pub fn index(&self) -> ObjectIndex {
        self.index
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn transition(&mut self, next: TaskState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal task transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(object = %self.object, from = ?self.state, to = ?next, "task state");
        self.state = next;
        if next == TaskState::Done {
            tracing::trace!(
                object = %self.object,
                elapsed_ms = self.admitted_at.elapsed().as_millis() as u64,
                "task done"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TaskState::*;

    #[test]
    fn legal_paths() {
        assert!(Pending.can_advance_to(Downloading));
        assert!(Downloading.can_advance_to(Retrying));
        assert!(Retrying.can_advance_to(Retrying));
        assert!(Retrying.can_advance_to(Fetched));
        assert!(Fetched.can_advance_to(Processing));
        assert!(Processing.can_advance_to(Done));
        assert!(Downloading.can_advance_to(Done));
    }

    #[tokio::test]
    async fn task_holds_permit_until_dropped() {
        let budget = crate::scheduler::AdmissionBudget::new(1);
        let mut task = Task::admit(3, budget.acquire().await.unwrap());
        assert_eq!(task.object(), "epoch_3");
        assert_eq!(task.index(), 3);
        assert_eq!(task.state(), Pending);
        for next in [Downloading, Retrying, Fetched, Processing, Done] {
            task.transition(next);
        }
        assert_eq!(task.state(), Done);
        assert_eq!(budget.in_use(), 1);
        drop(task);
        assert_eq!(budget.in_use(), 0);
    }

    #[test]
    fn illegal_paths() {
        assert!(!Pending.can_advance_to(Processing));
        assert!(!Fetched.can_advance_to(Done));
        assert!(!Done.can_advance_to(Pending));
        assert!(!Processing.can_advance_to(Downloading));
    }
}
