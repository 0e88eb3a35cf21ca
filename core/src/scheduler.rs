use alloc::vec::Vec;

use crate::{GameSummary, Millis, Position};

/// One-shot actions that fire on the engine's virtual clock.
///
/// Actions reference card positions, never card snapshots; whoever fires them
/// must re-check the current state so that stale tasks are inert.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum DeferredAction {
    RevertMismatch(Position, Position),
    RevertHint(Position, Position),
    EmitSummary(GameSummary),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct Task {
    due: Millis,
    action: DeferredAction,
}

/// Cancelable one-shot task queue over virtual time.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TaskQueue {
    tasks: Vec<Task>,
}

impl TaskQueue {
    pub(crate) fn schedule(&mut self, due: Millis, action: DeferredAction) {
        self.tasks.push(Task { due, action });
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub(crate) fn pop_due(&mut self, now: Millis) -> Option<DeferredAction> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= now)
            .min_by_key(|(_, task)| task.due)
            .map(|(index, _)| index)?;
        Some(self.tasks.remove(index).action)
    }

    pub(crate) fn clear(&mut self) {
        self.tasks.clear();
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
