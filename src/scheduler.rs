//! Periodic timer tasks.
//!
//! The scheduler never calls anything itself. It keeps the list of live
//! repeating tasks and tells the owner which one is due next; the owner
//! dispatches on [`TaskKind`]. That keeps both of the viewer's loops (frame
//! redraw and radius animation) independently cancellable and lets tests
//! fast-forward them with a manual clock.

use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle to a scheduled periodic task. Handles are generational: once a
    /// task is cancelled its handle never fires again, and a new task never
    /// reuses it.
    pub struct TaskId;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Repaint the frame from the current pointer position and radius.
    Redraw,
    /// Advance the in-flight radius animation by one sample.
    Animate,
}

#[derive(Clone, Copy, Debug)]
struct Task {
    kind: TaskKind,
    period: Duration,
    next_due: Duration,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    tasks: SlotMap<TaskId, Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a repeating task. Like an interval timer, the first fire is
    /// one period after `now`.
    pub fn schedule(&mut self, kind: TaskKind, period: Duration, now: Duration) -> TaskId {
        let period = period.max(Duration::from_millis(1));
        let id = self.tasks.insert(Task { kind, period, next_due: now.saturating_add(period) });
        tracing::debug!(?id, ?kind, ?period, "scheduled periodic task");
        id
    }

    /// Returns false when the handle was already cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let removed = self.tasks.remove(id);
        if let Some(task) = removed {
            tracing::debug!(?id, kind = ?task.kind, "cancelled periodic task");
        }
        removed.is_some()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn count(&self, kind: TaskKind) -> usize {
        self.tasks.values().filter(|t| t.kind == kind).count()
    }

    /// Pop the earliest task due at `now` and rearm it one period later. If the
    /// host stalled for several periods the task fires once and its next fire
    /// is pushed past `now`, so calling this in a loop always terminates.
    pub fn next_due(&mut self, now: Duration) -> Option<(TaskId, TaskKind)> {
        let (id, task) = self
            .tasks
            .iter_mut()
            .filter(|(_, t)| t.next_due <= now)
            .min_by_key(|(_, t)| t.next_due)?;

        task.next_due = task.next_due.saturating_add(task.period);
        if task.next_due <= now {
            task.next_due = now.saturating_add(task.period);
        }
        Some((id, task.kind))
    }
}
