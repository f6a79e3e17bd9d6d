// src/registry.rs

//! Task registry: the immutable pending queue plus per-task mutable state.

use std::collections::{HashMap, VecDeque};

use crate::config::CaseEntry;
use crate::types::{TaskName, TaskStatus};

/// Immutable description of one unit of work.
///
/// Created once at load time and never mutated; identity is the command
/// string (uniqueness is enforced by the case list loader).
#[derive(Debug, Clone)]
pub struct Task {
    pub command: String,
    pub log: String,
    pub timeout_cycles: u32,
}

impl From<CaseEntry> for Task {
    fn from(entry: CaseEntry) -> Self {
        Task {
            command: entry.command,
            log: entry.log,
            timeout_cycles: entry.tc,
        }
    }
}

/// Mutable per-task state, keyed by task identity in the registry.
#[derive(Debug, Clone)]
pub struct TaskState {
    pub status: TaskStatus,
    /// Consecutive cycles the task has been observed running.
    pub poll_count: u32,
    /// Copied from the task at creation.
    pub timeout_cycles: u32,
}

impl TaskState {
    fn new(timeout_cycles: u32) -> Self {
        TaskState {
            status: TaskStatus::Pending,
            poll_count: 0,
            timeout_cycles,
        }
    }
}

/// Holds the FIFO queue of not-yet-submitted tasks and the status mapping
/// for every task ever loaded.
///
/// State entries are created `Pending` when the registry is built and are
/// never deleted; after the monitor loop halts, [`TaskRegistry::into_statuses`]
/// yields the final status for every loaded task.
#[derive(Debug)]
pub struct TaskRegistry {
    pending: VecDeque<Task>,
    states: HashMap<TaskName, TaskState>,
}

impl TaskRegistry {
    /// Build a registry from validated case entries, preserving insertion
    /// order for admission.
    pub fn from_entries(entries: Vec<CaseEntry>) -> Self {
        let mut pending = VecDeque::with_capacity(entries.len());
        let mut states = HashMap::with_capacity(entries.len());

        for entry in entries {
            let task = Task::from(entry);
            states.insert(task.command.clone(), TaskState::new(task.timeout_cycles));
            pending.push_back(task);
        }

        TaskRegistry { pending, states }
    }

    /// Pop the next pending task in insertion order.
    pub fn pop_pending(&mut self) -> Option<Task> {
        self.pending.pop_front()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Mutable state for a task, if known.
    pub fn state_mut(&mut self, task: &str) -> Option<&mut TaskState> {
        self.states.get_mut(task)
    }

    /// Read-only state for a task, if known.
    pub fn state(&self, task: &str) -> Option<&TaskState> {
        self.states.get(task)
    }

    /// Number of loaded tasks (pending, running or terminal).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Consume the registry and return the final status mapping.
    pub fn into_statuses(self) -> HashMap<TaskName, TaskStatus> {
        self.states
            .into_iter()
            .map(|(name, state)| (name, state.status))
            .collect()
    }
}
