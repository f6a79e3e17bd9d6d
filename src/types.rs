// src/types.rs

//! Small cross-cutting types shared by the registry, backend and monitor.

use std::fmt;

/// Canonical task identity: the full submission command string.
pub type TaskName = String;

/// Scheduler-assigned job identifier, distinct from the task's command string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque scheduler state code as reported by the bulk status query
/// (e.g. `RUN`, `PEND`, `PSUSP`). Only the canonical running code is
/// interpreted by the monitor; everything else is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchedulerState(pub String);

impl SchedulerState {
    /// Canonical "running" code used by LSF's `bjobs` output.
    pub const RUNNING: &'static str = "RUN";

    pub fn new(code: impl Into<String>) -> Self {
        SchedulerState(code.into())
    }

    /// Whether this is the canonical running code.
    pub fn is_running(&self) -> bool {
        self.0 == Self::RUNNING
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-task lifecycle status.
///
/// `Pending` is initial; `Done` and `TimedOut` are terminal. A task never
/// re-enters `Pending` after leaving it and no terminal task is revisited.
/// `Scheduler(..)` holds a verbatim state code that is neither the running
/// code nor terminal (a job still queued or suspended inside the scheduler);
/// such a task stays in the running set and keeps occupying a slot, but is
/// not aged toward its timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Done,
    TimedOut,
    Scheduler(SchedulerState),
}

impl TaskStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::TimedOut)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => f.write_str("PEND"),
            TaskStatus::Running => f.write_str("RUN"),
            TaskStatus::Done => f.write_str("DONE"),
            TaskStatus::TimedOut => f.write_str("TIMEOUT"),
            TaskStatus::Scheduler(state) => f.write_str(state.as_str()),
        }
    }
}
