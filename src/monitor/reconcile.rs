// src/monitor/reconcile.rs

//! Folds a bulk status snapshot into the task registry.

use std::collections::HashMap;

use tracing::debug;

use crate::registry::TaskRegistry;
use crate::types::{JobId, SchedulerState, TaskName, TaskStatus};

/// Update every running task's status from the bulk status mapping.
///
/// - Job id present with the canonical running code: the task is `Running`.
/// - Job id present with any other code: the code is carried verbatim as
///   `Scheduler(..)`; only the monitor loop interprets it further.
/// - Job id absent: the scheduler no longer lists the job, which is the only
///   observable completion signal, so the task is declared `Done`.
pub fn apply_bulk_status(
    registry: &mut TaskRegistry,
    running: &HashMap<TaskName, JobId>,
    status_map: &HashMap<JobId, SchedulerState>,
) {
    for (task, jobid) in running {
        let Some(state) = registry.state_mut(task) else {
            continue;
        };

        match status_map.get(jobid) {
            Some(reported) if reported.is_running() => {
                state.status = TaskStatus::Running;
            }
            Some(reported) => {
                debug!(task = %task, job = %jobid, state = %reported, "scheduler-side state");
                state.status = TaskStatus::Scheduler(reported.clone());
            }
            None => {
                debug!(task = %task, job = %jobid, "job absent from bulk status; declaring done");
                state.status = TaskStatus::Done;
            }
        }
    }
}
