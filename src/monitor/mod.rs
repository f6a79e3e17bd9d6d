// src/monitor/mod.rs

//! The submit/poll/timeout/reap loop.
//!
//! One [`Monitor`] owns the task registry, a [`JobBackend`] and the running
//! set. Each cycle runs, in order:
//!
//! 1. reconcile — fold the bulk status snapshot into per-task state;
//! 2. age — count cycles for running tasks and flag timeouts;
//! 3. reap — release slots of finished tasks, kill timed-out jobs;
//! 4. admit — fill free slots from the pending queue, in insertion order;
//! 5. sleep until the next cycle, or halt when nothing is pending or running.
//!
//! The loop is single-threaded and cooperative: the only suspension points
//! are the backend calls and the inter-cycle sleep, so no locking is needed
//! around the registry or the running set.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::backend::JobBackend;
use crate::errors::Result;
use crate::registry::TaskRegistry;
use crate::types::{JobId, TaskName, TaskStatus};

pub mod reconcile;

/// Hard upper bound on outstanding jobs, whatever the caller asks for.
pub const MAX_PARALLEL_LIMIT: usize = 50;

/// Clamp a requested parallelism ceiling into `[1, MAX_PARALLEL_LIMIT]`.
///
/// Zero and negative requests collapse to 1.
pub fn effective_max_parallel(requested: i64) -> usize {
    requested.clamp(1, MAX_PARALLEL_LIMIT as i64) as usize
}

/// Monitor construction options.
#[derive(Debug, Clone, Copy)]
pub struct MonitorOptions {
    /// Requested parallelism ceiling; clamped at construction.
    pub max_parallel: i64,
    /// Fixed sleep between poll cycles.
    pub poll_interval: Duration,
}

impl Default for MonitorOptions {
    fn default() -> Self {
        MonitorOptions {
            max_parallel: 3,
            poll_interval: Duration::from_secs(60),
        }
    }
}

/// Drives submitted jobs from `Pending` to a terminal status.
pub struct Monitor<B: JobBackend> {
    registry: TaskRegistry,
    backend: B,
    /// Task identity -> scheduler job id, for tasks submitted and not yet
    /// reconciled to a terminal state.
    running: HashMap<TaskName, JobId>,
    max_parallel: usize,
    poll_interval: Duration,
}

impl<B: JobBackend> Monitor<B> {
    pub fn new(registry: TaskRegistry, backend: B, options: MonitorOptions) -> Self {
        Monitor {
            registry,
            backend,
            running: HashMap::new(),
            max_parallel: effective_max_parallel(options.max_parallel),
            poll_interval: options.poll_interval,
        }
    }

    /// Effective (clamped) parallelism ceiling.
    pub fn parallel_ceiling(&self) -> usize {
        self.max_parallel
    }

    /// Number of currently outstanding jobs (for tests).
    pub fn running_len(&self) -> usize {
        self.running.len()
    }

    /// Run cycles until no task is pending or running, then return the final
    /// status mapping with exactly one entry per loaded task.
    pub async fn run(mut self) -> Result<HashMap<TaskName, TaskStatus>> {
        info!(
            tasks = self.registry.len(),
            max_parallel = self.max_parallel,
            poll_interval_secs = self.poll_interval.as_secs_f64(),
            "monitor loop started"
        );

        loop {
            self.cycle().await;

            if !self.registry.has_pending() && self.running.is_empty() {
                break;
            }

            sleep(self.poll_interval).await;
        }

        info!("monitor loop finished; all submitted tasks terminal");
        Ok(self.registry.into_statuses())
    }

    async fn cycle(&mut self) {
        self.reconcile().await;
        self.age_running();
        self.reap().await;
        self.admit().await;
    }

    /// Fold the scheduler's bulk status into per-task state.
    ///
    /// A failed query keeps the previous cycle's state; the loop degrades
    /// gracefully rather than aborting.
    async fn reconcile(&mut self) {
        if self.running.is_empty() {
            return;
        }

        match self.backend.query_all().await {
            Ok(status_map) => {
                reconcile::apply_bulk_status(&mut self.registry, &self.running, &status_map);
            }
            Err(err) => {
                warn!(error = %err, "bulk status query failed; keeping stale state this cycle");
            }
        }
    }

    /// Count one more observed-running cycle for every running task and flag
    /// the ones that crossed their threshold.
    fn age_running(&mut self) {
        for task in self.running.keys() {
            let Some(state) = self.registry.state_mut(task) else {
                continue;
            };

            if state.status == TaskStatus::Running {
                state.poll_count += 1;
                if state.poll_count > state.timeout_cycles {
                    warn!(
                        task = %task,
                        poll_count = state.poll_count,
                        timeout_cycles = state.timeout_cycles,
                        "task exceeded its timeout threshold"
                    );
                    state.status = TaskStatus::TimedOut;
                }
            }
        }
    }

    /// Release slots of done tasks; kill timed-out jobs and release their
    /// slots whether or not the kill succeeded.
    async fn reap(&mut self) {
        let mut done: Vec<TaskName> = Vec::new();
        let mut timed_out: Vec<(TaskName, JobId)> = Vec::new();

        for (task, jobid) in &self.running {
            match self.registry.state(task).map(|s| &s.status) {
                Some(TaskStatus::Done) => done.push(task.clone()),
                Some(TaskStatus::TimedOut) => timed_out.push((task.clone(), *jobid)),
                _ => {}
            }
        }

        for task in done {
            debug!(task = %task, "task done; releasing slot");
            self.running.remove(&task);
        }

        for (task, jobid) in timed_out {
            info!(task = %task, job = %jobid, "killing timed-out job");
            if let Err(err) = self.backend.kill(jobid).await {
                warn!(task = %task, job = %jobid, error = %err, "kill failed; releasing slot anyway");
            }
            self.running.remove(&task);
        }
    }

    /// Fill free slots from the pending queue, in insertion order.
    ///
    /// A submission that yields no job id (or errors) drops the task for the
    /// remainder of the run: it is neither re-enqueued nor marked running,
    /// matching the scheduler driver this replaces. Its status stays
    /// `Pending` in the final mapping.
    async fn admit(&mut self) {
        let mut available = self.max_parallel.saturating_sub(self.running.len());

        while available > 0 {
            let Some(task) = self.registry.pop_pending() else {
                break;
            };

            match self.backend.submit(&task.command).await {
                Ok(Some(jobid)) => {
                    info!(task = %task.command, job = %jobid, log = %task.log, "task submitted");
                    if let Some(state) = self.registry.state_mut(&task.command) {
                        state.status = TaskStatus::Running;
                    }
                    self.running.insert(task.command, jobid);
                    available -= 1;
                }
                Ok(None) => {
                    warn!(
                        task = %task.command,
                        "submission output carried no job id; task will not be retried"
                    );
                }
                Err(err) => {
                    warn!(
                        task = %task.command,
                        error = %err,
                        "submission failed; task will not be retried"
                    );
                }
            }
        }
    }
}
