//! A scripted [`JobBackend`] for driving the monitor loop without LSF.
//!
//! Each submitted command is assigned an increasing job id and appears in
//! bulk status replies with the `RUN` code for a scripted number of query
//! cycles, after which it vanishes (which the monitor reads as completion).
//! Submissions and kills are recorded for assertions, and the backend tracks
//! the peak number of outstanding jobs it ever saw.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use bsubq::backend::JobBackend;
use bsubq::errors::{BsubqError, Result};
use bsubq::types::{JobId, SchedulerState};

#[derive(Default)]
struct Inner {
    next_jobid: u64,
    /// command -> how many queries the job reports `RUN` before vanishing.
    run_cycles: HashMap<String, u64>,
    /// commands whose submission yields no job id.
    failing_submissions: Vec<String>,
    /// number of upcoming `query_all` calls that fail outright.
    failing_queries: u64,
    /// jobid -> (command, remaining RUN cycles).
    active: HashMap<JobId, (String, u64)>,
    submitted: Vec<String>,
    killed: Vec<JobId>,
    peak_outstanding: usize,
}

/// Handle the test keeps to script behaviour and inspect what happened.
#[derive(Clone, Default)]
pub struct ScriptedHandle {
    inner: Arc<Mutex<Inner>>,
}

impl ScriptedHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script how many query cycles `command`'s job reports `RUN` before
    /// vanishing. Unscripted commands vanish at the first query.
    pub fn runs_for(&self, command: &str, cycles: u64) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .run_cycles
            .insert(command.to_string(), cycles);
        self
    }

    /// Make `command`'s submission produce no job id.
    pub fn fail_submission(&self, command: &str) -> &Self {
        self.inner
            .lock()
            .unwrap()
            .failing_submissions
            .push(command.to_string());
        self
    }

    /// Make the next `n` bulk status queries fail.
    pub fn fail_next_queries(&self, n: u64) -> &Self {
        self.inner.lock().unwrap().failing_queries = n;
        self
    }

    pub fn backend(&self) -> ScriptedBackend {
        ScriptedBackend {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn submitted(&self) -> Vec<String> {
        self.inner.lock().unwrap().submitted.clone()
    }

    pub fn killed(&self) -> Vec<JobId> {
        self.inner.lock().unwrap().killed.clone()
    }

    pub fn peak_outstanding(&self) -> usize {
        self.inner.lock().unwrap().peak_outstanding
    }

    /// Job id assigned to the `n`th successful submission (0-based).
    pub fn jobid_of_submission(&self, n: u64) -> JobId {
        JobId(n + 1)
    }
}

pub struct ScriptedBackend {
    inner: Arc<Mutex<Inner>>,
}

impl JobBackend for ScriptedBackend {
    fn submit(
        &mut self,
        command: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<JobId>>> + Send + '_>> {
        let command = command.to_string();
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            let mut inner = inner.lock().unwrap();
            inner.submitted.push(command.clone());

            if inner.failing_submissions.contains(&command) {
                return Ok(None);
            }

            inner.next_jobid += 1;
            let jobid = JobId(inner.next_jobid);
            let cycles = inner.run_cycles.get(&command).copied().unwrap_or(0);
            inner.active.insert(jobid, (command, cycles));

            let outstanding = inner.active.len();
            inner.peak_outstanding = inner.peak_outstanding.max(outstanding);

            Ok(Some(jobid))
        })
    }

    fn query_all(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<HashMap<JobId, SchedulerState>>> + Send + '_>> {
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            let mut inner = inner.lock().unwrap();

            if inner.failing_queries > 0 {
                inner.failing_queries -= 1;
                return Err(BsubqError::QueryError("scripted query failure".to_string()));
            }

            let mut reply = HashMap::new();
            let mut vanished = Vec::new();

            for (jobid, (_command, remaining)) in inner.active.iter_mut() {
                if *remaining > 0 {
                    *remaining -= 1;
                    reply.insert(*jobid, SchedulerState::new(SchedulerState::RUNNING));
                } else {
                    vanished.push(*jobid);
                }
            }

            for jobid in vanished {
                inner.active.remove(&jobid);
            }

            Ok(reply)
        })
    }

    fn kill(&mut self, job: JobId) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let inner = Arc::clone(&self.inner);

        Box::pin(async move {
            let mut inner = inner.lock().unwrap();
            inner.killed.push(job);
            inner.active.remove(&job);
            Ok(())
        })
    }
}
