// src/backend/mod.rs

//! Job backend abstraction.
//!
//! The monitor talks to a [`JobBackend`] instead of spawning processes
//! directly. This isolates the fragile text contract with the external
//! scheduler behind three narrow operations, and makes it easy to swap in a
//! scripted backend in tests while keeping the production implementation in
//! [`lsf`].
//!
//! - `LsfBackend` is the default implementation used by `bsubq`. It shells
//!   out to `bsub`-style submission commands, `bjobs` and `bkill`.
//! - Tests can provide their own `JobBackend` that, for example, records
//!   which commands were submitted and scripts the bulk status replies.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::types::{JobId, SchedulerState};

pub mod lsf;

pub use lsf::LsfBackend;

/// Trait abstracting the three external scheduler operations.
///
/// Production code uses [`LsfBackend`]; tests can provide their own
/// implementation that doesn't spawn real processes.
///
/// All three operations are fallible at the process boundary; the monitor
/// treats every failure as non-fatal and keeps looping.
pub trait JobBackend: Send {
    /// Submit one task command to the scheduler.
    ///
    /// Returns `Ok(None)` when the submission ran but its output carried no
    /// recognizable job identifier; the caller treats that the same as a
    /// submission error.
    fn submit(
        &mut self,
        command: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<JobId>>> + Send + '_>>;

    /// Query the scheduler for all currently known jobs.
    ///
    /// The returned mapping covers every job the scheduler still lists;
    /// a submitted job that is absent from it is taken to have finished.
    fn query_all(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<HashMap<JobId, SchedulerState>>> + Send + '_>>;

    /// Kill one job by identifier. Best-effort.
    fn kill(&mut self, job: JobId) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}
