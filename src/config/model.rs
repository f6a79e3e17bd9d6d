// src/config/model.rs

use serde::Deserialize;

/// One entry of the case list, as read from JSON.
///
/// All three fields are required; a missing field is a deserialization error
/// and aborts loading.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CaseEntry {
    /// Full shell-invocable submission command (e.g. a `bsub ...` line).
    ///
    /// This string doubles as the task's identity and must be unique across
    /// the case list.
    pub command: String,

    /// Path for the job's log output. Informational only: the path is
    /// expected to already be embedded in `command` (e.g. via `bsub -o`),
    /// so it is passed through, not interpreted.
    pub log: String,

    /// Timeout threshold in poll cycles. Must be >= 1.
    pub tc: u32,
}
