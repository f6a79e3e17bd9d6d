// src/backend/lsf.rs

//! Production backend that shells out to the LSF tooling.
//!
//! - submit: run the task's own submission command through `sh -c` and fish
//!   the job id out of stdout (`Job <12345> is submitted ...`).
//! - query: run `bjobs`, drop the header line, split on whitespace; job id is
//!   the first column and the state code the third.
//! - kill: run `bkill <jobid>`.
//!
//! All parsing lives in free functions so the text contract is testable
//! without an LSF installation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::process::Output;

use regex::Regex;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::errors::{BsubqError, Result};
use crate::types::{JobId, SchedulerState};

use super::JobBackend;

const QUERY_COMMAND: &str = "bjobs";
const KILL_COMMAND: &str = "bkill";

/// LSF-backed implementation of [`JobBackend`].
pub struct LsfBackend {
    jobid_pattern: Regex,
}

impl LsfBackend {
    pub fn new() -> Self {
        // The pattern is a fixed literal; compilation cannot fail.
        let jobid_pattern = Regex::new(r"Job <(\d+)>").unwrap();
        Self { jobid_pattern }
    }

    async fn run_shell(&self, command: &str) -> Result<Output> {
        let output = Command::new("sh").arg("-c").arg(command).output().await?;
        Ok(output)
    }
}

impl Default for LsfBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl JobBackend for LsfBackend {
    fn submit(
        &mut self,
        command: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Option<JobId>>> + Send + '_>> {
        let command = command.to_string();

        Box::pin(async move {
            let output = self
                .run_shell(&command)
                .await
                .map_err(|e| BsubqError::SubmissionError(format!("'{command}': {e}")))?;

            let stdout = String::from_utf8_lossy(&output.stdout);
            debug!(cmd = %command, stdout = %stdout.trim(), "submission output");

            Ok(parse_submission_output(&self.jobid_pattern, &stdout))
        })
    }

    fn query_all(
        &mut self,
    ) -> Pin<Box<dyn Future<Output = Result<HashMap<JobId, SchedulerState>>> + Send + '_>> {
        Box::pin(async move {
            let output = self
                .run_shell(QUERY_COMMAND)
                .await
                .map_err(|e| BsubqError::QueryError(format!("'{QUERY_COMMAND}': {e}")))?;

            if !output.status.success() {
                return Err(BsubqError::QueryError(format!(
                    "'{QUERY_COMMAND}' exited with {}",
                    output.status
                )));
            }

            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(parse_bulk_status(&stdout))
        })
    }

    fn kill(&mut self, job: JobId) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            let command = format!("{KILL_COMMAND} {job}");
            let output = self
                .run_shell(&command)
                .await
                .map_err(|e| BsubqError::KillError(format!("'{command}': {e}")))?;

            if !output.status.success() {
                return Err(BsubqError::KillError(format!(
                    "'{command}' exited with {}",
                    output.status
                )));
            }

            Ok(())
        })
    }
}

/// Extract the job id from submission stdout, if present.
///
/// LSF prints `Job <12345> is submitted to queue <normal>.`; anything that
/// doesn't match yields `None` and the submission counts as failed.
pub fn parse_submission_output(pattern: &Regex, stdout: &str) -> Option<JobId> {
    let captures = pattern.captures(stdout)?;
    let digits = captures.get(1)?.as_str();
    digits.parse::<u64>().ok().map(JobId)
}

/// Parse line-oriented bulk status output into a job-id -> state mapping.
///
/// The first line is a header and is discarded. Each remaining line is
/// whitespace-delimited with the job id in the first column and the state
/// code in the third; malformed or short lines are skipped, not fatal.
pub fn parse_bulk_status(stdout: &str) -> HashMap<JobId, SchedulerState> {
    let mut status_map = HashMap::new();

    for line in stdout.lines().skip(1) {
        let mut fields = line.split_whitespace();
        let (Some(id_field), _user, Some(state_field)) =
            (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };

        match id_field.parse::<u64>() {
            Ok(id) => {
                status_map.insert(JobId(id), SchedulerState::new(state_field));
            }
            Err(_) => {
                warn!(line, "skipping bulk status line with non-numeric job id");
            }
        }
    }

    status_map
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jobid_pattern() -> Regex {
        Regex::new(r"Job <(\d+)>").unwrap()
    }

    #[test]
    fn parses_jobid_from_submission_output() {
        let out = "Job <4817> is submitted to queue <normal>.\n";
        assert_eq!(
            parse_submission_output(&jobid_pattern(), out),
            Some(JobId(4817))
        );
    }

    #[test]
    fn submission_output_without_jobid_yields_none() {
        assert_eq!(
            parse_submission_output(&jobid_pattern(), "Request aborted: queue closed\n"),
            None
        );
        assert_eq!(parse_submission_output(&jobid_pattern(), ""), None);
    }

    #[test]
    fn parses_bulk_status_lines() {
        let out = "JOBID   USER    STAT  QUEUE      FROM_HOST   EXEC_HOST   JOB_NAME   SUBMIT_TIME\n\
                   101     guodz   RUN   normal     hostA       hostB       *run_a.sh  Jan  1 10:00\n\
                   102     guodz   PEND  normal     hostA                   *run_b.sh  Jan  1 10:01\n";

        let map = parse_bulk_status(out);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&JobId(101)], SchedulerState::new("RUN"));
        assert_eq!(map[&JobId(102)], SchedulerState::new("PEND"));
    }

    #[test]
    fn header_only_output_yields_empty_map() {
        let out = "JOBID   USER    STAT  QUEUE\n";
        assert!(parse_bulk_status(out).is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let out = "JOBID   USER    STAT\n\
                   103     guodz   RUN\n\
                   truncated\n\
                   not-a-number  guodz  RUN\n\
                   \n";

        let map = parse_bulk_status(out);
        assert_eq!(map.len(), 1);
        assert_eq!(map[&JobId(103)], SchedulerState::new("RUN"));
    }

    #[test]
    fn empty_output_yields_empty_map() {
        assert!(parse_bulk_status("").is_empty());
    }
}
