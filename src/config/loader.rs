// src/config/loader.rs

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::config::model::CaseEntry;
use crate::errors::{BsubqError, Result};

/// Load a case list from a given path and return the raw entries.
///
/// This only performs JSON deserialization; it does **not** perform semantic
/// validation (uniqueness, timeout sanity). Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<CaseEntry>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let entries: Vec<CaseEntry> = serde_json::from_str(&contents)?;

    Ok(entries)
}

/// Load a case list from path and run basic validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads JSON.
/// - Checks for:
///   - an empty case list,
///   - empty command strings,
///   - duplicate commands (the command string is the task identity, and the
///     registry is keyed by it),
///   - a zero timeout threshold.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<Vec<CaseEntry>> {
    let entries = load_from_path(&path)?;
    validate_entries(&entries)?;
    Ok(entries)
}

fn validate_entries(entries: &[CaseEntry]) -> Result<()> {
    if entries.is_empty() {
        return Err(BsubqError::LoadError(
            "case list must contain at least one entry".to_string(),
        ));
    }

    let mut seen: HashSet<&str> = HashSet::new();

    for entry in entries {
        if entry.command.trim().is_empty() {
            return Err(BsubqError::LoadError(
                "case entry has an empty `command`".to_string(),
            ));
        }
        if entry.tc == 0 {
            return Err(BsubqError::LoadError(format!(
                "case '{}' has tc = 0 (timeout must be >= 1 poll cycle)",
                entry.command
            )));
        }
        if !seen.insert(entry.command.as_str()) {
            return Err(BsubqError::LoadError(format!(
                "duplicate command '{}' in case list (commands are task identities)",
                entry.command
            )));
        }
    }

    Ok(())
}
