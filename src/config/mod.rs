// src/config/mod.rs

//! Case list loading and validation.
//!
//! The case list is a JSON array of objects, each describing one submission:
//!
//! ```json
//! [
//!   { "command": "bsub -o run_a.log ./run_a.sh", "log": "run_a.log", "tc": 10 },
//!   { "command": "bsub -o run_b.log ./run_b.sh", "log": "run_b.log", "tc": 5 }
//! ]
//! ```
//!
//! `tc` is the per-task timeout measured in poll cycles.

pub mod loader;
pub mod model;

pub use loader::{load_and_validate, load_from_path};
pub use model::CaseEntry;
