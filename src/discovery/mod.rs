//! File Discovery Module
//!
//! Produces the ordered list of input files the planner works from.
//!
//! Only regular files directly inside the selected directory are considered.
//! Entries are sorted by name so that the byte-range plan (and therefore the
//! chunk/worker assignment) is deterministic for a given directory content.

pub mod scanner;
pub mod types;
