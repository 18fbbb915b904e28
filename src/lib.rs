//! Distributed Word-Frequency Counter Library
//!
//! This library crate defines the core modules of a chunked, multi-worker
//! word-counting pipeline. It serves as the foundation for the binary
//! executable (`main.rs`).
//!
//! ## Architecture Modules
//! The system is composed of six loosely coupled subsystems:
//!
//! - **`discovery`**: The file intake layer. Scans a directory for regular files
//!   and produces the ordered (name, size) table the planner consumes.
//! - **`workload`**: The byte-range planner. Splits the total byte volume of all
//!   files into contiguous chunks across a fixed number of workers, classifying
//!   each chunk by its position within its file.
//! - **`counting`**: The local counting engine. Streams one chunk at a time in
//!   fixed-size blocks, tokenizes ASCII alphanumeric runs, and recovers words
//!   torn apart by block boundaries inside a chunk.
//! - **`reconcile`**: The boundary protocol. Workers that are adjacent in global
//!   byte order exchange word fragments left dangling at their chunk edges and
//!   correct double-counted partial words.
//! - **`histogram`**: The merge layer. Each worker serializes its non-zero
//!   entries as fixed-size records; the coordinator gathers and merges them
//!   into the final word table.
//! - **`runtime`**: The orchestration layer. Spawns one task per worker rank,
//!   wires up peer links, phase barriers, and the gather channels, and drives
//!   a job from plan to merged table.

pub mod counting;
pub mod discovery;
pub mod histogram;
pub mod reconcile;
pub mod runtime;
pub mod workload;
