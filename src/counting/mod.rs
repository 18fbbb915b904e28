//! Local Counting Module
//!
//! Implements the per-worker counting engine: the owned word→count store and
//! the streaming chunk counter.
//!
//! ## Core Concepts
//! - **Blocks**: a chunk's byte range is read in fixed-size blocks (default
//!   2048 bytes); reads are clipped so the range is never overrun.
//! - **Tokens**: maximal runs of ASCII alphanumeric bytes, case-folded to
//!   lowercase and bounded to `WORD_CAP` bytes.
//! - **Dangling runs**: a run still open at a block edge is counted
//!   provisionally and remembered; when the next block begins mid-run, the
//!   pieces are merged and the provisional count is corrected in place.
//! - **Chunk stubs**: runs cut by the chunk's own edges are reported to the
//!   caller so the boundary reconciler can repair them against the
//!   neighboring worker.

pub mod counter;
pub mod store;
pub mod types;
