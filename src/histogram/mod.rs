//! Histogram Merge Module
//!
//! Assembles the final word table out of the per-worker stores.
//!
//! ## Core Concepts
//! - **Extraction**: a worker filters its store to entries with a positive
//!   count and serializes them as fixed-size records.
//! - **Two-phase gather**: the coordinator first learns how many records each
//!   worker will send, then receives the record arrays, so payload sizes are
//!   known up front and a short or padded array is detected.
//! - **Merge**: insert-or-increment by exact word text; the text was
//!   normalized upstream. The merge is commutative and associative, so the
//!   coordinator absorbs worker histograms concurrently as they arrive.
//! - **Ordering**: the merge itself guarantees none; callers that need
//!   reproducible output sort by word before emission.

pub mod merger;
pub mod protocol;

#[cfg(test)]
mod tests;
