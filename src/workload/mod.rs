//! Workload Planning Module
//!
//! Splits the total byte volume of all input files into contiguous chunks and
//! assigns them to workers.
//!
//! ## Core Concepts
//! - **Capacity**: each worker is budgeted `total / W` bytes, with the first
//!   `total % W` workers taking one extra byte, so capacities differ by at
//!   most one.
//! - **Chunks**: files are carved in order into sub-ranges no larger than the
//!   current worker's remaining capacity. Per file, the chunks partition
//!   `[0, size)` exactly: contiguous, non-overlapping, ordered by start.
//! - **Position tags**: every chunk records whether it is the whole file
//!   (`Unique`), the first of several (`First`), the final of several
//!   (`Last`), or an interior piece (`Regular`). The tags drive which chunk
//!   edges later need boundary reconciliation.

pub mod planner;
pub mod types;

#[cfg(test)]
mod tests;
