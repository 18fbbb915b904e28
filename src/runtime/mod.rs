//! Job Runtime Module
//!
//! Orchestrates a whole counting job: one tokio task per worker rank, all
//! running the same control flow over disjoint byte ranges.
//!
//! ## Phases
//! 1. **Plan**: chunk lists are computed and handed out before any worker is
//!    spawned, so every worker holds its full plan before reading starts.
//! 2. **Count**: each worker streams its chunks and fills its own store. A
//!    barrier separates this phase from the next, so no stub is exchanged
//!    before every neighbor's stub values are final.
//! 3. **Reconcile**: adjacent ranks run the boundary handshake. A second
//!    barrier lets all correction traffic settle before extraction.
//! 4. **Gather**: rank 0 acts as coordinator and merges every worker's
//!    histogram into the final table.
//!
//! Any fatal condition raises a broadcast abort that releases workers parked
//! on barriers: the job fails as a whole rather than hanging or emitting a
//! silently skewed histogram.

pub mod config;
pub mod job;
pub mod worker;
