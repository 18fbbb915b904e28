//! Boundary Reconciliation Module
//!
//! Corrects words torn apart by the planner's worker boundaries, without any
//! shared global view.
//!
//! ## Core Concepts
//! - **Topology**: the global byte sequence across all files forms a path,
//!   split at worker boundaries. Each worker talks only to the owners of the
//!   immediately preceding and following byte ranges, which by construction
//!   are the adjacent ranks.
//! - **Handshake**: per boundary, the predecessor sends its trailing fragment
//!   (or an explicit "no stub" message) and the successor replies with a
//!   one-bit ack saying whether a correction happened. Exactly one exchange
//!   per boundary.
//! - **Ordering**: fragment and ack frames travel over queued point-to-point
//!   channels, so sends never block. Every worker sends downstream first,
//!   then services its upstream neighbor, then awaits its own ack; no rank
//!   parity scheme is needed to stay deadlock-free.
//! - **Hardening**: every receive is bounded by a timeout; a silent or
//!   crashed neighbor aborts the whole job instead of hanging it.

pub mod link;
pub mod protocol;
pub mod reconciler;
