use crate::counting::types::DEFAULT_BLOCK_SIZE;
use anyhow::{ensure, Result};
use std::time::Duration;

/// Unique identifier for one counting job, used to correlate log lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobId(pub String);

impl JobId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Tunable parameters of a counting job.
#[derive(Debug, Clone)]
pub struct JobConfig {
    /// Number of worker ranks the byte volume is split across.
    pub workers: usize,
    /// Read-block size used by the chunk counter.
    pub block_size: usize,
    /// Upper bound on every boundary and gather receive; a peer silent for
    /// longer aborts the job.
    pub handshake_timeout: Duration,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            block_size: DEFAULT_BLOCK_SIZE,
            handshake_timeout: Duration::from_secs(30),
        }
    }
}

impl JobConfig {
    /// Rejects contract-violating configurations before any I/O happens.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.workers >= 1, "worker count must be at least 1");
        ensure!(self.block_size >= 1, "block size must be at least 1");
        ensure!(
            self.handshake_timeout > Duration::ZERO,
            "handshake timeout must be positive"
        );
        Ok(())
    }
}
