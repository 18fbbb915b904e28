use serde::{Deserialize, Serialize};

/// Where a chunk sits within its file.
///
/// Boundary stubs are only meaningful for `First`, `Regular`, and `Last`
/// chunks; a `Unique` chunk owns the entire file and never participates in
/// reconciliation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChunkPosition {
    /// The whole file in one chunk.
    Unique,
    /// The file's first chunk of several.
    First,
    /// An interior chunk: neither first nor last.
    Regular,
    /// The file's final chunk of several.
    Last,
}

/// A contiguous byte range `[start, end)` of one file, assigned to one worker.
///
/// Chunks own no file content, only the range. They are created once by the
/// planner and read-only thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chunk {
    pub file_name: String,
    pub start: u64,
    pub end: u64,
    pub position: ChunkPosition,
}

impl Chunk {
    /// Number of bytes covered by this chunk.
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the chunk's range starts mid-file, i.e. its first bytes may be
    /// the tail of a word begun in the preceding chunk.
    pub fn continues_previous(&self) -> bool {
        matches!(self.position, ChunkPosition::Regular | ChunkPosition::Last)
    }

    /// True if the chunk's range ends mid-file, i.e. its last bytes may be the
    /// head of a word finished in the following chunk.
    pub fn continues_into_next(&self) -> bool {
        matches!(self.position, ChunkPosition::First | ChunkPosition::Regular)
    }
}

/// The ordered sequence of chunks owned by one worker rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerPlan {
    pub rank: usize,
    pub chunks: Vec<Chunk>,
}

impl WorkerPlan {
    pub fn new(rank: usize) -> Self {
        Self {
            rank,
            chunks: Vec::new(),
        }
    }

    /// Total bytes assigned to this worker.
    pub fn assigned_bytes(&self) -> u64 {
        self.chunks.iter().map(|c| c.len()).sum()
    }
}
