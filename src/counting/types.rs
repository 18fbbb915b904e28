use serde::{Deserialize, Serialize};

/// Size of the fixed word buffer in the histogram wire format, including the
/// terminating null byte.
pub const WORD_MAX: usize = 256;

/// Longest word text ever stored or transmitted, in bytes. Longer runs are
/// truncated to this bound at tokenization time, never rejected.
pub const WORD_CAP: usize = WORD_MAX - 1;

/// Default read-block size for the chunk counter.
pub const DEFAULT_BLOCK_SIZE: usize = 2048;

/// A word fragment left incomplete by a chunk boundary.
///
/// The text is already lowercased and bounded to `WORD_CAP` bytes; it has been
/// counted once as a standalone token by the producing worker, which is what
/// reconciliation later corrects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoundaryStub {
    pub text: String,
}

impl BoundaryStub {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Stubs produced by counting one chunk.
///
/// `leading` is set when the chunk starts mid-file on an alphanumeric byte:
/// the true word prefix lies in the previous chunk. `trailing` is set when
/// the chunk ends mid-file with a run still open: the true word suffix lies
/// in the next chunk. A `Unique` chunk never produces either.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkStubs {
    pub leading: Option<BoundaryStub>,
    pub trailing: Option<BoundaryStub>,
}
