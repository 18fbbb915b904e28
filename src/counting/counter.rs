use super::store::WordStore;
use super::types::{BoundaryStub, ChunkStubs, WORD_CAP};
use crate::workload::types::Chunk;
use anyhow::{bail, ensure, Context, Result};
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Streams one assigned byte range in fixed-size blocks, tokenizes it, and
/// updates the worker's store.
///
/// Tokenization never sees more than one block at a time, so a word can be
/// torn apart both by block edges (repaired here, inside the chunk) and by the
/// chunk's own edges (reported as stubs for the boundary reconciler).
pub struct ChunkCounter {
    block_size: usize,
}

/// Tokenizer state carried across the blocks of one chunk.
#[derive(Default)]
struct ScanState {
    /// Run still open at the end of the last block, already counted
    /// provisionally under its partial text.
    carry: Option<String>,
    /// Final text of the chunk's first token, once known.
    first: Option<String>,
    /// The open `carry` run is still the chunk's first token.
    first_open: bool,
    /// At least one token has started somewhere in this chunk.
    seen_token: bool,
    /// The chunk's very first byte was alphanumeric.
    begins_alnum: bool,
}

impl ChunkCounter {
    pub fn new(block_size: usize) -> Self {
        Self { block_size }
    }

    /// Counts the words of `chunk` into `store` and returns the boundary
    /// stubs the chunk leaves behind.
    ///
    /// The file is opened read-only and the cursor seeked to `chunk.start`;
    /// reads are clipped so no byte outside `[start, end)` is ever consumed.
    /// A file shorter than the planned range is a fatal I/O error: a silently
    /// missing block would skew the global histogram.
    pub async fn count_chunk(
        &self,
        path: &Path,
        chunk: &Chunk,
        store: &mut WordStore,
    ) -> Result<ChunkStubs> {
        ensure!(self.block_size > 0, "block size must be at least 1");
        if chunk.is_empty() {
            return Ok(ChunkStubs::default());
        }

        let mut file = File::open(path)
            .await
            .with_context(|| format!("unable to open {}", path.display()))?;
        file.seek(SeekFrom::Start(chunk.start))
            .await
            .with_context(|| format!("unable to seek {} to {}", path.display(), chunk.start))?;

        let mut remaining = chunk.len();
        let mut buf = vec![0u8; self.block_size];
        let mut state = ScanState::default();
        let mut first_block = true;

        while remaining > 0 {
            let want = remaining.min(self.block_size as u64) as usize;
            let read = file
                .read(&mut buf[..want])
                .await
                .with_context(|| format!("read failed on {}", path.display()))?;
            if read == 0 {
                bail!(
                    "{} ended {} bytes short of planned range [{}, {})",
                    path.display(),
                    remaining,
                    chunk.start,
                    chunk.end
                );
            }
            remaining -= read as u64;

            let block = &buf[..read];
            if first_block {
                state.begins_alnum = block[0].is_ascii_alphanumeric();
                first_block = false;
            }
            scan_block(block, store, &mut state);
        }

        // A run still open at the chunk's end is the chunk's final (and
        // possibly also first) token.
        if state.first_open {
            state.first = state.carry.clone();
        }

        let leading = if chunk.continues_previous() && state.begins_alnum {
            state.first.map(BoundaryStub::new)
        } else {
            None
        };
        let trailing = if chunk.continues_into_next() {
            state.carry.map(BoundaryStub::new)
        } else {
            None
        };

        Ok(ChunkStubs { leading, trailing })
    }
}

/// Tokenizes one block, continuing any run left open by the previous block.
fn scan_block(block: &[u8], store: &mut WordStore, state: &mut ScanState) {
    let mut i = 0;

    if let Some(prev) = state.carry.take() {
        if block[0].is_ascii_alphanumeric() {
            // The dangling run continues: merge, count the corrected word,
            // and take back the provisional count of the partial one.
            let mut merged = prev.clone();
            while i < block.len() && block[i].is_ascii_alphanumeric() {
                push_bounded(&mut merged, block[i]);
                i += 1;
            }
            store.increment(&merged);
            store.decrement(&prev);

            if i == block.len() {
                // Still open; stays provisional under the longer text.
                state.carry = Some(merged);
                return;
            }
            if state.first_open {
                state.first = Some(merged);
                state.first_open = false;
            }
        } else if state.first_open {
            // The run was complete after all; its provisional count stands.
            state.first = Some(prev);
            state.first_open = false;
        }
    }

    while i < block.len() {
        if !block[i].is_ascii_alphanumeric() {
            i += 1;
            continue;
        }

        let is_first = !state.seen_token;
        state.seen_token = true;

        let mut word = String::new();
        while i < block.len() && block[i].is_ascii_alphanumeric() {
            push_bounded(&mut word, block[i]);
            i += 1;
        }

        // Counted even when the run is cut by the block edge; the count is
        // corrected if the next block proves the word longer.
        store.increment(&word);

        let open = i == block.len();
        if is_first {
            if open {
                state.first_open = true;
            } else {
                state.first = Some(word.clone());
            }
        }
        if open {
            state.carry = Some(word);
        }
    }
}

/// Appends a case-folded byte, truncating at the word length bound.
///
/// The run keeps being consumed past the bound so an over-length run still
/// forms a single (truncated) token instead of splitting into several.
fn push_bounded(word: &mut String, byte: u8) {
    if word.len() < WORD_CAP {
        word.push(byte.to_ascii_lowercase() as char);
    }
}
