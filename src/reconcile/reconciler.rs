use super::link::{NextPeer, PrevPeer};
use crate::counting::store::WordStore;
use crate::counting::types::{BoundaryStub, WORD_CAP};
use anyhow::{bail, Result};
use std::time::Duration;

/// The at-most-two stubs a worker carries into reconciliation: the leading
/// stub of its first chunk and the trailing stub of its last chunk. Interior
/// chunks are whole files and never produce stubs.
#[derive(Debug, Default)]
pub struct WorkerStubs {
    pub leading: Option<BoundaryStub>,
    pub trailing: Option<BoundaryStub>,
}

/// Merges a received suffix fragment with the local leading stub and fixes
/// the store: the corrected word is counted, the stub word's provisional
/// count is taken back (flooring at zero).
///
/// Returns the corrected word. The merge is subject to the same length bound
/// as tokenization; an over-long merge is truncated, never rejected.
pub fn apply_suffix_correction(
    store: &mut WordStore,
    suffix: &str,
    leading: &BoundaryStub,
) -> String {
    let mut merged = String::with_capacity(WORD_CAP.min(suffix.len() + leading.len()));
    for byte in suffix.bytes().chain(leading.text.bytes()) {
        if merged.len() >= WORD_CAP {
            break;
        }
        merged.push(byte as char);
    }

    store.increment(&merged);
    store.decrement(&leading.text);
    merged
}

/// Runs the worker's side of both boundary exchanges.
///
/// Must be called after local counting has finished on every worker (the
/// runtime enforces this with a barrier), so all stub values are final.
///
/// The order is fixed and deadlock-free because sends are queued: first the
/// trailing fragment goes downstream, then the upstream neighbor is serviced,
/// and only then is the own ack awaited.
pub async fn reconcile_boundaries(
    rank: usize,
    stubs: &WorkerStubs,
    store: &mut WordStore,
    mut prev: Option<PrevPeer>,
    mut next: Option<NextPeer>,
    timeout: Duration,
) -> Result<()> {
    // Round 1, downstream: announce the trailing fragment (or its absence).
    if let Some(next) = next.as_ref() {
        next.send_fragment(stubs.trailing.as_ref().map(|s| s.text.as_str()))?;
        tracing::debug!(
            "rank {} sent {} to rank {}",
            rank,
            match &stubs.trailing {
                Some(stub) => format!("trailing fragment {:?}", stub.text),
                None => "no-stub".to_string(),
            },
            rank + 1
        );
    }

    // Round 1, upstream: resolve the predecessor's fragment against the own
    // leading stub and tell it whether a correction happened.
    if let Some(prev) = prev.as_mut() {
        let fragment = prev.recv_fragment(timeout).await?;
        let corrected = match (&fragment, &stubs.leading) {
            (Some(suffix), Some(leading)) => {
                let merged = apply_suffix_correction(store, suffix, leading);
                tracing::debug!(
                    "rank {} merged boundary word {:?} (suffix {:?} + leading {:?})",
                    rank,
                    merged,
                    suffix,
                    leading.text
                );
                true
            }
            // The predecessor's run ended exactly at the boundary, or nothing
            // was dangling at all; either way our counts are already right.
            _ => false,
        };
        prev.send_ack(corrected)?;
    }

    // Round 2: learn whether the successor absorbed our trailing word, and if
    // so take back its standalone count.
    if let Some(next) = next.as_mut() {
        let corrected = next.await_ack(timeout).await?;
        if corrected {
            match &stubs.trailing {
                Some(stub) => {
                    store.decrement(&stub.text);
                    tracing::debug!(
                        "rank {} retracted provisional count for {:?}",
                        rank,
                        stub.text
                    );
                }
                None => bail!(
                    "rank {} got a correction ack from rank {} without having sent a fragment",
                    rank,
                    rank + 1
                ),
            }
        }
    }

    Ok(())
}
