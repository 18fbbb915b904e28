use super::protocol;
use crate::counting::store::WordStore;
use anyhow::{bail, Context, Result};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Ships a worker's histogram to the coordinator.
///
/// Phase one announces the record count, phase two carries the record array;
/// both frames are queued, so the sender never blocks on the coordinator.
pub fn send_histogram(tx: &mpsc::UnboundedSender<Vec<u8>>, store: &WordStore) -> Result<()> {
    let entries = store.non_zero_entries();
    tx.send(protocol::encode_size(entries.len()))
        .map_err(|_| anyhow::anyhow!("coordinator hung up before the gather"))?;
    tx.send(protocol::encode_records(&entries)?)
        .map_err(|_| anyhow::anyhow!("coordinator hung up during the gather"))?;

    tracing::debug!("sent {} histogram record(s) to the coordinator", entries.len());
    Ok(())
}

/// Coordinator-side merge table.
///
/// Starts from the coordinator's own local entries and absorbs each incoming
/// worker histogram by insert-or-increment on exact word text. Absorption is
/// commutative, so worker histograms are merged concurrently in whatever
/// order they arrive.
pub struct HistogramMerger {
    table: Arc<DashMap<String, u64>>,
}

impl HistogramMerger {
    pub fn new() -> Self {
        Self {
            table: Arc::new(DashMap::new()),
        }
    }

    /// Seeds the table with the coordinator's own non-zero entries.
    pub fn absorb_store(&self, store: &WordStore) {
        for (word, count) in store.non_zero_entries() {
            self.absorb(word, count);
        }
    }

    fn absorb(&self, word: String, count: u64) {
        *self.table.entry(word).or_insert(0) += count;
    }

    /// Receives and merges every worker's histogram.
    ///
    /// One absorb task per source rank: each runs the two-phase receive
    /// (size, then records) against its own channel and folds the decoded
    /// entries into the shared table. A worker that stays silent past
    /// `timeout`, hangs up, or sends a record array that disagrees with its
    /// announced size fails the whole gather.
    pub async fn gather(
        &self,
        inbound: Vec<(usize, mpsc::UnboundedReceiver<Vec<u8>>)>,
        timeout: Duration,
    ) -> Result<()> {
        let mut tasks = Vec::with_capacity(inbound.len());

        for (rank, mut rx) in inbound {
            let table = self.table.clone();
            tasks.push(tokio::spawn(async move {
                let size_frame = recv_frame(&mut rx, timeout, rank).await?;
                let expected = protocol::decode_size(&size_frame)
                    .with_context(|| format!("bad size frame from rank {}", rank))?;

                let record_frame = recv_frame(&mut rx, timeout, rank).await?;
                let entries = protocol::decode_records(&record_frame, expected)
                    .with_context(|| format!("bad record array from rank {}", rank))?;

                tracing::debug!("merging {} record(s) from rank {}", entries.len(), rank);
                for (word, count) in entries {
                    *table.entry(word).or_insert(0) += count;
                }
                Ok::<_, anyhow::Error>(())
            }));
        }

        for task in tasks {
            task.await.context("gather task panicked")??;
        }
        Ok(())
    }

    /// Consumes the merger and returns the merged (word, count) table.
    ///
    /// No ordering is guaranteed; sort before emission when reproducible
    /// output is needed.
    pub fn into_table(self) -> Vec<(String, u64)> {
        self.table
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

impl Default for HistogramMerger {
    fn default() -> Self {
        Self::new()
    }
}

async fn recv_frame(
    rx: &mut mpsc::UnboundedReceiver<Vec<u8>>,
    timeout: Duration,
    rank: usize,
) -> Result<Vec<u8>> {
    match tokio::time::timeout(timeout, rx.recv()).await {
        Ok(Some(frame)) => Ok(frame),
        Ok(None) => bail!("rank {} hung up before completing the gather", rank),
        Err(_) => bail!("rank {} sent nothing within {:?}", rank, timeout),
    }
}
