use crate::counting::counter::ChunkCounter;
use crate::counting::store::WordStore;
use crate::histogram::merger::{send_histogram, HistogramMerger};
use crate::reconcile::link::{NextPeer, PrevPeer};
use crate::reconcile::reconciler::{reconcile_boundaries, WorkerStubs};
use crate::workload::types::WorkerPlan;
use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, Barrier};

/// Job-wide abort signal.
///
/// Any worker that hits a fatal condition raises it; everyone else observes
/// it at their next barrier and fails instead of waiting on a rank that will
/// never arrive.
pub struct AbortSignal {
    tx: broadcast::Sender<String>,
    rx: broadcast::Receiver<String>,
}

impl AbortSignal {
    pub fn new(tx: broadcast::Sender<String>) -> Self {
        let rx = tx.subscribe();
        Self { tx, rx }
    }

    /// Broadcasts the abort reason. Failing to deliver just means every
    /// other worker already stopped.
    pub fn raise(&self, reason: &str) {
        let _ = self.tx.send(reason.to_string());
    }

    async fn observed(&mut self) -> String {
        match self.rx.recv().await {
            Ok(reason) => reason,
            Err(_) => "abort channel closed".to_string(),
        }
    }
}

/// A worker's role in the gather phase: rank 0 merges, everyone else ships
/// its histogram to rank 0.
pub enum GatherRole {
    Coordinator {
        inbound: Vec<(usize, mpsc::UnboundedReceiver<Vec<u8>>)>,
    },
    Member {
        outbound: mpsc::UnboundedSender<Vec<u8>>,
    },
}

/// Everything one worker rank needs to run a job.
pub struct WorkerContext {
    pub rank: usize,
    pub root: PathBuf,
    pub plan: WorkerPlan,
    pub block_size: usize,
    pub handshake_timeout: Duration,
    pub prev: Option<PrevPeer>,
    pub next: Option<NextPeer>,
    /// Barrier after local counting: stub values are final past it.
    pub counted: Arc<Barrier>,
    /// Barrier after reconciliation: correction traffic has settled past it.
    pub settled: Arc<Barrier>,
    pub abort: AbortSignal,
    pub role: GatherRole,
}

/// Runs one worker rank end to end.
///
/// Returns the merged table for the coordinator, `None` for everyone else.
/// On error the abort signal is raised before the error propagates, so peers
/// blocked on barriers or channels are released.
pub async fn run_worker(ctx: WorkerContext) -> Result<Option<Vec<(String, u64)>>> {
    let abort = AbortSignal::new(ctx.abort.tx.clone());
    let rank = ctx.rank;

    match drive(ctx).await {
        Ok(table) => Ok(table),
        Err(e) => {
            tracing::error!("rank {} failed: {:#}", rank, e);
            abort.raise(&format!("{:#}", e));
            Err(e)
        }
    }
}

async fn drive(mut ctx: WorkerContext) -> Result<Option<Vec<(String, u64)>>> {
    let mut store = WordStore::new();
    let counter = ChunkCounter::new(ctx.block_size);
    let mut stubs = WorkerStubs::default();
    let chunk_count = ctx.plan.chunks.len();

    // Phase 2: local counting. Only the first chunk can continue a
    // predecessor's range and only the last can spill into a successor's;
    // interior chunks are whole files.
    for (index, chunk) in ctx.plan.chunks.iter().enumerate() {
        let path = ctx.root.join(&chunk.file_name);
        let chunk_stubs = counter
            .count_chunk(&path, chunk, &mut store)
            .await
            .with_context(|| {
                format!(
                    "rank {} failed counting {} [{}, {})",
                    ctx.rank, chunk.file_name, chunk.start, chunk.end
                )
            })?;

        if index == 0 {
            stubs.leading = chunk_stubs.leading;
        }
        if index + 1 == chunk_count {
            stubs.trailing = chunk_stubs.trailing;
        }
    }
    tracing::debug!(
        "rank {} counted {} chunk(s), {} distinct word(s)",
        ctx.rank,
        chunk_count,
        store.non_zero_len()
    );

    checkpoint(&ctx.counted, &mut ctx.abort).await?;

    // Phase 3: boundary reconciliation with the adjacent ranks.
    reconcile_boundaries(
        ctx.rank,
        &stubs,
        &mut store,
        ctx.prev.take(),
        ctx.next.take(),
        ctx.handshake_timeout,
    )
    .await?;

    checkpoint(&ctx.settled, &mut ctx.abort).await?;

    // Phase 4: gather.
    match ctx.role {
        GatherRole::Member { outbound } => {
            send_histogram(&outbound, &store)?;
            Ok(None)
        }
        GatherRole::Coordinator { inbound } => {
            let merger = HistogramMerger::new();
            merger.absorb_store(&store);
            merger.gather(inbound, ctx.handshake_timeout).await?;
            Ok(Some(merger.into_table()))
        }
    }
}

/// Waits on a phase barrier, bailing out if the job is aborted meanwhile.
async fn checkpoint(barrier: &Barrier, abort: &mut AbortSignal) -> Result<()> {
    tokio::select! {
        _ = barrier.wait() => Ok(()),
        reason = abort.observed() => bail!("job aborted: {}", reason),
    }
}
