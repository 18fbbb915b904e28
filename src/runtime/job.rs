use super::config::{JobConfig, JobId};
use super::worker::{run_worker, AbortSignal, GatherRole, WorkerContext};
use crate::discovery::types::{total_size, FileDescriptor};
use crate::reconcile::link::chain_links;
use crate::workload::planner::plan_workloads;
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, Barrier};

/// Runs a whole counting job over `files` (resolved relative to `root`) and
/// returns the merged (word, count) table, sorted by word.
///
/// Every fatal condition — unreadable file, silent neighbor, malformed frame
/// — aborts the entire job: a partially aggregated histogram would be
/// silently wrong, so there is no partial-result salvage.
pub async fn run_job(
    root: &Path,
    files: &[FileDescriptor],
    config: &JobConfig,
) -> Result<Vec<(String, u64)>> {
    config.validate()?;

    let job_id = JobId::new();
    let workers = config.workers;
    tracing::info!(
        "job {} starting: {} file(s), {} bytes, {} worker(s), block size {}",
        job_id,
        files.len(),
        total_size(files),
        workers,
        config.block_size
    );

    // Phase 1: plan. Computed before any worker exists, so every rank holds
    // its complete chunk list before the first read.
    let plans = plan_workloads(files, workers)?;
    if tracing::enabled!(tracing::Level::DEBUG) {
        for plan in &plans {
            tracing::debug!(
                "rank {} plan ({} bytes): {}",
                plan.rank,
                plan.assigned_bytes(),
                serde_json::to_string(&plan.chunks).unwrap_or_default()
            );
        }
    }

    // Fail fast on unreadable input instead of tearing the job down from
    // deep inside a worker.
    for file in files {
        if file.size > 0 {
            let path = root.join(&file.name);
            tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("unable to open {}", path.display()))?;
        }
    }

    let links = chain_links(workers);
    let counted = Arc::new(Barrier::new(workers));
    let settled = Arc::new(Barrier::new(workers));
    let (abort_tx, _) = broadcast::channel::<String>(workers.max(16));

    // Gather channels: one per non-coordinator rank, all feeding rank 0.
    let mut inbound = Vec::with_capacity(workers.saturating_sub(1));
    let mut outbound = vec![None; workers];
    for (rank, slot) in outbound.iter_mut().enumerate().skip(1) {
        let (tx, rx) = mpsc::unbounded_channel();
        inbound.push((rank, rx));
        *slot = Some(tx);
    }

    let mut inbound = Some(inbound);
    let mut handles = Vec::with_capacity(workers);
    for (plan, (prev, next)) in plans.into_iter().zip(links) {
        let rank = plan.rank;
        let role = if rank == 0 {
            GatherRole::Coordinator {
                inbound: inbound.take().unwrap_or_default(),
            }
        } else {
            GatherRole::Member {
                outbound: outbound[rank]
                    .take()
                    .ok_or_else(|| anyhow!("gather channel for rank {} already taken", rank))?,
            }
        };

        let ctx = WorkerContext {
            rank,
            root: root.to_path_buf(),
            plan,
            block_size: config.block_size,
            handshake_timeout: config.handshake_timeout,
            prev,
            next,
            counted: counted.clone(),
            settled: settled.clone(),
            abort: AbortSignal::new(abort_tx.clone()),
            role,
        };
        handles.push(tokio::spawn(run_worker(ctx)));
    }

    let mut table = None;
    let mut first_error: Option<anyhow::Error> = None;
    for (rank, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(Ok(Some(merged))) => table = Some(merged),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => {
                // Prefer the root cause over the "job aborted" echoes the
                // other ranks report after the broadcast.
                let is_echo = e.to_string().starts_with("job aborted");
                if first_error.is_none() || !is_echo {
                    let keep = match &first_error {
                        Some(existing) => existing.to_string().starts_with("job aborted"),
                        None => true,
                    };
                    if keep {
                        first_error = Some(e);
                    }
                }
            }
            Err(join_error) => {
                // A panicked worker never raises the abort itself.
                let reason = format!("rank {} panicked: {}", rank, join_error);
                let _ = abort_tx.send(reason.clone());
                if first_error.is_none() {
                    first_error = Some(anyhow!(reason));
                }
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    let mut table = table.ok_or_else(|| anyhow!("coordinator produced no merged table"))?;
    table.sort_by(|a, b| a.0.cmp(&b.0));

    tracing::info!(
        "job {} finished: {} distinct word(s)",
        job_id,
        table.len()
    );
    Ok(table)
}
