use super::types::{Chunk, ChunkPosition, WorkerPlan};
use crate::discovery::types::FileDescriptor;
use anyhow::{bail, ensure, Result};

/// Computes the per-worker chunk lists for `workers` workers over `files`.
///
/// Worker `i` is budgeted `total / workers` bytes, plus one extra byte when
/// `i < total % workers`. Files are processed in their given order; the
/// current worker's remaining capacity is carved off the current file until
/// either the file or the capacity is exhausted. A file that fits entirely
/// within the remaining capacity yields a single `Unique` chunk (or `Last`,
/// if earlier pieces were already emitted) and the worker keeps its leftover
/// budget for the next file.
///
/// Zero-byte files produce no chunks. A worker count of zero is a
/// configuration error, rejected before any I/O happens.
pub fn plan_workloads(files: &[FileDescriptor], workers: usize) -> Result<Vec<WorkerPlan>> {
    if workers == 0 {
        bail!("worker count must be at least 1");
    }

    let total: u64 = files.iter().map(|f| f.size).sum();
    let base = total / workers as u64;
    let remainder = (total % workers as u64) as usize;

    let mut capacities: Vec<u64> = (0..workers)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect();
    let mut plans: Vec<WorkerPlan> = (0..workers).map(WorkerPlan::new).collect();

    let mut cursor = 0usize;
    for file in files {
        let mut start = 0u64;
        let mut left = file.size;

        while left > 0 {
            while cursor < workers && capacities[cursor] == 0 {
                cursor += 1;
            }
            // Capacities sum to the total byte volume, so bytes can never
            // outlast the workers.
            ensure!(
                cursor < workers,
                "planner ran out of capacity with {} bytes of {} unassigned",
                left,
                file.name
            );

            let capacity = capacities[cursor];
            if capacity >= left {
                let position = if start == 0 {
                    ChunkPosition::Unique
                } else {
                    ChunkPosition::Last
                };
                plans[cursor].chunks.push(Chunk {
                    file_name: file.name.clone(),
                    start,
                    end: start + left,
                    position,
                });
                capacities[cursor] -= left;
                left = 0;
            } else {
                let position = if start == 0 {
                    ChunkPosition::First
                } else {
                    ChunkPosition::Regular
                };
                plans[cursor].chunks.push(Chunk {
                    file_name: file.name.clone(),
                    start,
                    end: start + capacity,
                    position,
                });
                start += capacity;
                left -= capacity;
                capacities[cursor] = 0;
                cursor += 1;
            }
        }
    }

    Ok(plans)
}
