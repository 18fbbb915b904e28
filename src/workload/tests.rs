//! Workload Module Tests
//!
//! Validates capacity splitting, chunk position tagging, and the per-file
//! partition invariant.

#[cfg(test)]
mod tests {
    use crate::discovery::types::FileDescriptor;
    use crate::workload::planner::plan_workloads;
    use crate::workload::types::{Chunk, ChunkPosition, WorkerPlan};

    fn file(name: &str, size: u64) -> FileDescriptor {
        FileDescriptor {
            name: name.to_string(),
            size,
        }
    }

    /// Reassembles the chunks of one file across all plans, in start order.
    fn chunks_of<'a>(plans: &'a [WorkerPlan], name: &str) -> Vec<&'a Chunk> {
        let mut chunks: Vec<&Chunk> = plans
            .iter()
            .flat_map(|p| p.chunks.iter())
            .filter(|c| c.file_name == name)
            .collect();
        chunks.sort_by_key(|c| c.start);
        chunks
    }

    // ============================================================
    // CAPACITY SPLITTING
    // ============================================================

    #[test]
    fn test_capacities_differ_by_at_most_one() {
        let files = vec![file("a.txt", 10), file("b.txt", 7)];
        let plans = plan_workloads(&files, 4).unwrap();

        let assigned: Vec<u64> = plans.iter().map(|p| p.assigned_bytes()).collect();
        assert_eq!(assigned.iter().sum::<u64>(), 17);

        let max = *assigned.iter().max().unwrap();
        let min = *assigned.iter().min().unwrap();
        assert!(max - min <= 1, "assigned bytes {:?} not balanced", assigned);

        // 17 = 4*4 + 1: the first worker takes the remainder byte.
        assert_eq!(assigned, vec![5, 4, 4, 4]);
    }

    #[test]
    fn test_single_worker_takes_everything() {
        let files = vec![file("a.txt", 100), file("b.txt", 23)];
        let plans = plan_workloads(&files, 1).unwrap();

        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].assigned_bytes(), 123);
        assert!(plans[0]
            .chunks
            .iter()
            .all(|c| c.position == ChunkPosition::Unique));
    }

    #[test]
    fn test_more_workers_than_bytes_leaves_empty_plans() {
        let files = vec![file("tiny.txt", 5)];
        let plans = plan_workloads(&files, 7).unwrap();

        assert_eq!(plans.len(), 7);
        let assigned: Vec<u64> = plans.iter().map(|p| p.assigned_bytes()).collect();
        assert_eq!(assigned, vec![1, 1, 1, 1, 1, 0, 0]);
        assert!(plans[5].chunks.is_empty());
        assert!(plans[6].chunks.is_empty());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let files = vec![file("a.txt", 10)];
        assert!(plan_workloads(&files, 0).is_err());
    }

    // ============================================================
    // POSITION TAGGING
    // ============================================================

    #[test]
    fn test_exact_fit_file_is_unique() {
        // 12 bytes over 3 workers: 4 bytes each. b.txt lands exactly inside
        // worker 1's remaining capacity.
        let files = vec![file("a.txt", 4), file("b.txt", 4), file("c.txt", 4)];
        let plans = plan_workloads(&files, 3).unwrap();

        for name in ["a.txt", "b.txt", "c.txt"] {
            let chunks = chunks_of(&plans, name);
            assert_eq!(chunks.len(), 1, "{} should be one chunk", name);
            assert_eq!(chunks[0].position, ChunkPosition::Unique);
        }
    }

    #[test]
    fn test_two_way_split_is_first_then_last() {
        let files = vec![file("a.txt", 10)];
        let plans = plan_workloads(&files, 2).unwrap();

        let chunks = chunks_of(&plans, "a.txt");
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].position, ChunkPosition::First);
        assert_eq!(chunks[1].position, ChunkPosition::Last);
    }

    #[test]
    fn test_multi_way_split_has_regular_interior() {
        // One 20-byte file over 5 workers: FIRST, 3x REGULAR, LAST.
        let files = vec![file("big.txt", 20)];
        let plans = plan_workloads(&files, 5).unwrap();

        let chunks = chunks_of(&plans, "big.txt");
        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[0].position, ChunkPosition::First);
        for chunk in &chunks[1..4] {
            assert_eq!(chunk.position, ChunkPosition::Regular);
        }
        assert_eq!(chunks[4].position, ChunkPosition::Last);
    }

    #[test]
    fn test_trailing_piece_of_spanning_file_is_last() {
        // a.txt (6) fills worker 0 (capacity 5) and spills one byte into
        // worker 1; the spill is the file's final piece.
        let files = vec![file("a.txt", 6), file("b.txt", 4)];
        let plans = plan_workloads(&files, 2).unwrap();

        let a_chunks = chunks_of(&plans, "a.txt");
        assert_eq!(a_chunks.len(), 2);
        assert_eq!(a_chunks[0].position, ChunkPosition::First);
        assert_eq!(a_chunks[1].position, ChunkPosition::Last);

        // b.txt then fits entirely within worker 1's leftover capacity.
        let b_chunks = chunks_of(&plans, "b.txt");
        assert_eq!(b_chunks.len(), 1);
        assert_eq!(b_chunks[0].position, ChunkPosition::Unique);
    }

    // ============================================================
    // PARTITION INVARIANT
    // ============================================================

    #[test]
    fn test_chunks_partition_each_file_exactly() {
        let files = vec![
            file("a.txt", 13),
            file("b.txt", 0),
            file("c.txt", 7),
            file("d.txt", 29),
        ];

        for workers in [1, 2, 3, 7, 11] {
            let plans = plan_workloads(&files, workers).unwrap();

            for f in &files {
                let chunks = chunks_of(&plans, &f.name);
                if f.size == 0 {
                    assert!(chunks.is_empty(), "zero-byte file must yield no chunks");
                    continue;
                }

                assert_eq!(chunks[0].start, 0);
                assert_eq!(chunks.last().unwrap().end, f.size);
                for window in chunks.windows(2) {
                    assert_eq!(
                        window[0].end, window[1].start,
                        "chunks of {} must be contiguous",
                        f.name
                    );
                }
                assert!(chunks.iter().all(|c| !c.is_empty()));
            }
        }
    }

    #[test]
    fn test_zero_byte_file_produces_no_chunks() {
        let files = vec![file("empty.txt", 0)];
        let plans = plan_workloads(&files, 3).unwrap();
        assert!(plans.iter().all(|p| p.chunks.is_empty()));
    }

    #[test]
    fn test_worker_order_follows_byte_order() {
        // Capacities are filled strictly in increasing rank order, so chunk
        // start offsets within a file must be ordered by owning rank.
        let files = vec![file("a.txt", 30)];
        let plans = plan_workloads(&files, 3).unwrap();

        let mut last_start = None;
        for plan in &plans {
            for chunk in &plan.chunks {
                if let Some(prev) = last_start {
                    assert!(chunk.start > prev);
                }
                last_start = Some(chunk.start);
            }
        }
    }
}
