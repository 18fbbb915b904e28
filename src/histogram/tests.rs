//! Histogram Module Tests
//!
//! Validates the fixed-size record layout, the two-phase gather, and the
//! merge semantics.

#[cfg(test)]
mod tests {
    use crate::counting::store::WordStore;
    use crate::counting::types::{WORD_CAP, WORD_MAX};
    use crate::histogram::merger::{send_histogram, HistogramMerger};
    use crate::histogram::protocol::{
        decode_record, decode_records, decode_size, encode_record, encode_records, encode_size,
        RECORD_SIZE,
    };
    use std::time::Duration;
    use tokio::sync::mpsc;

    const TIMEOUT: Duration = Duration::from_secs(1);

    // ============================================================
    // RECORD LAYOUT
    // ============================================================

    #[test]
    fn test_record_layout_is_fixed_size() {
        let frame = encode_record("hello", 42).unwrap();

        assert_eq!(frame.len(), RECORD_SIZE);
        assert_eq!(&frame[..4], &42i32.to_le_bytes());
        assert_eq!(&frame[4..9], b"hello");
        // The rest of the word buffer is null padding.
        assert!(frame[9..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_record_roundtrip() {
        let frame = encode_record("word", 7).unwrap();
        assert_eq!(decode_record(&frame).unwrap(), ("word".to_string(), 7));
    }

    #[test]
    fn test_record_word_fills_buffer_exactly() {
        let word = "a".repeat(WORD_CAP);
        let frame = encode_record(&word, 1).unwrap();
        assert_eq!(decode_record(&frame).unwrap().0, word);
    }

    #[test]
    fn test_record_rejects_unbounded_word() {
        assert!(encode_record(&"a".repeat(WORD_MAX), 1).is_err());
        assert!(encode_record("", 1).is_err());
    }

    #[test]
    fn test_record_rejects_oversized_count() {
        assert!(encode_record("word", u64::from(i32::MAX as u32) + 1).is_err());
    }

    #[test]
    fn test_record_decode_rejects_malformed_frames() {
        assert!(decode_record(&[0u8; 10]).is_err());

        // Negative count.
        let mut frame = vec![0u8; RECORD_SIZE];
        frame[..4].copy_from_slice(&(-1i32).to_le_bytes());
        frame[4] = b'a';
        assert!(decode_record(&frame).is_err());

        // All-null word buffer.
        let mut frame = vec![0u8; RECORD_SIZE];
        frame[..4].copy_from_slice(&1i32.to_le_bytes());
        assert!(decode_record(&frame).is_err());
    }

    #[test]
    fn test_record_array_size_must_match_announcement() {
        let entries = vec![("one".to_string(), 1), ("two".to_string(), 2)];
        let buf = encode_records(&entries).unwrap();

        assert_eq!(decode_records(&buf, 2).unwrap(), entries);
        assert!(decode_records(&buf, 1).is_err());
        assert!(decode_records(&buf, 3).is_err());
    }

    #[test]
    fn test_size_frame_roundtrip() {
        assert_eq!(decode_size(&encode_size(0)).unwrap(), 0);
        assert_eq!(decode_size(&encode_size(12345)).unwrap(), 12345);
        assert!(decode_size(&[0u8; 4]).is_err());
        assert!(decode_size(&(-1i64).to_le_bytes()).is_err());
    }

    // ============================================================
    // GATHER AND MERGE
    // ============================================================

    fn store_of(entries: &[(&str, u64)]) -> WordStore {
        let mut store = WordStore::new();
        for (word, count) in entries {
            store.add(word, *count);
        }
        store
    }

    #[tokio::test]
    async fn test_gather_merges_worker_histograms() {
        let merger = HistogramMerger::new();
        merger.absorb_store(&store_of(&[("shared", 2), ("local", 1)]));

        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        send_histogram(&tx1, &store_of(&[("shared", 3), ("remote", 5)])).unwrap();
        send_histogram(&tx2, &store_of(&[("shared", 1)])).unwrap();

        merger.gather(vec![(1, rx1), (2, rx2)], TIMEOUT).await.unwrap();

        let mut table = merger.into_table();
        table.sort();
        assert_eq!(
            table,
            vec![
                ("local".to_string(), 1),
                ("remote".to_string(), 5),
                ("shared".to_string(), 6),
            ]
        );
    }

    #[tokio::test]
    async fn test_gather_accepts_empty_histogram() {
        let merger = HistogramMerger::new();

        let (tx, rx) = mpsc::unbounded_channel();
        send_histogram(&tx, &WordStore::new()).unwrap();

        merger.gather(vec![(1, rx)], TIMEOUT).await.unwrap();
        assert!(merger.into_table().is_empty());
    }

    #[tokio::test]
    async fn test_send_histogram_filters_zero_counts() {
        let mut store = store_of(&[("kept", 2), ("gone", 1)]);
        store.decrement("gone");

        let (tx, mut rx) = mpsc::unbounded_channel();
        send_histogram(&tx, &store).unwrap();

        let size = decode_size(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(size, 1);
        let records = decode_records(&rx.recv().await.unwrap(), 1).unwrap();
        assert_eq!(records, vec![("kept".to_string(), 2)]);
    }

    #[tokio::test]
    async fn test_gather_fails_on_silent_worker() {
        let merger = HistogramMerger::new();
        let (_tx, rx) = mpsc::unbounded_channel::<Vec<u8>>();

        let result = merger
            .gather(vec![(1, rx)], Duration::from_millis(20))
            .await;
        assert!(result.is_err(), "a silent worker must not hang the gather");
    }

    #[tokio::test]
    async fn test_gather_fails_on_record_count_mismatch() {
        let merger = HistogramMerger::new();

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(encode_size(2)).unwrap();
        tx.send(encode_records(&[("only_one".to_string(), 1)]).unwrap())
            .unwrap();

        let result = merger.gather(vec![(1, rx)], TIMEOUT).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_gather_fails_on_hung_up_worker() {
        let merger = HistogramMerger::new();

        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(encode_size(1)).unwrap();
        drop(tx);

        let result = merger.gather(vec![(1, rx)], TIMEOUT).await;
        assert!(result.is_err());
    }
}
