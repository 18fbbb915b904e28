//! Histogram Wire Format
//!
//! Fixed-size record layout for transferring one (word, count) entry:
//! a little-endian `i32` count followed by a `WORD_MAX`-byte word buffer,
//! null-padded. A gather announcement frame carries the record count as a
//! little-endian `i64`.

use crate::counting::types::{WORD_CAP, WORD_MAX};
use anyhow::{bail, Context, Result};

/// Bytes per record on the wire.
pub const RECORD_SIZE: usize = 4 + WORD_MAX;

/// Encodes one record into its fixed-size layout.
///
/// The word must already be bounded; a count that does not fit the wire's
/// `i32` is a protocol error rather than a silent wrap.
pub fn encode_record(word: &str, count: u64) -> Result<Vec<u8>> {
    if word.is_empty() || word.len() > WORD_CAP {
        bail!("record word length {} outside 1..={}", word.len(), WORD_CAP);
    }
    let count = i32::try_from(count)
        .with_context(|| format!("count {} for {:?} does not fit the wire format", count, word))?;

    let mut frame = vec![0u8; RECORD_SIZE];
    frame[..4].copy_from_slice(&count.to_le_bytes());
    frame[4..4 + word.len()].copy_from_slice(word.as_bytes());
    Ok(frame)
}

/// Decodes one fixed-size record.
pub fn decode_record(frame: &[u8]) -> Result<(String, u64)> {
    if frame.len() != RECORD_SIZE {
        bail!("record must be {} bytes, got {}", RECORD_SIZE, frame.len());
    }

    let mut count_bytes = [0u8; 4];
    count_bytes.copy_from_slice(&frame[..4]);
    let count = i32::from_le_bytes(count_bytes);
    if count < 0 {
        bail!("record carries negative count {}", count);
    }

    let word_buf = &frame[4..];
    let end = word_buf
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(word_buf.len());
    if end == 0 {
        bail!("record carries an empty word");
    }
    let word = std::str::from_utf8(&word_buf[..end])
        .context("record word is not valid UTF-8")?
        .to_string();

    Ok((word, count as u64))
}

/// Encodes a worker's entries as one contiguous record array.
pub fn encode_records(entries: &[(String, u64)]) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(entries.len() * RECORD_SIZE);
    for (word, count) in entries {
        buf.extend_from_slice(&encode_record(word, *count)?);
    }
    Ok(buf)
}

/// Decodes a record array, checking it holds exactly `expected` records.
pub fn decode_records(buf: &[u8], expected: usize) -> Result<Vec<(String, u64)>> {
    if buf.len() != expected * RECORD_SIZE {
        bail!(
            "record array is {} bytes, expected {} records ({} bytes)",
            buf.len(),
            expected,
            expected * RECORD_SIZE
        );
    }

    let mut entries = Vec::with_capacity(expected);
    for frame in buf.chunks(RECORD_SIZE) {
        entries.push(decode_record(frame)?);
    }
    Ok(entries)
}

/// Encodes the phase-one announcement: how many records will follow.
pub fn encode_size(records: usize) -> Vec<u8> {
    (records as i64).to_le_bytes().to_vec()
}

/// Decodes the phase-one announcement.
pub fn decode_size(frame: &[u8]) -> Result<usize> {
    if frame.len() != 8 {
        bail!("size frame must be 8 bytes, got {}", frame.len());
    }
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(frame);
    let size = i64::from_le_bytes(bytes);
    usize::try_from(size).map_err(|_| anyhow::anyhow!("negative record count {}", size))
}
