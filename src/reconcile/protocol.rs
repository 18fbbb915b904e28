//! Boundary Wire Format
//!
//! Byte layouts for the two frame kinds a boundary handshake exchanges. The
//! codec is independent of the transport carrying the frames: the same bytes
//! could travel over an in-process channel, a pipe, or a socket.
//!
//! - Fragment frame: little-endian `i64` length, followed by that many raw
//!   bytes of word text. A length of zero (or a negative sentinel) means
//!   "no dangling suffix".
//! - Ack frame: a single little-endian `i64`; `0` means a correction
//!   happened, `1` means it did not ("no correction" is the positive answer).

use crate::counting::types::WORD_CAP;
use anyhow::{bail, Context, Result};

/// Ack payload: the receiver merged the fragment and corrected its count.
pub const ACK_CORRECTED: i64 = 0;
/// Ack payload: no correction happened on the receiving side.
pub const ACK_UNCORRECTED: i64 = 1;

/// Encodes a trailing fragment, or the "no stub" message for `None`.
pub fn encode_fragment(stub: Option<&str>) -> Vec<u8> {
    match stub {
        Some(text) => {
            let mut frame = Vec::with_capacity(8 + text.len());
            frame.extend_from_slice(&(text.len() as i64).to_le_bytes());
            frame.extend_from_slice(text.as_bytes());
            frame
        }
        None => 0i64.to_le_bytes().to_vec(),
    }
}

/// Decodes a fragment frame into the optional word text it carries.
pub fn decode_fragment(frame: &[u8]) -> Result<Option<String>> {
    if frame.len() < 8 {
        bail!("fragment frame too short: {} bytes", frame.len());
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&frame[..8]);
    let len = i64::from_le_bytes(len_bytes);

    if len <= 0 {
        if frame.len() != 8 {
            bail!("no-stub fragment frame carries {} trailing bytes", frame.len() - 8);
        }
        return Ok(None);
    }
    let len = len as usize;
    if len > WORD_CAP {
        bail!("fragment length {} exceeds the word bound {}", len, WORD_CAP);
    }
    if frame.len() - 8 != len {
        bail!(
            "fragment frame length mismatch: header says {}, payload is {}",
            len,
            frame.len() - 8
        );
    }

    let text = std::str::from_utf8(&frame[8..])
        .context("fragment payload is not valid UTF-8")?
        .to_string();
    Ok(Some(text))
}

/// Encodes the one-bit correction ack.
pub fn encode_ack(corrected: bool) -> Vec<u8> {
    let flag = if corrected { ACK_CORRECTED } else { ACK_UNCORRECTED };
    flag.to_le_bytes().to_vec()
}

/// Decodes an ack frame; `true` means the receiver corrected a count.
pub fn decode_ack(frame: &[u8]) -> Result<bool> {
    if frame.len() != 8 {
        bail!("ack frame must be 8 bytes, got {}", frame.len());
    }
    let mut flag_bytes = [0u8; 8];
    flag_bytes.copy_from_slice(frame);
    match i64::from_le_bytes(flag_bytes) {
        ACK_CORRECTED => Ok(true),
        ACK_UNCORRECTED => Ok(false),
        other => bail!("unknown ack flag {}", other),
    }
}
