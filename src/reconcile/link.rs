//! Point-to-Point Peer Links
//!
//! Channel endpoints connecting byte-order-adjacent ranks. Each boundary is
//! two queued byte-frame channels: fragments flow downstream (rank i to
//! i+1), acks flow back upstream. The endpoints only move opaque frames;
//! encoding and decoding live in `protocol`.

use super::protocol;
use anyhow::{bail, Context, Result};
use std::time::Duration;
use tokio::sync::mpsc;

/// The upstream side of a boundary: sends the trailing fragment to the
/// successor rank and awaits its correction ack.
pub struct NextPeer {
    fragment_tx: mpsc::UnboundedSender<Vec<u8>>,
    ack_rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

/// The downstream side of a boundary: receives the predecessor's trailing
/// fragment and replies with the correction ack.
pub struct PrevPeer {
    fragment_rx: mpsc::UnboundedReceiver<Vec<u8>>,
    ack_tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl NextPeer {
    /// Queues the fragment frame; never blocks.
    pub fn send_fragment(&self, stub: Option<&str>) -> Result<()> {
        self.fragment_tx
            .send(protocol::encode_fragment(stub))
            .map_err(|_| anyhow::anyhow!("successor hung up before the fragment was sent"))
    }

    /// Awaits the successor's ack, bounded by `timeout`.
    pub async fn await_ack(&mut self, timeout: Duration) -> Result<bool> {
        let frame = recv_frame(&mut self.ack_rx, timeout, "successor").await?;
        protocol::decode_ack(&frame).context("malformed ack from successor")
    }
}

impl PrevPeer {
    /// Awaits the predecessor's fragment, bounded by `timeout`.
    pub async fn recv_fragment(&mut self, timeout: Duration) -> Result<Option<String>> {
        let frame = recv_frame(&mut self.fragment_rx, timeout, "predecessor").await?;
        protocol::decode_fragment(&frame).context("malformed fragment from predecessor")
    }

    /// Queues the ack frame; never blocks.
    pub fn send_ack(&self, corrected: bool) -> Result<()> {
        self.ack_tx
            .send(protocol::encode_ack(corrected))
            .map_err(|_| anyhow::anyhow!("predecessor hung up before the ack was sent"))
    }
}

async fn recv_frame(
    rx: &mut mpsc::UnboundedReceiver<Vec<u8>>,
    timeout: Duration,
    peer: &str,
) -> Result<Vec<u8>> {
    match tokio::time::timeout(timeout, rx.recv()).await {
        Ok(Some(frame)) => Ok(frame),
        Ok(None) => bail!("{} closed its end of the boundary channel", peer),
        Err(_) => bail!("{} did not respond within {:?}", peer, timeout),
    }
}

/// Creates the two endpoints of one boundary; the `NextPeer` belongs to the
/// lower rank, the `PrevPeer` to the higher one.
pub fn link_pair() -> (NextPeer, PrevPeer) {
    let (fragment_tx, fragment_rx) = mpsc::unbounded_channel();
    let (ack_tx, ack_rx) = mpsc::unbounded_channel();
    (
        NextPeer { fragment_tx, ack_rx },
        PrevPeer { fragment_rx, ack_tx },
    )
}

/// Builds the full chain of peer endpoints for `workers` ranks.
///
/// Rank i receives `(prev, next)`: rank 0 has no predecessor, the last rank
/// has no successor.
pub fn chain_links(workers: usize) -> Vec<(Option<PrevPeer>, Option<NextPeer>)> {
    let mut endpoints: Vec<(Option<PrevPeer>, Option<NextPeer>)> =
        (0..workers).map(|_| (None, None)).collect();

    for rank in 0..workers.saturating_sub(1) {
        let (next, prev) = link_pair();
        endpoints[rank].1 = Some(next);
        endpoints[rank + 1].0 = Some(prev);
    }

    endpoints
}
