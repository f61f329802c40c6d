// src/transport/inproc.rs

#![cfg(feature = "inproc")]

use crate::error::LindaError;
use crate::message::WireFrame;
use crate::transport::Transport;

use async_channel::{unbounded, Receiver as AsyncReceiver, Sender as AsyncSender};
use async_trait::async_trait;
use std::time::Duration;

/// An in-process transport made of two unbounded channels.
///
/// `pair()` hands back the node-side transport plus an [`InprocPeer`] that
/// plays the broker/server role: it observes every frame the node sends and
/// injects inbound traffic, including receive errors to imitate a flaky
/// link. Closing either side surfaces as `ConnectionClosed` on the other,
/// which lets tests exercise the fatal transport path.
#[derive(Debug)]
pub struct InprocTransport {
  to_peer: AsyncSender<WireFrame>,
  from_peer: AsyncReceiver<Result<WireFrame, LindaError>>,
}

/// The far end of an [`InprocTransport`].
#[derive(Debug, Clone)]
pub struct InprocPeer {
  to_node: AsyncSender<Result<WireFrame, LindaError>>,
  from_node: AsyncReceiver<WireFrame>,
}

impl InprocTransport {
  /// Creates a connected transport/peer pair.
  pub fn pair() -> (InprocTransport, InprocPeer) {
    let (to_peer, from_node) = unbounded();
    let (to_node, from_peer) = unbounded();
    (
      InprocTransport { to_peer, from_peer },
      InprocPeer { to_node, from_node },
    )
  }
}

#[async_trait]
impl Transport for InprocTransport {
  async fn send(&self, frame: WireFrame) -> Result<(), LindaError> {
    self
      .to_peer
      .send(frame)
      .await
      .map_err(|_| LindaError::ConnectionClosed)
  }

  async fn recv(&self, poll: Duration) -> Result<Option<WireFrame>, LindaError> {
    match tokio::time::timeout(poll, self.from_peer.recv()).await {
      Err(_elapsed) => Ok(None),
      Ok(Ok(Ok(frame))) => Ok(Some(frame)),
      Ok(Ok(Err(e))) => Err(e),
      Ok(Err(_closed)) => Err(LindaError::ConnectionClosed),
    }
  }

  async fn close(&self) {
    self.to_peer.close();
    self.from_peer.close();
  }
}

impl InprocPeer {
  /// Next frame the node published, or `None` once the node side is closed.
  pub async fn recv_sent(&self) -> Option<WireFrame> {
    self.from_node.recv().await.ok()
  }

  /// Delivers a frame to the node as if it arrived from the bus.
  /// Returns `false` if the node side is already closed.
  pub async fn inject(&self, frame: WireFrame) -> bool {
    self.to_node.send(Ok(frame)).await.is_ok()
  }

  /// Surfaces a receive error on the node side, as a flaky link would.
  /// Returns `false` if the node side is already closed.
  pub async fn inject_error(&self, error: LindaError) -> bool {
    self.to_node.send(Err(error)).await.is_ok()
  }

  /// Simulates the broker dropping the connection.
  pub fn disconnect(&self) {
    self.to_node.close();
    self.from_node.close();
  }
}
