// src/transport/tcp.rs

use crate::error::LindaError;
use crate::message::WireFrame;
use crate::protocol::WireCodec;
use crate::transport::Transport;

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite};

/// A framed TCP connection to the broker.
///
/// The read and write halves live behind separate locks: the receive loop
/// holds the reader while callers publish through the writer concurrently.
#[derive(Debug)]
pub struct TcpTransport {
  endpoint: String,
  reader: Mutex<FramedRead<OwnedReadHalf, WireCodec>>,
  writer: Mutex<FramedWrite<OwnedWriteHalf, WireCodec>>,
  closed: AtomicBool,
}

impl TcpTransport {
  /// Connects to `addr` (already resolved to `host:port` by endpoint parsing).
  pub async fn connect(addr: &str) -> Result<Self, LindaError> {
    tracing::debug!(endpoint = %addr, "Connecting TCP transport");
    let stream = TcpStream::connect(addr)
      .await
      .map_err(|e| LindaError::from_io_endpoint(e, addr))?;
    // Request/reply latency matters more than batching here.
    let _ = stream.set_nodelay(true);

    let (read_half, write_half) = stream.into_split();
    Ok(Self {
      endpoint: addr.to_string(),
      reader: Mutex::new(FramedRead::new(read_half, WireCodec::new())),
      writer: Mutex::new(FramedWrite::new(write_half, WireCodec::new())),
      closed: AtomicBool::new(false),
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

#[async_trait]
impl Transport for TcpTransport {
  async fn send(&self, frame: WireFrame) -> Result<(), LindaError> {
    if self.closed.load(Ordering::Acquire) {
      return Err(LindaError::ConnectionClosed);
    }
    let mut writer = self.writer.lock().await;
    writer.send(frame).await.map_err(|e| {
      tracing::warn!(endpoint = %self.endpoint, error = %e, "TCP send failed");
      e
    })
  }

  async fn recv(&self, poll: Duration) -> Result<Option<WireFrame>, LindaError> {
    if self.closed.load(Ordering::Acquire) {
      return Err(LindaError::ConnectionClosed);
    }
    let mut reader = self.reader.lock().await;
    match tokio::time::timeout(poll, reader.next()).await {
      Err(_elapsed) => Ok(None),
      Ok(Some(Ok(frame))) => Ok(Some(frame)),
      Ok(Some(Err(e))) => Err(e),
      Ok(None) => Err(LindaError::ConnectionClosed),
    }
  }

  async fn close(&self) {
    if self.closed.swap(true, Ordering::AcqRel) {
      return;
    }
    tracing::debug!(endpoint = %self.endpoint, "Closing TCP transport");
    let mut writer = self.writer.lock().await;
    let _ = writer.close().await;
  }
}
