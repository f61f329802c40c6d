// src/transport/mod.rs

//! Transport bindings: the abstraction the node runtime pumps frames through.

pub mod endpoint;
#[cfg(feature = "inproc")]
mod inproc;
mod tcp;

pub use endpoint::{parse_endpoint, Endpoint, DEFAULT_PORT};
#[cfg(feature = "inproc")]
pub use inproc::{InprocPeer, InprocTransport};
pub use tcp::TcpTransport;

use crate::error::LindaError;
use crate::message::WireFrame;

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// A bidirectional channel to a broker or peer.
///
/// `recv` takes a bounded poll interval and returns `Ok(None)` when nothing
/// arrived within it, so the receive loop can observe a stop signal promptly
/// without busy-waiting.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
  /// Fire-and-forget publish of one frame.
  async fn send(&self, frame: WireFrame) -> Result<(), LindaError>;

  /// Blocking receive, bounded by `poll`. `Ok(None)` means the interval
  /// elapsed without traffic; `Err(ConnectionClosed)` means the peer is gone.
  async fn recv(&self, poll: Duration) -> Result<Option<WireFrame>, LindaError>;

  /// Registers a topic prefix with the broker. Idempotent.
  ///
  /// The node enforces prefix filtering locally on every dispatch, so the
  /// default is a no-op; transports talking to brokers with server-side
  /// filtering override this to push the prefix upstream.
  async fn subscribe(&self, _prefix: &str) -> Result<(), LindaError> {
    Ok(())
  }

  /// Removes a topic prefix registration. Idempotent.
  async fn unsubscribe(&self, _prefix: &str) -> Result<(), LindaError> {
    Ok(())
  }

  /// Closes the channel. Safe to call more than once.
  async fn close(&self);
}

/// Connects the transport matching the endpoint scheme.
pub async fn connect(endpoint: &str) -> Result<Box<dyn Transport>, LindaError> {
  match parse_endpoint(endpoint)? {
    Endpoint::Tcp(addr) => Ok(Box::new(TcpTransport::connect(&addr).await?)),
    #[cfg(feature = "inproc")]
    Endpoint::Inproc(name) => Err(LindaError::UnsupportedTransport(format!(
      "inproc endpoint '{}' must be constructed with InprocTransport::pair()",
      name
    ))),
  }
}
