// src/error.rs

use std::io;
use thiserror::Error;

/// Errors surfaced by the rlinda node runtime and its tuple-space operations.
#[derive(Error, Debug)]
#[non_exhaustive] // Allows adding more variants later without breaking change
pub enum LindaError {
  // --- I/O Errors ---
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Invalid argument provided: {0}")]
  InvalidArgument(String),

  // --- Timeouts ---
  #[error("Operation timed out")]
  Timeout,

  // --- Correlation Errors ---
  #[error("A request of the same kind is already outstanding on topic: {0}")]
  DuplicateRequest(String),

  // --- Lifecycle Errors ---
  #[error("Node was terminated while the operation was pending")]
  NodeTerminated,

  // --- Connection Errors ---
  #[error("Connection refused by peer: {0}")]
  ConnectionRefused(String),
  #[error("Host is unreachable: {0}")]
  HostUnreachable(String),
  #[error("Connection closed by peer or transport")]
  ConnectionClosed,
  #[error("Permission denied for endpoint: {0}")]
  PermissionDenied(String),

  // --- Endpoint Errors ---
  #[error("Invalid endpoint format: {0}")]
  InvalidEndpoint(String),
  #[error("Transport scheme not supported or enabled: {0}")]
  UnsupportedTransport(String),

  // --- Protocol Errors ---
  #[error("Wire protocol violation: {0}")]
  ProtocolViolation(String),

  // --- Internal Errors ---
  #[error("Internal library error: {0}")]
  Internal(String),
}

impl LindaError {
  /// Maps common `std::io::Error` kinds to endpoint-aware variants.
  pub fn from_io_endpoint(e: io::Error, endpoint: &str) -> Self {
    match e.kind() {
      io::ErrorKind::ConnectionRefused => LindaError::ConnectionRefused(endpoint.to_string()),
      io::ErrorKind::PermissionDenied => LindaError::PermissionDenied(endpoint.to_string()),
      io::ErrorKind::TimedOut => LindaError::Timeout,
      io::ErrorKind::ConnectionReset | io::ErrorKind::BrokenPipe => LindaError::ConnectionClosed,
      _ => LindaError::Io(e),
    }
  }

  /// True when the receive loop cannot recover from this transport error.
  ///
  /// Fatal errors terminate the loop and release every pending waiter with
  /// `NodeTerminated`; anything else is retried after a bounded backoff.
  pub(crate) fn is_fatal_transport(&self) -> bool {
    matches!(
      self,
      LindaError::ConnectionClosed
        | LindaError::ConnectionRefused(_)
        | LindaError::NodeTerminated
        | LindaError::Io(_)
    )
  }
}
