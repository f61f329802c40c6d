// src/lib.rs

//! rlinda - A pure-Rust asynchronous client runtime for Linda-style
//! tuple-space coordination over a publish/subscribe message bus.
//!
//! The runtime pairs a background receive loop with a correlation waiter
//! registry so that the canonical Linda operations (`out`, `in`, `inp`, `rd`,
//! `dump`) read like synchronous calls while arbitrary unrelated traffic
//! keeps flowing through the same connection.

/// Defines custom error types used throughout the library.
pub mod error;
/// Contains types representing tuple-space values and pub/sub frames.
pub mod message;
/// The node runtime: receive loop, subscriptions, correlation, facade.
pub mod node;
/// Implements the wire contract: request/reply payloads and frame codec.
pub mod protocol;
/// Provides core asynchronous runtime primitives like mailboxes.
pub mod runtime;
/// Well-known topics of the Linda coordination protocol.
pub mod topic;
/// Deals with transport bindings (TCP, inproc).
pub mod transport;

// Re-export core types for user convenience, making them accessible directly
// from the crate root (e.g., `rlinda::LindaError`, `rlinda::Node`).
pub use error::LindaError;
pub use message::{fmt_payload, Tuple, Value, WireFrame};
pub use node::{Node, NodeConfig};
pub use protocol::OpKind;
#[cfg(feature = "inproc")]
pub use transport::{InprocPeer, InprocTransport};
pub use transport::{TcpTransport, Transport};

// --- Top-Level Library Information Functions ---

/// Major version number of the rlinda library.
const VERSION_MAJOR: i32 = 0;
/// Minor version number of the rlinda library.
const VERSION_MINOR: i32 = 1;
/// Patch version number of the rlinda library.
const VERSION_PATCH: i32 = 0;

/// Returns the library version as a tuple (major, minor, patch).
pub fn version() -> (i32, i32, i32) {
  (VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH)
}
