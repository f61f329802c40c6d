// src/topic.rs

//! Well-known topics used by the Linda coordination protocol.
//!
//! Requests are published to the server topic; each operation kind has a
//! deterministic reply topic so a node can register a waiter before sending.
//! Only one request per reply topic may be outstanding at a time.

use crate::protocol::OpKind;

/// Topic the tuple-space server listens on for requests.
pub const LINDA_SERVER: &str = "linda/server";

/// Prefix under which all client-bound traffic is published.
pub const LINDA_CLIENT: &str = "linda/client";

/// Prefix of the deterministic per-operation reply topics.
pub const LINDA_REPLY_PREFIX: &str = "linda/client/reply";

/// Derives the reply topic for an operation kind, e.g. `linda/client/reply/in`.
pub fn reply_topic(op: OpKind) -> String {
  format!("{}/{}", LINDA_REPLY_PREFIX, op.as_str())
}
