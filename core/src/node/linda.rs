// src/node/linda.rs

//! The tuple-space operation facade: `out`, `in`, `inp`, `rd`, `dump` as
//! synchronous-looking calls over the asynchronous bus.

use crate::error::LindaError;
use crate::message::{Tuple, Value, WireFrame};
use crate::node::Node;
use crate::protocol::{self, OpKind};
use crate::topic::{reply_topic, LINDA_SERVER};

use std::time::Duration;

impl Node {
  /// Inserts a tuple into the space.
  ///
  /// Non-blocking from the space's point of view; waits for the server's
  /// best-effort ack up to the configured request timeout, and tolerates a
  /// missing ack (the insert itself is fire-and-forget on the wire).
  pub async fn out_tuple(&self, tuple: &[Value]) -> Result<(), LindaError> {
    Value::validate_tuple(tuple)?;
    match self
      .request(OpKind::Out, tuple, Some(self.config().request_timeout))
      .await
    {
      Ok(_ack) => Ok(()),
      Err(LindaError::Timeout) => {
        tracing::debug!("out: no ack within timeout, treating insert as sent");
        Ok(())
      }
      Err(e) => Err(e),
    }
  }

  /// Removes and returns the first tuple matching `pattern`, blocking until
  /// one exists (or `timeout` elapses when supplied).
  pub async fn in_tuple(
    &self,
    pattern: &[Value],
    timeout: Option<Duration>,
  ) -> Result<Tuple, LindaError> {
    Value::validate_pattern(pattern)?;
    self.request(OpKind::In, pattern, timeout).await
  }

  /// Single-attempt `in`: removes the first matching tuple if one is present
  /// now, else `Ok(None)`. Bounded by one round trip.
  pub async fn inp_tuple(&self, pattern: &[Value]) -> Result<Option<Tuple>, LindaError> {
    Value::validate_pattern(pattern)?;
    let reply = self
      .request(OpKind::Inp, pattern, Some(self.config().request_timeout))
      .await?;
    // Tuples are non-empty by construction, so an empty reply payload is the
    // server's "not found".
    Ok(if reply.is_empty() { None } else { Some(reply) })
  }

  /// Reads (non-destructively) the first tuple matching `pattern`, blocking
  /// until one exists (or `timeout` elapses when supplied).
  pub async fn rd_tuple(
    &self,
    pattern: &[Value],
    timeout: Option<Duration>,
  ) -> Result<Tuple, LindaError> {
    Value::validate_pattern(pattern)?;
    self.request(OpKind::Rd, pattern, timeout).await
  }

  /// Returns a snapshot of the entire space. Bounded timeout.
  pub async fn dump_space(&self) -> Result<Vec<Tuple>, LindaError> {
    let reply = self
      .request(OpKind::Dump, &[], Some(self.config().request_timeout))
      .await?;
    protocol::decode_dump_reply(&reply)
  }

  /// Shared request flow: register the waiter on the operation's reply topic
  /// *before* sending, so the concurrently running receive loop cannot race
  /// a fast reply past an unregistered waiter.
  async fn request(
    &self,
    op: OpKind,
    values: &[Value],
    timeout: Option<Duration>,
  ) -> Result<Vec<Value>, LindaError> {
    if !self.is_running() {
      return Err(LindaError::NodeTerminated);
    }

    let key = reply_topic(op);
    let waiter = self.inner.waiters.register(&key, op)?;

    let frame = WireFrame::new(LINDA_SERVER, protocol::encode_request(op, values));
    if let Err(e) = self.inner.transport.send(frame).await {
      // Send failed synchronously; free the slot so the next attempt isn't
      // reported as a duplicate.
      self.inner.waiters.cancel(&key);
      return Err(e);
    }

    waiter.wait(timeout).await
  }
}
