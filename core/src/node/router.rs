// src/node/router.rs

use crate::message::WireFrame;
use crate::node::waiters::{WaitOutcome, WaiterRegistry};

use async_channel::Sender as AsyncSender;
use std::sync::Arc;

/// Routes an inbound frame to the correct consumer: a pending request keyed
/// by the frame's topic, or the inbox queue for passive consumption.
#[derive(Debug)]
pub(crate) struct Router {
  waiters: Arc<WaiterRegistry>,
  inbox_tx: AsyncSender<WireFrame>,
}

impl Router {
  pub fn new(waiters: Arc<WaiterRegistry>, inbox_tx: AsyncSender<WireFrame>) -> Self {
    Self { waiters, inbox_tx }
  }

  /// Dispatches one frame. Never fails: routing problems are logged so the
  /// receive loop keeps pumping.
  pub fn dispatch(&self, frame: WireFrame) {
    if let Some(pending) = self.waiters.claim(&frame.topic) {
      tracing::trace!(
        topic = %frame.topic,
        op = pending.op.as_str(),
        waited = ?pending.registered_at.elapsed(),
        "Resolving pending request"
      );
      pending.slot.take_and_send(WaitOutcome::Reply(frame.payload));
      return;
    }

    // Default path: monitor-style passive consumption. The channel is
    // unbounded, so try_send only fails once the inbox is closed.
    if self.inbox_tx.try_send(frame).is_err() {
      tracing::debug!("Inbox closed, dropping frame");
    }
  }
}
