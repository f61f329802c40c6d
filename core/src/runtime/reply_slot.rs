// src/runtime/reply_slot.rs

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;

/// A cloneable wrapper around a `tokio::sync::oneshot::Sender` that ensures
/// the underlying sender is consumed at most once.
///
/// The waiter registry resolves a pending request from the receive loop while
/// timeout and shutdown paths may race to complete the same slot; the first
/// caller to `take_and_send` wins and every later attempt is a no-op.
#[derive(Debug)]
pub(crate) struct ReplySlot<T> {
  inner: Arc<Mutex<Option<oneshot::Sender<T>>>>,
}

impl<T> Clone for ReplySlot<T> {
  fn clone(&self) -> Self {
    Self {
      inner: self.inner.clone(),
    }
  }
}

impl<T: Send> ReplySlot<T> {
  pub fn new(sender: oneshot::Sender<T>) -> Self {
    Self {
      inner: Arc::new(Mutex::new(Some(sender))),
    }
  }

  /// Attempts to take the underlying sender and complete it with `value`.
  ///
  /// Returns `true` if the slot was still armed and the send was attempted
  /// (a dropped receiver is a normal outcome for oneshot), `false` if the
  /// slot had already been consumed.
  pub fn take_and_send(&self, value: T) -> bool {
    let mut guard = self.inner.lock();
    if let Some(sender) = guard.take() {
      let _ = sender.send(value);
      true
    } else {
      false
    }
  }
}
