// src/node/waiters.rs

use crate::error::LindaError;
use crate::message::Value;
use crate::protocol::OpKind;
use crate::runtime::ReplySlot;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// What a completed reply slot carries back to the waiting caller.
#[derive(Debug)]
pub(crate) enum WaitOutcome {
  Reply(Vec<Value>),
  Terminated,
}

/// One in-flight synchronous operation, keyed by its reply topic.
#[derive(Debug)]
pub(crate) struct PendingRequest {
  pub op: OpKind,
  pub slot: ReplySlot<WaitOutcome>,
  pub registered_at: Instant,
}

#[derive(Debug, Default)]
struct RegistryState {
  entries: HashMap<String, PendingRequest>,
  closed: bool,
}

/// Tracks outstanding requests and bridges asynchronous delivery to
/// synchronous-looking waits.
///
/// At most one unresolved request may occupy a key; with deterministic
/// per-operation reply topics this enforces the single-outstanding-per-kind
/// policy, and the oldest-registered waiter is trivially the only one. The
/// critical sections are short and never span an await, hence the
/// `parking_lot` lock.
#[derive(Debug, Default)]
pub(crate) struct WaiterRegistry {
  state: Mutex<RegistryState>,
}

impl WaiterRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new pending request under `key`.
  ///
  /// Fails with `DuplicateRequest` while an unresolved request holds the key,
  /// and with `NodeTerminated` once the registry has shut down.
  pub fn register(self: &Arc<Self>, key: &str, op: OpKind) -> Result<ReplyWaiter, LindaError> {
    let (tx, rx) = oneshot::channel();
    let mut state = self.state.lock();
    if state.closed {
      return Err(LindaError::NodeTerminated);
    }
    if state.entries.contains_key(key) {
      return Err(LindaError::DuplicateRequest(key.to_string()));
    }
    state.entries.insert(
      key.to_string(),
      PendingRequest {
        op,
        slot: ReplySlot::new(tx),
        registered_at: Instant::now(),
      },
    );
    tracing::trace!(key = %key, op = op.as_str(), "Registered pending request");
    Ok(ReplyWaiter {
      registry: self.clone(),
      key: key.to_string(),
      rx,
    })
  }

  /// Removes and returns the pending request for `key`, if any.
  /// The router claims entries this way before completing their slots.
  pub fn claim(&self, key: &str) -> Option<PendingRequest> {
    self.state.lock().entries.remove(key)
  }

  /// Drops the pending request for `key` without completing it.
  /// Used on timeout and on send failure; also the hook a future
  /// cancel-by-identifier API would call.
  pub fn cancel(&self, key: &str) -> bool {
    let removed = self.state.lock().entries.remove(key).is_some();
    if removed {
      tracing::trace!(key = %key, "Cancelled pending request");
    }
    removed
  }

  /// Releases every blocked waiter with `NodeTerminated` and rejects all
  /// future registrations. Idempotent.
  pub fn shutdown(&self) {
    let drained: Vec<PendingRequest> = {
      let mut state = self.state.lock();
      state.closed = true;
      state.entries.drain().map(|(_, pending)| pending).collect()
    };
    for pending in drained {
      tracing::debug!(
        op = pending.op.as_str(),
        waited = ?pending.registered_at.elapsed(),
        "Releasing pending request: node terminated"
      );
      pending.slot.take_and_send(WaitOutcome::Terminated);
    }
  }
}

/// The caller-side handle to one pending request.
#[derive(Debug)]
pub(crate) struct ReplyWaiter {
  registry: Arc<WaiterRegistry>,
  key: String,
  rx: oneshot::Receiver<WaitOutcome>,
}

impl ReplyWaiter {
  /// Suspends until the slot is filled or `timeout` elapses.
  ///
  /// Timeout removes the registry entry before returning, so the key is free
  /// for the next operation; a reply racing past that removal is routed to
  /// the inbox instead of being lost.
  pub async fn wait(self, timeout: Option<Duration>) -> Result<Vec<Value>, LindaError> {
    let ReplyWaiter { registry, key, rx } = self;
    let outcome = match timeout {
      None => rx.await.map_err(|_| LindaError::NodeTerminated)?,
      Some(limit) => match tokio::time::timeout(limit, rx).await {
        Ok(received) => received.map_err(|_| LindaError::NodeTerminated)?,
        Err(_elapsed) => {
          registry.cancel(&key);
          return Err(LindaError::Timeout);
        }
      },
    };
    match outcome {
      WaitOutcome::Reply(payload) => Ok(payload),
      WaitOutcome::Terminated => Err(LindaError::NodeTerminated),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn registry() -> Arc<WaiterRegistry> {
    Arc::new(WaiterRegistry::new())
  }

  #[tokio::test]
  async fn claim_resolves_a_registered_waiter() {
    let reg = registry();
    let waiter = reg.register("linda/in/reply", OpKind::In).unwrap();

    let pending = reg.claim("linda/in/reply").unwrap();
    pending.slot.take_and_send(WaitOutcome::Reply(vec![Value::Int(1), Value::from("hello")]));

    let payload = waiter.wait(Some(Duration::from_secs(1))).await.unwrap();
    assert_eq!(payload, vec![Value::Int(1), Value::from("hello")]);
    assert!(reg.claim("linda/in/reply").is_none());
  }

  #[tokio::test]
  async fn duplicate_keys_are_rejected_until_resolution() {
    let reg = registry();
    let _first = reg.register("k", OpKind::Rd).unwrap();
    assert!(matches!(
      reg.register("k", OpKind::Rd),
      Err(LindaError::DuplicateRequest(_))
    ));
    assert!(reg.cancel("k"));
    assert!(reg.register("k", OpKind::Rd).is_ok());
  }

  #[tokio::test]
  async fn timeout_removes_the_entry() {
    let reg = registry();
    let waiter = reg.register("k", OpKind::In).unwrap();

    let start = Instant::now();
    let result = waiter.wait(Some(Duration::from_millis(100))).await;
    assert!(matches!(result, Err(LindaError::Timeout)));
    assert!(start.elapsed() < Duration::from_millis(500));
    // Key is free again.
    assert!(reg.register("k", OpKind::In).is_ok());
  }

  #[tokio::test]
  async fn shutdown_releases_blocked_waiters_and_rejects_new_ones() {
    let reg = registry();
    let waiter = reg.register("k", OpKind::Dump).unwrap();

    reg.shutdown();
    assert!(matches!(
      waiter.wait(None).await,
      Err(LindaError::NodeTerminated)
    ));
    assert!(matches!(
      reg.register("other", OpKind::In),
      Err(LindaError::NodeTerminated)
    ));
    // Idempotent.
    reg.shutdown();
  }
}
