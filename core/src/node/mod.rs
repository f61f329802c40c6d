// src/node/mod.rs

//! The message node runtime: receive loop, subscriptions, correlation, and
//! the tuple-space operation facade.

mod core;
mod filter;
mod linda;
mod router;
mod waiters;

use crate::error::LindaError;
use crate::message::{Value, WireFrame};
use crate::runtime::{mailbox, Command, MailboxSender};
use crate::topic::LINDA_REPLY_PREFIX;
use crate::transport::{self, Transport};

use filter::TopicFilter;
use router::Router;
use waiters::WaiterRegistry;

use async_channel::{unbounded, Receiver as AsyncReceiver, Sender as AsyncSender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Tunables for a node. `Default` matches the adapter deployment this client
/// was written against.
#[derive(Debug, Clone)]
pub struct NodeConfig {
  /// Bounded poll interval of the receive loop's inbound receive, which also
  /// bounds how long a stop signal can go unobserved.
  pub poll_interval: Duration,
  /// Timeout applied to bounded operations (`inp`, `dump`, the `out` ack).
  pub request_timeout: Duration,
  /// Initial backoff after a transient receive error.
  pub retry_backoff: Duration,
  /// Backoff ceiling; doubling stops here.
  pub max_retry_backoff: Duration,
  /// Subscribe to the empty prefix (all traffic) at connect time, as the
  /// monitor does.
  pub subscribe_all: bool,
}

impl Default for NodeConfig {
  fn default() -> Self {
    Self {
      poll_interval: Duration::from_millis(100),
      request_timeout: Duration::from_secs(5),
      retry_backoff: Duration::from_millis(50),
      max_retry_backoff: Duration::from_secs(1),
      subscribe_all: false,
    }
  }
}

/// State shared between the caller-facing handle and the receive loop.
#[derive(Debug)]
pub(crate) struct NodeInner {
  pub(crate) transport: Box<dyn Transport>,
  pub(crate) filter: TopicFilter,
  pub(crate) waiters: Arc<WaiterRegistry>,
  pub(crate) router: Router,
  pub(crate) inbox_rx: AsyncReceiver<WireFrame>,
  pub(crate) inbox_tx: AsyncSender<WireFrame>,
  pub(crate) mailbox_tx: MailboxSender,
  pub(crate) running: AtomicBool,
  pub(crate) terminated: AtomicBool,
  pub(crate) config: NodeConfig,
}

/// A node participating in the publish/subscribe bus.
///
/// Cloneable; all clones share the same receive loop and state. Safe to call
/// from multiple tasks concurrently. Owns its subscription set, pending
/// request table, and inbox queue; the transport is injected at construction.
#[derive(Debug, Clone)]
pub struct Node {
  inner: Arc<NodeInner>,
  loop_handle: Arc<parking_lot::Mutex<Option<JoinHandle<()>>>>,
}

impl Node {
  /// Connects the transport for `endpoint` and starts the node.
  pub async fn connect(endpoint: &str, config: NodeConfig) -> Result<Node, LindaError> {
    let transport = transport::connect(endpoint).await?;
    Self::with_transport(transport, config).await
  }

  /// Starts a node over an already-connected transport (used with inproc
  /// pairs and by tests).
  pub async fn with_transport(
    transport: Box<dyn Transport>,
    config: NodeConfig,
  ) -> Result<Node, LindaError> {
    let (inbox_tx, inbox_rx) = unbounded();
    let (mailbox_tx, mailbox_rx) = mailbox();
    let waiters = Arc::new(WaiterRegistry::new());
    let router = Router::new(waiters.clone(), inbox_tx.clone());

    let inner = Arc::new(NodeInner {
      transport,
      filter: TopicFilter::new(),
      waiters,
      router,
      inbox_rx,
      inbox_tx,
      mailbox_tx,
      running: AtomicBool::new(true),
      terminated: AtomicBool::new(false),
      config,
    });

    // Reply traffic is always wanted; the monitor additionally wants
    // everything.
    inner.filter.subscribe(LINDA_REPLY_PREFIX).await;
    inner.transport.subscribe(LINDA_REPLY_PREFIX).await?;
    if inner.config.subscribe_all {
      inner.filter.subscribe("").await;
      inner.transport.subscribe("").await?;
    }

    let loop_inner = inner.clone();
    let handle = tokio::spawn(core::run_receive_loop(loop_inner, mailbox_rx));

    Ok(Node {
      inner,
      loop_handle: Arc::new(parking_lot::Mutex::new(Some(handle))),
    })
  }

  /// True until `terminate()` runs or a fatal transport error stops the loop.
  pub fn is_running(&self) -> bool {
    self.inner.running.load(Ordering::Acquire)
  }

  pub fn config(&self) -> &NodeConfig {
    &self.inner.config
  }

  /// Adds a topic prefix to the subscription set. Idempotent: subscribing an
  /// already-present prefix changes nothing.
  pub async fn subscribe(&self, prefix: &str) -> Result<(), LindaError> {
    self.inner.filter.subscribe(prefix).await;
    self.inner.transport.subscribe(prefix).await
  }

  /// Removes a topic prefix from the subscription set.
  pub async fn unsubscribe(&self, prefix: &str) -> Result<(), LindaError> {
    self.inner.filter.unsubscribe(prefix).await;
    self.inner.transport.unsubscribe(prefix).await
  }

  /// Raw publish, used by the facade and available to advanced callers.
  pub async fn publish(&self, topic: &str, payload: Vec<Value>) -> Result<(), LindaError> {
    if !self.is_running() {
      return Err(LindaError::NodeTerminated);
    }
    self.inner.transport.send(WireFrame::new(topic, payload)).await
  }

  /// Next queued `(topic, payload)` pair for passive consumers, suspending
  /// until one arrives. `None` once the node is terminated and the inbox is
  /// drained.
  pub async fn recv_inbox(&self) -> Option<WireFrame> {
    self.inner.inbox_rx.recv().await.ok()
  }

  /// Non-blocking inbox drain.
  pub fn try_recv_inbox(&self) -> Option<WireFrame> {
    self.inner.inbox_rx.try_recv().ok()
  }

  /// Shuts the node down: stops the receive loop, releases every blocked
  /// waiter with `NodeTerminated`, then closes the transport. Idempotent.
  pub async fn terminate(&self) {
    if self.inner.terminated.swap(true, Ordering::AcqRel) {
      return;
    }
    tracing::debug!("Terminating node");
    self.inner.running.store(false, Ordering::Release);

    // Queue the stop command, then close the mailbox so a loop blocked on
    // recv wakes even if the channel were full.
    let _ = self.inner.mailbox_tx.try_send(Command::Stop);
    self.inner.mailbox_tx.close();
    let handle = self.loop_handle.lock().take();
    if let Some(handle) = handle {
      let _ = handle.await;
    }

    self.inner.waiters.shutdown();
    self.inner.transport.close().await;
    self.inner.inbox_tx.close();
    tracing::debug!("Node terminated");
  }
}
