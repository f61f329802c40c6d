// src/node/core.rs

use crate::node::NodeInner;
use crate::runtime::{Command, MailboxReceiver};

use rand::Rng;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

/// The node's receive loop: pumps inbound frames until stopped.
///
/// Runs as its own tokio task so no caller is ever suspended by the inbound
/// receive. Each iteration races the control mailbox against a bounded
/// transport poll; closing the mailbox therefore stops the loop within one
/// poll interval at worst, and usually immediately.
pub(crate) async fn run_receive_loop(inner: Arc<NodeInner>, mailbox: MailboxReceiver) {
  tracing::debug!("Receive loop started");
  let mut backoff = inner.config.retry_backoff;

  loop {
    tokio::select! {
      cmd = mailbox.recv() => match cmd {
        Ok(Command::Stop) | Err(_) => {
          tracing::debug!("Receive loop stopping");
          break;
        }
      },
      result = inner.transport.recv(inner.config.poll_interval) => match result {
        Ok(Some(frame)) => {
          backoff = inner.config.retry_backoff;
          if inner.filter.matches(&frame.topic).await {
            // dispatch never raises; handler failures are logged inside.
            inner.router.dispatch(frame);
          } else {
            tracing::trace!(topic = %frame.topic, "No subscription matches topic, dropping frame");
          }
        }
        Ok(None) => {
          // Poll interval elapsed without traffic; loop around so a stop
          // signal is observed promptly.
        }
        Err(e) if e.is_fatal_transport() => {
          tracing::error!(error = %e, "Fatal transport error, terminating receive loop");
          inner.running.store(false, Ordering::Release);
          inner.waiters.shutdown();
          break;
        }
        Err(e) => {
          tracing::warn!(error = %e, backoff = ?backoff, "Transient receive error, backing off");
          tokio::time::sleep(with_jitter(backoff)).await;
          backoff = (backoff * 2).min(inner.config.max_retry_backoff);
        }
      },
    }
  }

  inner.running.store(false, Ordering::Release);
  tracing::debug!("Receive loop exited");
}

/// Adds up to 50% random jitter so colliding clients don't retry in lockstep.
fn with_jitter(backoff: Duration) -> Duration {
  let half = (backoff.as_millis() as u64) / 2;
  let jitter = if half == 0 {
    0
  } else {
    rand::rng().random_range(0..=half)
  };
  backoff + Duration::from_millis(jitter)
}
