// tests/lifecycle.rs

use rlinda::{LindaError, Value, WireFrame};

use std::time::{Duration, Instant};

mod common;

#[tokio::test]
async fn terminate_releases_blocked_waiters_promptly() {
  let (node, peer) = common::test_node(common::test_config()).await;

  let caller = node.clone();
  let blocked = tokio::spawn(async move { caller.in_tuple(&[Value::Any], None).await });
  let _ = peer.recv_sent().await.expect("in request not sent");

  let start = Instant::now();
  node.terminate().await;

  let result = blocked.await.unwrap();
  assert!(matches!(result, Err(LindaError::NodeTerminated)));
  assert!(
    start.elapsed() < Duration::from_millis(500),
    "blocked waiter was not released promptly"
  );
  assert!(!node.is_running());
}

#[tokio::test]
async fn terminate_is_idempotent() {
  let (node, _peer) = common::test_node(common::test_config()).await;

  node.terminate().await;
  node.terminate().await;
  assert!(!node.is_running());
}

#[tokio::test]
async fn no_new_operations_after_terminate() {
  let (node, _peer) = common::test_node(common::test_config()).await;
  node.terminate().await;

  let in_result = node.in_tuple(&[Value::Any], Some(Duration::from_millis(100))).await;
  assert!(matches!(in_result, Err(LindaError::NodeTerminated)));

  let out_result = node.out_tuple(&[Value::Int(1)]).await;
  assert!(matches!(out_result, Err(LindaError::NodeTerminated)));

  let publish = node.publish("any/topic", vec![Value::Int(1)]).await;
  assert!(matches!(publish, Err(LindaError::NodeTerminated)));
}

#[tokio::test]
async fn transient_transport_errors_are_retried() {
  let mut config = common::test_config();
  config.subscribe_all = true;
  let (node, peer) = common::test_node(config).await;

  // A run of garbled frames must not kill the loop; each one is retried
  // after a bounded backoff.
  for _ in 0..3 {
    peer
      .inject_error(LindaError::ProtocolViolation("garbled frame".into()))
      .await;
  }
  peer
    .inject(WireFrame::new("bus/after", vec![Value::Int(1)]))
    .await;

  let frame = node.recv_inbox().await.expect("no frame after transient errors");
  assert_eq!(frame.topic, "bus/after");
  assert!(node.is_running());

  node.terminate().await;
}

#[tokio::test]
async fn fatal_transport_error_cascades_to_pending_waiters() {
  let (node, peer) = common::test_node(common::test_config()).await;

  let caller = node.clone();
  let blocked = tokio::spawn(async move { caller.in_tuple(&[Value::Any], None).await });
  let _ = peer.recv_sent().await.expect("in request not sent");

  // The broker drops the connection while the wait is pending.
  peer.disconnect();

  let result = blocked.await.unwrap();
  assert!(matches!(result, Err(LindaError::NodeTerminated)));

  // The node marks itself not running once the loop observes the error.
  tokio::time::sleep(Duration::from_millis(100)).await;
  assert!(!node.is_running());

  // Cleanup is still safe after the loop died on its own.
  node.terminate().await;
}
