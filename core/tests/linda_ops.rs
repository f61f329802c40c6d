// tests/linda_ops.rs

use rlinda::{LindaError, Value};

use std::time::Duration;

mod common;

const BLOCKING_WAIT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn out_then_in_delivers_the_tuple_exactly_once() -> Result<(), LindaError> {
  let (node, peer) = common::test_node(common::test_config()).await;
  let server = common::spawn_tuple_space(peer);

  let tuple = vec![Value::Int(1), Value::from("hello")];
  node.out_tuple(&tuple).await?;

  let taken = node
    .in_tuple(&[Value::Int(1), Value::Any], Some(BLOCKING_WAIT))
    .await?;
  assert_eq!(taken, tuple);

  // The tuple was removed; a second take finds nothing.
  let again = node.inp_tuple(&[Value::Int(1), Value::Any]).await?;
  assert_eq!(again, None);

  node.terminate().await;
  server.abort();
  Ok(())
}

#[tokio::test]
async fn in_blocks_until_a_matching_tuple_is_inserted() -> Result<(), LindaError> {
  let (node, peer) = common::test_node(common::test_config()).await;
  let server = common::spawn_tuple_space(peer);

  let taker = node.clone();
  let blocked = tokio::spawn(async move {
    taker
      .in_tuple(&[Value::from("job"), Value::Any], Some(BLOCKING_WAIT))
      .await
  });

  // Give the in request time to park on the empty space.
  tokio::time::sleep(Duration::from_millis(100)).await;
  assert!(!blocked.is_finished());

  node.out_tuple(&[Value::from("job"), Value::Int(42)]).await?;
  let taken = blocked.await.unwrap()?;
  assert_eq!(taken, vec![Value::from("job"), Value::Int(42)]);

  node.terminate().await;
  server.abort();
  Ok(())
}

#[tokio::test]
async fn inp_on_empty_space_returns_not_found_without_blocking() -> Result<(), LindaError> {
  let (node, peer) = common::test_node(common::test_config()).await;
  let server = common::spawn_tuple_space(peer);

  let start = std::time::Instant::now();
  let missing = node.inp_tuple(&[Value::Int(99)]).await?;
  assert_eq!(missing, None);
  // One round trip over inproc, not a blocking wait.
  assert!(start.elapsed() < Duration::from_millis(400));

  node.terminate().await;
  server.abort();
  Ok(())
}

#[tokio::test]
async fn rd_reads_without_removing() -> Result<(), LindaError> {
  let (node, peer) = common::test_node(common::test_config()).await;
  let server = common::spawn_tuple_space(peer);

  let tuple = vec![Value::from("cfg"), Value::Float(2.5)];
  node.out_tuple(&tuple).await?;

  let read = node
    .rd_tuple(&[Value::from("cfg"), Value::Any], Some(BLOCKING_WAIT))
    .await?;
  assert_eq!(read, tuple);

  // Still present afterwards.
  let taken = node.inp_tuple(&[Value::from("cfg"), Value::Any]).await?;
  assert_eq!(taken, Some(tuple));

  node.terminate().await;
  server.abort();
  Ok(())
}

#[tokio::test]
async fn dump_returns_a_snapshot_of_the_space() -> Result<(), LindaError> {
  let (node, peer) = common::test_node(common::test_config()).await;
  let server = common::spawn_tuple_space(peer);

  let a = vec![Value::Int(1)];
  let b = vec![Value::Int(2), Value::from("two")];
  node.out_tuple(&a).await?;
  node.out_tuple(&b).await?;

  let space = node.dump_space().await?;
  assert_eq!(space.len(), 2);
  assert!(space.contains(&a));
  assert!(space.contains(&b));

  node.terminate().await;
  server.abort();
  Ok(())
}

#[tokio::test]
async fn malformed_input_fails_fast_before_any_network_call() {
  let (node, peer) = common::test_node(common::test_config()).await;

  let wildcard_out = node.out_tuple(&[Value::Int(1), Value::Any]).await;
  assert!(matches!(wildcard_out, Err(LindaError::InvalidArgument(_))));
  let empty_out = node.out_tuple(&[]).await;
  assert!(matches!(empty_out, Err(LindaError::InvalidArgument(_))));

  // Nothing reached the wire.
  let sent = tokio::time::timeout(Duration::from_millis(100), peer.recv_sent()).await;
  assert!(sent.is_err(), "invalid out must not be sent");

  node.terminate().await;
}
