// tests/common.rs
#![allow(dead_code)] // Not every helper is used by every test binary.

use rlinda::protocol::{decode_request, encode_dump_reply, OpKind};
use rlinda::topic::{reply_topic, LINDA_SERVER};
use rlinda::{InprocPeer, InprocTransport, Node, NodeConfig, Tuple, Value, WireFrame};

use std::sync::Once;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

static TRACING_INIT: Once = Once::new();

fn setup_tracing() {
  TRACING_INIT.call_once(|| {
    let default_filter = "rlinda=trace,debug";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
      .with_max_level(tracing::Level::TRACE)
      .with_env_filter(env_filter)
      .with_target(true)
      .with_test_writer()
      .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
  });
}

/// Fast timings so tests spend their time on behavior, not on polling.
pub fn test_config() -> NodeConfig {
  NodeConfig {
    poll_interval: Duration::from_millis(10),
    request_timeout: Duration::from_millis(500),
    retry_backoff: Duration::from_millis(10),
    max_retry_backoff: Duration::from_millis(50),
    subscribe_all: false,
  }
}

/// Builds a node over an inproc pair; the returned peer plays the server.
pub async fn test_node(config: NodeConfig) -> (Node, InprocPeer) {
  setup_tracing();
  let (transport, peer) = InprocTransport::pair();
  let node = Node::with_transport(Box::new(transport), config)
    .await
    .expect("failed to start test node");
  (node, peer)
}

/// A reply frame on the deterministic reply topic for `op`.
pub fn reply_frame(op: OpKind, payload: Vec<Value>) -> WireFrame {
  WireFrame::new(reply_topic(op), payload)
}

fn pattern_matches(pattern: &[Value], tuple: &[Value]) -> bool {
  pattern.is_empty()
    || (pattern.len() == tuple.len()
      && pattern.iter().zip(tuple).all(|(p, v)| p.is_wildcard() || p == v))
}

fn take_first_match(space: &mut Vec<Tuple>, pattern: &[Value], remove: bool) -> Option<Tuple> {
  let idx = space.iter().position(|t| pattern_matches(pattern, t))?;
  if remove {
    Some(space.remove(idx))
  } else {
    Some(space[idx].clone())
  }
}

/// A minimal in-process tuple-space server driving the peer side of an
/// inproc pair: stores tuples, answers requests, and parks blocking `in`/`rd`
/// requests until a matching `out` arrives. Exercises the full request path
/// end to end without a broker.
pub fn spawn_tuple_space(peer: InprocPeer) -> JoinHandle<()> {
  tokio::spawn(async move {
    let mut space: Vec<Tuple> = Vec::new();
    let mut parked: Vec<(OpKind, Vec<Value>)> = Vec::new();

    while let Some(frame) = peer.recv_sent().await {
      if frame.topic != LINDA_SERVER {
        continue;
      }
      let (op, values) = match decode_request(&frame.payload) {
        Ok(parsed) => parsed,
        Err(e) => {
          eprintln!("tuple-space server: bad request: {}", e);
          continue;
        }
      };

      match op {
        OpKind::Out => {
          space.push(values.to_vec());
          peer.inject(reply_frame(OpKind::Out, vec![Value::from("ok")])).await;

          // Serve any parked blocking request the new tuple satisfies.
          let mut still_parked = Vec::new();
          for (parked_op, pattern) in parked.drain(..) {
            let remove = parked_op == OpKind::In;
            match take_first_match(&mut space, &pattern, remove) {
              Some(tuple) => {
                peer.inject(reply_frame(parked_op, tuple)).await;
              }
              None => still_parked.push((parked_op, pattern)),
            }
          }
          parked = still_parked;
        }
        OpKind::In | OpKind::Rd => {
          let remove = op == OpKind::In;
          match take_first_match(&mut space, values, remove) {
            Some(tuple) => {
              peer.inject(reply_frame(op, tuple)).await;
            }
            None => parked.push((op, values.to_vec())),
          }
        }
        OpKind::Inp => {
          let reply = take_first_match(&mut space, values, true).unwrap_or_default();
          peer.inject(reply_frame(OpKind::Inp, reply)).await;
        }
        OpKind::Dump => {
          peer.inject(reply_frame(OpKind::Dump, encode_dump_reply(&space))).await;
        }
      }
    }
  })
}
