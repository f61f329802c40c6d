// src/protocol/mod.rs

//! Wire contract for tuple-space requests and replies.
//!
//! Every request payload is an ordered sequence whose first element names the
//! operation kind and whose remaining elements are the tuple or pattern
//! values. Replies carry the matched tuple directly; `dump` replies flatten
//! the whole space into a length-prefixed sequence.

mod codec;

pub use codec::{WireCodec, MAX_FRAME_SIZE};

use crate::error::LindaError;
use crate::message::{Tuple, Value};

/// The five Linda operation kinds carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
  Out,
  In,
  Inp,
  Rd,
  Dump,
}

impl OpKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      OpKind::Out => "out",
      OpKind::In => "in",
      OpKind::Inp => "inp",
      OpKind::Rd => "rd",
      OpKind::Dump => "dump",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s {
      "out" => Some(OpKind::Out),
      "in" => Some(OpKind::In),
      "inp" => Some(OpKind::Inp),
      "rd" => Some(OpKind::Rd),
      "dump" => Some(OpKind::Dump),
      _ => None,
    }
  }
}

/// Builds a request payload: `[op, values...]`.
pub fn encode_request(op: OpKind, values: &[Value]) -> Vec<Value> {
  let mut payload = Vec::with_capacity(values.len() + 1);
  payload.push(Value::Str(op.as_str().to_string()));
  payload.extend_from_slice(values);
  payload
}

/// Splits a request payload back into its operation kind and values.
///
/// Used by in-process servers and by tooling that inspects raw traffic.
pub fn decode_request(payload: &[Value]) -> Result<(OpKind, &[Value]), LindaError> {
  let head = payload
    .first()
    .and_then(Value::as_str)
    .ok_or_else(|| LindaError::ProtocolViolation("request payload missing operation kind".into()))?;
  let op = OpKind::parse(head)
    .ok_or_else(|| LindaError::ProtocolViolation(format!("unknown operation kind: {}", head)))?;
  Ok((op, &payload[1..]))
}

/// Flattens a snapshot of the space into a dump reply payload.
///
/// Layout: `[count, len_0, v_0_0.., len_1, v_1_0.., ...]`.
pub fn encode_dump_reply(tuples: &[Tuple]) -> Vec<Value> {
  let mut payload = vec![Value::Int(tuples.len() as i64)];
  for tuple in tuples {
    payload.push(Value::Int(tuple.len() as i64));
    payload.extend_from_slice(tuple);
  }
  payload
}

/// Reassembles the tuples of a dump reply payload.
pub fn decode_dump_reply(payload: &[Value]) -> Result<Vec<Tuple>, LindaError> {
  let mut iter = payload.iter();
  let count = match iter.next() {
    Some(Value::Int(n)) if *n >= 0 => *n as usize,
    _ => {
      return Err(LindaError::ProtocolViolation(
        "dump reply missing tuple count".into(),
      ))
    }
  };

  let mut tuples = Vec::with_capacity(count);
  for _ in 0..count {
    let len = match iter.next() {
      Some(Value::Int(n)) if *n >= 0 => *n as usize,
      _ => {
        return Err(LindaError::ProtocolViolation(
          "dump reply missing tuple length".into(),
        ))
      }
    };
    let mut tuple = Vec::with_capacity(len);
    for _ in 0..len {
      let value = iter.next().ok_or_else(|| {
        LindaError::ProtocolViolation("dump reply truncated inside a tuple".into())
      })?;
      tuple.push(value.clone());
    }
    tuples.push(tuple);
  }

  if iter.next().is_some() {
    return Err(LindaError::ProtocolViolation(
      "dump reply has trailing values".into(),
    ));
  }
  Ok(tuples)
}
