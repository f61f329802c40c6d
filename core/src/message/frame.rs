// src/message/frame.rs

use crate::message::value::{fmt_payload, Value};

use std::fmt;

/// One pub/sub message: a routable topic plus an ordered value payload.
#[derive(Debug, Clone, PartialEq)]
pub struct WireFrame {
  pub topic: String,
  pub payload: Vec<Value>,
}

impl WireFrame {
  pub fn new(topic: impl Into<String>, payload: Vec<Value>) -> Self {
    Self {
      topic: topic.into(),
      payload,
    }
  }
}

impl fmt::Display for WireFrame {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "('{}', {})", self.topic, fmt_payload(&self.payload))
  }
}
