// src/protocol/codec.rs

use crate::error::LindaError;
use crate::message::{Value, WireFrame};

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Upper bound on a single encoded frame, guarding the decoder against
/// hostile or corrupted length prefixes.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

const TAG_INT: u8 = 0;
const TAG_FLOAT: u8 = 1;
const TAG_STR: u8 = 2;
const TAG_ANY: u8 = 3;

/// Codec for the framed `(topic, payload)` wire format.
///
/// Layout: `u32` body length, `u16` topic length, topic bytes, then each
/// value as a one-byte tag followed by its big-endian encoding.
#[derive(Debug, Default)]
pub struct WireCodec {
  // Body size parsed from the length prefix while waiting for the rest of
  // the frame to arrive.
  pending_body: Option<usize>,
}

impl WireCodec {
  pub fn new() -> Self {
    Self::default()
  }
}

fn encode_value(value: &Value, dst: &mut BytesMut) {
  match value {
    Value::Int(i) => {
      dst.put_u8(TAG_INT);
      dst.put_i64(*i);
    }
    Value::Float(x) => {
      dst.put_u8(TAG_FLOAT);
      dst.put_f64(*x);
    }
    Value::Str(s) => {
      dst.put_u8(TAG_STR);
      dst.put_u32(s.len() as u32);
      dst.put_slice(s.as_bytes());
    }
    Value::Any => dst.put_u8(TAG_ANY),
  }
}

fn decode_value(src: &mut BytesMut) -> Result<Value, LindaError> {
  if src.is_empty() {
    return Err(LindaError::ProtocolViolation("frame body truncated at value tag".into()));
  }
  match src.get_u8() {
    TAG_INT => {
      if src.remaining() < 8 {
        return Err(LindaError::ProtocolViolation("truncated integer value".into()));
      }
      Ok(Value::Int(src.get_i64()))
    }
    TAG_FLOAT => {
      if src.remaining() < 8 {
        return Err(LindaError::ProtocolViolation("truncated float value".into()));
      }
      Ok(Value::Float(src.get_f64()))
    }
    TAG_STR => {
      if src.remaining() < 4 {
        return Err(LindaError::ProtocolViolation("truncated string length".into()));
      }
      let len = src.get_u32() as usize;
      if src.remaining() < len {
        return Err(LindaError::ProtocolViolation("truncated string value".into()));
      }
      let raw = src.split_to(len);
      let s = std::str::from_utf8(&raw)
        .map_err(|_| LindaError::ProtocolViolation("string value is not valid UTF-8".into()))?;
      Ok(Value::Str(s.to_string()))
    }
    TAG_ANY => Ok(Value::Any),
    other => Err(LindaError::ProtocolViolation(format!("unknown value tag: {}", other))),
  }
}

impl Encoder<WireFrame> for WireCodec {
  type Error = LindaError;

  fn encode(&mut self, item: WireFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
    if item.topic.len() > u16::MAX as usize {
      return Err(LindaError::ProtocolViolation("topic exceeds u16 length".into()));
    }

    let mut body = BytesMut::new();
    body.put_u16(item.topic.len() as u16);
    body.put_slice(item.topic.as_bytes());
    for value in &item.payload {
      encode_value(value, &mut body);
    }

    if body.len() > MAX_FRAME_SIZE {
      return Err(LindaError::ProtocolViolation(format!(
        "frame of {} bytes exceeds maximum of {}",
        body.len(),
        MAX_FRAME_SIZE
      )));
    }

    dst.reserve(4 + body.len());
    dst.put_u32(body.len() as u32);
    dst.put_slice(&body);
    Ok(())
  }
}

impl Decoder for WireCodec {
  type Item = WireFrame;
  type Error = LindaError;

  fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
    let body_len = match self.pending_body {
      Some(len) => len,
      None => {
        if src.len() < 4 {
          return Ok(None);
        }
        let len = src.get_u32() as usize;
        if len > MAX_FRAME_SIZE {
          return Err(LindaError::ProtocolViolation(format!(
            "frame length {} exceeds maximum of {}",
            len, MAX_FRAME_SIZE
          )));
        }
        self.pending_body = Some(len);
        len
      }
    };

    if src.len() < body_len {
      src.reserve(body_len - src.len());
      return Ok(None);
    }
    self.pending_body = None;

    let mut body = src.split_to(body_len);
    if body.remaining() < 2 {
      return Err(LindaError::ProtocolViolation("frame body missing topic length".into()));
    }
    let topic_len = body.get_u16() as usize;
    if body.remaining() < topic_len {
      return Err(LindaError::ProtocolViolation("frame body truncated inside topic".into()));
    }
    let raw_topic = body.split_to(topic_len);
    let topic = std::str::from_utf8(&raw_topic)
      .map_err(|_| LindaError::ProtocolViolation("topic is not valid UTF-8".into()))?
      .to_string();

    let mut payload = Vec::new();
    while !body.is_empty() {
      payload.push(decode_value(&mut body)?);
    }

    Ok(Some(WireFrame { topic, payload }))
  }
}
