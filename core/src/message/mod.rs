// src/message/mod.rs

//! Types representing tuple-space values and pub/sub frames.

mod frame;
mod value;

pub use frame::WireFrame;
pub use value::{fmt_payload, Tuple, Value};
