// src/message/value.rs

use crate::error::LindaError;

use std::fmt;

/// A primitive scalar carried inside a tuple or pattern.
///
/// `Any` is the wildcard marker, only meaningful inside patterns handed to
/// `in`/`inp`/`rd`; tuples inserted with `out` must not contain it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Int(i64),
  Float(f64),
  Str(String),
  /// Wildcard marker, rendered as `*`.
  Any,
}

/// An ordered sequence of values, the unit stored in the tuple space.
pub type Tuple = Vec<Value>;

impl Value {
  pub fn is_wildcard(&self) -> bool {
    matches!(self, Value::Any)
  }

  /// Borrows the string payload if this value is a `Str`.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::Str(s) => Some(s.as_str()),
      _ => None,
    }
  }

  /// Validates a tuple destined for `out`: non-empty and wildcard-free.
  pub(crate) fn validate_tuple(tuple: &[Value]) -> Result<(), LindaError> {
    if tuple.is_empty() {
      return Err(LindaError::InvalidArgument("tuple must not be empty".into()));
    }
    if tuple.iter().any(Value::is_wildcard) {
      return Err(LindaError::InvalidArgument(
        "tuple inserted with out() must not contain wildcards".into(),
      ));
    }
    Ok(())
  }

  /// Validates a pattern for `in`/`inp`/`rd`. Patterns may contain wildcards;
  /// an empty pattern is legal and matches any tuple.
  pub(crate) fn validate_pattern(pattern: &[Value]) -> Result<(), LindaError> {
    // Nothing structural to reject today beyond the sequence shape, which the
    // type system already guarantees. Kept as the single local validation
    // point so the facade fails fast before any network call.
    let _ = pattern;
    Ok(())
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::Int(i) => write!(f, "{}", i),
      Value::Float(x) => write!(f, "{}", x),
      Value::Str(s) => write!(f, "{:?}", s),
      Value::Any => write!(f, "*"),
    }
  }
}

impl From<i64> for Value {
  fn from(v: i64) -> Self {
    Value::Int(v)
  }
}

impl From<f64> for Value {
  fn from(v: f64) -> Self {
    Value::Float(v)
  }
}

impl From<&str> for Value {
  fn from(v: &str) -> Self {
    Value::Str(v.to_string())
  }
}

impl From<String> for Value {
  fn from(v: String) -> Self {
    Value::Str(v)
  }
}

/// Renders a payload the way the CLI prints it: `[1, "hello", *]`.
pub fn fmt_payload(values: &[Value]) -> String {
  let inner: Vec<String> = values.iter().map(|v| v.to_string()).collect();
  format!("[{}]", inner.join(", "))
}
