// src/transport/endpoint.rs

use crate::error::LindaError;

/// Default broker port when an endpoint omits one, matching the adapter
/// deployment this client was written against.
pub const DEFAULT_PORT: u16 = 16103;

/// A parsed endpoint string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
  /// `tcp://host:port` (or a bare `host[:port]`, which implies tcp).
  Tcp(String),
  /// `inproc://name`, resolvable only inside the current process.
  #[cfg(feature = "inproc")]
  Inproc(String),
}

/// Parses an endpoint URI, defaulting bare addresses to tcp and appending
/// the default port when none is given.
pub fn parse_endpoint(endpoint: &str) -> Result<Endpoint, LindaError> {
  if endpoint.is_empty() {
    return Err(LindaError::InvalidEndpoint(endpoint.to_string()));
  }

  let (scheme, rest) = match endpoint.split_once("://") {
    Some((scheme, rest)) => (scheme, rest),
    None => ("tcp", endpoint),
  };

  match scheme {
    "tcp" => {
      if rest.is_empty() {
        return Err(LindaError::InvalidEndpoint(endpoint.to_string()));
      }
      let addr = if rest.contains(':') {
        rest.to_string()
      } else {
        format!("{}:{}", rest, DEFAULT_PORT)
      };
      Ok(Endpoint::Tcp(addr))
    }
    #[cfg(feature = "inproc")]
    "inproc" => {
      if rest.is_empty() {
        return Err(LindaError::InvalidEndpoint(endpoint.to_string()));
      }
      Ok(Endpoint::Inproc(rest.to_string()))
    }
    other => Err(LindaError::UnsupportedTransport(other.to_string())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bare_host_defaults_to_tcp_and_port() {
    assert_eq!(
      parse_endpoint("127.0.0.1").unwrap(),
      Endpoint::Tcp(format!("127.0.0.1:{}", DEFAULT_PORT))
    );
    assert_eq!(
      parse_endpoint("tcp://10.0.0.2:9999").unwrap(),
      Endpoint::Tcp("10.0.0.2:9999".to_string())
    );
  }

  #[test]
  fn unknown_schemes_are_rejected() {
    assert!(matches!(
      parse_endpoint("udp://127.0.0.1"),
      Err(LindaError::UnsupportedTransport(_))
    ));
    assert!(matches!(
      parse_endpoint(""),
      Err(LindaError::InvalidEndpoint(_))
    ));
    assert!(matches!(
      parse_endpoint("tcp://"),
      Err(LindaError::InvalidEndpoint(_))
    ));
  }
}
