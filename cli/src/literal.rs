//! Parses Python-ish list literals from the command line into tuple values,
//! e.g. `[1, "hello", *, 2.5]`. Malformed input is rejected here so the node
//! only ever sees validated sequences.

use anyhow::{anyhow, bail, Result};
use rlinda::Value;
use std::iter::Peekable;
use std::str::Chars;

pub fn parse_values(input: &str) -> Result<Vec<Value>> {
  let mut chars = input.trim().chars().peekable();

  expect(&mut chars, '[')?;
  let mut values = Vec::new();
  skip_ws(&mut chars);
  if chars.peek() == Some(&']') {
    chars.next();
    return finish(chars, values);
  }

  loop {
    values.push(parse_value(&mut chars)?);
    skip_ws(&mut chars);
    match chars.next() {
      Some(',') => {
        skip_ws(&mut chars);
        // Trailing comma before the closing bracket is fine.
        if chars.peek() == Some(&']') {
          chars.next();
          return finish(chars, values);
        }
      }
      Some(']') => return finish(chars, values),
      Some(c) => bail!("expected ',' or ']', found '{}'", c),
      None => bail!("unterminated list literal"),
    }
  }
}

fn finish(mut chars: Peekable<Chars<'_>>, values: Vec<Value>) -> Result<Vec<Value>> {
  skip_ws(&mut chars);
  if let Some(c) = chars.next() {
    bail!("unexpected trailing input starting at '{}'", c);
  }
  Ok(values)
}

fn parse_value(chars: &mut Peekable<Chars<'_>>) -> Result<Value> {
  skip_ws(chars);
  match chars.peek() {
    Some('"') | Some('\'') => parse_string(chars),
    Some('*') => {
      chars.next();
      Ok(Value::Any)
    }
    Some(c) if c.is_ascii_digit() || *c == '-' || *c == '+' => parse_number(chars),
    Some(c) => bail!("unexpected character '{}' in list literal", c),
    None => bail!("unexpected end of list literal"),
  }
}

fn parse_string(chars: &mut Peekable<Chars<'_>>) -> Result<Value> {
  let quote = chars.next().expect("caller checked the quote");
  let mut out = String::new();
  loop {
    match chars.next() {
      Some('\\') => match chars.next() {
        Some('n') => out.push('\n'),
        Some('t') => out.push('\t'),
        Some(c @ ('\\' | '"' | '\'')) => out.push(c),
        Some(c) => bail!("unsupported escape '\\{}'", c),
        None => bail!("unterminated string literal"),
      },
      Some(c) if c == quote => return Ok(Value::Str(out)),
      Some(c) => out.push(c),
      None => bail!("unterminated string literal"),
    }
  }
}

fn parse_number(chars: &mut Peekable<Chars<'_>>) -> Result<Value> {
  let mut raw = String::new();
  while let Some(&c) = chars.peek() {
    if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E') {
      raw.push(c);
      chars.next();
    } else {
      break;
    }
  }
  if raw.contains(|c| matches!(c, '.' | 'e' | 'E')) {
    raw
      .parse::<f64>()
      .map(Value::Float)
      .map_err(|_| anyhow!("invalid float literal: {}", raw))
  } else {
    raw
      .parse::<i64>()
      .map(Value::Int)
      .map_err(|_| anyhow!("invalid integer literal: {}", raw))
  }
}

fn skip_ws(chars: &mut Peekable<Chars<'_>>) {
  while chars.peek().is_some_and(|c| c.is_whitespace()) {
    chars.next();
  }
}

fn expect(chars: &mut Peekable<Chars<'_>>, wanted: char) -> Result<()> {
  skip_ws(chars);
  match chars.next() {
    Some(c) if c == wanted => Ok(()),
    Some(c) => bail!("expected '{}', found '{}'", wanted, c),
    None => bail!("expected '{}', found end of input", wanted),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_mixed_literals() {
    let values = parse_values(r#"[1, "hello", *, -2.5]"#).unwrap();
    assert_eq!(
      values,
      vec![
        Value::Int(1),
        Value::Str("hello".into()),
        Value::Any,
        Value::Float(-2.5),
      ]
    );
  }

  #[test]
  fn parses_empty_and_trailing_comma() {
    assert_eq!(parse_values("[]").unwrap(), vec![]);
    assert_eq!(parse_values(" [ 1 , ] ").unwrap(), vec![Value::Int(1)]);
  }

  #[test]
  fn single_quotes_and_escapes() {
    let values = parse_values(r#"['it\'s', "a\nb"]"#).unwrap();
    assert_eq!(
      values,
      vec![Value::Str("it's".into()), Value::Str("a\nb".into())]
    );
  }

  #[test]
  fn rejects_malformed_input() {
    assert!(parse_values("1, 2").is_err());
    assert!(parse_values("[1").is_err());
    assert!(parse_values("[1] trailing").is_err());
    assert!(parse_values(r#"["unterminated]"#).is_err());
    assert!(parse_values("[foo]").is_err());
  }
}
