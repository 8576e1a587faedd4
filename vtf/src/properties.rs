//! This module implements the `%KEY value` properties that open most blocks,
//! along with the rules that turn their raw text into typed values.

use std::collections::BTreeMap;
use std::fmt::Display;

use log::debug;
use serde::Serialize;

use crate::blocks::types::{BlockId, BlockRef};
use crate::error::*;
use crate::lines::LineSource;

/// A typed property value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum PropValue {
  /// The key was given without a value.
  Absent,
  /// A plain integer.
  Integer(i64),
  /// A `#`-prefixed reference to the id of another block.
  Reference(BlockId),
  /// Anything else, with surrounding double quotes removed.
  Text(String)
}

impl PropValue {
  /// Coerces a raw value. In order: `#n` is a reference, `"..."` is text, an
  /// integer is an integer, and whatever is left stays text.
  pub fn coerce(raw: Option<&str>, location: BlockRef) -> VtfResult<Self> {
    let raw = match raw.map(str::trim) {
      Some(raw) => raw,
      None => return Ok(Self::Absent)
    };
    if let Some(r) = raw.strip_prefix('#') {
      return r.trim().parse::<BlockId>()
        .map(Self::Reference)
        .map_err(|_| VtfError::BadReference {
          location,
          value: raw.to_string()
        });
    }
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
      return Ok(Self::Text(raw[1..raw.len()-1].to_string()));
    }
    return Ok(
      raw.parse::<i64>()
        .map(Self::Integer)
        .unwrap_or_else(|_| Self::Text(raw.to_string()))
    );
  }

  /// Returns the value as an integer. References count as integers.
  pub fn as_int(&self) -> Option<i64> {
    return match self {
      Self::Integer(x) | Self::Reference(x) => Some(*x),
      _ => None
    };
  }

  /// Returns the value as text, if it is text.
  pub fn as_str(&self) -> Option<&str> {
    if let Self::Text(s) = self {
      return Some(s.as_str());
    }
    return None;
  }
}

impl Display for PropValue {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Absent => write!(f, "(none)"),
      Self::Integer(x) => write!(f, "{}", x),
      Self::Reference(x) => write!(f, "#{}", x),
      Self::Text(s) => write!(f, "\"{}\"", s)
    };
  }
}

/// The properties of a block, keyed by lowercase name.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, PropValue>);

impl Properties {
  /// Reads a run of `%KEY value` lines. Stops at the first line that is not a
  /// property, or at a property whose uppercase key is in `skip_on`; either
  /// way, that line is given back to the source.
  pub fn decode<S: LineSource>(
    lines: &mut S,
    skip_on: Option<&[&str]>,
    location: BlockRef
  ) -> VtfResult<Self> {
    let mut raw: Vec<(String, Option<String>)> = Vec::new();
    while let Some(line) = lines.next_line()? {
      if !line.trim_start().starts_with('%') {
        lines.put_back(line);
        break;
      }
      let body = line.trim()[1..].trim_start();
      let (key, value) = match body.split_once(char::is_whitespace) {
        Some((key, value)) => (key, Some(value.to_string())),
        None => (body, None)
      };
      if skip_on.is_some_and(|tags| tags.contains(&key.to_uppercase().as_str())) {
        debug!("{}: properties end at %{}", location, key);
        lines.put_back(line);
        break;
      }
      raw.push((key.to_lowercase(), value));
    }
    let mut props = Self::default();
    for (key, value) in raw {
      let value = PropValue::coerce(value.as_deref(), location)?;
      props.0.insert(key, value);
    }
    return Ok(props);
  }

  /// Gets a property by (lowercase) name.
  pub fn get(&self, key: &str) -> Option<&PropValue> {
    return self.0.get(key);
  }

  /// Checks whether a property was given, with or without value.
  pub fn contains(&self, key: &str) -> bool {
    return self.0.contains_key(key);
  }

  /// Iterates over all properties in key order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
    return self.0.iter().map(|(k, v)| (k.as_str(), v));
  }

  /// The number of properties.
  pub fn len(&self) -> usize {
    return self.0.len();
  }

  /// Whether there are no properties at all.
  pub fn is_empty(&self) -> bool {
    return self.0.is_empty();
  }

  /// Gets an integer property that must be there.
  pub fn require_int(
    &self,
    key: &'static str,
    location: BlockRef
  ) -> VtfResult<i64> {
    let value = self.get(key).ok_or(VtfError::MissingProperty {
      location,
      property: key
    })?;
    return value.as_int().ok_or(VtfError::BadProperty {
      location,
      property: key.to_string()
    });
  }

  /// Gets a text property that may be missing, but must be text if present.
  pub fn optional_str(
    &self,
    key: &str,
    location: BlockRef
  ) -> VtfResult<Option<&str>> {
    return match self.get(key) {
      None => Ok(None),
      Some(value) => value.as_str().map(Some).ok_or(VtfError::BadProperty {
        location,
        property: key.to_string()
      })
    };
  }
}
