//! This module defines the errors that can come up while reading, decoding and
//! verifying a VTF file. All of them are fatal: there is no partial recovery.

use std::error::Error;
use std::fmt::Display;
use std::io;

use crate::blocks::types::BlockRef;

/// Shorthand for results carrying a `VtfError`.
pub type VtfResult<T> = Result<T, VtfError>;

/// This is the kind of error that can be returned when handling a VTF file.
#[derive(Debug)]
#[non_exhaustive]
pub enum VtfError {
  /// The first line didn't carry the `*VTF-` signature (or wasn't text).
  NotVtf,
  /// The underlying stream failed.
  Io(io::Error),
  /// A line starting with `*` wasn't of the form `*<TYPE> <ID>`.
  MalformedHeader {
    /// The line number of the header.
    line: usize,
    /// The offending text.
    text: String
  },
  /// A table entry couldn't be parsed as a number.
  BadValue {
    /// The block holding the table.
    location: BlockRef,
    /// The offending token.
    value: String
  },
  /// A table row didn't have as many columns as the first one.
  InconsistentRows(BlockRef),
  /// A table had no rows at all.
  EmptyTable(BlockRef),
  /// A required property wasn't there.
  MissingProperty {
    /// The block missing the property.
    location: BlockRef,
    /// The name of the property.
    property: &'static str
  },
  /// A property was there, but its value had the wrong type.
  BadProperty {
    /// The block holding the property.
    location: BlockRef,
    /// The name of the property.
    property: String
  },
  /// A `#`-prefixed property value wasn't an integer.
  BadReference {
    /// The block holding the property.
    location: BlockRef,
    /// The raw value.
    value: String
  },
  /// A `%STEP` marker didn't carry an integer step id.
  BadStep {
    /// The steppable block.
    location: BlockRef,
    /// The offending line.
    text: String
  },
  /// Step data (or something other than a property) came before any `%STEP`.
  DataBeforeStep(BlockRef),
  /// A results block declared a dimension other than its table's width.
  DimensionMismatch(BlockRef),
  /// A results block was neither per-node nor per-element.
  UnknownResultKind(BlockRef),
  /// A field decoder was run for a block type that isn't a field.
  NotAField(BlockRef),
  /// More than one geometry block was found.
  MultipleGeometry,
  /// Two blocks of the same kind shared an id.
  DuplicateBlock(BlockRef),
  /// A block pointed to a block that doesn't exist.
  UnknownTarget {
    /// The block holding the reference.
    location: BlockRef,
    /// The block that was pointed to.
    target: BlockRef
  },
  /// A results block didn't have one row per node or element of its target.
  IncorrectSize {
    /// The results block.
    location: BlockRef,
    /// The size of the target.
    expected: usize,
    /// The number of rows in the results block.
    found: usize
  },
  /// No geometry block was found.
  GeometryMissing
}

impl Display for VtfError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::NotVtf => write!(f, "File is not a valid ASCII VTF file"),
      Self::Io(e) => write!(f, "I/O error: {}", e),
      Self::MalformedHeader { line, text } => {
        write!(f, "Line {}: Malformed block header \"{}\"", line, text)
      },
      Self::BadValue { location, value } => {
        write!(f, "{}: Bad value \"{}\"", location, value)
      },
      Self::InconsistentRows(loc) => {
        write!(f, "{}: Inconsistent dimension", loc)
      },
      Self::EmptyTable(loc) => write!(f, "{}: Empty table", loc),
      Self::MissingProperty { location, property } => {
        write!(f, "{}: Missing property {}", location, property)
      },
      Self::BadProperty { location, property } => {
        write!(f, "{}: Bad value for property {}", location, property)
      },
      Self::BadReference { location, value } => {
        write!(f, "{}: Bad block reference \"{}\"", location, value)
      },
      Self::BadStep { location, text } => {
        write!(f, "{}: Bad step marker \"{}\"", location, text)
      },
      Self::DataBeforeStep(loc) => {
        write!(f, "{}: Step data before any %STEP", loc)
      },
      Self::DimensionMismatch(loc) => {
        write!(f, "{}: Inconsistent dimension", loc)
      },
      Self::UnknownResultKind(loc) => write!(f, "{}: Unknown type", loc),
      Self::NotAField(loc) => write!(f, "{}: Not a field type", loc),
      Self::MultipleGeometry => write!(f, "Multiple geometry blocks"),
      Self::DuplicateBlock(loc) => write!(f, "{}: Duplicate id", loc),
      Self::UnknownTarget { location, target } => write!(
        f,
        "{}: Unknown {} block {}",
        location,
        target.kind.name().to_lowercase(),
        target.id
      ),
      Self::IncorrectSize { location, expected, found } => write!(
        f,
        "{}: Incorrect size (expected {}, found {})",
        location,
        expected,
        found
      ),
      Self::GeometryMissing => write!(f, "Geometry block missing")
    };
  }
}

impl Error for VtfError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    if let Self::Io(e) = self {
      return Some(e);
    }
    return None;
  }
}

impl From<io::Error> for VtfError {
  fn from(e: io::Error) -> Self {
    return Self::Io(e);
  }
}
