//! This module implements utility functions without much need for defining
//! context or not enough of it to warrant them having their own modules.

use std::str::FromStr;

use crate::blocks::types::BlockRef;
use crate::error::*;
use crate::lines::LineSource;

/// Reads a rectangular table of whitespace-separated values, parsing each one
/// as a `T`. The table ends at a blank line, at the end of the source, or at a
/// `%` line, which is given back. Returns the number of rows and columns.
pub fn check_array<T: FromStr, S: LineSource>(
  lines: &mut S,
  location: BlockRef
) -> VtfResult<(usize, usize)> {
  let mut rows = lines.until_empty();
  let mut nrows: usize = 0;
  let mut ncols: Option<usize> = None;
  while let Some(line) = rows.next_line()? {
    if line.starts_with('%') {
      rows.put_back(line);
      break;
    }
    let mut ncoords: usize = 0;
    for token in line.split_whitespace() {
      if token.parse::<T>().is_err() {
        return Err(VtfError::BadValue {
          location,
          value: token.to_string()
        });
      }
      ncoords += 1;
    }
    match ncols {
      None => ncols = Some(ncoords),
      Some(n) if n != ncoords => return Err(VtfError::InconsistentRows(location)),
      Some(_) => {}
    }
    nrows += 1;
  }
  return ncols
    .map(|ncols| (nrows, ncols))
    .ok_or(VtfError::EmptyTable(location));
}
