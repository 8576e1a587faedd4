//! This module implements the line source that block decoders read from. It
//! hands out lines in their original order and keeps a single slot for a line
//! that was read ahead and then given back, which is how decoders find out
//! where their block ends without consuming the next one.

use std::io::{BufRead, Lines};

use crate::error::VtfResult;

/// Something decoders can pull lines from and give one line back to.
pub trait LineSource {
  /// Returns the next line, or `None` once the source is exhausted.
  fn next_line(&mut self) -> VtfResult<Option<String>>;

  /// Gives a line back, to be returned by the next call to `next_line`.
  fn put_back(&mut self, line: String);

  /// Returns a view of this source that yields trimmed lines up to (and
  /// consuming, but not yielding) the next blank line.
  fn until_empty(&mut self) -> UntilEmpty<'_, Self> where Self: Sized {
    return UntilEmpty { source: self, done: false };
  }
}

/// Line source over a buffered reader with one line of pushback.
pub struct PushbackLines<R: BufRead> {
  /// The underlying lines.
  lines: Lines<R>,
  /// The line that was given back, if any.
  slot: Option<String>,
  /// The number of lines handed out so far, minus the given-back one.
  line_number: usize
}

impl<R: BufRead> PushbackLines<R> {
  /// Wraps a buffered reader.
  pub fn new(reader: R) -> Self {
    return Self {
      lines: reader.lines(),
      slot: None,
      line_number: 0
    };
  }

  /// The number of the last line handed out, starting at 1.
  pub fn line_number(&self) -> usize {
    return self.line_number;
  }
}

impl<R: BufRead> LineSource for PushbackLines<R> {
  fn next_line(&mut self) -> VtfResult<Option<String>> {
    if let Some(line) = self.slot.take() {
      self.line_number += 1;
      return Ok(Some(line));
    }
    return match self.lines.next() {
      Some(line) => {
        self.line_number += 1;
        Ok(Some(line?))
      },
      None => Ok(None)
    };
  }

  fn put_back(&mut self, line: String) {
    debug_assert!(self.slot.is_none(), "pushback slot already taken");
    self.line_number = self.line_number.saturating_sub(1);
    self.slot = Some(line);
  }
}

/// A bounded view over a line source: trimmed lines until the next blank one.
/// Once the blank line (or the end of the source) is reached, it stays done.
pub struct UntilEmpty<'a, S: LineSource> {
  /// The source being read.
  source: &'a mut S,
  /// Whether the blank line was already seen.
  done: bool
}

impl<S: LineSource> LineSource for UntilEmpty<'_, S> {
  fn next_line(&mut self) -> VtfResult<Option<String>> {
    if self.done {
      return Ok(None);
    }
    let trimmed = self.source.next_line()?
      .map(|line| line.trim().to_string())
      .filter(|line| !line.is_empty());
    if trimmed.is_none() {
      self.done = true;
    }
    return Ok(trimmed);
  }

  fn put_back(&mut self, line: String) {
    self.source.put_back(line);
  }
}
