//! This module implements the block reader for VTF files: it checks the file
//! signature, finds block headers and dispatches each block to its decoder.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::{debug, warn};

use crate::blocks::Block;
use crate::blocks::types::*;
use crate::error::*;
use crate::lines::{LineSource, PushbackLines};
use crate::vtffile::VtfFile;

/// The start of the first line of every ASCII VTF file.
pub const VTF_SIGNATURE: &str = "*VTF-";

/// Reads the blocks of a VTF file one by one, in a single forward pass. Block
/// types it doesn't know are skipped, with a warning the first time each one
/// is seen.
pub struct BlockReader<R: BufRead> {
  /// The lines of the file.
  lines: PushbackLines<R>,
  /// The unknown block types that were already warned about.
  warned: BTreeSet<String>,
  /// Whether an error was already returned.
  failed: bool
}

impl<R: BufRead> BlockReader<R> {
  /// Starts reading a file, checking its signature.
  pub fn new(reader: R) -> VtfResult<Self> {
    let mut lines = PushbackLines::new(reader);
    match lines.next_line() {
      Ok(Some(line)) if line.starts_with(VTF_SIGNATURE) => {
        debug!("Found signature \"{}\".", line.trim());
      },
      _ => return Err(VtfError::NotVtf)
    }
    return Ok(Self {
      lines,
      warned: BTreeSet::new(),
      failed: false
    });
  }

  /// The unknown block types that were found so far.
  pub fn warned(&self) -> &BTreeSet<String> {
    return &self.warned;
  }

  /// Finishes up and returns the unknown block types that were found.
  pub fn into_warned(self) -> BTreeSet<String> {
    return self.warned;
  }

  /// Skips to the next known block and decodes it.
  fn next_block(&mut self) -> VtfResult<Option<Block>> {
    while let Some(line) = self.lines.next_line()? {
      let header = match line.strip_prefix('*') {
        Some(header) => header,
        None => continue
      };
      let lineno = self.lines.line_number();
      let malformed = || VtfError::MalformedHeader {
        line: lineno,
        text: line.clone()
      };
      let mut tokens = header.split_whitespace();
      let (tag, id) = match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(tag), Some(id), None) => (tag.to_lowercase(), id),
        _ => return Err(malformed())
      };
      let id: BlockId = id.parse().map_err(|_| malformed())?;
      if let Some(bt) = BlockType::from_tag(&tag) {
        debug!("Started {} on line {}.", BlockRef { kind: bt, id }, lineno);
        let block = bt.decode(id, &mut self.lines)?;
        debug!(
          "Finished {} on line {}.",
          block.block_ref(),
          self.lines.line_number()
        );
        return Ok(Some(block));
      }
      if IGNORED_BLOCK_TYPES.contains(&tag.as_str()) {
        debug!("Skipping {} block on line {}.", tag, lineno);
      } else if !self.warned.contains(&tag) {
        warn!("Ignoring {} block", tag);
        self.warned.insert(tag);
      }
    }
    return Ok(None);
  }

  /// Reads a whole file from a BufRead instance.
  pub fn parse_bufread(reader: R) -> VtfResult<VtfFile> {
    let mut blocks = Self::new(reader)?;
    let mut vtf = VtfFile::new();
    for block in blocks.by_ref() {
      vtf.insert_block(block?)?;
    }
    vtf.warned = blocks.into_warned();
    return Ok(vtf);
  }
}

impl BlockReader<BufReader<File>> {
  /// Utility method -- reads and parses a file.
  pub fn parse_file<P: AsRef<Path>>(p: P) -> VtfResult<VtfFile> {
    let file = File::open(p.as_ref())?;
    return Self::parse_bufread(BufReader::new(file));
  }
}

impl<R: BufRead> Iterator for BlockReader<R> {
  type Item = VtfResult<Block>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.failed {
      return None;
    }
    let next = self.next_block().transpose();
    if matches!(next, Some(Err(_))) {
      self.failed = true;
    }
    return next;
  }
}
