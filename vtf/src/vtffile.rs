//! This module implements the general structure of a VTF file as we interpret
//! it: every decoded block, sorted into a collection per block type. Its
//! submodules are responsible for the step-by-step summary.

pub mod summary;

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::blocks::*;
use crate::blocks::types::*;
use crate::error::*;
use crate::steps::{StepId, Steppable};

/// This is the output of the block reader.
#[derive(Clone, Debug, Default, Serialize)]
pub struct VtfFile {
  /// The free-text blocks.
  pub strings: BTreeMap<BlockId, InternalString>,
  /// The node blocks.
  pub nodes: BTreeMap<BlockId, Nodes>,
  /// The elements blocks.
  pub elements: BTreeMap<BlockId, Elements>,
  /// The results blocks.
  pub results: BTreeMap<BlockId, Results>,
  /// The geometry block, if there was one.
  pub geometry: Option<Geometry>,
  /// The displacement fields, in the order they were found.
  pub displacements: Vec<Field>,
  /// The scalar fields, in the order they were found.
  pub scalars: Vec<Field>,
  /// The vector fields, in the order they were found.
  pub vectors: Vec<Field>,
  /// The unknown block types that were skipped.
  pub warned: BTreeSet<String>
}

/// Inserts a block into a collection, unless its id is already taken.
fn insert_unique<B>(
  map: &mut BTreeMap<BlockId, B>,
  bref: BlockRef,
  block: B
) -> VtfResult<()> {
  if map.contains_key(&bref.id) {
    return Err(VtfError::DuplicateBlock(bref));
  }
  map.insert(bref.id, block);
  return Ok(());
}

impl VtfFile {
  /// Instantiates a new VTF file struct with nothing inside.
  pub fn new() -> Self {
    return Self::default();
  }

  /// Sorts a decoded block into the right collection.
  pub fn insert_block(&mut self, block: Block) -> VtfResult<()> {
    let bref = block.block_ref();
    match block {
      Block::InternalString(b) => insert_unique(&mut self.strings, bref, b)?,
      Block::Nodes(b) => insert_unique(&mut self.nodes, bref, b)?,
      Block::Elements(b) => insert_unique(&mut self.elements, bref, b)?,
      Block::Results(b) => insert_unique(&mut self.results, bref, b)?,
      Block::Geometry(b) => {
        if self.geometry.is_some() {
          return Err(VtfError::MultipleGeometry);
        }
        self.geometry = Some(b);
      },
      Block::Field(b) => {
        let fields = match b.kind {
          FieldKind::Displacement => &mut self.displacements,
          FieldKind::Scalar => &mut self.scalars,
          FieldKind::Vector => &mut self.vectors
        };
        if fields.iter().any(|f| f.id == b.id) {
          return Err(VtfError::DuplicateBlock(bref));
        }
        fields.push(b);
      }
    };
    return Ok(());
  }

  /// Iterates over all fields: displacements, then scalars, then vectors.
  pub fn fields(&self) -> impl Iterator<Item = &Field> {
    return self.displacements.iter()
      .chain(self.scalars.iter())
      .chain(self.vectors.iter());
  }

  /// The number of steps: the last step of the geometry or of any field.
  pub fn nsteps(&self) -> StepId {
    return self.geometry.iter()
      .filter_map(|g| g.max_step())
      .chain(self.fields().filter_map(|f| f.max_step()))
      .max()
      .unwrap_or(0);
  }

  /// The number of rows a results block attached to a block must have, or
  /// `None` if there's no such block.
  pub fn target_size(&self, target: BlockRef) -> Option<usize> {
    return match target.kind {
      BlockType::Nodes => self.nodes.get(&target.id).map(|n| n.npts),
      BlockType::Elements => {
        self.elements.get(&target.id).map(|e| e.total_elements())
      },
      _ => None
    };
  }

  /// Checks that every reference between blocks points to an existing block
  /// of the right size, and that there is a geometry. Stops at the first
  /// problem found.
  pub fn verify(&self) -> VtfResult<()> {
    for elems in self.elements.values() {
      if !self.nodes.contains_key(&elems.nodes_id) {
        return Err(VtfError::UnknownTarget {
          location: BlockRef { kind: BlockType::Elements, id: elems.id },
          target: BlockRef { kind: BlockType::Nodes, id: elems.nodes_id }
        });
      }
    }
    for results in self.results.values() {
      let location = BlockRef { kind: BlockType::Results, id: results.id };
      let target = results.target_ref();
      let expected = self.target_size(target)
        .ok_or(VtfError::UnknownTarget { location, target })?;
      if results.npts != expected {
        return Err(VtfError::IncorrectSize {
          location,
          expected,
          found: results.npts
        });
      }
    }
    let geometry = self.geometry.as_ref().ok_or(VtfError::GeometryMissing)?;
    for id in geometry.steps.referenced() {
      if !self.elements.contains_key(&id) {
        return Err(VtfError::UnknownTarget {
          location: BlockRef { kind: BlockType::Geometry, id: geometry.id },
          target: BlockRef { kind: BlockType::Elements, id }
        });
      }
    }
    for field in self.fields() {
      for id in field.steps.referenced() {
        if !self.results.contains_key(&id) {
          return Err(VtfError::UnknownTarget {
            location: field.block_ref(),
            target: BlockRef { kind: BlockType::Results, id }
          });
        }
      }
    }
    return Ok(());
  }
}
