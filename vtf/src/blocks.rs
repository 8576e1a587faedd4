//! This module defines the blocks that make up a VTF file. Every block starts
//! with a `*<TYPE> <ID>` header and runs until the next blank line (with some
//! types spanning a few of them, see the decoders).

pub mod decoders;
pub mod types;

use serde::Serialize;

use crate::blocks::types::*;
use crate::elements::ElementTopology;
use crate::error::VtfResult;
use crate::lines::LineSource;
use crate::properties::Properties;
use crate::steps::{StepMap, Steppable};

/// The name reported for fields without a `%NAME` property.
pub const UNNAMED_FIELD: &str = "{{UNNAMED}}";

/// All block decoders must implement this trait.
pub trait BlockDecoder: Sized {
  /// Consumes exactly the lines that belong to a block and decodes them.
  fn decode<S: LineSource>(location: BlockRef, lines: &mut S) -> VtfResult<Self>;
}

/// A block of free text.
#[derive(Clone, Debug, Serialize)]
pub struct InternalString {
  /// The id of the block.
  pub id: BlockId,
  /// The text, one trimmed line after the other, each ending in a newline.
  pub value: String
}

/// A block of node coordinates.
#[derive(Clone, Debug, Serialize)]
pub struct Nodes {
  /// The id of the block.
  pub id: BlockId,
  /// The properties given before the coordinates, if any.
  pub props: Properties,
  /// The number of nodes.
  pub npts: usize,
  /// The number of coordinates per node.
  pub dim: usize
}

/// A block of element connectivity, made of one sub-block per topology.
#[derive(Clone, Debug, Serialize)]
pub struct Elements {
  /// The id of the block.
  pub id: BlockId,
  /// The properties of the block.
  pub props: Properties,
  /// The id of the nodes block the connectivity refers to.
  pub nodes_id: BlockId,
  /// The topology of each sub-block.
  pub topologies: Vec<ElementTopology>,
  /// The number of elements in each sub-block.
  pub nelems: Vec<usize>,
  /// The number of vertices per element in each sub-block.
  pub nverts: Vec<usize>
}

impl Elements {
  /// The total number of elements over all sub-blocks.
  pub fn total_elements(&self) -> usize {
    return self.nelems.iter().sum();
  }

  /// The name of the part, if one was given.
  pub fn name(&self) -> Option<&str> {
    return self.props.get("name").and_then(|v| v.as_str());
  }

  /// The id of the part, if one was given.
  pub fn part_id(&self) -> Option<i64> {
    return self.props.get("part_id").and_then(|v| v.as_int());
  }
}

/// Whether results are given per node or per element.
#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq)]
pub enum ResultKind {
  /// One row per node of a nodes block.
  Nodal,
  /// One row per element of an elements block.
  Element
}

impl ResultKind {
  /// Returns the lowercase name of the kind.
  pub const fn name(&self) -> &'static str {
    return match self {
      Self::Nodal => "nodal",
      Self::Element => "element"
    };
  }

  /// The type of block results of this kind point to.
  pub const fn target_type(&self) -> BlockType {
    return match self {
      Self::Nodal => BlockType::Nodes,
      Self::Element => BlockType::Elements
    };
  }
}

/// A block of result values, attached to a nodes or elements block.
#[derive(Clone, Debug, Serialize)]
pub struct Results {
  /// The id of the block.
  pub id: BlockId,
  /// The properties of the block.
  pub props: Properties,
  /// Whether the results are per node or per element.
  pub kind: ResultKind,
  /// The id of the nodes or elements block the results are attached to.
  pub target: BlockId,
  /// The number of rows.
  pub npts: usize,
  /// The number of values per row.
  pub dim: usize
}

impl Results {
  /// Refers to the block these results are attached to.
  pub fn target_ref(&self) -> BlockRef {
    return BlockRef { kind: self.kind.target_type(), id: self.target };
  }
}

/// The geometry: which elements blocks make up the model at each step.
#[derive(Clone, Debug, Serialize)]
pub struct Geometry {
  /// The id of the block.
  pub id: BlockId,
  /// Elements block ids, per step.
  pub steps: StepMap
}

impl Steppable for Geometry {
  fn steps(&self) -> &StepMap {
    return &self.steps;
  }
}

/// The kinds of field, in the order they are reported.
#[derive(Copy, Clone, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum FieldKind {
  /// Displacements of the nodes.
  Displacement,
  /// One value per node or element.
  Scalar,
  /// A vector per node or element.
  Vector
}

impl FieldKind {
  /// Returns the CamelCase name of the kind, as reported in summaries.
  pub const fn name(&self) -> &'static str {
    return self.block_type().name();
  }

  /// The block type that introduces fields of this kind.
  pub const fn block_type(&self) -> BlockType {
    return match self {
      Self::Displacement => BlockType::Displacement,
      Self::Scalar => BlockType::Scalar,
      Self::Vector => BlockType::Vector
    };
  }
}

/// A displacement, scalar or vector field: which results blocks hold its
/// values at each step.
#[derive(Clone, Debug, Serialize)]
pub struct Field {
  /// The id of the block.
  pub id: BlockId,
  /// The kind of field.
  pub kind: FieldKind,
  /// The properties of the block.
  pub props: Properties,
  /// Results block ids, per step.
  pub steps: StepMap
}

impl Field {
  /// The name of the field.
  pub fn name(&self) -> &str {
    return self.props.get("name")
      .and_then(|v| v.as_str())
      .unwrap_or(UNNAMED_FIELD);
  }

  /// Refers to this block.
  pub fn block_ref(&self) -> BlockRef {
    return BlockRef { kind: self.kind.block_type(), id: self.id };
  }
}

impl Steppable for Field {
  fn steps(&self) -> &StepMap {
    return &self.steps;
  }
}

/// Any decoded block.
#[derive(Clone, Debug, Serialize, derive_more::From)]
#[allow(missing_docs)]
pub enum Block {
  InternalString(InternalString),
  Nodes(Nodes),
  Elements(Elements),
  Results(Results),
  Geometry(Geometry),
  Field(Field)
}

impl Block {
  /// Refers to this block by type and id.
  pub fn block_ref(&self) -> BlockRef {
    let (kind, id) = match self {
      Self::InternalString(b) => (BlockType::InternalString, b.id),
      Self::Nodes(b) => (BlockType::Nodes, b.id),
      Self::Elements(b) => (BlockType::Elements, b.id),
      Self::Results(b) => (BlockType::Results, b.id),
      Self::Geometry(b) => (BlockType::Geometry, b.id),
      Self::Field(b) => (b.kind.block_type(), b.id)
    };
    return BlockRef { kind, id };
  }
}
