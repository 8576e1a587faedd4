//! This module implements the list of known block types, along with the tags
//! that announce them in a block header and the decoders they dispatch to.

use std::fmt::Display;

use serde::{Serialize, Deserialize};

use crate::blocks::{Block, BlockDecoder, Elements, Field, FieldKind, Geometry};
use crate::blocks::{InternalString, Nodes, Results};
use crate::error::VtfResult;
use crate::lines::LineSource;

/// The type of block ids. Ids are unique within a block type, not globally.
pub type BlockId = i64;

/// Block types that are known but carry nothing of interest. They are skipped
/// without a warning.
pub const IGNORED_BLOCK_TYPES: &[&str] = &["glviewstateinfo"];

/// Generates the BlockType enum and the dispatch to the decoders.
macro_rules! gen_block_types {
  (
    $(
      {
        $desc:literal,
        $bname:ident,
        $tag:literal,
        $dec:ty
      },
    )*
  ) => {
    /// This contains all the known block types.
    #[derive(
      Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd,
      Ord, Hash
    )]
    #[non_exhaustive]
    pub enum BlockType {
      $(
        #[doc = $desc]
        $bname,
      )*
    }

    impl BlockType {
      /// Returns all known block types.
      pub const fn all() -> &'static [Self] {
        return &[ $(Self::$bname,)* ];
      }

      /// Returns the description of the block type.
      pub const fn desc(&self) -> &'static str {
        return match self {
          $(Self::$bname => $desc,)*
        };
      }

      /// Returns the small name of the variant, CamelCase.
      pub const fn name(&self) -> &'static str {
        return match self {
          $(Self::$bname => stringify!($bname),)*
        };
      }

      /// Returns the lowercase tag that follows the `*` in a block header.
      pub const fn tag(&self) -> &'static str {
        return match self {
          $(Self::$bname => $tag,)*
        };
      }

      /// Looks up a block type by its (lowercase) header tag.
      pub fn from_tag(tag: &str) -> Option<Self> {
        return match tag {
          $($tag => Some(Self::$bname),)*
          _ => None
        };
      }

      /// Runs the decoder for this block type over the lines of a block.
      pub fn decode<S: LineSource>(
        &self,
        id: BlockId,
        lines: &mut S
      ) -> VtfResult<Block> {
        let location = BlockRef { kind: *self, id };
        return match self {
          $(
            Self::$bname => {
              <$dec as BlockDecoder>::decode(location, lines).map(Block::from)
            },
          )*
        };
      }
    }
  }
}

gen_block_types!(
  {
    "Free text",
    InternalString,
    "internalstring",
    InternalString
  },
  {
    "Node coordinates",
    Nodes,
    "nodes",
    Nodes
  },
  {
    "Element connectivity, split by topology",
    Elements,
    "elements",
    Elements
  },
  {
    "Per-node or per-element result values",
    Results,
    "results",
    Results
  },
  {
    "The elements blocks that make up the geometry, per step",
    Geometry,
    "glviewgeometry",
    Geometry
  },
  {
    "A displacement field, pointing to results blocks per step",
    Displacement,
    "glviewdisplacement",
    Field
  },
  {
    "A scalar field, pointing to results blocks per step",
    Scalar,
    "glviewscalar",
    Field
  },
  {
    "A vector field, pointing to results blocks per step",
    Vector,
    "glviewvector",
    Field
  },
);

impl BlockType {
  /// The kind of field blocks of this type hold, if they are fields.
  pub const fn field_kind(&self) -> Option<FieldKind> {
    return match self {
      Self::Displacement => Some(FieldKind::Displacement),
      Self::Scalar => Some(FieldKind::Scalar),
      Self::Vector => Some(FieldKind::Vector),
      _ => None
    };
  }
}

impl Display for BlockType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}

/// Refers to a single block by type and id.
#[derive(
  Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord,
  Hash
)]
pub struct BlockRef {
  /// The type of block.
  pub kind: BlockType,
  /// The id of the block.
  pub id: BlockId
}

impl Display for BlockRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{} block {}", self.kind, self.id);
  }
}
