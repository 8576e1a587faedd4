//! This module defines the element topologies that can introduce the
//! sub-blocks of an elements block.

use std::fmt::Display;
use core::str::FromStr;

use serde::{Serialize, Deserialize};

/// Generates the ElementTopology enum.
macro_rules! gen_topologies {
  (
    $(($vn:ident, $nm:literal, $nverts:expr),)*
  ) => {
    /// Known element topologies.
    #[derive(
      Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd,
      Ord, Hash
    )]
    #[allow(missing_docs)]
    #[non_exhaustive]
    pub enum ElementTopology {
      $($vn,)*
    }

    impl ElementTopology {
      /// Returns the all-caps tag of the topology, as found after a `%`.
      pub const fn name(&self) -> &'static str {
        return match self {
          $(Self::$vn => $nm,)*
        };
      }

      /// Returns the usual number of vertices per element.
      pub const fn usual_nverts(&self) -> usize {
        return match self {
          $(Self::$vn => $nverts,)*
        };
      }

      /// Returns a static slice with all known topologies.
      pub const fn all() -> &'static [Self] {
        return &[
          $(Self::$vn,)*
        ];
      }

      /// Returns the tags of all known topologies.
      pub const fn tags() -> &'static [&'static str] {
        return &[
          $($nm,)*
        ];
      }
    }

    impl FromStr for ElementTopology {
      type Err = ();

      fn from_str(s: &str) -> Result<Self, Self::Err> {
        return match s {
          $(
            $nm => Ok(Self::$vn),
          )*
          _ => Err(())
        };
      }
    }
  };
}

gen_topologies!(
  (Points, "POINTS", 1),
  (Beams, "BEAMS", 2),
  (Quads, "QUADS", 4),
  (Triangles, "TRIANGLES", 3),
  (Hexahedrons, "HEXAHEDRONS", 8),
  (Tetrahedrons, "TETRAHEDRONS", 4),
  (Pentahedrons, "PENTAHEDRONS", 6),
);

impl Display for ElementTopology {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return write!(f, "{}", self.name());
  }
}
