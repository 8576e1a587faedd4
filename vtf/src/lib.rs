//! This library implements types and functions to parse and inspect ASCII VTF
//! files, the block-based text format used to store structured meshes and the
//! results attached to them for visualization.
//!
//! A file is read in a single forward pass: lines go through a pushback-capable
//! line source, block headers are dispatched to per-kind decoders, and the
//! decoded blocks are gathered into a `VtfFile`. That file can then be verified
//! for cross-block consistency and summarized step by step.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]
#![allow(clippy::needless_return)]

pub mod blocks;
pub mod elements;
pub mod error;
pub mod lines;
pub mod parser;
pub mod properties;
pub mod steps;
pub mod util;
pub mod vtffile;

/// Imports the most relevant exports from the library.
pub mod prelude {
  pub use super::blocks::*;
  pub use super::blocks::types::*;
  pub use super::elements::*;
  pub use super::error::*;
  pub use super::lines::*;
  pub use super::parser::*;
  pub use super::properties::*;
  pub use super::steps::*;
  pub use super::vtffile::*;
  pub use super::vtffile::summary::*;
}

#[cfg(test)]
mod tests;
