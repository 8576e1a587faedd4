//! This module implements the step-by-step summary of a VTF file: for each
//! step, the geometry parts in effect and the fields defined on them.

use std::fmt::Display;

use itertools::Itertools;
use serde::Serialize;

use crate::blocks::*;
use crate::blocks::types::*;
use crate::error::*;
use crate::steps::{StepId, Steppable};
use crate::vtffile::VtfFile;

/// The indentation unit of the rendered summary.
const INDENT: &str = "  ";

/// A field defined on a geometry part at some step.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FieldEntry {
  /// The kind of field.
  pub kind: FieldKind,
  /// The name of the field.
  pub name: String
}

/// A geometry part (an elements block and its nodes) at some step.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PartSummary {
  /// The id of the elements block.
  pub elements_id: BlockId,
  /// The id of the nodes block.
  pub nodes_id: BlockId,
  /// The number of nodes.
  pub npts: usize,
  /// The number of elements in each topology sub-block.
  pub nelems: Vec<usize>,
  /// The fields with results on this part at this step.
  pub fields: Vec<FieldEntry>
}

/// Everything in effect at one step.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct StepSummary {
  /// The step index.
  pub step: StepId,
  /// The geometry parts, in geometry order.
  pub parts: Vec<PartSummary>
}

/// A summary of a whole file, step by step.
#[derive(Clone, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Summary {
  /// The steps, from the first to the last.
  pub steps: Vec<StepSummary>
}

impl VtfFile {
  /// Checks whether a field has results on a geometry part at a step.
  fn defined_on(
    &self,
    field: &Field,
    stepid: StepId,
    elems: &Elements,
    nodes: &Nodes
  ) -> bool {
    return field.mapping_at(stepid)
      .iter()
      .filter_map(|id| self.results.get(id))
      .any(|r| match r.kind {
        ResultKind::Nodal => r.target == nodes.id,
        ResultKind::Element => r.target == elems.id
      });
  }

  /// Summarizes the file step by step, from step 1 to the last step of the
  /// geometry or any field. Verifies the file first.
  pub fn summary(&self) -> VtfResult<Summary> {
    self.verify()?;
    let geometry = self.geometry.as_ref().ok_or(VtfError::GeometryMissing)?;
    let mut summary = Summary::default();
    for stepid in 1..=self.nsteps() {
      let mut parts: Vec<PartSummary> = Vec::new();
      for eid in geometry.mapping_at(stepid) {
        let elems = self.elements.get(eid).ok_or(VtfError::UnknownTarget {
          location: BlockRef { kind: BlockType::Geometry, id: geometry.id },
          target: BlockRef { kind: BlockType::Elements, id: *eid }
        })?;
        let nodes = self.nodes.get(&elems.nodes_id).ok_or(
          VtfError::UnknownTarget {
            location: BlockRef { kind: BlockType::Elements, id: elems.id },
            target: BlockRef { kind: BlockType::Nodes, id: elems.nodes_id }
          }
        )?;
        let fields = self.fields()
          .filter(|f| self.defined_on(f, stepid, elems, nodes))
          .map(|f| FieldEntry { kind: f.kind, name: f.name().to_string() })
          .collect();
        parts.push(PartSummary {
          elements_id: elems.id,
          nodes_id: nodes.id,
          npts: nodes.npts,
          nelems: elems.nelems.clone(),
          fields
        });
      }
      summary.steps.push(StepSummary { step: stepid, parts });
    }
    return Ok(summary);
  }
}

impl Display for Summary {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for step in self.steps.iter() {
      writeln!(f, "Step {}", step.step)?;
      for (gpart, part) in step.parts.iter().enumerate() {
        writeln!(f, "{}Element block {}", INDENT, gpart + 1)?;
        writeln!(f, "{}{}{} nodes", INDENT, INDENT, part.npts)?;
        writeln!(
          f,
          "{}{}{} elements",
          INDENT,
          INDENT,
          part.nelems.iter().join(", ")
        )?;
        for field in part.fields.iter() {
          writeln!(
            f,
            "{}{}{}: '{}'",
            INDENT,
            INDENT,
            field.kind.name(),
            field.name
          )?;
        }
      }
    }
    return Ok(());
  }
}
