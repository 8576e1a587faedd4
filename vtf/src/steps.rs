//! This module implements step maps: sparse, step-indexed lists of block ids,
//! as carried by geometry and field blocks. Looking up a step that isn't a key
//! gives the list of the closest earlier step, so a list stays in effect until
//! another step replaces it.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::blocks::types::{BlockId, BlockRef};
use crate::error::*;
use crate::lines::LineSource;

/// The type of step indexes.
pub type StepId = i64;

/// A map from step index to the ordered list of blocks active at that step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StepMap(BTreeMap<StepId, Vec<BlockId>>);

impl StepMap {
  /// Reads `%STEP <n>` sections, each followed by comma-separated block ids
  /// over one or more lines, until the source is exhausted. Tags listed in
  /// `markers` are accepted silently; other tags are skipped.
  pub fn decode<S: LineSource>(
    lines: &mut S,
    markers: &[&str],
    location: BlockRef
  ) -> VtfResult<Self> {
    let mut map = Self::default();
    let mut current: Option<StepId> = None;
    while let Some(line) = lines.next_line()? {
      if let Some(body) = line.strip_prefix('%') {
        let mut tokens = body.split_whitespace();
        let tag = tokens.next().unwrap_or_default().to_uppercase();
        if tag == "STEP" {
          let stepid = tokens.last()
            .and_then(|s| s.parse::<StepId>().ok())
            .ok_or_else(|| VtfError::BadStep {
              location,
              text: line.clone()
            })?;
          map.0.insert(stepid, Vec::new());
          current = Some(stepid);
        } else if current.is_none() {
          return Err(VtfError::DataBeforeStep(location));
        } else if !markers.contains(&tag.as_str()) {
          debug!("{}: skipping %{}", location, tag);
        }
        continue;
      }
      let ids = current
        .and_then(|stepid| map.0.get_mut(&stepid))
        .ok_or(VtfError::DataBeforeStep(location))?;
      for v in line.split(',').map(str::trim).filter(|v| !v.is_empty()) {
        let id = v.parse::<BlockId>().map_err(|_| VtfError::BadValue {
          location,
          value: v.to_string()
        })?;
        ids.push(id);
      }
    }
    return Ok(map);
  }

  /// The blocks in effect at a step: those of the greatest key not above it,
  /// or nothing if the step comes before every key.
  pub fn mapping_at(&self, stepid: StepId) -> &[BlockId] {
    return self.0.range(..=stepid)
      .next_back()
      .map(|(_, ids)| ids.as_slice())
      .unwrap_or(&[]);
  }

  /// The last step index, if there are any steps.
  pub fn max_step(&self) -> Option<StepId> {
    return self.0.keys().next_back().copied();
  }

  /// The first step index, if there are any steps.
  pub fn min_step(&self) -> Option<StepId> {
    return self.0.keys().next().copied();
  }

  /// The number of steps that were explicitly given.
  pub fn nsteps(&self) -> usize {
    return self.0.len();
  }

  /// Iterates over every block id referenced at any step.
  pub fn referenced(&self) -> impl Iterator<Item = BlockId> + '_ {
    return self.0.values().flatten().copied();
  }

  /// Iterates over the explicit steps in order.
  pub fn iter(&self) -> impl Iterator<Item = (StepId, &[BlockId])> {
    return self.0.iter().map(|(s, ids)| (*s, ids.as_slice()));
  }
}

impl FromIterator<(StepId, Vec<BlockId>)> for StepMap {
  fn from_iter<T: IntoIterator<Item = (StepId, Vec<BlockId>)>>(iter: T) -> Self {
    return Self(iter.into_iter().collect());
  }
}

/// Blocks that carry a step map.
pub trait Steppable {
  /// The step map of this block.
  fn steps(&self) -> &StepMap;

  /// The blocks in effect at a step. See `StepMap::mapping_at`.
  fn mapping_at(&self, stepid: StepId) -> &[BlockId] {
    return self.steps().mapping_at(stepid);
  }

  /// The last step index of this block.
  fn max_step(&self) -> Option<StepId> {
    return self.steps().max_step();
  }

  /// The number of explicit steps in this block.
  fn nsteps(&self) -> usize {
    return self.steps().nsteps();
  }
}
