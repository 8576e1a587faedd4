//! This module implements the specific decoders for each block type. Each one
//! consumes exactly the lines of its block, giving back the first line that
//! belongs to whatever comes next.

use std::str::FromStr;

use log::debug;

use crate::blocks::*;
use crate::blocks::types::BlockRef;
use crate::elements::ElementTopology;
use crate::error::*;
use crate::lines::LineSource;
use crate::properties::Properties;
use crate::steps::StepMap;
use crate::util::check_array;

/// Tags that are part of a geometry step and carry no data of their own.
const GEOMETRY_MARKERS: &[&str] = &["ELEMENTS"];

/// Tags that end the properties of a field and begin its steps.
const FIELD_STEP_TAGS: &[&str] = &["STEP"];

impl BlockDecoder for InternalString {
  fn decode<S: LineSource>(location: BlockRef, lines: &mut S) -> VtfResult<Self> {
    let mut value = String::new();
    let mut text = lines.until_empty();
    while let Some(line) = text.next_line()? {
      value.push_str(&line);
      value.push('\n');
    }
    return Ok(Self { id: location.id, value });
  }
}

impl BlockDecoder for Nodes {
  fn decode<S: LineSource>(location: BlockRef, lines: &mut S) -> VtfResult<Self> {
    let props = Properties::decode(lines, None, location)?;
    let (npts, dim) = check_array::<f64, _>(lines, location)?;
    return Ok(Self { id: location.id, props, npts, dim });
  }
}

impl BlockDecoder for Elements {
  fn decode<S: LineSource>(location: BlockRef, lines: &mut S) -> VtfResult<Self> {
    let props = Properties::decode(
      lines,
      Some(ElementTopology::tags()),
      location
    )?;
    let nodes_id = props.require_int("nodes", location)?;
    let mut topologies: Vec<ElementTopology> = Vec::new();
    let mut nelems: Vec<usize> = Vec::new();
    let mut nverts: Vec<usize> = Vec::new();
    while let Some(line) = lines.next_line()? {
      let trimmed = line.trim();
      let tag = trimmed.strip_prefix('%').unwrap_or(trimmed)
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_uppercase();
      let topology = match ElementTopology::from_str(&tag) {
        Ok(topology) => topology,
        Err(()) => {
          lines.put_back(line);
          break;
        }
      };
      let (n, v) = check_array::<i64, _>(lines, location)?;
      if v != topology.usual_nverts() {
        debug!(
          "{}: {} with {} vertices each (usually {})",
          location,
          topology,
          v,
          topology.usual_nverts()
        );
      }
      topologies.push(topology);
      nelems.push(n);
      nverts.push(v);
    }
    return Ok(Self {
      id: location.id,
      props,
      nodes_id,
      topologies,
      nelems,
      nverts
    });
  }
}

impl BlockDecoder for Results {
  fn decode<S: LineSource>(location: BlockRef, lines: &mut S) -> VtfResult<Self> {
    let props = Properties::decode(lines, None, location)?;
    let (npts, dim) = check_array::<f64, _>(lines, location)?;
    let dimension = props.require_int("dimension", location)?;
    if usize::try_from(dimension).ok() != Some(dim) {
      return Err(VtfError::DimensionMismatch(location));
    }
    let (kind, target) = if props.contains("per_node") {
      (ResultKind::Nodal, props.require_int("per_node", location)?)
    } else if props.contains("per_element") {
      (ResultKind::Element, props.require_int("per_element", location)?)
    } else {
      return Err(VtfError::UnknownResultKind(location));
    };
    return Ok(Self { id: location.id, props, kind, target, npts, dim });
  }
}

impl BlockDecoder for Geometry {
  fn decode<S: LineSource>(location: BlockRef, lines: &mut S) -> VtfResult<Self> {
    let steps = StepMap::decode(
      &mut lines.until_empty(),
      GEOMETRY_MARKERS,
      location
    )?;
    return Ok(Self { id: location.id, steps });
  }
}

impl BlockDecoder for Field {
  fn decode<S: LineSource>(location: BlockRef, lines: &mut S) -> VtfResult<Self> {
    let kind = location.kind.field_kind()
      .ok_or(VtfError::NotAField(location))?;
    let mut block = lines.until_empty();
    let props = Properties::decode(&mut block, Some(FIELD_STEP_TAGS), location)?;
    props.optional_str("name", location)?;
    let steps = StepMap::decode(&mut block, &[], location)?;
    return Ok(Self { id: location.id, kind, props, steps });
  }
}
