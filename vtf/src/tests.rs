use std::io::Cursor;

use crate::prelude::*;
use crate::util::check_array;

/// A single quad on four nodes, shown at step 1.
const SINGLE_QUAD: &str = "\
*VTF-1.00


*NODES 1
0. 0. 0.
1. 0. 0.
1. 1. 0.
0. 1. 0.

*ELEMENTS 2
%NODES #1
%NAME \"Patch 1\"
%NO_ID
%MAP_NODE_INDICES
%PART_ID 1
%QUADS
1 2 3 4

*GLVIEWGEOMETRY 1
%STEP 1
%ELEMENTS
2
";

/// A quad and a triangle, with one field of each kind over three steps.
const MULTI_STEP: &str = "\
*VTF-1.00

*INTERNALSTRING 40
VTF file written by hand
  for testing

*NODES 1
0. 0.
1. 0.
1. 1.
0. 1.
0.5 2.

*ELEMENTS 1
%NODES #1
%QUADS
1 2 3 4
%TRIANGLES
3 4 5

*RESULTS 10
%DIMENSION 1
%PER_NODE #1
0.0
1.0
2.0
3.0
4.0

*RESULTS 11
%DIMENSION 3
%PER_ELEMENT #1
0. 0. 1.
0. 0. 2.

*RESULTS 12
%DIMENSION 2
%PER_NODE #1
0. 0.
0. 0.
0.1 0.
0.1 0.
0.2 0.

*GLVIEWGEOMETRY 1
%STEP 1
%ELEMENTS
1

*GLVIEWSCALAR 1
%NAME \"Pressure\"
%STEP 1
10
%STEP 3
10

*GLVIEWVECTOR 2
%NAME \"Normal\"
%STEP 2
11

*GLVIEWDISPLACEMENT 3
%STEP 1
12

*GLVIEWSTATEINFO 1
%STEPNAME 1 \"t=0\"
";

/// The report for MULTI_STEP.
const MULTI_STEP_REPORT: &str = "\
Step 1
  Element block 1
    5 nodes
    1, 1 elements
    Displacement: '{{UNNAMED}}'
    Scalar: 'Pressure'
Step 2
  Element block 1
    5 nodes
    1, 1 elements
    Displacement: '{{UNNAMED}}'
    Scalar: 'Pressure'
    Vector: 'Normal'
Step 3
  Element block 1
    5 nodes
    1, 1 elements
    Displacement: '{{UNNAMED}}'
    Scalar: 'Pressure'
    Vector: 'Normal'
";

/// Nodes, elements and geometry that are fine on their own; tests append to it.
const BASE: &str = "\
*VTF-1.00
*NODES 1
0. 0. 0.
1. 0. 0.
1. 1. 0.
0. 1. 0.

*ELEMENTS 1
%NODES #1
%QUADS
1 2 3 4

";

/// A geometry block showing elements block 1 at step 1.
const BASE_GEOMETRY: &str = "\
*GLVIEWGEOMETRY 1
%STEP 1
%ELEMENTS
1

";

fn parse(text: &str) -> VtfResult<VtfFile> {
  return BlockReader::parse_bufread(Cursor::new(text));
}

fn parse_with(extra: &str) -> VtfResult<VtfFile> {
  return parse(&format!("{}{}{}", BASE, BASE_GEOMETRY, extra));
}

fn location(kind: BlockType, id: BlockId) -> BlockRef {
  return BlockRef { kind, id };
}

fn lines_of(text: &str) -> PushbackLines<Cursor<&str>> {
  return PushbackLines::new(Cursor::new(text));
}

#[test]
fn test_pushback() {
  let mut lines = lines_of("a\nb\n");
  assert_eq!(lines.next_line().unwrap().as_deref(), Some("a"));
  assert_eq!(lines.line_number(), 1);
  lines.put_back("a".to_string());
  assert_eq!(lines.line_number(), 0);
  assert_eq!(lines.next_line().unwrap().as_deref(), Some("a"));
  assert_eq!(lines.next_line().unwrap().as_deref(), Some("b"));
  assert_eq!(lines.next_line().unwrap(), None);
  assert_eq!(lines.next_line().unwrap(), None);
}

#[test]
fn test_until_empty() {
  let mut lines = lines_of("  one  \ntwo\n   \nthree\n");
  {
    let mut block = lines.until_empty();
    assert_eq!(block.next_line().unwrap().as_deref(), Some("one"));
    assert_eq!(block.next_line().unwrap().as_deref(), Some("two"));
    assert_eq!(block.next_line().unwrap(), None);
    assert_eq!(block.next_line().unwrap(), None);
  }
  // the blank line is consumed, but nothing after it
  assert_eq!(lines.next_line().unwrap().as_deref(), Some("three"));
  // an exhausted source ends the view too
  assert_eq!(lines.until_empty().next_line().unwrap(), None);
}

#[test]
fn test_coercion() {
  let loc = location(BlockType::Results, 1);
  let coerce = |s: Option<&str>| PropValue::coerce(s, loc).unwrap();
  assert_eq!(coerce(Some("#12")), PropValue::Reference(12));
  assert_eq!(coerce(Some("\"Patch 1\"")), PropValue::Text("Patch 1".into()));
  assert_eq!(coerce(Some("\"5\"")), PropValue::Text("5".into()));
  assert_eq!(coerce(Some("-3")), PropValue::Integer(-3));
  assert_eq!(coerce(Some(" 7 ")), PropValue::Integer(7));
  assert_eq!(coerce(Some("1.5")), PropValue::Text("1.5".into()));
  assert_eq!(coerce(Some("hello world")), PropValue::Text("hello world".into()));
  assert_eq!(coerce(None), PropValue::Absent);
  assert_eq!(PropValue::Reference(4).as_int(), Some(4));
  assert_eq!(PropValue::Text("4".into()).as_int(), None);
  assert!(matches!(
    PropValue::coerce(Some("#abc"), loc),
    Err(VtfError::BadReference { .. })
  ));
}

#[test]
fn test_properties_stop_at_data() {
  let loc = location(BlockType::Results, 3);
  let mut lines = lines_of("%DIMENSION 3\n%Per_Node #2\n%FLAG\n1.0 2.0 3.0\n");
  let props = Properties::decode(&mut lines, None, loc).unwrap();
  assert_eq!(props.len(), 3);
  assert_eq!(props.get("dimension"), Some(&PropValue::Integer(3)));
  assert_eq!(props.get("per_node"), Some(&PropValue::Reference(2)));
  assert_eq!(props.get("flag"), Some(&PropValue::Absent));
  assert_eq!(props.require_int("per_node", loc).unwrap(), 2);
  assert!(matches!(
    props.require_int("per_element", loc),
    Err(VtfError::MissingProperty { property: "per_element", .. })
  ));
  assert!(matches!(
    props.require_int("flag", loc),
    Err(VtfError::BadProperty { .. })
  ));
  // the data line was given back
  assert_eq!(lines.next_line().unwrap().as_deref(), Some("1.0 2.0 3.0"));
}

#[test]
fn test_properties_stop_at_tag() {
  let loc = location(BlockType::Elements, 1);
  let mut lines = lines_of("%NODES #1\n%quads\n1 2 3 4\n");
  let props = Properties::decode(
    &mut lines,
    Some(ElementTopology::tags()),
    loc
  ).unwrap();
  assert_eq!(props.len(), 1);
  assert!(!props.contains("quads"));
  assert_eq!(lines.next_line().unwrap().as_deref(), Some("%quads"));
}

#[test]
fn test_check_array() {
  let loc = location(BlockType::Nodes, 1);
  let mut lines = lines_of("1 2 3\n4 5 6\n%TRIANGLES\n1 2 3\n");
  assert_eq!(check_array::<f64, _>(&mut lines, loc).unwrap(), (2, 3));
  assert_eq!(lines.next_line().unwrap().as_deref(), Some("%TRIANGLES"));
  let mut lines = lines_of("1 2 3\n4 5\n");
  assert!(matches!(
    check_array::<f64, _>(&mut lines, loc),
    Err(VtfError::InconsistentRows(l)) if l == loc
  ));
  let mut lines = lines_of("\n1 2 3\n");
  assert!(matches!(
    check_array::<f64, _>(&mut lines, loc),
    Err(VtfError::EmptyTable(_))
  ));
  let mut lines = lines_of("1 2 x\n");
  assert!(matches!(
    check_array::<f64, _>(&mut lines, loc),
    Err(VtfError::BadValue { .. })
  ));
  let mut lines = lines_of("1 2 3.5\n");
  assert!(check_array::<i64, _>(&mut lines, loc).is_err());
}

#[test]
fn test_floor_lookup() {
  let steps: StepMap = [(2, vec![1, 2]), (5, vec![3]), (9, vec![])]
    .into_iter()
    .collect();
  assert_eq!(steps.mapping_at(-4), &[] as &[BlockId]);
  assert_eq!(steps.mapping_at(1), &[] as &[BlockId]);
  assert_eq!(steps.mapping_at(2), &[1, 2]);
  assert_eq!(steps.mapping_at(4), &[1, 2]);
  assert_eq!(steps.mapping_at(5), &[3]);
  assert_eq!(steps.mapping_at(8), &[3]);
  assert_eq!(steps.mapping_at(9), &[] as &[BlockId]);
  assert_eq!(steps.mapping_at(100), &[] as &[BlockId]);
  // no key in (s1, s2] means the same list
  for s1 in 2..12 {
    for s2 in (s1 + 1)..12 {
      if steps.iter().all(|(k, _)| k <= s1 || k > s2) {
        assert_eq!(steps.mapping_at(s1), steps.mapping_at(s2));
      }
    }
  }
  assert_eq!(steps.min_step(), Some(2));
  assert_eq!(steps.max_step(), Some(9));
  assert_eq!(steps.nsteps(), 3);
  assert_eq!(StepMap::default().mapping_at(1), &[] as &[BlockId]);
  assert_eq!(StepMap::default().max_step(), None);
}

#[test]
fn test_step_map_decode() {
  let loc = location(BlockType::Geometry, 1);
  let mut lines = lines_of(
    "%STEP 1\n%ELEMENTS\n1, 2,\n3\n%STEP 4\n%ELEMENTS\n5\n%STEP 1\n%ELEMENTS\n6\n"
  );
  let steps = StepMap::decode(&mut lines, &["ELEMENTS"], loc).unwrap();
  // a repeated step starts over
  assert_eq!(steps.mapping_at(1), &[6]);
  assert_eq!(steps.mapping_at(3), &[6]);
  assert_eq!(steps.mapping_at(4), &[5]);
  assert_eq!(steps.nsteps(), 2);
  let mut lines = lines_of("1, 2\n%STEP 1\n");
  assert!(matches!(
    StepMap::decode(&mut lines, &[], loc),
    Err(VtfError::DataBeforeStep(_))
  ));
  let mut lines = lines_of("%STEP one\n");
  assert!(matches!(
    StepMap::decode(&mut lines, &[], loc),
    Err(VtfError::BadStep { .. })
  ));
  let mut lines = lines_of("%STEP 1\n1, x\n");
  assert!(matches!(
    StepMap::decode(&mut lines, &[], loc),
    Err(VtfError::BadValue { .. })
  ));
}

#[test]
fn test_signature() {
  assert!(matches!(parse(""), Err(VtfError::NotVtf)));
  assert!(matches!(parse("*NODES 1\n1 2 3\n"), Err(VtfError::NotVtf)));
  let garbage: &[u8] = &[0xff, 0xfe, 0x00, b'\n'];
  assert!(matches!(
    BlockReader::parse_bufread(Cursor::new(garbage)),
    Err(VtfError::NotVtf)
  ));
  assert_eq!(
    VtfError::NotVtf.to_string(),
    "File is not a valid ASCII VTF file"
  );
}

#[test]
fn test_single_quad() {
  let vtf = parse(SINGLE_QUAD).unwrap();
  let nodes = &vtf.nodes[&1];
  assert_eq!((nodes.npts, nodes.dim), (4, 3));
  let elems = &vtf.elements[&2];
  assert_eq!(elems.nodes_id, 1);
  assert_eq!(elems.topologies, vec![ElementTopology::Quads]);
  assert_eq!(elems.nelems, vec![1]);
  assert_eq!(elems.nverts, vec![4]);
  assert_eq!(elems.name(), Some("Patch 1"));
  assert_eq!(elems.part_id(), Some(1));
  assert_eq!(elems.props.get("no_id"), Some(&PropValue::Absent));
  vtf.verify().unwrap();
  assert_eq!(vtf.nsteps(), 1);
  let summary = vtf.summary().unwrap();
  assert_eq!(
    summary.to_string(),
    "Step 1\n  Element block 1\n    4 nodes\n    1 elements\n"
  );
  assert!(summary.steps[0].parts[0].fields.is_empty());
}

#[test]
fn test_multi_step() {
  let vtf = parse(MULTI_STEP).unwrap();
  assert_eq!(vtf.strings[&40].value, "VTF file written by hand\nfor testing\n");
  assert_eq!(vtf.elements[&1].nelems, vec![1, 1]);
  assert_eq!(vtf.elements[&1].nverts, vec![4, 3]);
  assert_eq!(vtf.elements[&1].total_elements(), 2);
  let results = &vtf.results[&11];
  assert_eq!(results.kind, ResultKind::Element);
  assert_eq!((results.npts, results.dim), (2, 3));
  assert_eq!(vtf.results[&12].kind, ResultKind::Nodal);
  let kinds: Vec<FieldKind> = vtf.fields().map(|f| f.kind).collect();
  assert_eq!(
    kinds,
    vec![FieldKind::Displacement, FieldKind::Scalar, FieldKind::Vector]
  );
  assert_eq!(vtf.scalars[0].nsteps(), 2);
  assert_eq!(vtf.vectors[0].mapping_at(1), &[] as &[BlockId]);
  // glviewstateinfo is expected and never warned about
  assert!(vtf.warned.is_empty());
  assert_eq!(vtf.nsteps(), 3);
  assert_eq!(vtf.summary().unwrap().to_string(), MULTI_STEP_REPORT);
}

#[test]
fn test_report_is_stable() {
  let first = parse(MULTI_STEP).unwrap().summary().unwrap();
  let second = parse(MULTI_STEP).unwrap().summary().unwrap();
  assert_eq!(first, second);
  assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_fields_on_other_parts() {
  // two parts on separate nodes; the scalar is only on the second one
  let text = format!(
    "{}{}",
    BASE,
    "\
*NODES 2
0. 0.
1. 0.
0. 1.

*ELEMENTS 2
%NODES #2
%TRIANGLES
1 2 3

*RESULTS 5
%DIMENSION 1
%PER_NODE #2
1.
2.
3.

*GLVIEWGEOMETRY 1
%STEP 1
%ELEMENTS
1, 2

*GLVIEWSCALAR 1
%NAME \"Temperature\"
%STEP 2
5
"
  );
  let vtf = parse(&text).unwrap();
  assert_eq!(
    vtf.summary().unwrap().to_string(),
    "\
Step 1
  Element block 1
    4 nodes
    1 elements
  Element block 2
    3 nodes
    1 elements
Step 2
  Element block 1
    4 nodes
    1 elements
  Element block 2
    3 nodes
    1 elements
    Scalar: 'Temperature'
"
  );
}

#[test]
fn test_unknown_block_warned_once() {
  let vtf = parse_with(
    "*FOOBAR 1\nwhatever\n\n*FOOBAR 2\n\n*glviewstateinfo 3\n\n*BarBaz 4\n"
  ).unwrap();
  assert_eq!(vtf.warned.len(), 2);
  assert!(vtf.warned.contains("foobar"));
  assert!(vtf.warned.contains("barbaz"));
  vtf.verify().unwrap();
}

#[test]
fn test_block_reader() {
  let mut reader = BlockReader::new(Cursor::new(SINGLE_QUAD)).unwrap();
  let refs: Vec<BlockRef> = reader.by_ref()
    .map(|b| b.unwrap().block_ref())
    .collect();
  assert_eq!(refs, vec![
    location(BlockType::Nodes, 1),
    location(BlockType::Elements, 2),
    location(BlockType::Geometry, 1)
  ]);
  assert!(reader.warned().is_empty());
  // errors end the iteration
  let mut reader = BlockReader::new(Cursor::new(
    "*VTF-1.00\n*NODES 1\n1 2\n3\n\n*NODES 2\n1 2\n"
  )).unwrap();
  assert!(matches!(reader.next(), Some(Err(VtfError::InconsistentRows(_)))));
  assert!(reader.next().is_none());
}

#[test]
fn test_malformed_header() {
  assert!(matches!(
    parse("*VTF-1.00\n*NODES\n1 2 3\n"),
    Err(VtfError::MalformedHeader { line: 2, .. })
  ));
  assert!(matches!(
    parse("*VTF-1.00\n\n*NODES x\n1 2 3\n"),
    Err(VtfError::MalformedHeader { line: 3, .. })
  ));
}

#[test]
fn test_geometry_missing() {
  let vtf = parse(BASE).unwrap();
  assert!(matches!(vtf.verify(), Err(VtfError::GeometryMissing)));
  assert!(matches!(vtf.summary(), Err(VtfError::GeometryMissing)));
  assert_eq!(
    VtfError::GeometryMissing.to_string(),
    "Geometry block missing"
  );
}

#[test]
fn test_multiple_geometry() {
  assert!(matches!(
    parse_with(BASE_GEOMETRY),
    Err(VtfError::MultipleGeometry)
  ));
}

#[test]
fn test_duplicate_block() {
  let err = parse_with("*NODES 1\n0. 0.\n").unwrap_err();
  assert!(matches!(err, VtfError::DuplicateBlock(l) if l == location(BlockType::Nodes, 1)));
  let err = parse_with(
    "*GLVIEWSCALAR 3\n%STEP 1\n\n*GLVIEWSCALAR 3\n%STEP 1\n"
  ).unwrap_err();
  assert!(matches!(err, VtfError::DuplicateBlock(_)));
  // same id, different kind is fine
  parse_with("*GLVIEWSCALAR 3\n%STEP 1\n\n*GLVIEWVECTOR 3\n%STEP 1\n")
    .unwrap()
    .verify()
    .unwrap();
}

#[test]
fn test_elements_unknown_nodes() {
  let vtf = parse_with("*ELEMENTS 7\n%NODES #9\n%POINTS\n1\n").unwrap();
  let err = vtf.verify().unwrap_err();
  assert!(matches!(
    err,
    VtfError::UnknownTarget { location: l, target: t }
      if l == location(BlockType::Elements, 7)
        && t == location(BlockType::Nodes, 9)
  ));
  assert_eq!(err.to_string(), "Elements block 7: Unknown nodes block 9");
}

#[test]
fn test_elements_without_nodes() {
  assert!(matches!(
    parse_with("*ELEMENTS 7\n%QUADS\n1 2 3 4\n"),
    Err(VtfError::MissingProperty { property: "nodes", .. })
  ));
}

#[test]
fn test_results_size() {
  // four nodes, three rows
  let vtf = parse_with(
    "*RESULTS 2\n%DIMENSION 1\n%PER_NODE #1\n1.\n2.\n3.\n"
  ).unwrap();
  assert!(matches!(
    vtf.verify(),
    Err(VtfError::IncorrectSize { expected: 4, found: 3, .. })
  ));
  // one element, two rows
  let vtf = parse_with(
    "*RESULTS 2\n%DIMENSION 1\n%PER_ELEMENT #1\n1.\n2.\n"
  ).unwrap();
  assert!(matches!(
    vtf.verify(),
    Err(VtfError::IncorrectSize { expected: 1, found: 2, .. })
  ));
  let vtf = parse_with(
    "*RESULTS 2\n%DIMENSION 1\n%PER_ELEMENT #1\n1.\n"
  ).unwrap();
  vtf.verify().unwrap();
}

#[test]
fn test_results_unknown_target() {
  let vtf = parse_with(
    "*RESULTS 2\n%DIMENSION 1\n%PER_NODE #5\n1.\n"
  ).unwrap();
  let err = vtf.verify().unwrap_err();
  assert_eq!(err.to_string(), "Results block 2: Unknown nodes block 5");
  let vtf = parse_with(
    "*RESULTS 2\n%DIMENSION 1\n%PER_ELEMENT #5\n1.\n"
  ).unwrap();
  let err = vtf.verify().unwrap_err();
  assert_eq!(err.to_string(), "Results block 2: Unknown elements block 5");
}

#[test]
fn test_results_format() {
  assert!(matches!(
    parse_with("*RESULTS 2\n%DIMENSION 3\n%PER_NODE #1\n1.\n2.\n3.\n4.\n"),
    Err(VtfError::DimensionMismatch(_))
  ));
  assert!(matches!(
    parse_with("*RESULTS 2\n%DIMENSION 1\n1.\n2.\n3.\n4.\n"),
    Err(VtfError::UnknownResultKind(_))
  ));
  assert!(matches!(
    parse_with("*RESULTS 2\n%PER_NODE #1\n1.\n2.\n3.\n4.\n"),
    Err(VtfError::MissingProperty { property: "dimension", .. })
  ));
  assert!(matches!(
    parse_with("*RESULTS 2\n%DIMENSION 1\n%PER_NODE #1\n"),
    Err(VtfError::EmptyTable(_))
  ));
}

#[test]
fn test_geometry_unknown_elements() {
  let text = format!("{}*GLVIEWGEOMETRY 1\n%STEP 1\n%ELEMENTS\n1\n%STEP 2\n%ELEMENTS\n1, 3\n", BASE);
  let err = parse(&text).unwrap().verify().unwrap_err();
  assert_eq!(err.to_string(), "Geometry block 1: Unknown elements block 3");
}

#[test]
fn test_field_unknown_results() {
  let vtf = parse_with("*GLVIEWVECTOR 4\n%NAME \"V\"\n%STEP 1\n8\n").unwrap();
  let err = vtf.verify().unwrap_err();
  assert!(matches!(
    err,
    VtfError::UnknownTarget { location: l, .. }
      if l == location(BlockType::Vector, 4)
  ));
  assert_eq!(err.to_string(), "Vector block 4: Unknown results block 8");
}

#[test]
fn test_field_names() {
  let vtf = parse_with("*GLVIEWSCALAR 1\n%STEP 1\n").unwrap();
  assert_eq!(vtf.scalars[0].name(), UNNAMED_FIELD);
  assert!(matches!(
    parse_with("*GLVIEWSCALAR 1\n%NAME 12\n%STEP 1\n"),
    Err(VtfError::BadProperty { .. })
  ));
  assert!(matches!(
    parse_with("*GLVIEWSCALAR 1\n1\n%STEP 1\n"),
    Err(VtfError::DataBeforeStep(_))
  ));
}

#[test]
fn test_field_decoder_needs_field_type() {
  let mut lines = lines_of("%STEP 1\n1\n");
  assert!(matches!(
    <Field as BlockDecoder>::decode(location(BlockType::Nodes, 1), &mut lines),
    Err(VtfError::NotAField(_))
  ));
}

#[test]
fn test_block_types() {
  for bt in BlockType::all() {
    assert_eq!(BlockType::from_tag(bt.tag()), Some(*bt));
  }
  assert_eq!(BlockType::from_tag("glviewstateinfo"), None);
  assert_eq!(BlockType::Scalar.field_kind(), Some(FieldKind::Scalar));
  assert_eq!(BlockType::Nodes.field_kind(), None);
  assert_eq!(location(BlockType::Results, 3).to_string(), "Results block 3");
}
