use configapi_rs_binary::BinaryFormat;
use configapi_rs_core::{
    ArrayNode, Comment, EnumValue, FileFormat, FormatError, ListNode, MapNode, Node,
};
use configapi_rs_test_utils::sample_map;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const LENGTHS: [usize; 10] = [0, 1, 2, 3, 4, 5, 255, 256, 65535, 65536];

fn round_trip(node: &Node) -> Node {
    let mut bytes = Vec::new();
    BinaryFormat::DEFAULT.save(node, &mut bytes).expect("save");
    BinaryFormat::DEFAULT.load(&mut bytes.as_slice()).expect("load")
}

/// Asserts the node and its commented form both read back as the bare node.
fn assert_round_trips(node: Node) {
    assert_eq!(round_trip(&node), node);
    let commented = node.clone().with_comment(Some(Comment::from("dropped")));
    assert_eq!(round_trip(&commented), node.into_uncommented());
}

#[test]
fn scalar_extremes_round_trip() {
    let mut nodes = vec![Node::Null, Node::Bool(true), Node::Bool(false)];
    nodes.extend([i8::MIN, 0, i8::MAX].map(Node::Byte));
    nodes.extend(['\0', 'a', '\u{ffff}'].map(Node::Char));
    nodes.extend([f64::MIN_POSITIVE, 0.0, f64::MAX].map(Node::Double));
    nodes.extend([f32::MIN_POSITIVE, 0.0, f32::MAX].map(Node::Float));
    nodes.extend([i32::MIN, 0, i32::MAX].map(Node::Int));
    nodes.extend([i64::MIN, 0, i64::MAX].map(Node::Long));
    nodes.extend([i16::MIN, 0, i16::MAX].map(Node::Short));
    nodes.extend(["a", "", "あ", "a\na"].map(Node::from));

    for node in nodes {
        assert_round_trips(node);
    }
}

/// Each length crosses the inline, `u8`, `u16` and `i32` length encodings.
#[test]
fn collections_of_every_length_round_trip() {
    for length in LENGTHS {
        assert_round_trips(Node::List((0..length).map(|_| true).collect()));
        assert_round_trips(Node::List((0..length).map(|index| index.to_string()).collect()));
        assert_round_trips(ArrayNode::Bool(vec![false; length]).into());
        assert_round_trips(ArrayNode::Byte(vec![0; length]).into());
        assert_round_trips(ArrayNode::Char(vec!['\0'; length]).into());
        assert_round_trips(ArrayNode::Double(vec![0.0; length]).into());
        assert_round_trips(ArrayNode::Float(vec![0.0; length]).into());
        assert_round_trips(ArrayNode::Int(vec![0; length]).into());
        assert_round_trips(ArrayNode::Long(vec![0; length]).into());
        assert_round_trips(ArrayNode::Short(vec![0; length]).into());

        let map: MapNode = (0..length)
            .map(|index| (index.to_string(), Node::Int(index as i32)))
            .collect();
        assert_round_trips(Node::Map(map));
    }
}

#[test]
fn sample_tree_round_trips() {
    let map = Node::Map(sample_map());
    assert_eq!(round_trip(&map), map);
}

#[test]
fn enums_are_written_as_names() {
    let mut map = MapNode::new();
    map.set("mode", EnumValue::new("Mode", "Fast"));
    let mut list = ListNode::new();
    list.add(EnumValue::new("Mode", "Slow"));
    map.set("modes", list);

    let loaded = round_trip(&Node::Map(map));
    let loaded = loaded.as_map().expect("map");
    assert_eq!(loaded.get("mode"), &Node::from("Fast"));
    assert_eq!(
        loaded.get_list("modes").and_then(|modes| modes.get(0)),
        Some(&Node::from("Slow"))
    );
}

#[test]
fn empty_and_trailing_input_is_rejected() {
    assert!(matches!(
        BinaryFormat::DEFAULT.from_bytes(&[]).expect_err("empty"),
        FormatError::Parse { format: "binary", .. }
    ));
    assert!(matches!(
        BinaryFormat::DEFAULT.from_bytes(&[0x00, 0x00]).expect_err("trailing"),
        FormatError::Parse { .. }
    ));
    assert!(matches!(
        BinaryFormat::DEFAULT.from_bytes(&[0x0a]).expect_err("unknown type"),
        FormatError::Parse { .. }
    ));
}

#[test]
fn oversized_strings_are_unsupported() {
    let node = Node::from("x".repeat(65536));
    assert!(matches!(
        BinaryFormat::DEFAULT.to_bytes(&node).expect_err("too long"),
        FormatError::UnsupportedNode { format: "binary", .. }
    ));
}

#[test]
fn files_round_trip_through_paths() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("data").join("tree.dat");

    assert_eq!(BinaryFormat::DEFAULT.load_path(&path).expect("missing"), Node::Null);

    let node = Node::Map(sample_map());
    BinaryFormat::DEFAULT.save_path(&node, &path).expect("save");
    assert_eq!(BinaryFormat::DEFAULT.load_path(&path).expect("load"), node);
}
