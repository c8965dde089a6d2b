use configapi_rs_core::{
    BlockComment, Comment, FileFormat, FormatError, InlineComment, MapNode, Node, TextFileFormat,
};
use configapi_rs_test_utils::{commented_sample_map, text_sample_map};
use configapi_rs_yaml::{FlowStyle, YamlFormat};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

const COMMENTED: &str = "# header\n\n# key\n# block\n# comment\ntest: true # inline\n# footer\n";

/// Header, block, inline and footer comments survive load then save.
#[test]
fn comments_round_trip_verbatim() {
    let map = YamlFormat::COMMENT_PROCESSING
        .load_str(COMMENTED)
        .expect("load");

    let mut expected = MapNode::new();
    expected.set(
        "test",
        Node::Bool(true).with_comment(Comment::node(
            Some(BlockComment::new(" key\n block\n comment", 0)),
            Some(InlineComment::new(" inline")),
        )),
    );
    expected.set_comment(Some(Comment::root(
        Some(BlockComment::new(" header", 0)),
        Some(BlockComment::new(" footer", 0)),
    )));
    assert_eq!(map, expected);

    assert_eq!(
        YamlFormat::COMMENT_PROCESSING
            .save_to_string(&map)
            .expect("save"),
        COMMENTED
    );
}

#[test]
fn default_format_ignores_comments_on_load() {
    let map = YamlFormat::DEFAULT.load_str(COMMENTED).expect("load");
    let mut expected = MapNode::new();
    expected.set("test", true);
    assert_eq!(map, expected);
}

#[test]
fn inline_comment_on_value() {
    let map = YamlFormat::COMMENT_PROCESSING
        .load_str("key: value # test\n")
        .expect("load");
    assert_eq!(
        map.get_node("key"),
        Some(&Node::from("value").with_comment(Some(Comment::inline(" test"))))
    );
    assert_eq!(map.get_string("key", ""), "value");
}

/// Simple comments are written with a space after the marker.
#[test]
fn simple_comments_are_padded() {
    let mut map = MapNode::new();
    map.set("port", Node::from(80).with_comment(Some(Comment::from("Listen port"))));
    map.set(
        "host",
        Node::from("localhost").with_comment(Some(Comment::simple_with_kind(
            "where",
            configapi_rs_core::comment::INLINE_KIND,
        ))),
    );
    assert_eq!(
        YamlFormat::DEFAULT.save_to_string(&map).expect("save"),
        "# Listen port\nport: 80\nhost: localhost # where\n"
    );
}

#[test]
fn sample_tree_round_trips() {
    let map = text_sample_map();
    let text = YamlFormat::DEFAULT.save_to_string(&map).expect("save");
    assert_eq!(YamlFormat::DEFAULT.load_str(&text).expect("load"), map);
}

#[test]
fn commented_tree_round_trips() {
    let map = commented_sample_map();
    let text = YamlFormat::COMMENT_PROCESSING
        .save_to_string(&map)
        .expect("save");
    assert_eq!(
        YamlFormat::COMMENT_PROCESSING.load_str(&text).expect("load"),
        map
    );
}

#[test]
fn key_order_is_preserved() {
    let map = YamlFormat::DEFAULT
        .load_str("zeta: 1\nalpha: 2\nmid: 3\n")
        .expect("load");
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    assert_eq!(
        YamlFormat::DEFAULT.save_to_string(&map).expect("save"),
        "zeta: 1\nalpha: 2\nmid: 3\n"
    );
}

#[test]
fn nested_maps_use_configured_indent() {
    let mut map = MapNode::new();
    map.create_map("outer").create_map("inner").set("leaf", 1);
    let format = YamlFormat::builder().indent(4).build();
    assert_eq!(
        format.save_to_string(&map).expect("save"),
        "outer:\n    inner:\n        leaf: 1\n"
    );
}

#[test]
fn collection_styles_are_configurable() {
    let mut map = MapNode::new();
    map.create_list("list").add_all([1, 2]);
    map.create_map("map").set("a", "b");
    let format = YamlFormat::builder()
        .list_style(FlowStyle::Flow)
        .map_style(FlowStyle::Flow)
        .build();
    assert_eq!(
        format.save_to_string(&map).expect("save"),
        "list: [1, 2]\nmap: {a: b}\n"
    );
}

#[test]
fn empty_input_loads_as_empty_map() {
    assert!(YamlFormat::DEFAULT.load_str("").expect("load").is_empty());
    assert_eq!(
        YamlFormat::DEFAULT
            .save_to_string(&MapNode::new())
            .expect("save"),
        "{}\n"
    );
}

#[test]
fn scalar_root_is_rejected() {
    let error = YamlFormat::DEFAULT.load_str("just text").expect_err("scalar root");
    assert!(matches!(
        error,
        FormatError::UnsupportedRoot {
            format: "yaml",
            found: "string",
            ..
        }
    ));
}

#[test]
fn malformed_input_is_a_parse_error() {
    let error = YamlFormat::DEFAULT
        .load_str("key: [unclosed\n")
        .expect_err("malformed");
    assert!(matches!(error, FormatError::Parse { format: "yaml", .. }));
}

#[test]
fn files_round_trip_through_paths() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config").join("app.yml");

    assert!(YamlFormat::DEFAULT.load_path(&path).expect("missing").is_empty());

    let map = text_sample_map();
    YamlFormat::DEFAULT.save_path(&map, &path).expect("save");
    assert_eq!(YamlFormat::DEFAULT.load_path(&path).expect("load"), map);
}

#[test]
fn merge_like_key_round_trips() {
    let mut map = MapNode::new();
    map.create_map("<<").set("a", 1);
    let text = YamlFormat::DEFAULT.save_to_string(&map).expect("save");
    assert_eq!(text, "\"<<\":\n  a: 1\n");
    assert_eq!(YamlFormat::DEFAULT.load_str(&text).expect("load"), map);
}
