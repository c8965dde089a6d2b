use configapi_rs_core::{ArrayNode, BlockComment, Comment, InlineComment, MapNode, Node};

/// Every node kind a lossless format must keep, comments and enums aside.
pub fn sample_map() -> MapNode {
    let mut map = MapNode::new();
    map.set("null", Node::Null);
    map.set("bool", true);
    map.set("byte", i8::MIN);
    map.set("short", i16::MAX);
    map.set("int", -42);
    map.set("long", i64::MAX);
    map.set("float", 1.25f32);
    map.set("double", -0.5f64);
    map.set("char", 'x');
    map.set("string", "héllo wörld");
    map.set("empty", "");

    let list = map.create_list("mixed");
    list.add(1);
    list.add("two");
    list.add(Node::Null);
    list.add_map().set("nested", false);
    list.add_list().add_all([1.5f64, 2.5]);

    map.create_list("strings").add_all(["a", "b", "c"]);
    map.create_list("empty-list");

    let nested = map.create_map("nested");
    nested.set("key", "value");
    nested.create_map("deeper").set("level", 3);
    map.create_map("empty-map");

    let arrays = map.create_map("arrays");
    arrays.set("bools", ArrayNode::Bool(vec![true, false]));
    arrays.set("bytes", ArrayNode::Byte(vec![i8::MIN, 0, i8::MAX]));
    arrays.set("chars", ArrayNode::Char(vec!['a', 'ß']));
    arrays.set("shorts", ArrayNode::Short(vec![i16::MIN, i16::MAX]));
    arrays.set("ints", ArrayNode::Int(vec![i32::MIN, 0, i32::MAX]));
    arrays.set("longs", ArrayNode::Long(vec![i64::MIN, i64::MAX]));
    arrays.set("floats", ArrayNode::Float(vec![0.5, -1.0]));
    arrays.set("doubles", ArrayNode::Double(vec![f64::MIN, f64::MAX]));
    arrays.set("no-ints", ArrayNode::Int(Vec::new()));
    map
}

/// Shapes that text formats read back unchanged: integers that fit in 32
/// bits load as `Int`, larger ones as `Long`, and every float as `Double`.
pub fn text_sample_map() -> MapNode {
    let mut map = MapNode::new();
    map.set("null", Node::Null);
    map.set("enabled", true);
    map.set("count", 42);
    map.set("negative", -7);
    map.set("big", 9_000_000_000i64);
    map.set("ratio", 0.75f64);
    map.set("name", "configapi");
    map.set("quoted", "needs: quotes, # really");
    map.set("numeric-string", "123");
    map.set("multiline", "first\nsecond");
    map.set("empty", "");

    let servers = map.create_list("servers");
    let first = servers.add_map();
    first.set("host", "alpha");
    first.set("port", 8080);
    let second = servers.add_map();
    second.set("host", "beta");
    second.set("port", 8081);

    let matrix = map.create_list("matrix");
    matrix.add_list().add_all([1, 2]);
    matrix.add_list().add_all([3, 4]);

    map.create_list("tags").add_all(["a", "b"]);
    map.create_list("no-tags");

    let database = map.create_map("database");
    database.set("url", "sqlite://data.db");
    database.create_map("pool").set("size", 4);
    map.create_map("extra");
    map
}

/// Flat string entries, the only shape `.properties` files hold.
pub fn string_sample_map() -> MapNode {
    [
        ("a", "b"),
        ("1", "2=3"),
        ("1=2", "3"),
        ("empty", ""),
        ("", "empty"),
        ("spaced key", " leading space"),
        ("colon:key", "tab\tand\nnewline"),
        ("unicode", "grüße ☃"),
        ("#hash", "!bang"),
    ]
    .into_iter()
    .collect()
}

/// A tree with root, block and inline comments in every container kind.
pub fn commented_sample_map() -> MapNode {
    let mut map = MapNode::new();
    map.set(
        "name",
        Node::from("demo").with_comment(Comment::node(
            Some(BlockComment::new(" Display name", 0)),
            Some(InlineComment::new(" shown in the title")),
        )),
    );
    map.set(
        "port",
        Node::from(8080).with_comment(Some(Comment::Block(BlockComment::new(
            " Listen port\n\n Change with care",
            1,
        )))),
    );

    let mut database = MapNode::new();
    database.set(
        "url",
        Node::from("sqlite://data.db").with_comment(Some(Comment::inline(" local"))),
    );
    map.set(
        "database",
        Node::Map(database).with_comment(Some(Comment::block(" Storage"))),
    );

    let servers = map.create_list("servers");
    servers.add(Node::from("alpha").with_comment(Some(Comment::block(" primary"))));
    servers.add(Node::from("beta").with_comment(Some(Comment::inline(" backup"))));

    map.set_comment(Some(Comment::root(
        Some(BlockComment::new(" Demo configuration", 0)),
        Some(BlockComment::new(" end", 1)),
    )));
    map
}
