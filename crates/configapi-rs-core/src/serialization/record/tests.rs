use super::*;
use crate::comment::Comment;
use crate::node::ListNode;
use crate::serialization::{KebabCase, SnakeCase};
use crate::{node_enum, node_record};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Difficulty {
    #[default]
    Easy,
    Hard,
}

node_enum!(Difficulty { Easy, Hard });

#[derive(Debug, Clone, PartialEq, Default)]
struct Database {
    url: String,
    pool_size: u32,
}

impl Record for Database {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field(Field::new("url", |d: &Database| &d.url, |d, v| d.url = v))
            .field(
                Field::new("pool_size", |d: &Database| &d.pool_size, |d, v| d.pool_size = v)
                    .default_value(4),
            )
    }
}

node_record!(Database);

#[derive(Debug, Clone, PartialEq, Default)]
struct ServerConfig {
    name: String,
    max_players: i32,
    difficulty: Difficulty,
    motd: Option<String>,
    whitelist: Vec<String>,
    ratios: BTreeMap<String, f64>,
    database: Database,
}

impl Record for ServerConfig {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field(
                Field::new("name", |c: &ServerConfig| &c.name, |c, v| c.name = v)
                    .comment("Server name"),
            )
            .field(
                Field::new("max_players", |c: &ServerConfig| &c.max_players, |c, v| {
                    c.max_players = v
                })
                .default_value(20),
            )
            .field(
                Field::new("difficulty", |c: &ServerConfig| &c.difficulty, |c, v| {
                    c.difficulty = v
                })
                .default_value(Difficulty::Easy),
            )
            .field(Field::new("motd", |c: &ServerConfig| &c.motd, |c, v| c.motd = v))
            .field(
                Field::new("whitelist", |c: &ServerConfig| &c.whitelist, |c, v| {
                    c.whitelist = v
                })
                .default_value(Vec::new()),
            )
            .field(
                Field::new("ratios", |c: &ServerConfig| &c.ratios, |c, v| c.ratios = v)
                    .default_value(BTreeMap::new()),
            )
            .field(
                Field::new("database", |c: &ServerConfig| &c.database, |c, v| {
                    c.database = v
                })
                .comment("Storage settings"),
            )
    }
}

fn populated() -> ServerConfig {
    ServerConfig {
        name: "lobby".to_string(),
        max_players: 64,
        difficulty: Difficulty::Hard,
        motd: Some("welcome".to_string()),
        whitelist: vec!["alice".to_string(), "bob".to_string()],
        ratios: BTreeMap::from([("drops".to_string(), 1.5), ("xp".to_string(), 2.0)]),
        database: Database {
            url: "sqlite://data.db".to_string(),
            pool_size: 8,
        },
    }
}

/// A fully populated record survives serialize then deserialize.
#[test]
fn populated_record_round_trips() {
    let serializer = RecordSerializer::<ServerConfig>::builder()
        .key_generator(KebabCase)
        .build();
    let deserializer = RecordDeserializer::<ServerConfig>::builder()
        .key_generator(KebabCase)
        .build();

    let map = serializer.serialize(&populated()).expect("serialize");
    assert_eq!(
        map.keys().collect::<Vec<_>>(),
        vec![
            "name",
            "max-players",
            "difficulty",
            "motd",
            "whitelist",
            "ratios",
            "database"
        ]
    );
    assert_eq!(
        map.get_map("database")
            .map(|db| db.keys().cloned().collect::<Vec<_>>()),
        Some(vec!["url".to_string(), "pool-size".to_string()])
    );

    let restored = deserializer.deserialize(&map).expect("deserialize");
    assert_eq!(restored, populated());
}

/// Comments land on scalars through a wrapper and on maps directly.
#[test]
fn comments_are_attached_to_written_nodes() {
    let map = RecordSerializer::<ServerConfig>::new()
        .serialize(&populated())
        .expect("serialize");

    assert_eq!(map.get("name").comment(), Some(&Comment::simple("Server name")));
    assert_eq!(map.get("name").as_str(), Some("lobby"));
    assert_eq!(
        map.get_map("database").and_then(MapNode::comment),
        Some(&Comment::simple("Storage settings"))
    );
    assert_eq!(map.get("max_players").comment(), None);
}

/// `None` values are not written; absent `Option` keys read back as `None`.
#[test]
fn none_values_are_skipped() {
    let config = ServerConfig {
        motd: None,
        ..populated()
    };
    let map = RecordSerializer::new().serialize(&config).expect("serialize");
    assert!(!map.contains_key("motd"));

    let restored = RecordDeserializer::<ServerConfig>::new()
        .deserialize(&map)
        .expect("deserialize");
    assert_eq!(restored.motd, None);
}

/// Missing keys with declared defaults fall back silently.
#[test]
fn missing_optional_keys_use_defaults() {
    let mut source = MapNode::new();
    source.set("name", "minimal");
    source.get_or_create_map("database").set("url", "mem://");

    let config = RecordDeserializer::<ServerConfig>::new()
        .deserialize(&source)
        .expect("deserialize");
    assert_eq!(config.max_players, 20);
    assert_eq!(config.difficulty, Difficulty::Easy);
    assert_eq!(config.whitelist, Vec::<String>::new());
    assert_eq!(config.database.pool_size, 4);
}

/// Missing keys without defaults are errors, reported with the nested path.
#[test]
fn missing_required_keys_fail() {
    let error = RecordDeserializer::<ServerConfig>::new()
        .deserialize(&MapNode::new())
        .expect_err("name is required");
    assert!(matches!(
        error,
        SerializationError::MissingKey { ref key } if key == "name"
    ));

    let mut source = MapNode::new();
    source.set("name", "x");
    source.create_map("database");
    let error = RecordDeserializer::<ServerConfig>::new()
        .deserialize(&source)
        .expect_err("database.url is required");
    match error {
        SerializationError::Field { key, source } => {
            assert_eq!(key, "database");
            assert!(matches!(*source, SerializationError::MissingKey { ref key } if key == "url"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Values that fail to convert fall back to the default, or fail without one.
#[test]
fn invalid_values_fall_back_only_with_defaults() {
    let mut source = MapNode::new();
    source.set("name", "x");
    source.set("max_players", "many");
    source.set("difficulty", "impossible");
    source.get_or_create_map("database").set("url", "mem://");

    let config = RecordDeserializer::<ServerConfig>::new()
        .deserialize(&source)
        .expect("defaults absorb bad values");
    assert_eq!(config.max_players, 20);
    assert_eq!(config.difficulty, Difficulty::Easy);

    source.set("name", ListNode::new());
    let error = RecordDeserializer::<ServerConfig>::new()
        .deserialize(&source)
        .expect_err("name has no default");
    assert!(error.to_string().contains("name"));
}

/// A default record makes every field optional.
#[test]
fn default_record_fills_missing_keys() {
    let mut source = MapNode::new();
    source.set("max_players", 5);
    source.get_or_create_map("database").set("pool_size", 16);

    let config = RecordDeserializer::builder()
        .default_record(populated())
        .build()
        .deserialize(&source)
        .expect("deserialize");
    assert_eq!(
        config,
        ServerConfig {
            max_players: 5,
            database: Database {
                pool_size: 16,
                ..populated().database
            },
            ..populated()
        }
    );
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Credentials {
    user: String,
    token: String,
}

impl Record for Credentials {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field(Field::new("user", |c: &Credentials| &c.user, |c, v| c.user = v))
            .field(Field::new("token", |c: &Credentials| &c.token, |c, v| c.token = v))
    }
}

node_record!(Credentials);

#[derive(Debug, Clone, PartialEq, Default)]
struct Endpoint {
    url: String,
    credentials: Credentials,
    retry_count: u8,
}

impl Record for Endpoint {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field(
                Field::new("url", |e: &Endpoint| &e.url, |e, v| e.url = v).key("endpoint-url"),
            )
            .field(
                Field::new("credentials", |e: &Endpoint| &e.credentials, |e, v| {
                    e.credentials = v
                })
                .inline(),
            )
            .field(Field::new("retry_count", |e: &Endpoint| &e.retry_count, |e, v| {
                e.retry_count = v
            }))
    }
}

/// Inline fields share the parent map; explicit keys bypass the generator.
#[test]
fn inline_fields_and_explicit_keys() {
    let endpoint = Endpoint {
        url: "https://example.com".to_string(),
        credentials: Credentials {
            user: "admin".to_string(),
            token: "secret".to_string(),
        },
        retry_count: 3,
    };

    let map = RecordSerializer::builder()
        .key_generator(SnakeCase)
        .build()
        .serialize(&endpoint)
        .expect("serialize");
    assert_eq!(
        map.keys().collect::<Vec<_>>(),
        vec!["endpoint-url", "user", "token", "retry_count"]
    );

    let restored = RecordDeserializer::<Endpoint>::builder()
        .key_generator(SnakeCase)
        .build()
        .deserialize(&map)
        .expect("deserialize");
    assert_eq!(restored, endpoint);
}

#[derive(Debug, Clone, PartialEq, Default)]
struct Duration {
    seconds: u64,
}

impl NodeValue for Duration {}

#[derive(Debug, Clone, PartialEq, Default)]
struct Timeouts {
    connect: Duration,
    idle: Duration,
}

impl Record for Timeouts {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field(Field::new("connect", |t: &Timeouts| &t.connect, |t, v| t.connect = v))
            .field(
                Field::new("idle", |t: &Timeouts| &t.idle, |t, v| t.idle = v)
                    .default_value(Duration { seconds: 60 }),
            )
    }
}

fn duration_to_node(duration: &Duration) -> Result<Node, SerializationError> {
    Ok(Node::from(format!("{}s", duration.seconds)))
}

fn duration_from_node(node: &Node) -> Result<Duration, SerializationError> {
    let text = node
        .as_str()
        .ok_or(SerializationError::mismatch("string", node.kind()))?;
    text.trim_end_matches('s')
        .parse()
        .map(|seconds| Duration { seconds })
        .map_err(|_| SerializationError::InvalidValue(text.to_string()))
}

/// Types without a built-in conversion go through the registry.
#[test]
fn registry_converts_custom_field_types() {
    let timeouts = Timeouts {
        connect: Duration { seconds: 5 },
        idle: Duration { seconds: 30 },
    };

    let error = RecordSerializer::new()
        .serialize(&timeouts)
        .expect_err("no serializer registered");
    assert!(error.to_string().contains("no serializer found"));

    let map = RecordSerializer::builder()
        .add_serializer(duration_to_node)
        .build()
        .serialize(&timeouts)
        .expect("serialize");
    assert_eq!(map.get_string("connect", ""), "5s");

    let registry = Registry::new();
    registry.register_deserializer(duration_from_node);
    let restored = RecordDeserializer::<Timeouts>::builder()
        .registry(&registry)
        .build()
        .deserialize(&map)
        .expect("deserialize");
    assert_eq!(restored, timeouts);

    let mut partial = MapNode::new();
    partial.set("connect", "1s");
    let restored = RecordDeserializer::<Timeouts>::new()
        .deserialize(&partial)
        .expect_err("no deserializer registered for a required field");
    assert!(restored.to_string().contains("no deserializer found"));
}

/// Record serializers register like any other serializer.
#[test]
fn record_serializers_are_registry_entries() {
    let registry = Registry::new();
    registry.register::<Database>(
        RecordSerializer::new(),
        RecordDeserializer::new(),
    );
    let ctx = Context::new(&registry, &AsIs);

    let database = Database {
        url: "x".to_string(),
        pool_size: 2,
    };
    let node = ctx.serialize(&database).expect("serialize");
    assert_eq!(node.as_map().map(MapNode::len), Some(2));
    assert_eq!(ctx.deserialize::<Database>(&node).expect("deserialize"), database);
    assert_eq!(
        RecordSerializer::<Database>::new()
            .serialize_default()
            .expect("default")
            .get_string("url", "unset"),
        ""
    );
}
