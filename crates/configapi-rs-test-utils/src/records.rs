use configapi_rs_core::{Field, Record, RecordSchema, node_enum, node_record};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
}

node_enum!(LogLevel { Debug, Info, Warn });

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

impl Record for DatabaseConfig {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field(Field::new("url", |d: &DatabaseConfig| &d.url, |d, v| d.url = v))
            .field(
                Field::new("pool_size", |d: &DatabaseConfig| &d.pool_size, |d, v| {
                    d.pool_size = v
                })
                .default_value(4),
            )
    }
}

node_record!(DatabaseConfig);

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppConfig {
    pub name: String,
    pub port: u16,
    pub log_level: LogLevel,
    pub motd: Option<String>,
    pub tags: Vec<String>,
    pub limits: BTreeMap<String, i64>,
    pub database: DatabaseConfig,
}

impl Record for AppConfig {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::new()
            .field(
                Field::new("name", |c: &AppConfig| &c.name, |c, v| c.name = v)
                    .comment("Application name"),
            )
            .field(
                Field::new("port", |c: &AppConfig| &c.port, |c, v| c.port = v)
                    .default_value(8080),
            )
            .field(
                Field::new("log_level", |c: &AppConfig| &c.log_level, |c, v| c.log_level = v)
                    .default_value(LogLevel::Info),
            )
            .field(Field::new("motd", |c: &AppConfig| &c.motd, |c, v| c.motd = v))
            .field(
                Field::new("tags", |c: &AppConfig| &c.tags, |c, v| c.tags = v)
                    .default_value(Vec::new()),
            )
            .field(
                Field::new("limits", |c: &AppConfig| &c.limits, |c, v| c.limits = v)
                    .default_value(BTreeMap::new()),
            )
            .field(
                Field::new("database", |c: &AppConfig| &c.database, |c, v| c.database = v)
                    .comment("Storage settings"),
            )
    }
}

/// An [`AppConfig`] with every field set.
pub fn sample_app_config() -> AppConfig {
    AppConfig {
        name: "demo".to_string(),
        port: 9000,
        log_level: LogLevel::Warn,
        motd: Some("welcome".to_string()),
        tags: vec!["blue".to_string(), "green".to_string()],
        limits: BTreeMap::from([
            ("connections".to_string(), 128),
            ("requests".to_string(), 10_000),
        ]),
        database: DatabaseConfig {
            url: "postgres://localhost/demo".to_string(),
            pool_size: 16,
        },
    }
}
