use configapi_rs::core::serialization::KebabCase;
use configapi_rs::core::{RecordDeserializer, RecordSerializer};
use configapi_rs::json::JsonFormat;
use configapi_rs::yaml::YamlFormat;
use configapi_rs::{
    FormatError, SerializationError, TextFileFormat, init_logging, load_record, save_record,
};
use configapi_rs_test_utils::{AppConfig, DatabaseConfig, LogLevel, sample_app_config};
use pretty_assertions::assert_eq;
use tempfile::tempdir;

/// A record saved as YAML keeps its field comments and loads back equal.
#[test]
fn records_round_trip_through_yaml_files() {
    init_logging();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("app.yml");

    let serializer = RecordSerializer::<AppConfig>::builder()
        .key_generator(KebabCase)
        .build();
    let deserializer = RecordDeserializer::<AppConfig>::builder()
        .key_generator(KebabCase)
        .build();

    let config = sample_app_config();
    save_record(&YamlFormat::DEFAULT, &path, &config, &serializer).expect("save");

    let text = std::fs::read_to_string(&path).expect("read");
    assert!(text.starts_with("# Application name\nname: demo\nport: 9000\nlog-level: Warn\n"));
    assert!(text.contains("# Storage settings\ndatabase:\n  url: "));

    let loaded =
        load_record(&YamlFormat::COMMENT_PROCESSING, &path, &deserializer).expect("load");
    assert_eq!(loaded, config);
}

#[test]
fn records_round_trip_through_json_files() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("app.json");
    let config = sample_app_config();

    save_record(&JsonFormat::PRETTY, &path, &config, &RecordSerializer::new()).expect("save");
    let loaded: AppConfig =
        load_record(&JsonFormat::DEFAULT, &path, &RecordDeserializer::new()).expect("load");
    assert_eq!(loaded, config);
}

/// A missing file yields the defaults of the deserializer's default record.
#[test]
fn missing_file_uses_default_record() {
    let dir = tempdir().expect("tempdir");
    let fallback = AppConfig {
        name: "fallback".to_string(),
        database: DatabaseConfig {
            url: "sqlite://fallback.db".to_string(),
            pool_size: 2,
        },
        ..AppConfig::default()
    };
    let deserializer = RecordDeserializer::<AppConfig>::builder()
        .default_record(fallback.clone())
        .build();

    let loaded = load_record(&YamlFormat::DEFAULT, &dir.path().join("absent.yml"), &deserializer)
        .expect("load");
    assert_eq!(loaded, fallback);
}

#[test]
fn partial_files_fill_in_field_defaults() {
    let map = YamlFormat::DEFAULT
        .load_str("name: partial\ndatabase:\n  url: sqlite://x.db\n")
        .expect("parse");
    let loaded = RecordDeserializer::<AppConfig>::new()
        .deserialize(&map)
        .expect("deserialize");

    assert_eq!(loaded.name, "partial");
    assert_eq!(loaded.port, 8080);
    assert_eq!(loaded.log_level, LogLevel::Info);
    assert_eq!(loaded.motd, None);
    assert_eq!(loaded.database.pool_size, 4);
}

#[test]
fn missing_required_keys_surface_as_format_errors() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.yml");
    std::fs::write(&path, "port: 1\n").expect("write");

    let error = load_record(&YamlFormat::DEFAULT, &path, &RecordDeserializer::<AppConfig>::new())
        .expect_err("missing name");
    assert!(matches!(
        error,
        FormatError::Serialization(SerializationError::MissingKey { ref key }) if key == "name"
    ));
}
