//! Test helpers shared across configapi crates.

pub mod records;
pub mod trees;

pub use records::{AppConfig, DatabaseConfig, LogLevel, sample_app_config};
pub use trees::{commented_sample_map, sample_map, string_sample_map, text_sample_map};
