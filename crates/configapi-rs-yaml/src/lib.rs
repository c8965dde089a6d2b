//! YAML support for configuration trees.
//!
//! Parsing goes through `serde_yaml`; output is written by this crate so
//! that comments, key order and collection styles can be controlled.

mod comments;
mod emit;
mod format;
mod load;

/// YAML format and its options.
pub use format::{FlowStyle, YamlFormat, YamlFormatBuilder};
