//! Core model for configuration trees.
//!
//! This crate defines the node tree, comments, the file format trait and
//! the serialization layer that maps typed records to and from nodes.
//! Concrete formats live in their own crates.

pub mod comment;
mod error;
pub mod file;
pub mod node;
pub mod serialization;

/// Comment types.
pub use comment::{BlockComment, Comment, InlineComment, NodeComment, RootComment};
/// Error types for conversions and formats.
pub use error::{FormatError, SerializationError};
/// File format traits.
pub use file::{FileFormat, TextFileFormat};
/// Node tree types.
pub use node::visitor::{NodeVisitor, VisitResult};
pub use node::{ArrayNode, CommentedNode, EnumValue, ListNode, MapNode, Node};
/// Serialization entry points.
pub use serialization::{
    Field, KeyGenerator, NodeEnum, NodeValue, Record, RecordDeserializer, RecordSchema,
    RecordSerializer, Registry,
};
