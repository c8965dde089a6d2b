//! JSON and JSON5 support for configuration trees.

mod format;
mod lenient;

/// Strict JSON formats with a map or list root.
pub use format::{JsonArrayFormat, JsonFormat};
/// JSON5 input, JSON output.
pub use lenient::Json5Format;
