//! `.properties` support for flat configuration trees.
//!
//! Every value loads as a string. Saving accepts any scalar and writes its
//! text form.

mod escape;
mod format;

/// The `.properties` format.
pub use format::PropertiesFormat;
