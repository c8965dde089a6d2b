//! Compact binary encoding of configuration trees.
//!
//! Any node can be the root. Comments are dropped and enums are written as
//! their names, everything else reads back exactly as written.

mod codec;
mod format;
mod mutf8;

/// The binary format.
pub use format::BinaryFormat;
