//! Public surface for configapi.
//!
//! This crate re-exports the node model and every format crate, and adds
//! helpers that load and save typed records through a file format.

mod records;

/// Re-export for convenience.
pub use configapi_rs_binary as binary;
pub use configapi_rs_core as core;
/// Re-export for convenience.
pub use configapi_rs_json as json;
/// Re-export for convenience.
pub use configapi_rs_properties as properties;
/// Re-export for convenience.
pub use configapi_rs_yaml as yaml;

pub use configapi_rs_core::{
    Comment, FileFormat, FormatError, ListNode, MapNode, Node, SerializationError, TextFileFormat,
};
/// Typed record loading and saving.
pub use records::{load_record, save_record};

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
///
/// This is a no-op if the feature is not enabled. Binaries are still expected
/// to call this early in startup to ensure log output is wired up.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
