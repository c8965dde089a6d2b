use configapi_rs_core::{
    FileFormat, FormatError, MapNode, Record, RecordDeserializer, RecordSerializer,
};
use log::debug;
use std::path::Path;

/// Load `path` with `format` and convert the tree into `R`.
///
/// A missing file loads as an empty map, so every field falls back to its
/// default (or to the deserializer's default record).
pub fn load_record<R, F>(
    format: &F,
    path: &Path,
    deserializer: &RecordDeserializer<R>,
) -> Result<R, FormatError>
where
    R: Record,
    F: FileFormat<Node = MapNode>,
{
    let map = format.load_path(path)?;
    debug!(
        "deserializing record (format={}, keys={})",
        format.name(),
        map.len()
    );
    Ok(deserializer.deserialize(&map)?)
}

/// Convert `record` into a tree and save it to `path` with `format`.
pub fn save_record<R, F>(
    format: &F,
    path: &Path,
    record: &R,
    serializer: &RecordSerializer<R>,
) -> Result<(), FormatError>
where
    R: Record,
    F: FileFormat<Node = MapNode>,
{
    let map = serializer.serialize(record)?;
    format.save_path(&map, path)
}
