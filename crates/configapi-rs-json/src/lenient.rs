use crate::format::{map_root, write_json};
use configapi_rs_core::file::read_to_string;
use configapi_rs_core::{FileFormat, FormatError, MapNode, Node, TextFileFormat};
use std::io::{Read, Write};

const FORMAT_NAME: &str = "json5";

/// Reads JSON5 (comments, trailing commas, unquoted keys, single quotes) and
/// writes plain JSON, which is itself valid JSON5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Json5Format {
    pretty: bool,
}

impl Json5Format {
    pub const DEFAULT: Json5Format = Json5Format { pretty: false };
    pub const PRETTY: Json5Format = Json5Format { pretty: true };
}

impl FileFormat for Json5Format {
    type Node = MapNode;

    fn name(&self) -> &'static str {
        FORMAT_NAME
    }

    fn load(&self, reader: &mut dyn Read) -> Result<MapNode, FormatError> {
        let text = read_to_string(reader, FORMAT_NAME)?;
        if text.trim().is_empty() {
            return Ok(MapNode::new());
        }
        let node: Node = json5::from_str(&text)
            .map_err(|err| FormatError::parse(FORMAT_NAME, err.to_string()))?;
        map_root(node, FORMAT_NAME)
    }

    fn save(&self, node: &MapNode, writer: &mut dyn Write) -> Result<(), FormatError> {
        write_json(node, self.pretty, writer)
    }
}

impl TextFileFormat for Json5Format {}
