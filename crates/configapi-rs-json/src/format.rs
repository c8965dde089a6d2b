use configapi_rs_core::file::read_to_string;
use configapi_rs_core::{FileFormat, FormatError, ListNode, MapNode, Node, TextFileFormat};
use log::trace;
use serde::Serialize;
use std::io::{self, Read, Write};

pub(crate) const FORMAT_NAME: &str = "json";

/// JSON document whose root is an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonFormat {
    pretty: bool,
}

impl JsonFormat {
    /// Compact output on a single line.
    pub const DEFAULT: JsonFormat = JsonFormat { pretty: false };
    /// Two-space indented output.
    pub const PRETTY: JsonFormat = JsonFormat { pretty: true };

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl FileFormat for JsonFormat {
    type Node = MapNode;

    fn name(&self) -> &'static str {
        FORMAT_NAME
    }

    fn load(&self, reader: &mut dyn Read) -> Result<MapNode, FormatError> {
        let text = read_to_string(reader, FORMAT_NAME)?;
        if text.trim().is_empty() {
            return Ok(MapNode::new());
        }
        let node: Node = serde_json::from_str(&text).map_err(json_error)?;
        map_root(node, FORMAT_NAME)
    }

    fn save(&self, node: &MapNode, writer: &mut dyn Write) -> Result<(), FormatError> {
        write_json(node, self.pretty, writer)
    }
}

impl TextFileFormat for JsonFormat {}

/// JSON document whose root is an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonArrayFormat {
    pretty: bool,
}

impl JsonArrayFormat {
    pub const DEFAULT: JsonArrayFormat = JsonArrayFormat { pretty: false };
    pub const PRETTY: JsonArrayFormat = JsonArrayFormat { pretty: true };

    pub fn is_pretty(&self) -> bool {
        self.pretty
    }
}

impl FileFormat for JsonArrayFormat {
    type Node = ListNode;

    fn name(&self) -> &'static str {
        FORMAT_NAME
    }

    fn load(&self, reader: &mut dyn Read) -> Result<ListNode, FormatError> {
        let text = read_to_string(reader, FORMAT_NAME)?;
        if text.trim().is_empty() {
            return Ok(ListNode::new());
        }
        let node: Node = serde_json::from_str(&text).map_err(json_error)?;
        match node {
            Node::Null => Ok(ListNode::new()),
            Node::List(list) => Ok(list),
            other => Err(FormatError::UnsupportedRoot {
                format: FORMAT_NAME,
                expected: "list",
                found: other.kind(),
            }),
        }
    }

    fn save(&self, node: &ListNode, writer: &mut dyn Write) -> Result<(), FormatError> {
        write_json(node, self.pretty, writer)
    }
}

impl TextFileFormat for JsonArrayFormat {}

pub(crate) fn map_root(node: Node, format: &'static str) -> Result<MapNode, FormatError> {
    match node {
        Node::Null => Ok(MapNode::new()),
        Node::Map(map) => Ok(map),
        other => Err(FormatError::UnsupportedRoot {
            format,
            expected: "map",
            found: other.kind(),
        }),
    }
}

pub(crate) fn write_json<T: Serialize>(
    value: &T,
    pretty: bool,
    writer: &mut dyn Write,
) -> Result<(), FormatError> {
    trace!("writing json (pretty={pretty})");
    let result = if pretty {
        serde_json::to_writer_pretty(writer, value)
    } else {
        serde_json::to_writer(writer, value)
    };
    result.map_err(json_error)
}

fn json_error(err: serde_json::Error) -> FormatError {
    if err.is_io() {
        FormatError::Io(io::Error::from(err))
    } else {
        FormatError::parse(FORMAT_NAME, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn numbers_load_by_shape() {
        let map = JsonFormat::DEFAULT
            .load_str(r#"{"int":1,"long":5000000000,"double":1.0,"exp":1e3,"neg":-3}"#)
            .expect("load");
        assert_eq!(map.get("int"), &Node::Int(1));
        assert_eq!(map.get("long"), &Node::Long(5_000_000_000));
        assert_eq!(map.get("double"), &Node::Double(1.0));
        assert_eq!(map.get("exp"), &Node::Double(1000.0));
        assert_eq!(map.get("neg"), &Node::Int(-3));
    }

    #[test]
    fn array_root_must_be_a_list() {
        let error = JsonArrayFormat::DEFAULT
            .load_str(r#"{"a":1}"#)
            .expect_err("object root");
        assert!(matches!(
            error,
            FormatError::UnsupportedRoot {
                expected: "list",
                found: "map",
                ..
            }
        ));
    }
}
