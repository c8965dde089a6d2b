//! Parsing YAML text into nodes.

use crate::format::FORMAT_NAME;
use configapi_rs_core::{FormatError, ListNode, MapNode, Node};
use serde_yaml::Value;

/// Parse a document whose root must be a mapping. Empty documents (and
/// documents holding only comments) load as an empty map.
pub(crate) fn parse_root(text: &str) -> Result<MapNode, FormatError> {
    if text.trim().is_empty() {
        return Ok(MapNode::new());
    }

    let mut value: Value = serde_yaml::from_str(text).map_err(parse_error)?;
    if has_plain_merge_key(text) {
        value.apply_merge().map_err(parse_error)?;
    }

    match convert(value)? {
        Node::Null => Ok(MapNode::new()),
        Node::Map(map) => Ok(map),
        other => Err(FormatError::UnsupportedRoot {
            format: FORMAT_NAME,
            expected: "map",
            found: other.kind(),
        }),
    }
}

/// Whether `<<` appears outside quotes. Keys written as `"<<"` stay
/// ordinary keys as long as the document has no plain merge key.
fn has_plain_merge_key(text: &str) -> bool {
    text.match_indices("<<").any(|(at, _)| {
        !text[..at].ends_with(['"', '\'']) && !text[at + 2..].starts_with(['"', '\''])
    })
}

fn parse_error(err: serde_yaml::Error) -> FormatError {
    FormatError::parse(FORMAT_NAME, err.to_string())
}

fn convert(value: Value) -> Result<Node, FormatError> {
    Ok(match value {
        Value::Null => Node::Null,
        Value::Bool(value) => Node::Bool(value),
        Value::Number(number) => {
            if let Some(value) = number.as_i64() {
                match i32::try_from(value) {
                    Ok(value) => Node::Int(value),
                    Err(_) => Node::Long(value),
                }
            } else {
                Node::Double(number.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(value) => Node::String(value),
        Value::Sequence(values) => {
            let mut list = ListNode::new();
            for value in values {
                list.add(convert(value)?);
            }
            Node::List(list)
        }
        Value::Mapping(mapping) => {
            let mut map = MapNode::new();
            for (key, value) in mapping {
                map.set(key_string(key)?, convert(value)?);
            }
            Node::Map(map)
        }
        Value::Tagged(tagged) => convert(tagged.value)?,
    })
}

/// Scalar keys become their text; collections cannot be keys.
pub(crate) fn key_string(key: Value) -> Result<String, FormatError> {
    match key {
        Value::String(key) => Ok(key),
        Value::Bool(key) => Ok(key.to_string()),
        Value::Number(key) => Ok(key.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Tagged(tagged) => key_string(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => Err(FormatError::parse(
            FORMAT_NAME,
            "collections cannot be used as map keys",
        )),
    }
}
