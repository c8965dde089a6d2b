//! serde bridge for the node tree.
//!
//! Data formats that speak serde (JSON, JSON5) read and write nodes through
//! these impls. Integer widths collapse to `Int`/`Long` on the way in, and
//! comments are dropped on the way out.

use super::{ArrayNode, ListNode, MapNode, Node};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(value) => serializer.serialize_bool(*value),
            Node::Byte(value) => serializer.serialize_i64(i64::from(*value)),
            Node::Short(value) => serializer.serialize_i64(i64::from(*value)),
            Node::Int(value) => serializer.serialize_i64(i64::from(*value)),
            Node::Long(value) => serializer.serialize_i64(*value),
            Node::Float(value) => serializer.serialize_f32(*value),
            Node::Double(value) => serializer.serialize_f64(*value),
            Node::Char(value) => serializer.serialize_char(*value),
            Node::String(value) => serializer.serialize_str(value),
            Node::Enum(value) => serializer.serialize_str(value.name),
            Node::List(list) => list.serialize(serializer),
            Node::Map(map) => map.serialize(serializer),
            Node::Array(array) => array.serialize(serializer),
            Node::Commented(commented) => commented.node().serialize(serializer),
        }
    }
}

impl Serialize for MapNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for ListNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for element in self {
            seq.serialize_element(element)?;
        }
        seq.end()
    }
}

impl Serialize for ArrayNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ArrayNode::Bool(values) => values.serialize(serializer),
            ArrayNode::Byte(values) => values.serialize(serializer),
            ArrayNode::Char(values) => values.serialize(serializer),
            ArrayNode::Short(values) => values.serialize(serializer),
            ArrayNode::Int(values) => values.serialize(serializer),
            ArrayNode::Long(values) => values.serialize(serializer),
            ArrayNode::Float(values) => values.serialize(serializer),
            ArrayNode::Double(values) => values.serialize(serializer),
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any configuration value")
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Node, E> {
        Ok(Node::Bool(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Node, E> {
        Ok(match i32::try_from(value) {
            Ok(value) => Node::Int(value),
            Err(_) => Node::Long(value),
        })
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Node, E> {
        match i64::try_from(value) {
            Ok(value) => self.visit_i64(value),
            Err(_) => Ok(Node::Double(value as f64)),
        }
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Node, E> {
        Ok(Node::Double(value))
    }

    fn visit_char<E: de::Error>(self, value: char) -> Result<Node, E> {
        Ok(Node::String(value.to_string()))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Node, E> {
        Ok(Node::String(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Node, E> {
        Ok(Node::String(value))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut list = ListNode::new();
        while let Some(element) = seq.next_element::<Node>()? {
            list.add(element);
        }
        Ok(Node::List(list))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Node, A::Error> {
        let mut map = MapNode::new();
        while let Some((key, value)) = access.next_entry::<String, Node>()? {
            map.set(key, value);
        }
        Ok(Node::Map(map))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

impl<'de> Deserialize<'de> for MapNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Node::deserialize(deserializer)? {
            Node::Map(map) => Ok(map),
            Node::Null => Ok(MapNode::new()),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.kind()),
                &"a map",
            )),
        }
    }
}

impl<'de> Deserialize<'de> for ListNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Node::deserialize(deserializer)? {
            Node::List(list) => Ok(list),
            Node::Null => Ok(ListNode::new()),
            other => Err(de::Error::invalid_type(
                de::Unexpected::Other(other.kind()),
                &"a list",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Comment;
    use pretty_assertions::assert_eq;

    #[test]
    fn integers_pick_the_narrowest_width() {
        let node: Node = serde_json::from_str(r#"[1, 3000000000, 1.5, 18446744073709551615]"#)
            .expect("parse");
        assert_eq!(
            node,
            Node::from(vec![
                Node::Int(1),
                Node::Long(3_000_000_000),
                Node::Double(1.5),
                Node::Double(u64::MAX as f64),
            ])
        );
    }

    #[test]
    fn maps_keep_document_order() {
        let map: MapNode = serde_json::from_str(r#"{"z": 1, "a": null, "m": "x"}"#).expect("parse");
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["z", "a", "m"]);
        assert_eq!(map.get("a"), &Node::Null);
    }

    #[test]
    fn comments_and_enums_serialize_as_plain_values() {
        let mut map = MapNode::new();
        map.set("c", Node::Int(1).with_comment(Some(Comment::simple("dropped"))));
        map.set("e", Node::Enum(crate::node::EnumValue::new("Mode", "FAST")));
        map.set("arr", ArrayNode::Byte(vec![1, 2]));
        map.set("ch", 'x');
        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(json, r#"{"c":1,"e":"FAST","arr":[1,2],"ch":"x"}"#);
    }

    #[test]
    fn non_map_root_is_rejected() {
        let error = serde_json::from_str::<MapNode>("[1]").expect_err("list root");
        assert!(error.to_string().contains("a map"));
    }
}
