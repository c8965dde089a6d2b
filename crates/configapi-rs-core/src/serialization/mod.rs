//! Conversion between typed values and nodes.
//!
//! Every conversion runs with a [`Context`] that carries the [`Registry`]
//! and the active [`KeyGenerator`]. A registered (de)serializer always wins
//! over a type's own [`NodeValue`] impl.

mod key;
pub mod record;
mod registry;
mod value;

pub use key::{AsIs, KebabCase, KeyGenerator, SnakeCase};
pub use record::{
    Field, Record, RecordDeserializer, RecordDeserializerBuilder, RecordSchema,
    RecordSerializer, RecordSerializerBuilder,
};
pub use registry::Registry;
pub use value::{NodeEnum, NodeValue};

use crate::SerializationError;
use crate::node::Node;

/// Converts a `T` into a node.
pub trait Serializer<T>: Send + Sync {
    fn serialize(&self, value: &T) -> Result<Node, SerializationError>;
}

/// Converts a node into a `T`.
pub trait Deserializer<T>: Send + Sync {
    fn deserialize(&self, node: &Node) -> Result<T, SerializationError>;
}

impl<T, F> Serializer<T> for F
where
    F: Fn(&T) -> Result<Node, SerializationError> + Send + Sync,
{
    fn serialize(&self, value: &T) -> Result<Node, SerializationError> {
        self(value)
    }
}

impl<T, F> Deserializer<T> for F
where
    F: Fn(&Node) -> Result<T, SerializationError> + Send + Sync,
{
    fn deserialize(&self, node: &Node) -> Result<T, SerializationError> {
        self(node)
    }
}

/// State shared by every conversion in one serialize/deserialize call.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    registry: &'a Registry,
    key_generator: &'a dyn KeyGenerator,
}

impl<'a> Context<'a> {
    pub fn new(registry: &'a Registry, key_generator: &'a dyn KeyGenerator) -> Self {
        Self {
            registry,
            key_generator,
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Map key for a field name under the active key generator.
    pub fn key(&self, name: &str) -> String {
        self.key_generator.generate(name)
    }

    /// Convert `value`, preferring a registered serializer.
    pub fn serialize<T: NodeValue>(&self, value: &T) -> Result<Node, SerializationError> {
        match self.registry.serializer::<T>() {
            Some(serializer) => serializer.serialize(value),
            None => value.to_node(self),
        }
    }

    /// Convert `node`, preferring a registered deserializer.
    pub fn deserialize<T: NodeValue>(&self, node: &Node) -> Result<T, SerializationError> {
        let node = node.unwrap_comment();
        match self.registry.deserializer::<T>() {
            Some(deserializer) => deserializer.deserialize(node),
            None => T::from_node(node, self),
        }
    }

    /// Like [`Context::deserialize`], with `base` filling anything `node` lacks.
    pub fn deserialize_with_base<T: NodeValue>(
        &self,
        node: &Node,
        base: &T,
    ) -> Result<T, SerializationError> {
        let node = node.unwrap_comment();
        match self.registry.deserializer::<T>() {
            Some(deserializer) => deserializer.deserialize(node),
            None => T::from_node_with_base(node, base, self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    impl NodeValue for Point {}

    #[test]
    fn registry_entries_take_precedence() {
        let registry = Registry::new();
        let ctx = Context::new(&registry, &AsIs);
        assert!(matches!(
            ctx.serialize(&Point { x: 1, y: 2 }),
            Err(SerializationError::NoSerializer { .. })
        ));
        assert!(matches!(
            ctx.deserialize::<Point>(&Node::from("1,2")),
            Err(SerializationError::NoDeserializer { .. })
        ));

        registry.register_serializer(|point: &Point| -> Result<Node, SerializationError> {
            Ok(Node::from(format!("{},{}", point.x, point.y)))
        });
        registry.register_deserializer(|node: &Node| -> Result<Point, SerializationError> {
            let text = node
                .as_str()
                .ok_or(SerializationError::mismatch("string", node.kind()))?;
            let (x, y) = text
                .split_once(',')
                .ok_or_else(|| SerializationError::InvalidValue(text.to_string()))?;
            let parse = |part: &str| {
                part.parse::<i32>()
                    .map_err(|err| SerializationError::InvalidValue(err.to_string()))
            };
            Ok(Point {
                x: parse(x)?,
                y: parse(y)?,
            })
        });

        assert_eq!(
            ctx.serialize(&Point { x: 1, y: 2 }).expect("serialize"),
            Node::from("1,2")
        );
        assert_eq!(
            ctx.deserialize::<Point>(&Node::from("3,4")).expect("deserialize"),
            Point { x: 3, y: 4 }
        );

        registry.register_serializer(|_: &i32| -> Result<Node, SerializationError> {
            Ok(Node::from("overridden"))
        });
        assert_eq!(ctx.serialize(&5).expect("serialize"), Node::from("overridden"));
    }
}
