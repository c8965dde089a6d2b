//! Records: structs described by a field schema.
//!
//! A [`Record`] lists its fields once in [`Record::schema`]. Each [`Field`]
//! carries the accessors and the options that control its map entry:
//!
//! - `key`: explicit map key, bypassing the key generator.
//! - `comment`: comment attached to the written node.
//! - `inline`: merge a nested map into the parent instead of nesting it.
//! - `default_value`: used when the key is absent or fails to convert and
//!   no default record was given.
//!
//! Collection element and key types come from the field's Rust type.
//!
//! ```
//! use configapi_rs_core::serialization::{Field, Record, RecordSchema, RecordSerializer};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Record for Server {
//!     fn schema() -> RecordSchema<Self> {
//!         RecordSchema::new()
//!             .field(Field::new("host", |s: &Server| &s.host, |s, v| s.host = v))
//!             .field(
//!                 Field::new("port", |s: &Server| &s.port, |s, v| s.port = v)
//!                     .default_value(8080),
//!             )
//!     }
//! }
//!
//! let map = RecordSerializer::<Server>::new()
//!     .serialize(&Server { host: "localhost".into(), port: 25565 })
//!     .unwrap();
//! assert_eq!(map.get_i32("port", 0), 25565);
//! ```

use super::key::{AsIs, KeyGenerator};
use super::registry::Registry;
use super::value::NodeValue;
use super::{Context, Deserializer, Serializer};
use crate::SerializationError;
use crate::comment::Comment;
use crate::node::{MapNode, Node};
use log::debug;
use std::marker::PhantomData;
use std::sync::Arc;

/// A struct converted to and from a [`MapNode`] field by field.
pub trait Record: Default + Clone + Send + Sync + 'static {
    fn schema() -> RecordSchema<Self>;
}

/// Ordered field list of a record.
pub struct RecordSchema<R> {
    fields: Vec<Box<dyn FieldCodec<R>>>,
}

impl<R: 'static> RecordSchema<R> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn field<T: NodeValue + Clone>(mut self, field: Field<R, T>) -> Self {
        self.fields.push(Box::new(field));
        self
    }

    /// Field names in declaration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|field| field.name()).collect()
    }
}

impl<R: 'static> Default for RecordSchema<R> {
    fn default() -> Self {
        Self::new()
    }
}

/// One field of a record.
pub struct Field<R, T> {
    name: &'static str,
    get: fn(&R) -> &T,
    set: fn(&mut R, T),
    key: Option<String>,
    comment: Option<Comment>,
    inline: bool,
    default: Option<T>,
}

impl<R, T> Field<R, T> {
    pub fn new(name: &'static str, get: fn(&R) -> &T, set: fn(&mut R, T)) -> Self {
        Self {
            name,
            get,
            set,
            key: None,
            comment: None,
            inline: false,
            default: None,
        }
    }

    /// Store the field under `key` instead of the generated one.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn comment(mut self, comment: impl Into<Comment>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Merge the field's map entries into the parent map.
    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    /// Value used when the key is missing or fails to convert. A default
    /// record given to the deserializer takes precedence.
    pub fn default_value(mut self, value: T) -> Self {
        self.default = Some(value);
        self
    }

    fn map_key(&self, ctx: &Context<'_>) -> String {
        match &self.key {
            Some(key) => key.clone(),
            None => ctx.key(self.name),
        }
    }
}

/// Type-erased view of a [`Field`].
trait FieldCodec<R> {
    fn name(&self) -> &'static str;

    fn write(&self, record: &R, target: &mut MapNode, ctx: &Context<'_>)
    -> Result<(), SerializationError>;

    fn read(
        &self,
        source: &MapNode,
        target: &mut R,
        has_base: bool,
        ctx: &Context<'_>,
    ) -> Result<(), SerializationError>;
}

impl<R, T: NodeValue + Clone> FieldCodec<R> for Field<R, T> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn write(
        &self,
        record: &R,
        target: &mut MapNode,
        ctx: &Context<'_>,
    ) -> Result<(), SerializationError> {
        let key = self.map_key(ctx);
        let node = ctx
            .serialize((self.get)(record))
            .map_err(|err| err.at(key.as_str()))?;
        if node.is_null() {
            return Ok(());
        }

        if self.inline {
            return match node.into_uncommented() {
                Node::Map(entries) => {
                    for (entry_key, value) in entries {
                        target.set(entry_key, value);
                    }
                    Ok(())
                }
                other => Err(SerializationError::NotAMap {
                    key,
                    found: other.kind(),
                }),
            };
        }

        let node = match &self.comment {
            Some(comment) => node.with_comment(Some(comment.clone())),
            None => node,
        };
        target.set(key, node);
        Ok(())
    }

    fn read(
        &self,
        source: &MapNode,
        target: &mut R,
        has_base: bool,
        ctx: &Context<'_>,
    ) -> Result<(), SerializationError> {
        let key = self.map_key(ctx);
        let inline_source;
        let node = if self.inline {
            inline_source = Node::Map(source.clone());
            Some(&inline_source)
        } else {
            source.get_node(&key).filter(|node| !node.is_null())
        };

        let Some(node) = node else {
            if has_base {
                debug!("keeping base value for missing key (key={key})");
            } else if let Some(default) = &self.default {
                (self.set)(target, default.clone());
            } else if let Some(absent) = T::absent() {
                (self.set)(target, absent);
            } else {
                return Err(SerializationError::MissingKey { key });
            }
            return Ok(());
        };

        let result = if has_base {
            ctx.deserialize_with_base(node, (self.get)(target))
        } else {
            ctx.deserialize(node)
        };

        match result {
            Ok(value) => (self.set)(target, value),
            Err(err) => {
                if has_base {
                    debug!("falling back to base value (key={key}, error={err})");
                } else if let Some(default) = &self.default {
                    debug!("falling back to default value (key={key}, error={err})");
                    (self.set)(target, default.clone());
                } else {
                    return Err(err.at(key));
                }
            }
        }
        Ok(())
    }
}

/// Serialize `record` field by field.
pub fn serialize_record<R: Record>(
    record: &R,
    ctx: &Context<'_>,
) -> Result<MapNode, SerializationError> {
    let mut map = MapNode::new();
    for field in R::schema().fields {
        field.write(record, &mut map, ctx)?;
    }
    Ok(map)
}

/// Deserialize a record from `source`. With a `base`, every field missing
/// from `source` keeps the base value.
pub fn deserialize_record<R: Record>(
    source: &MapNode,
    base: Option<&R>,
    ctx: &Context<'_>,
) -> Result<R, SerializationError> {
    let mut record = base.cloned().unwrap_or_default();
    for field in R::schema().fields {
        field.read(source, &mut record, base.is_some(), ctx)?;
    }
    Ok(record)
}

/// [`deserialize_record`] for a node that should hold a map.
pub fn deserialize_record_node<R: Record>(
    node: &Node,
    base: Option<&R>,
    ctx: &Context<'_>,
) -> Result<R, SerializationError> {
    match node.unwrap_comment() {
        Node::Map(map) => deserialize_record(map, base, ctx),
        Node::Null => deserialize_record(&MapNode::new(), base, ctx),
        other => Err(SerializationError::mismatch("map", other.kind())),
    }
}

/// Implement [`NodeValue`] for records so they can nest inside other
/// records and collections.
#[macro_export]
macro_rules! node_record {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::serialization::NodeValue for $ty {
                fn to_node(
                    &self,
                    ctx: &$crate::serialization::Context<'_>,
                ) -> ::std::result::Result<$crate::node::Node, $crate::SerializationError> {
                    $crate::serialization::record::serialize_record(self, ctx)
                        .map($crate::node::Node::Map)
                }

                fn from_node(
                    node: &$crate::node::Node,
                    ctx: &$crate::serialization::Context<'_>,
                ) -> ::std::result::Result<Self, $crate::SerializationError> {
                    $crate::serialization::record::deserialize_record_node(node, None, ctx)
                }

                fn from_node_with_base(
                    node: &$crate::node::Node,
                    base: &Self,
                    ctx: &$crate::serialization::Context<'_>,
                ) -> ::std::result::Result<Self, $crate::SerializationError> {
                    $crate::serialization::record::deserialize_record_node(node, Some(base), ctx)
                }
            }
        )+
    };
}

/// Converts records into map nodes.
pub struct RecordSerializer<R> {
    registry: Registry,
    key_generator: Arc<dyn KeyGenerator>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordSerializer<R> {
    /// Serializer with the [`AsIs`] key generator and no registry entries.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RecordSerializerBuilder<R> {
        RecordSerializerBuilder {
            registry: Registry::new(),
            key_generator: Arc::new(AsIs),
            _record: PhantomData,
        }
    }

    pub fn serialize(&self, record: &R) -> Result<MapNode, SerializationError> {
        serialize_record(record, &self.context())
    }

    /// Serialize `R::default()`, typically to write a fresh config file.
    pub fn serialize_default(&self) -> Result<MapNode, SerializationError> {
        self.serialize(&R::default())
    }

    fn context(&self) -> Context<'_> {
        Context::new(&self.registry, self.key_generator.as_ref())
    }
}

impl<R: Record> Default for RecordSerializer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Serializer<R> for RecordSerializer<R> {
    fn serialize(&self, value: &R) -> Result<Node, SerializationError> {
        serialize_record(value, &self.context()).map(Node::Map)
    }
}

/// Builder for [`RecordSerializer`].
pub struct RecordSerializerBuilder<R> {
    registry: Registry,
    key_generator: Arc<dyn KeyGenerator>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordSerializerBuilder<R> {
    pub fn key_generator(mut self, key_generator: impl KeyGenerator + 'static) -> Self {
        self.key_generator = Arc::new(key_generator);
        self
    }

    pub fn add_serializer<T: 'static>(self, serializer: impl Serializer<T> + 'static) -> Self {
        self.registry.register_serializer(serializer);
        self
    }

    /// Copy every entry of `registry`.
    pub fn registry(self, registry: &Registry) -> Self {
        self.registry.register_all(registry);
        self
    }

    pub fn build(self) -> RecordSerializer<R> {
        RecordSerializer {
            registry: self.registry,
            key_generator: self.key_generator,
            _record: PhantomData,
        }
    }
}

/// Converts map nodes into records.
pub struct RecordDeserializer<R> {
    registry: Registry,
    key_generator: Arc<dyn KeyGenerator>,
    default_record: Option<R>,
}

impl<R: Record> RecordDeserializer<R> {
    /// Deserializer with the [`AsIs`] key generator, no registry entries and
    /// no default record.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> RecordDeserializerBuilder<R> {
        RecordDeserializerBuilder {
            registry: Registry::new(),
            key_generator: Arc::new(AsIs),
            default_record: None,
        }
    }

    pub fn deserialize(&self, source: &MapNode) -> Result<R, SerializationError> {
        deserialize_record(source, self.default_record.as_ref(), &self.context())
    }

    fn context(&self) -> Context<'_> {
        Context::new(&self.registry, self.key_generator.as_ref())
    }
}

impl<R: Record> Default for RecordDeserializer<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Deserializer<R> for RecordDeserializer<R> {
    fn deserialize(&self, node: &Node) -> Result<R, SerializationError> {
        deserialize_record_node(node, self.default_record.as_ref(), &self.context())
    }
}

/// Builder for [`RecordDeserializer`].
pub struct RecordDeserializerBuilder<R> {
    registry: Registry,
    key_generator: Arc<dyn KeyGenerator>,
    default_record: Option<R>,
}

impl<R: Record> RecordDeserializerBuilder<R> {
    pub fn key_generator(mut self, key_generator: impl KeyGenerator + 'static) -> Self {
        self.key_generator = Arc::new(key_generator);
        self
    }

    pub fn add_deserializer<T: 'static>(
        self,
        deserializer: impl Deserializer<T> + 'static,
    ) -> Self {
        self.registry.register_deserializer(deserializer);
        self
    }

    /// Copy every entry of `registry`.
    pub fn registry(self, registry: &Registry) -> Self {
        self.registry.register_all(registry);
        self
    }

    /// Record whose values fill every key missing from the source.
    pub fn default_record(mut self, record: R) -> Self {
        self.default_record = Some(record);
        self
    }

    pub fn build(self) -> RecordDeserializer<R> {
        RecordDeserializer {
            registry: self.registry,
            key_generator: self.key_generator,
            default_record: self.default_record,
        }
    }
}

#[cfg(test)]
mod tests;
