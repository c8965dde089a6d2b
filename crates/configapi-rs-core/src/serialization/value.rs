//! Built-in conversions between Rust values and nodes.

use super::Context;
use crate::SerializationError;
use crate::node::{EnumValue, ListNode, MapNode, Node};
use indexmap::IndexMap;
use std::any::type_name;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// A type that can be stored in a node tree.
///
/// Every method has a default, so `impl NodeValue for MyType {}` is enough
/// for types converted only through a [`super::Registry`]; the defaults fail
/// with [`SerializationError::NoSerializer`] / [`SerializationError::NoDeserializer`].
pub trait NodeValue: Sized + 'static {
    fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
        Err(SerializationError::NoSerializer {
            type_name: type_name::<Self>(),
        })
    }

    /// Convert `node`, which never is a [`Node::Commented`] wrapper.
    fn from_node(_node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
        Err(SerializationError::NoDeserializer {
            type_name: type_name::<Self>(),
        })
    }

    /// Convert `node`, taking anything it lacks from `base`. Only records and
    /// wrappers around them make use of the base.
    fn from_node_with_base(
        node: &Node,
        _base: &Self,
        ctx: &Context<'_>,
    ) -> Result<Self, SerializationError> {
        Self::from_node(node, ctx)
    }

    /// Value used when the key is missing and no default is declared.
    /// `None` makes the key required.
    fn absent() -> Option<Self> {
        None
    }
}

/// A fieldless enum stored as [`Node::Enum`].
///
/// Implement with [`crate::node_enum!`].
pub trait NodeEnum: Copy + 'static {
    const TYPE_NAME: &'static str;

    fn variants() -> &'static [Self];

    fn name(&self) -> &'static str;

    fn to_enum_value(&self) -> EnumValue {
        EnumValue::new(Self::TYPE_NAME, self.name())
    }

    /// Variant named `name`: exact match first, then case-insensitive.
    fn from_name(name: &str) -> Option<Self> {
        let variants = Self::variants();
        variants
            .iter()
            .find(|variant| variant.name() == name)
            .or_else(|| {
                variants
                    .iter()
                    .find(|variant| variant.name().eq_ignore_ascii_case(name))
            })
            .copied()
    }

    /// Variant held by an enum node of this type or named by a string node.
    fn from_enum_node(node: &Node) -> Option<Self> {
        match node.unwrap_comment() {
            Node::Enum(value) if value.type_name == Self::TYPE_NAME => Self::from_name(value.name),
            Node::String(name) => Self::from_name(name),
            _ => None,
        }
    }
}

/// Implement [`NodeEnum`] and [`NodeValue`] for a fieldless enum.
///
/// ```
/// use configapi_rs_core::node_enum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Mode {
///     Fast,
///     Safe,
/// }
///
/// node_enum!(Mode { Fast, Safe });
/// ```
#[macro_export]
macro_rules! node_enum {
    ($ty:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::serialization::NodeEnum for $ty {
            const TYPE_NAME: &'static str = stringify!($ty);

            fn variants() -> &'static [Self] {
                &[$($ty::$variant),+]
            }

            fn name(&self) -> &'static str {
                match self {
                    $($ty::$variant => stringify!($variant),)+
                }
            }
        }

        impl $crate::serialization::NodeValue for $ty {
            fn to_node(
                &self,
                _ctx: &$crate::serialization::Context<'_>,
            ) -> ::std::result::Result<$crate::node::Node, $crate::SerializationError> {
                Ok($crate::node::Node::Enum(
                    $crate::serialization::NodeEnum::to_enum_value(self),
                ))
            }

            fn from_node(
                node: &$crate::node::Node,
                _ctx: &$crate::serialization::Context<'_>,
            ) -> ::std::result::Result<Self, $crate::SerializationError> {
                <Self as $crate::serialization::NodeEnum>::from_enum_node(node).ok_or_else(|| {
                    $crate::SerializationError::InvalidValue(format!(
                        "{} is not a variant of {}",
                        node.as_scalar_string().unwrap_or_else(|| node.kind().to_string()),
                        stringify!($ty)
                    ))
                })
            }
        }
    };
}

fn parse_scalar<T: std::str::FromStr>(
    node: &Node,
    expected: &'static str,
) -> Result<T, SerializationError>
where
    T::Err: std::fmt::Display,
{
    match node {
        Node::String(text) => text.trim().parse::<T>().map_err(|err| {
            SerializationError::InvalidValue(format!("{text:?} is not a valid {expected}: {err}"))
        }),
        other => Err(SerializationError::mismatch(expected, other.kind())),
    }
}

impl NodeValue for bool {
    fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
        Ok(Node::Bool(*self))
    }

    fn from_node(node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
        match node {
            Node::Bool(value) => Ok(*value),
            Node::String(text) if text.eq_ignore_ascii_case("true") => Ok(true),
            Node::String(text) if text.eq_ignore_ascii_case("false") => Ok(false),
            other => parse_scalar(other, "bool"),
        }
    }
}

macro_rules! integer_value {
    ($($ty:ty => $variant:ident($node_ty:ty)),+ $(,)?) => {
        $(
            impl NodeValue for $ty {
                fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
                    <$node_ty>::try_from(*self)
                        .map(Node::$variant)
                        .map_err(|_| SerializationError::InvalidValue(format!(
                            "{} does not fit in a {} node", self, stringify!($variant)
                        )))
                }

                fn from_node(node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
                    let wide = match node {
                        Node::Byte(_) | Node::Short(_) | Node::Int(_) | Node::Long(_) => {
                            node.as_i64().map(i128::from)
                        }
                        Node::Float(_) | Node::Double(_) => node.as_f64().map(|v| v as i128),
                        _ => None,
                    };
                    match wide {
                        Some(wide) => <$ty>::try_from(wide).map_err(|_| {
                            SerializationError::InvalidValue(format!(
                                "{} is out of range for {}", wide, stringify!($ty)
                            ))
                        }),
                        None => parse_scalar(node, stringify!($ty)),
                    }
                }
            }
        )+
    };
}

integer_value! {
    i8 => Byte(i8),
    i16 => Short(i16),
    i32 => Int(i32),
    i64 => Long(i64),
    isize => Long(i64),
    u8 => Short(i16),
    u16 => Int(i32),
    u32 => Long(i64),
    u64 => Long(i64),
    usize => Long(i64),
}

macro_rules! float_value {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl NodeValue for $ty {
                fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
                    Ok(Node::$variant(*self))
                }

                fn from_node(node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
                    match node.as_f64() {
                        Some(value) => Ok(value as $ty),
                        None => parse_scalar(node, stringify!($ty)),
                    }
                }
            }
        )+
    };
}

float_value! {
    f32 => Float,
    f64 => Double,
}

impl NodeValue for char {
    fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
        Ok(Node::Char(*self))
    }

    fn from_node(node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
        match node {
            Node::Char(value) => Ok(*value),
            Node::String(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(value), None) => Ok(value),
                    _ => Err(SerializationError::InvalidValue(format!(
                        "{text:?} is not a single character"
                    ))),
                }
            }
            other => Err(SerializationError::mismatch("char", other.kind())),
        }
    }
}

impl NodeValue for String {
    fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
        Ok(Node::String(self.clone()))
    }

    fn from_node(node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
        node.as_scalar_string()
            .ok_or_else(|| SerializationError::mismatch("string", node.kind()))
    }
}

impl NodeValue for Node {
    fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
        Ok(self.clone())
    }

    fn from_node(node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
        Ok(node.clone())
    }
}

impl NodeValue for MapNode {
    fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
        Ok(Node::Map(self.clone()))
    }

    fn from_node(node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
        node.as_map()
            .cloned()
            .ok_or_else(|| SerializationError::mismatch("map", node.kind()))
    }
}

impl NodeValue for ListNode {
    fn to_node(&self, _ctx: &Context<'_>) -> Result<Node, SerializationError> {
        Ok(Node::List(self.clone()))
    }

    fn from_node(node: &Node, _ctx: &Context<'_>) -> Result<Self, SerializationError> {
        match node {
            Node::List(list) => Ok(list.clone()),
            Node::Array(array) => Ok(array.elements().into_iter().collect()),
            other => Err(SerializationError::mismatch("list", other.kind())),
        }
    }
}

impl<T: NodeValue> NodeValue for Option<T> {
    fn to_node(&self, ctx: &Context<'_>) -> Result<Node, SerializationError> {
        match self {
            Some(value) => ctx.serialize(value),
            None => Ok(Node::Null),
        }
    }

    fn from_node(node: &Node, ctx: &Context<'_>) -> Result<Self, SerializationError> {
        if node.is_null() {
            return Ok(None);
        }
        ctx.deserialize(node).map(Some)
    }

    fn from_node_with_base(
        node: &Node,
        base: &Self,
        ctx: &Context<'_>,
    ) -> Result<Self, SerializationError> {
        match base {
            Some(base) if !node.is_null() => ctx.deserialize_with_base(node, base).map(Some),
            _ => Self::from_node(node, ctx),
        }
    }

    fn absent() -> Option<Self> {
        Some(None)
    }
}

impl<T: NodeValue> NodeValue for Vec<T> {
    fn to_node(&self, ctx: &Context<'_>) -> Result<Node, SerializationError> {
        let mut list = ListNode::new();
        for (index, element) in self.iter().enumerate() {
            list.add(ctx.serialize(element).map_err(|err| err.at(format!("[{index}]")))?);
        }
        Ok(Node::List(list))
    }

    /// Null elements are skipped.
    fn from_node(node: &Node, ctx: &Context<'_>) -> Result<Self, SerializationError> {
        let elements = match node {
            Node::List(list) => list.as_slice().to_vec(),
            Node::Array(array) => array.elements(),
            other => return Err(SerializationError::mismatch("list", other.kind())),
        };
        elements
            .iter()
            .enumerate()
            .filter(|(_, element)| !element.is_null())
            .map(|(index, element)| {
                ctx.deserialize(element)
                    .map_err(|err| err.at(format!("[{index}]")))
            })
            .collect()
    }
}

fn map_to_node<'a, K, V, I>(entries: I, ctx: &Context<'_>) -> Result<Node, SerializationError>
where
    K: NodeValue,
    V: NodeValue,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let mut map = MapNode::new();
    for (key, value) in entries {
        let key_node = ctx.serialize(key)?;
        let key = key_node.as_scalar_string().ok_or_else(|| {
            SerializationError::InvalidValue(format!(
                "map keys must be scalars, found {}",
                key_node.kind()
            ))
        })?;
        let value = ctx.serialize(value).map_err(|err| err.at(key.clone()))?;
        map.set(key, value);
    }
    Ok(Node::Map(map))
}

/// Entries of a map node as typed pairs. Null values are skipped.
fn map_from_node<K, V>(node: &Node, ctx: &Context<'_>) -> Result<Vec<(K, V)>, SerializationError>
where
    K: NodeValue,
    V: NodeValue,
{
    let map = match node {
        Node::Map(map) => map,
        other => return Err(SerializationError::mismatch("map", other.kind())),
    };
    map.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let typed_key = ctx
                .deserialize::<K>(&Node::String(key.clone()))
                .map_err(|err| err.at(key.clone()))?;
            let typed_value = ctx
                .deserialize::<V>(value)
                .map_err(|err| err.at(key.clone()))?;
            Ok((typed_key, typed_value))
        })
        .collect()
}

impl<K, V> NodeValue for HashMap<K, V>
where
    K: NodeValue + Eq + Hash,
    V: NodeValue,
{
    fn to_node(&self, ctx: &Context<'_>) -> Result<Node, SerializationError> {
        map_to_node(self, ctx)
    }

    fn from_node(node: &Node, ctx: &Context<'_>) -> Result<Self, SerializationError> {
        Ok(map_from_node(node, ctx)?.into_iter().collect())
    }
}

impl<K, V> NodeValue for BTreeMap<K, V>
where
    K: NodeValue + Ord,
    V: NodeValue,
{
    fn to_node(&self, ctx: &Context<'_>) -> Result<Node, SerializationError> {
        map_to_node(self, ctx)
    }

    fn from_node(node: &Node, ctx: &Context<'_>) -> Result<Self, SerializationError> {
        Ok(map_from_node(node, ctx)?.into_iter().collect())
    }
}

impl<K, V> NodeValue for IndexMap<K, V>
where
    K: NodeValue + Eq + Hash,
    V: NodeValue,
{
    fn to_node(&self, ctx: &Context<'_>) -> Result<Node, SerializationError> {
        map_to_node(self, ctx)
    }

    fn from_node(node: &Node, ctx: &Context<'_>) -> Result<Self, SerializationError> {
        Ok(map_from_node(node, ctx)?.into_iter().collect())
    }
}
