//! Registry of per-type serializers and deserializers.

use super::{Deserializer, Serializer};
use log::debug;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;

type Entry = Arc<dyn Any + Send + Sync>;

/// In-memory lookup table from a runtime type to its conversions.
///
/// Clones share the same tables; use [`Registry::snapshot`] for an
/// independent copy.
#[derive(Default, Clone)]
pub struct Registry {
    /// `TypeId` of `T` to `Arc<dyn Serializer<T>>`.
    serializers: Arc<RwLock<HashMap<TypeId, Entry>>>,
    /// `TypeId` of `T` to `Arc<dyn Deserializer<T>>`.
    deserializers: Arc<RwLock<HashMap<TypeId, Entry>>>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the serializer for `T`, replacing any previous one.
    pub fn register_serializer<T: 'static>(&self, serializer: impl Serializer<T> + 'static) {
        debug!("registering serializer (type={})", type_name::<T>());
        let serializer: Arc<dyn Serializer<T>> = Arc::new(serializer);
        self.serializers
            .write()
            .insert(TypeId::of::<T>(), Arc::new(serializer));
    }

    /// Register the deserializer for `T`, replacing any previous one.
    pub fn register_deserializer<T: 'static>(
        &self,
        deserializer: impl Deserializer<T> + 'static,
    ) {
        debug!("registering deserializer (type={})", type_name::<T>());
        let deserializer: Arc<dyn Deserializer<T>> = Arc::new(deserializer);
        self.deserializers
            .write()
            .insert(TypeId::of::<T>(), Arc::new(deserializer));
    }

    /// Register both directions for `T`.
    pub fn register<T: 'static>(
        &self,
        serializer: impl Serializer<T> + 'static,
        deserializer: impl Deserializer<T> + 'static,
    ) {
        self.register_serializer(serializer);
        self.register_deserializer(deserializer);
    }

    /// Fetch the serializer for `T`.
    pub fn serializer<T: 'static>(&self) -> Option<Arc<dyn Serializer<T>>> {
        self.serializers
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn Serializer<T>>>())
            .cloned()
    }

    /// Fetch the deserializer for `T`.
    pub fn deserializer<T: 'static>(&self) -> Option<Arc<dyn Deserializer<T>>> {
        self.deserializers
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Arc<dyn Deserializer<T>>>())
            .cloned()
    }

    pub fn has_serializer<T: 'static>(&self) -> bool {
        self.serializers.read().contains_key(&TypeId::of::<T>())
    }

    pub fn has_deserializer<T: 'static>(&self) -> bool {
        self.deserializers.read().contains_key(&TypeId::of::<T>())
    }

    /// Copy every entry of `other` into this registry. Entries of `other`
    /// replace existing ones for the same type.
    pub fn register_all(&self, other: &Registry) {
        if Arc::ptr_eq(&self.serializers, &other.serializers) {
            return;
        }
        let serializers = other.serializers.read().clone();
        let deserializers = other.deserializers.read().clone();
        debug!(
            "merging registry (serializers={}, deserializers={})",
            serializers.len(),
            deserializers.len()
        );
        self.serializers.write().extend(serializers);
        self.deserializers.write().extend(deserializers);
    }

    /// Independent copy; later registrations on either side do not leak.
    pub fn snapshot(&self) -> Registry {
        Registry {
            serializers: Arc::new(RwLock::new(self.serializers.read().clone())),
            deserializers: Arc::new(RwLock::new(self.deserializers.read().clone())),
        }
    }
}
