//! Encoding/decoding configuration.

use core::any::TypeId;
use core::fmt;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::overrides::{
    Decoder, Encoder, ResolvedRecord, SchemaFieldSlot, resolve_overrides,
};
use crate::record::{Record, RecordInfo};

/// How timestamps are written when no field override says otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Seconds since the Unix epoch, fractional when needed
    #[default]
    Posix,
    /// RFC 3339 strings
    Iso8601,
}

/// Element order of encoded sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetOrder {
    /// Whatever order the set iterates in
    #[default]
    Iteration,
    /// Sorted by the canonical order of the encoded elements
    Sorted,
}

/// Configuration threaded through every encode and decode call.
///
/// Cloning is cheap; clones share the type-keyed registry and its override
/// cache. Registering a global override detaches the registry and starts a
/// fresh cache.
#[derive(Clone, Default)]
pub struct Config {
    /// Fill absent fields without defaults with `null` instead of failing
    pub infer_missing: bool,

    /// Default timestamp encoding
    pub timestamp_format: TimestampFormat,

    /// Element order of encoded sets
    pub set_order: SetOrder,

    registry: Arc<Registry>,
}

#[derive(Default)]
struct Registry {
    encoders: HashMap<TypeId, Encoder>,
    decoders: HashMap<TypeId, Decoder>,
    schema_fields: HashMap<TypeId, SchemaFieldSlot>,
    cache: RwLock<HashMap<TypeId, Arc<ResolvedRecord>>>,
}

impl Clone for Registry {
    fn clone(&self) -> Self {
        Registry {
            encoders: self.encoders.clone(),
            decoders: self.decoders.clone(),
            schema_fields: self.schema_fields.clone(),
            cache: RwLock::default(),
        }
    }
}

impl Config {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether absent fields are inferred as `null`.
    pub fn infer_missing(mut self, infer_missing: bool) -> Self {
        self.infer_missing = infer_missing;
        self
    }

    /// Set the default timestamp encoding.
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Set the order of encoded sets.
    pub fn set_order(mut self, order: SetOrder) -> Self {
        self.set_order = order;
        self
    }

    /// Use `encoder` for every record field declared with type `T`.
    pub fn encoder<T: 'static>(mut self, encoder: Encoder) -> Self {
        Arc::make_mut(&mut self.registry)
            .encoders
            .insert(TypeId::of::<T>(), encoder);
        self.clear_cache();
        self
    }

    /// Use `decoder` for every record field declared with type `T`.
    pub fn decoder<T: 'static>(mut self, decoder: Decoder) -> Self {
        Arc::make_mut(&mut self.registry)
            .decoders
            .insert(TypeId::of::<T>(), decoder);
        self.clear_cache();
        self
    }

    /// Use `field` as the schema field of every record field declared with type `T`.
    pub fn schema_field<T: 'static>(mut self, field: impl core::any::Any + Send + Sync) -> Self {
        Arc::make_mut(&mut self.registry)
            .schema_fields
            .insert(TypeId::of::<T>(), SchemaFieldSlot::new(field));
        self.clear_cache();
        self
    }

    pub(crate) fn global_encoder(&self, type_id: TypeId) -> Option<&Encoder> {
        self.registry.encoders.get(&type_id)
    }

    pub(crate) fn global_decoder(&self, type_id: TypeId) -> Option<&Decoder> {
        self.registry.decoders.get(&type_id)
    }

    pub(crate) fn global_schema_field(&self, type_id: TypeId) -> Option<&SchemaFieldSlot> {
        self.registry.schema_fields.get(&type_id)
    }

    /// Resolved overrides of `R`, computed once per registry.
    pub fn resolved<R: Record>(&self) -> Arc<ResolvedRecord> {
        self.resolved_info(R::record_info())
    }

    /// Resolved overrides of the record described by `info`.
    pub fn resolved_info(&self, info: &'static RecordInfo) -> Arc<ResolvedRecord> {
        {
            let cache = self
                .registry
                .cache
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(hit) = cache.get(&info.type_id) {
                return Arc::clone(hit);
            }
        }

        let resolved = Arc::new(resolve_overrides(info, self));
        let mut cache = self
            .registry
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(cache.entry(info.type_id).or_insert(resolved))
    }

    /// Number of records whose overrides are cached.
    pub fn cached_records(&self) -> usize {
        self.registry
            .cache
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Drop every cached resolution. They are recomputed on demand.
    pub fn clear_cache(&self) {
        self.registry
            .cache
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("infer_missing", &self.infer_missing)
            .field("timestamp_format", &self.timestamp_format)
            .field("set_order", &self.set_order)
            .field("encoders", &self.registry.encoders.len())
            .field("decoders", &self.registry.decoders.len())
            .field("schema_fields", &self.registry.schema_fields.len())
            .finish()
    }
}
