//! Process-wide registry of generated view types.
//!
//! Two tables share one locking scheme. Schemas are keyed by original type
//! alone and extracted once; view types are keyed by `(original type,
//! policy)` and built from the shared schema. Each key owns one slot that is
//! initialized at most once: concurrent first requests for the same key block
//! on the slot while a single caller generates, then all of them observe the
//! same value. A failure is stored in the slot as well, so a type that cannot
//! be substituted reports the same error on every request and is never
//! regenerated.
//!
//! The cache never evicts. The set of viewed types is fixed at compile time,
//! which bounds it.

use crate::error::ViewError;
use crate::policy::Policy;
use crate::schema::{Schema, Viewable};
use crate::view_type::ViewType;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, OnceLock};
use tracing::trace;

type Erased = Arc<dyn Any + Send + Sync>;
type Generated = Result<Erased, ViewError>;
type Slot = Arc<OnceLock<Generated>>;
type Table<K> = RwLock<HashMap<K, Slot>>;

static GLOBAL: OnceLock<ViewTypeCache> = OnceLock::new();

/// Memoized schemas and view types.
#[derive(Default)]
pub struct ViewTypeCache {
    schemas: Table<TypeId>,
    view_types: Table<(TypeId, Policy)>,
}

impl ViewTypeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cache used by every view operation of this process.
    pub fn global() -> &'static ViewTypeCache {
        GLOBAL.get_or_init(ViewTypeCache::new)
    }

    /// Returns the field model of `T`, extracting it on first request.
    pub fn schema<T: Viewable>(&self) -> Result<Arc<Schema<T>>, ViewError> {
        let slot = slot(&self.schemas, TypeId::of::<T>());
        let extracted = slot.get_or_init(|| {
            T::schema()
                .map(|schema| Arc::new(schema) as Erased)
                .map_err(ViewError::from)
        });
        restore::<Schema<T>>(extracted, std::any::type_name::<T>())
    }

    /// Returns the view type of `T` under `policy`, generating it on first
    /// request.
    pub fn resolve<T: Viewable>(&self, policy: Policy) -> Result<Arc<ViewType<T>>, ViewError> {
        let slot = slot(&self.view_types, (TypeId::of::<T>(), policy));
        let generated = slot.get_or_init(|| {
            let schema = self.schema::<T>()?;
            ViewType::generate(schema, policy).map(|view_type| Arc::new(view_type) as Erased)
        });
        restore::<ViewType<T>>(generated, std::any::type_name::<T>())
    }

    /// Returns `true` once generation for `T` under `policy` has finished,
    /// successfully or not.
    pub fn contains<T: Viewable>(&self, policy: Policy) -> bool {
        self.view_types
            .read()
            .get(&(TypeId::of::<T>(), policy))
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of view type keys requested so far.
    pub fn len(&self) -> usize {
        self.view_types.read().len()
    }

    /// Returns `true` if no view type was ever requested.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn slot<K: Hash + Eq>(table: &Table<K>, key: K) -> Slot {
    if let Some(slot) = table.read().get(&key) {
        trace!("view type cache hit");
        return Arc::clone(slot);
    }
    Arc::clone(table.write().entry(key).or_default())
}

fn restore<V: Any + Send + Sync>(generated: &Generated, type_name: &'static str) -> Result<Arc<V>, ViewError> {
    match generated {
        Ok(erased) => Arc::clone(erased)
            .downcast::<V>()
            .map_err(|_| ViewError::TypeGeneration {
                type_name,
                reason: "cached entry belongs to another type".to_string(),
            }),
        Err(err) => Err(err.clone()),
    }
}

impl std::fmt::Debug for ViewTypeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewTypeCache")
            .field("schemas", &self.schemas.read().len())
            .field("view_types", &self.len())
            .finish()
    }
}
