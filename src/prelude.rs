//! Collection aliases shared across the crate.
//!
//! Ordered maps use `FxHasher`; property keys are small and trusted, so the
//! fast non-DoS-resistant hasher is fine here.

pub use rustc_hash::{FxHashMap, FxHashSet};

// ═══════════════════════════════════════════════════════════════════════════════
// IndexMap/IndexSet - insertion ordered, FxHasher
// ═══════════════════════════════════════════════════════════════════════════════

pub type IndexMap<K, V> =
    indexmap::IndexMap<K, V, core::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

pub type IndexSet<T> =
    indexmap::IndexSet<T, core::hash::BuildHasherDefault<rustc_hash::FxHasher>>;

/// Create an empty IndexMap
#[inline]
pub fn index_map_new<K, V>() -> IndexMap<K, V>
where
    K: core::hash::Hash + Eq,
{
    indexmap::IndexMap::with_hasher(Default::default())
}

/// Create an empty IndexSet
#[inline]
pub fn index_set_new<T>() -> IndexSet<T>
where
    T: core::hash::Hash + Eq,
{
    indexmap::IndexSet::with_hasher(Default::default())
}
