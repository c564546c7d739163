//! Collection type aliases used throughout the crate.
//!
//! Hash maps and sets use the fast non-cryptographic `FxHash` from
//! `rustc-hash`; keys here are small integer tuples and tetrahedron keys, so
//! DoS resistance is not a concern. Short per-operation lists live in a
//! [`SmallBuffer`] to stay on the stack.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

#[cfg(not(feature = "dense-slotmap"))]
use slotmap::SlotMap;

#[cfg(feature = "dense-slotmap")]
use slotmap::DenseSlotMap;

pub use slotmap::SecondaryMap;

/// Arena for tetrahedra.
///
/// - **default** (`dense-slotmap`): `DenseSlotMap`, contiguous storage and
///   faster iteration.
/// - without the feature: `SlotMap`, faster removal.
///
/// Both hand out generational keys and reuse freed slots, so a key of a
/// removed tetrahedron never resolves to a later one.
#[cfg(not(feature = "dense-slotmap"))]
pub type StorageMap<K, V> = SlotMap<K, V>;

/// Arena for tetrahedra.
///
/// - **default** (`dense-slotmap`): `DenseSlotMap`, contiguous storage and
///   faster iteration.
/// - without the feature: `SlotMap`, faster removal.
///
/// Both hand out generational keys and reuse freed slots, so a key of a
/// removed tetrahedron never resolves to a later one.
#[cfg(feature = "dense-slotmap")]
pub type StorageMap<K, V> = DenseSlotMap<K, V>;

/// Hash map with `FxHash`.
pub type FastHashMap<K, V> = FxHashMap<K, V>;

/// Hash set with `FxHash`.
pub type FastHashSet<T> = FxHashSet<T>;

pub use std::collections::hash_map::Entry;

/// Stack-first vector holding up to `N` elements inline.
pub type SmallBuffer<T, const N: usize> = SmallVec<[T; N]>;

/// Creates a [`FastHashMap`] with room for `capacity` entries.
#[must_use]
pub fn fast_hash_map_with_capacity<K, V>(capacity: usize) -> FastHashMap<K, V> {
    FastHashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

/// Creates a [`FastHashSet`] with room for `capacity` entries.
#[must_use]
pub fn fast_hash_set_with_capacity<T>(capacity: usize) -> FastHashSet<T> {
    FastHashSet::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}
