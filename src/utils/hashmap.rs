//! A hash-map that behaves deterministically when the
//! `enhanced-determinism` feature is enabled.

/// Deterministic hashmap using [`indexmap::IndexMap`] and [`CoordHasher32`](super::CoordHasher32).
#[cfg(feature = "enhanced-determinism")]
pub type HashMap<K, V> =
    indexmap::IndexMap<K, V, core::hash::BuildHasherDefault<super::CoordHasher32>>;
#[cfg(feature = "enhanced-determinism")]
pub use indexmap::map::Entry;

/// Hashmap using [`hashbrown::HashMap`] with a fixed-seed hasher.
#[cfg(not(feature = "enhanced-determinism"))]
pub type HashMap<K, V> = hashbrown::hash_map::HashMap<K, V, foldhash::fast::FixedState>;
#[cfg(not(feature = "enhanced-determinism"))]
pub use hashbrown::hash_map::Entry;

/// Creates an empty map able to hold `capacity` entries without reallocating.
///
/// `capacity` is clamped so that an unbounded voxel budget does not translate
/// into a huge up-front allocation.
pub fn with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
    const MAX_PREALLOCATED: usize = 1 << 16;
    HashMap::with_capacity_and_hasher(capacity.min(MAX_PREALLOCATED), Default::default())
}
