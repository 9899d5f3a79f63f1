//! Hashing utilities used by the voxel admission tables.

pub use self::coord_hasher::CoordHasher32;

mod coord_hasher;
pub mod hashmap;
