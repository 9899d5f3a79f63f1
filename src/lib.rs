/*!
pillarvox
========

**pillarvox** groups point clouds into regular grids of voxels, the
pre-processing step of pillar/voxel-based 3D detectors.

Two flavors are provided:
- *hard* voxelization, where each voxel keeps at most `max_points` points and at
  most `max_voxels` voxels are created, see [`voxelization::Voxelizer`] and
  [`voxelization::hard_voxelize`];
- *dynamic* voxelization, where every point simply gets its grid coordinate, see
  [`voxelization::dynamic_voxelize`].

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.
#![deny(unused_qualifications)]

#[cfg(all(feature = "f32", feature = "f64"))]
core::compile_error!("The `f32` and `f64` features are mutually exclusive.");

#[cfg(feature = "serde-serialize")]
#[macro_use]
extern crate serde;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod utils;
pub mod voxelization;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Point3, Vector3};

    /// The number of spatial dimensions assumed when none is given.
    pub const DEFAULT_NDIM: usize = 3;

    /// The maximum number of points per voxel used by default by a hard voxelization.
    pub const DEFAULT_MAX_POINTS: usize = 32;

    /// The maximum number of voxels created by default by a hard voxelization.
    pub const DEFAULT_MAX_VOXELS: usize = 20000;

    /// The integer type of voxel grid coordinates.
    pub type GridInt = i32;
}
