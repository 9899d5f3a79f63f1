//! Hard and dynamic voxelization of point clouds.
//!
//! The entry points are:
//! - [`Voxelizer`] (and its string/sentinel-based wrapper [`voxelize`]), returning
//!   an owned [`VoxelizationResult`];
//! - [`hard_voxelize`], writing multi-scale results into pre-allocated buffers
//!   (see [`VoxelBuffers`]);
//! - [`dynamic_voxelize`], computing the voxel of every point without capacity
//!   limits.

pub use self::assign::VoxelizationStats;
pub use self::backend::Backend;
pub use self::dynamic::{dynamic_voxelize, dynamic_voxelize_into};
pub use self::error::{InvalidArgument, VoxelizationError};
pub use self::grid::{VoxelGrid, VoxelGridCoord};
pub use self::hard_voxelize::{hard_voxelize, VoxelBuffers};
pub use self::params::{Capacity, VoxelizationParams};
pub use self::point_cloud::{flatten_points3, PointCloud};
pub use self::reduce::ReduceMode;
pub use self::result::{Representation, VoxelFeatures, VoxelizationResult};
pub use self::voxelizer::{voxelize, Voxelizer};

mod assign;
mod backend;
mod dynamic;
mod error;
mod grid;
mod hard_voxelize;
mod params;
mod point_cloud;
mod reduce;
mod result;
mod voxelizer;
