use crate::math::{GridInt, Real};
use crate::voxelization::{
    Backend, InvalidArgument, PointCloud, VoxelGrid, VoxelGridCoord, VoxelizationError,
};

/// Computes the voxel coordinates of every point, without any capacity limit.
///
/// The `i`-th entry of the result is the coordinate of the `i`-th point, or
/// `None` if that point is outside of `coords_range`. This is the voxelization
/// used by dynamic-voxel detectors, where points are scattered to voxels later
/// on.
pub fn dynamic_voxelize(
    points: &PointCloud,
    voxel_size: &[Real],
    coords_range: &[Real],
    ndim: usize,
    backend: Backend,
) -> Result<Vec<Option<VoxelGridCoord>>, VoxelizationError> {
    let grid = VoxelGrid::new(voxel_size, coords_range, ndim)?;
    points.check_ndim(ndim)?;
    let exec = backend.executor()?;
    Ok(exec.grid_coords(points, &grid))
}

/// Writes dynamic voxel coordinates into a `[num_points, ndim]` buffer, with
/// every component of out-of-range points set to `-1`.
///
/// Returns the number of in-range points.
pub fn dynamic_voxelize_into(
    points: &PointCloud,
    coords: &mut [GridInt],
    voxel_size: &[Real],
    coords_range: &[Real],
    ndim: usize,
    backend: Backend,
) -> Result<usize, VoxelizationError> {
    let grid = VoxelGrid::new(voxel_size, coords_range, ndim)?;
    points.check_ndim(ndim)?;

    let required = points.len() * ndim;
    if coords.len() < required {
        return Err(InvalidArgument::BufferTooSmall {
            buffer: "coords",
            required,
            found: coords.len(),
        }
        .into());
    }

    let exec = backend.executor()?;
    let mut num_in_range = 0;

    for (dst, coord) in coords
        .chunks_exact_mut(ndim)
        .zip(exec.grid_coords(points, &grid))
    {
        match coord {
            Some(coord) => {
                dst.copy_from_slice(&coord);
                num_in_range += 1;
            }
            None => dst.fill(-1),
        }
    }

    Ok(num_in_range)
}
