use crate::math::Real;
use crate::voxelization::{
    Backend, Capacity, PointCloud, ReduceMode, Representation, VoxelizationError,
    VoxelizationParams, VoxelizationResult,
};

/// Hard voxelization of point clouds.
///
/// A `Voxelizer` bundles the grid parameters, the execution [`Backend`] and the
/// [`Representation`] of the output. It holds no state between calls.
///
/// # Example
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use pillarvox::voxelization::{PointCloud, ReduceMode, VoxelizationParams, Voxelizer};
///
/// // x, y, z, intensity
/// let points = [
///     0.1, 0.1, 0.1, 1.0,
///     0.2, 0.3, 0.4, 3.0,
///     1.5, 0.2, 0.2, 5.0,
/// ];
/// let cloud = PointCloud::new(&points, 4).unwrap();
/// let params = VoxelizationParams::new(&[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0, 4.0, 4.0, 4.0]);
/// let voxelizer = Voxelizer::new(params).with_reduce_mode(ReduceMode::Mean);
///
/// let result = voxelizer.voxelize(&cloud, true).unwrap().unwrap();
/// assert_eq!(result.num_voxels(), 2);
/// assert_eq!(result.coords()[1].as_slice(), &[1, 0, 0]);
/// assert_eq!(result.reduced_row(0).unwrap()[3], 2.0);
/// # }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Voxelizer {
    params: VoxelizationParams,
    backend: Backend,
    representation: Representation,
}

impl Voxelizer {
    /// A sequential voxelizer storing raw points.
    pub fn new(params: VoxelizationParams) -> Self {
        Self {
            params,
            backend: Backend::Sequential,
            representation: Representation::Points,
        }
    }

    /// Selects the execution backend.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    /// Selects how voxel contents are represented.
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Reduces the stored points of each voxel into a single row.
    pub fn with_reduce_mode(self, mode: ReduceMode) -> Self {
        self.with_representation(Representation::Reduced(mode))
    }

    /// The grid and capacity parameters.
    pub fn params(&self) -> &VoxelizationParams {
        &self.params
    }

    /// The execution backend.
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// The output representation.
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Voxelizes `points`.
    ///
    /// Points are processed in input order: the first `max_voxels` distinct
    /// voxels encountered are created, and each voxel stores its first
    /// `max_points` points. Points outside of the coordinates range, points
    /// falling into a voxel that could not be created, and points exceeding the
    /// capacity of their voxel are dropped (the latter are still counted by
    /// [`VoxelizationResult::true_num_points_per_voxel`]).
    ///
    /// Returns `Ok(None)` if `deterministic` is `false` and the backend cannot
    /// honor that (see [`Backend::honors_non_deterministic`]): nothing was
    /// voxelized, and the caller should retry in deterministic mode or with
    /// another backend.
    pub fn voxelize(
        &self,
        points: &PointCloud,
        deterministic: bool,
    ) -> Result<Option<VoxelizationResult>, VoxelizationError> {
        let grid = self.params.grid()?;
        points.check_ndim(grid.ndim())?;
        let exec = self.backend.executor()?;

        if !deterministic && !self.backend.honors_non_deterministic() {
            log::debug!(
                "non-deterministic voxelization is not available on the {:?} backend, nothing produced",
                self.backend
            );
            return Ok(None);
        }

        let assignment = exec.assign(
            points,
            &grid,
            self.params.max_points,
            self.params.max_voxels,
        );
        let result = VoxelizationResult::gather(exec, points, assignment, self.representation);

        let stats = result.stats();
        log::debug!(
            "voxelized {} points into {} voxels ({} out of range, {} over max_voxels, {} over max_points)",
            stats.num_points,
            result.num_voxels(),
            stats.out_of_range,
            stats.dropped_by_max_voxels,
            stats.dropped_by_max_points,
        );

        Ok(Some(result))
    }
}

/// Voxelizes `points` with the sequential backend, using the integer and string
/// conventions of tensor libraries.
///
/// - `max_points` and `max_voxels` are unbounded if negative, and rejected if zero.
/// - `reduce_mode` is `None` to keep raw points, or one of `"sum"`, `"mean"`,
///   `"max"` to get one reduced row per voxel. Any other string is rejected before
///   any point is read.
pub fn voxelize(
    points: &PointCloud,
    voxel_size: &[Real],
    coords_range: &[Real],
    max_points: i64,
    max_voxels: i64,
    reduce_mode: Option<&str>,
    deterministic: bool,
) -> Result<Option<VoxelizationResult>, VoxelizationError> {
    let representation = match reduce_mode {
        Some(mode) => Representation::Reduced(mode.parse()?),
        None => Representation::Points,
    };

    let params = VoxelizationParams {
        voxel_size: voxel_size.to_vec(),
        coords_range: coords_range.to_vec(),
        max_points: Capacity::from_sentinel(max_points, "max_points")?,
        max_voxels: Capacity::from_sentinel(max_voxels, "max_voxels")?,
    };

    Voxelizer::new(params)
        .with_representation(representation)
        .voxelize(points, deterministic)
}
