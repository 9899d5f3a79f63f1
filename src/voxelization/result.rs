use crate::math::{GridInt, Real};
use crate::voxelization::assign::Assignment;
use crate::voxelization::backend::Executor;
use crate::voxelization::{PointCloud, ReduceMode, VoxelGridCoord, VoxelizationStats};
use core::slice::ChunksExact;

/// How the content of each voxel is represented in a [`VoxelizationResult`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Representation {
    /// The stored points themselves, up to `max_points` per voxel.
    #[default]
    Points,
    /// A single row per voxel, combining the stored points.
    Reduced(ReduceMode),
}

/// The content of the voxels of a [`VoxelizationResult`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum VoxelFeatures {
    /// The rows of the stored points, grouped by voxel.
    Points {
        /// The points of voxel `i` are the rows `offsets[i]..offsets[i + 1]`.
        offsets: Vec<usize>,
        /// The flat, row-major, point rows.
        rows: Vec<Real>,
    },
    /// One reduced row per voxel.
    Reduced {
        /// The reduction applied.
        mode: ReduceMode,
        /// The flat, row-major, reduced rows.
        rows: Vec<Real>,
    },
}

/// The voxels produced by [`Voxelizer::voxelize`](crate::voxelization::Voxelizer::voxelize).
///
/// Voxels are indexed in admission order: voxel `0` is the voxel of the first
/// in-range point, voxel `1` the first voxel different from voxel `0` that was
/// encountered, etc.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VoxelizationResult {
    row_width: usize,
    coords: Vec<VoxelGridCoord>,
    num_points: Vec<u32>,
    true_num_points: Vec<u32>,
    features: VoxelFeatures,
    stats: VoxelizationStats,
}

static_assertions::assert_impl_all!(VoxelizationResult: Send, Sync);

impl VoxelizationResult {
    pub(crate) fn gather(
        exec: Executor,
        cloud: &PointCloud,
        assignment: Assignment,
        representation: Representation,
    ) -> Self {
        let row_width = cloud.row_width();

        let features = match representation {
            Representation::Points => {
                let members = &assignment.members;
                let mut rows = vec![0.0; members.len() * row_width];
                exec.fill_chunks(&mut rows, row_width, |k, dst| {
                    dst.copy_from_slice(cloud.row(members[k]))
                });
                VoxelFeatures::Points {
                    offsets: assignment.offsets.clone(),
                    rows,
                }
            }
            Representation::Reduced(mode) => {
                let mut rows = vec![0.0; assignment.num_voxels() * row_width];
                exec.fill_chunks(&mut rows, row_width, |slot, dst| {
                    let members = assignment.members(slot).iter();
                    let _ = mode.reduce(members.map(|i| cloud.row(*i)), dst);
                });
                VoxelFeatures::Reduced { mode, rows }
            }
        };

        Self {
            row_width,
            coords: assignment.coords,
            num_points: assignment.num_points,
            true_num_points: assignment.true_num_points,
            features,
            stats: assignment.stats,
        }
    }

    /// The number of voxels.
    pub fn num_voxels(&self) -> usize {
        self.coords.len()
    }

    /// Does this result contain no voxel?
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The number of values per point (or per reduced row).
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// The grid coordinates of all the voxels, in admission order.
    pub fn coords(&self) -> &[VoxelGridCoord] {
        &self.coords
    }

    /// The number of points stored in each voxel, never larger than `max_points`.
    pub fn num_points_per_voxel(&self) -> &[u32] {
        &self.num_points
    }

    /// The number of in-range points that fell into each voxel, including the
    /// ones that were not stored because the voxel was full.
    pub fn true_num_points_per_voxel(&self) -> &[u32] {
        &self.true_num_points
    }

    /// The content of the voxels.
    pub fn features(&self) -> &VoxelFeatures {
        &self.features
    }

    /// What happened to the input points.
    pub fn stats(&self) -> &VoxelizationStats {
        &self.stats
    }

    /// The index of the voxel with the given coordinates, if it exists.
    pub fn find(&self, coord: &[GridInt]) -> Option<usize> {
        self.coords.iter().position(|c| c.as_slice() == coord)
    }

    /// The points stored in the `i`-th voxel, in input order.
    ///
    /// Returns `None` if the voxels were reduced.
    pub fn voxel_points(&self, i: usize) -> Option<ChunksExact<'_, Real>> {
        match &self.features {
            VoxelFeatures::Points { offsets, rows } => Some(
                rows[offsets[i] * self.row_width..offsets[i + 1] * self.row_width]
                    .chunks_exact(self.row_width),
            ),
            VoxelFeatures::Reduced { .. } => None,
        }
    }

    /// The reduced row of the `i`-th voxel.
    ///
    /// Returns `None` if the voxels were not reduced.
    pub fn reduced_row(&self, i: usize) -> Option<&[Real]> {
        match &self.features {
            VoxelFeatures::Reduced { rows, .. } => {
                Some(&rows[i * self.row_width..(i + 1) * self.row_width])
            }
            VoxelFeatures::Points { .. } => None,
        }
    }
}
