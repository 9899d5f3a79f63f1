use crate::math::Real;
use crate::voxelization::assign::{Assigner, Assignment};
use crate::voxelization::{Capacity, PointCloud, VoxelGrid, VoxelGridCoord, VoxelizationError};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// The execution strategy of a voxelization.
///
/// Both backends produce bit-identical results in deterministic mode. The
/// [`Backend::Parallel`] backend requires the `parallel` feature; requesting it
/// from a build without that feature fails with
/// [`VoxelizationError::UnsupportedOperation`] instead of silently running
/// sequentially.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Backend {
    /// Single-threaded execution, always deterministic.
    #[default]
    Sequential,
    /// Multi-threaded execution on the rayon thread pool.
    ///
    /// Grid coordinates and output rows are computed in parallel while voxel
    /// admission runs in input order, so results do not depend on scheduling.
    Parallel,
}

impl Backend {
    /// Is this backend compiled in?
    pub fn is_available(self) -> bool {
        match self {
            Backend::Sequential => true,
            Backend::Parallel => cfg!(feature = "parallel"),
        }
    }

    /// Can this backend run with `deterministic = false`?
    ///
    /// The sequential backend ignores the flag since it is deterministic anyway.
    /// No backend currently implements a race-based admission, so parallel
    /// non-deterministic requests produce an empty output.
    pub fn honors_non_deterministic(self) -> bool {
        match self {
            Backend::Sequential => true,
            Backend::Parallel => false,
        }
    }

    pub(crate) fn executor(self) -> Result<Executor, VoxelizationError> {
        match self {
            Backend::Sequential => Ok(Executor::Sequential),
            #[cfg(feature = "parallel")]
            Backend::Parallel => Ok(Executor::Parallel),
            #[cfg(not(feature = "parallel"))]
            Backend::Parallel => Err(VoxelizationError::UnsupportedOperation(self)),
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub(crate) enum Executor {
    Sequential,
    #[cfg(feature = "parallel")]
    Parallel,
}

impl Executor {
    pub fn grid_coords(self, cloud: &PointCloud, grid: &VoxelGrid) -> Vec<Option<VoxelGridCoord>> {
        match self {
            Executor::Sequential => cloud.rows().map(|row| grid.coord_of(row)).collect(),
            #[cfg(feature = "parallel")]
            Executor::Parallel => cloud
                .as_slice()
                .par_chunks_exact(cloud.row_width())
                .map(|row| grid.coord_of(row))
                .collect(),
        }
    }

    pub fn assign(
        self,
        cloud: &PointCloud,
        grid: &VoxelGrid,
        max_points: Capacity,
        max_voxels: Capacity,
    ) -> Assignment {
        let mut assigner = Assigner::new(max_points, max_voxels, cloud.len());

        match self {
            Executor::Sequential => {
                for (i, row) in cloud.rows().enumerate() {
                    assigner.push(i, grid.coord_of(row));
                }
            }
            #[cfg(feature = "parallel")]
            Executor::Parallel => {
                let coords = self.grid_coords(cloud, grid);
                for (i, coord) in coords.into_iter().enumerate() {
                    assigner.push(i, coord);
                }
            }
        }

        assigner.finish()
    }

    /// Calls `f(i, chunk)` on each `chunk_len`-sized chunk of `out`.
    pub fn fill_chunks<F>(self, out: &mut [Real], chunk_len: usize, f: F)
    where
        F: Fn(usize, &mut [Real]) + Send + Sync,
    {
        match self {
            Executor::Sequential => out
                .chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk)),
            #[cfg(feature = "parallel")]
            Executor::Parallel => out
                .par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk)),
        }
    }
}
