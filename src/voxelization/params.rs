use crate::math::{Point3, Real, Vector3, DEFAULT_MAX_POINTS, DEFAULT_MAX_VOXELS};
use crate::voxelization::{InvalidArgument, VoxelGrid};

/// An upper bound on a number of points or voxels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum Capacity {
    /// At most this many elements are retained.
    Bounded(usize),
    /// Everything is retained.
    Unbounded,
}

impl Capacity {
    /// Converts the integer convention used by tensor libraries, where any negative
    /// value (typically `-1`) means "unbounded".
    ///
    /// A value of zero is rejected: it would silently drop every point.
    pub fn from_sentinel(value: i64, what: &'static str) -> Result<Self, InvalidArgument> {
        match value {
            0 => Err(InvalidArgument::ZeroCapacity(what)),
            v if v < 0 => Ok(Capacity::Unbounded),
            v => Ok(Capacity::Bounded(v as usize)),
        }
    }

    /// The bound, if any.
    pub fn bound(self) -> Option<usize> {
        match self {
            Capacity::Bounded(n) => Some(n),
            Capacity::Unbounded => None,
        }
    }

    /// Can one more element be retained when `count` are already?
    #[inline]
    pub fn admits(self, count: usize) -> bool {
        match self {
            Capacity::Bounded(n) => count < n,
            Capacity::Unbounded => true,
        }
    }

    pub(crate) fn check(self, what: &'static str) -> Result<(), InvalidArgument> {
        if self == Capacity::Bounded(0) {
            Err(InvalidArgument::ZeroCapacity(what))
        } else {
            Ok(())
        }
    }
}

impl From<usize> for Capacity {
    fn from(n: usize) -> Self {
        Capacity::Bounded(n)
    }
}

/// The geometric and capacity parameters of a hard voxelization.
///
/// The number of spatial dimensions is the length of `voxel_size`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VoxelizationParams {
    /// The size of a voxel along each dimension.
    pub voxel_size: Vec<Real>,
    /// All the range minimums followed by all the range maximums.
    pub coords_range: Vec<Real>,
    /// The maximum number of points stored in a single voxel.
    pub max_points: Capacity,
    /// The maximum number of voxels created.
    pub max_voxels: Capacity,
}

impl VoxelizationParams {
    /// Parameters with the default capacities.
    pub fn new(voxel_size: &[Real], coords_range: &[Real]) -> Self {
        Self {
            voxel_size: voxel_size.to_vec(),
            coords_range: coords_range.to_vec(),
            max_points: Capacity::Bounded(DEFAULT_MAX_POINTS),
            max_voxels: Capacity::Bounded(DEFAULT_MAX_VOXELS),
        }
    }

    /// Parameters for a 3D grid spanning the box `[mins, maxs]`.
    pub fn new_3d(voxel_size: Vector3<Real>, mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        let coords_range: Vec<Real> = mins.iter().chain(maxs.iter()).copied().collect();
        Self::new(voxel_size.as_slice(), &coords_range)
    }

    /// Sets the maximum number of points per voxel.
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = Capacity::Bounded(max_points);
        self
    }

    /// Sets the maximum number of voxels.
    pub fn with_max_voxels(mut self, max_voxels: usize) -> Self {
        self.max_voxels = Capacity::Bounded(max_voxels);
        self
    }

    /// Sets both capacities, possibly unbounded.
    pub fn with_capacities(mut self, max_points: Capacity, max_voxels: Capacity) -> Self {
        self.max_points = max_points;
        self.max_voxels = max_voxels;
        self
    }

    /// The number of spatial dimensions.
    pub fn ndim(&self) -> usize {
        self.voxel_size.len()
    }

    /// Validates these parameters and builds the corresponding grid.
    pub fn grid(&self) -> Result<VoxelGrid, InvalidArgument> {
        self.max_points.check("max_points")?;
        self.max_voxels.check("max_voxels")?;
        VoxelGrid::new(&self.voxel_size, &self.coords_range, self.ndim())
    }
}
