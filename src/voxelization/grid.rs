use crate::math::{GridInt, Point3, Real};
use crate::num::ToPrimitive;
use crate::voxelization::InvalidArgument;
use core::ops::Deref;
use smallvec::SmallVec;

// Relative slack under which a cell count is considered a whole number. Covers
// the rounding error of `(max - min) / size` for ranges such as `69.12 / 0.16`.
const WHOLE_CELLS_TOLERANCE: Real = 1.0e-5;

/// The integer coordinates of a voxel in a [`VoxelGrid`].
///
/// Component `d` is `floor((p[d] - min[d]) / voxel_size[d])` for any point `p`
/// inside the voxel, so it always lies in `[0, extent[d])`. Components are stored
/// in dimension order (x first).
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VoxelGridCoord(SmallVec<[GridInt; 4]>);

impl VoxelGridCoord {
    /// Creates a coordinate from its components, in dimension order.
    pub fn new(components: &[GridInt]) -> Self {
        Self(SmallVec::from_slice(components))
    }

    /// The components of this coordinate, in dimension order.
    pub fn as_slice(&self) -> &[GridInt] {
        &self.0
    }

    /// This coordinate with its components in reverse order (z first in 3D).
    ///
    /// This is the layout expected by most sparse-convolution backends.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    /// Converts a 3-dimensional coordinate into a point.
    pub fn to_point3(&self) -> Option<Point3<GridInt>> {
        match *self.as_slice() {
            [x, y, z] => Some(Point3::new(x, y, z)),
            _ => None,
        }
    }
}

impl Deref for VoxelGridCoord {
    type Target = [GridInt];

    fn deref(&self) -> &[GridInt] {
        &self.0
    }
}

impl From<Point3<GridInt>> for VoxelGridCoord {
    fn from(pt: Point3<GridInt>) -> Self {
        Self::new(pt.coords.as_slice())
    }
}

/// A validated regular grid: origin, voxel size, and number of voxels along each
/// dimension.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
    mins: SmallVec<[Real; 4]>,
    maxs: SmallVec<[Real; 4]>,
    voxel_size: SmallVec<[Real; 4]>,
    extent: SmallVec<[GridInt; 4]>,
}

impl VoxelGrid {
    /// Builds a grid over `coords_range` with cells of size `voxel_size`.
    ///
    /// `coords_range` is laid out as all the minimums followed by all the
    /// maximums (`[x_min, y_min, z_min, x_max, y_max, z_max]` in 3D). The number
    /// of cells along dimension `d` is `ceil((max[d] - min[d]) / voxel_size[d])`:
    /// when the range is not a whole number of voxels, the last cell is cut at
    /// `max[d]`.
    pub fn new(
        voxel_size: &[Real],
        coords_range: &[Real],
        ndim: usize,
    ) -> Result<Self, InvalidArgument> {
        if ndim == 0 {
            return Err(InvalidArgument::ZeroDimension);
        }

        if voxel_size.len() != ndim {
            return Err(InvalidArgument::DimensionMismatch {
                what: "voxel_size",
                expected: ndim,
                found: voxel_size.len(),
            });
        }

        if coords_range.len() != 2 * ndim {
            return Err(InvalidArgument::DimensionMismatch {
                what: "coords_range",
                expected: 2 * ndim,
                found: coords_range.len(),
            });
        }

        let (mins, maxs) = coords_range.split_at(ndim);
        let mut extent = SmallVec::with_capacity(ndim);

        for dim in 0..ndim {
            let size = voxel_size[dim];
            if !size.is_finite() || size <= 0.0 {
                return Err(InvalidArgument::NonPositiveVoxelSize {
                    dim,
                    value: size as f64,
                });
            }

            let (min, max) = (mins[dim], maxs[dim]);
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(InvalidArgument::EmptyRange {
                    dim,
                    min: min as f64,
                    max: max as f64,
                });
            }

            let cells = (max - min) / size;
            let nearest = cells.round();
            let cells = if (cells - nearest).abs() <= cells * WHOLE_CELLS_TOLERANCE {
                nearest
            } else {
                cells.ceil()
            };
            extent.push(cells.to_i32().unwrap_or(GridInt::MAX).max(1));
        }

        Ok(Self {
            mins: SmallVec::from_slice(mins),
            maxs: SmallVec::from_slice(maxs),
            voxel_size: SmallVec::from_slice(voxel_size),
            extent,
        })
    }

    /// The number of spatial dimensions of this grid.
    pub fn ndim(&self) -> usize {
        self.extent.len()
    }

    /// The number of cells along each dimension.
    pub fn extent(&self) -> &[GridInt] {
        &self.extent
    }

    /// The size of a cell along each dimension.
    pub fn voxel_size(&self) -> &[Real] {
        &self.voxel_size
    }

    /// The lower corner of the grid.
    pub fn mins(&self) -> &[Real] {
        &self.mins
    }

    /// The upper corner of the grid, excluded from it.
    pub fn maxs(&self) -> &[Real] {
        &self.maxs
    }

    /// The coordinate of the voxel containing `point`.
    ///
    /// Only the first `self.ndim()` components of `point` are read. Returns
    /// `None` unless `min[d] <= point[d] < max[d]` along every dimension `d`
    /// (which also rejects non-finite coordinates).
    #[inline]
    pub fn coord_of(&self, point: &[Real]) -> Option<VoxelGridCoord> {
        let mut coord = SmallVec::with_capacity(self.ndim());

        for dim in 0..self.ndim() {
            let (p, min) = (point[dim], self.mins[dim]);

            // NOTE: written so that NaN is rejected too.
            if !(p >= min && p < self.maxs[dim]) {
                return None;
            }

            // The clamp only absorbs rounding errors of the division next to the
            // range bounds.
            let c = ((p - min) / self.voxel_size[dim]).floor() as GridInt;
            coord.push(c.clamp(0, self.extent[dim] - 1));
        }

        Some(VoxelGridCoord(coord))
    }

    /// The lower corner of the voxel with the given coordinate.
    pub fn voxel_origin(&self, coord: &VoxelGridCoord) -> SmallVec<[Real; 4]> {
        coord
            .iter()
            .zip(self.mins.iter().zip(self.voxel_size.iter()))
            .map(|(c, (min, size))| min + *c as Real * size)
            .collect()
    }
}
