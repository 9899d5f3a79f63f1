use crate::math::{Point3, Real};
use crate::voxelization::InvalidArgument;
use core::slice::ChunksExact;

/// A borrowed, row-major point buffer.
///
/// Each row holds the spatial coordinates of one point, followed by any number of
/// feature channels (intensity, timestamp, …). The number of spatial dimensions
/// is not part of the cloud: it is given by the grid the cloud is voxelized on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointCloud<'a> {
    data: &'a [Real],
    row_width: usize,
}

impl<'a> PointCloud<'a> {
    /// Wraps a flat buffer of `data.len() / row_width` points.
    pub fn new(data: &'a [Real], row_width: usize) -> Result<Self, InvalidArgument> {
        if row_width == 0 || data.len() % row_width != 0 {
            return Err(InvalidArgument::PointStride {
                row_width,
                ndim: 0,
                len: data.len(),
            });
        }

        Ok(Self { data, row_width })
    }

    /// The number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() / self.row_width
    }

    /// Does this cloud contain no point?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The number of values per point.
    #[inline]
    pub fn row_width(&self) -> usize {
        self.row_width
    }

    /// The flat buffer of all the points.
    #[inline]
    pub fn as_slice(&self) -> &'a [Real] {
        self.data
    }

    /// The `i`-th point.
    #[inline]
    pub fn row(&self, i: usize) -> &'a [Real] {
        &self.data[i * self.row_width..(i + 1) * self.row_width]
    }

    /// Iterates through all the points, in order.
    #[inline]
    pub fn rows(&self) -> ChunksExact<'a, Real> {
        self.data.chunks_exact(self.row_width)
    }

    pub(crate) fn check_ndim(&self, ndim: usize) -> Result<(), InvalidArgument> {
        if self.row_width < ndim {
            Err(InvalidArgument::PointStride {
                row_width: self.row_width,
                ndim,
                len: self.data.len(),
            })
        } else {
            Ok(())
        }
    }
}

/// Flattens 3D points into a row-major buffer suitable for [`PointCloud::new`] with a
/// row width of 3.
pub fn flatten_points3(points: &[Point3<Real>]) -> Vec<Real> {
    points.iter().flat_map(|pt| pt.coords.iter().copied()).collect()
}
