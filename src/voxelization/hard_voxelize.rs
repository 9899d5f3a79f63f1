use crate::math::{GridInt, Real};
use crate::voxelization::{
    Backend, Capacity, InvalidArgument, PointCloud, VoxelGrid, VoxelizationError,
};
use core::slice::ChunksExact;

/// Multi-scale hard voxelization into caller-provided buffers.
///
/// One voxelization is performed per scale, scale `s` using the voxel size
/// `voxel_sizes[s]` and at most `max_pointses[s]` points per voxel. With
/// `scales = voxel_sizes.len()`, `max_points = max(max_pointses)`, and
/// `row_width = points.row_width()`, the buffers are laid out as:
/// - `voxels`: `[scales, max_voxels, max_points, row_width]`,
/// - `coords`: `[scales, max_voxels, ndim]`, in dimension order,
/// - `num_points_per_voxel`: `[scales, max_voxels]`.
///
/// Only the entries of the voxels actually created are written; everything else
/// keeps its initial value. The returned vector gives the number of voxels
/// created at each scale.
///
/// An empty vector is returned, without touching the buffers, if `deterministic`
/// is `false` and the backend cannot honor it (see
/// [`Backend::honors_non_deterministic`]).
///
/// All the arguments (including buffer sizes) are validated before any point is
/// read. At least one scale is required.
pub fn hard_voxelize<S: AsRef<[Real]>>(
    points: &PointCloud,
    voxels: &mut [Real],
    coords: &mut [GridInt],
    num_points_per_voxel: &mut [GridInt],
    voxel_sizes: &[S],
    coords_range: &[Real],
    max_pointses: &[usize],
    max_voxels: usize,
    ndim: usize,
    deterministic: bool,
    backend: Backend,
) -> Result<Vec<usize>, VoxelizationError> {
    if voxel_sizes.len() != max_pointses.len() {
        return Err(InvalidArgument::ScaleCountMismatch {
            voxel_sizes: voxel_sizes.len(),
            max_points: max_pointses.len(),
        }
        .into());
    }

    if voxel_sizes.is_empty() {
        return Err(InvalidArgument::NoScale.into());
    }

    Capacity::Bounded(max_voxels).check("max_voxels")?;
    for max_points in max_pointses {
        Capacity::Bounded(*max_points).check("max_points")?;
    }

    let grids = voxel_sizes
        .iter()
        .map(|voxel_size| VoxelGrid::new(voxel_size.as_ref(), coords_range, ndim))
        .collect::<Result<Vec<_>, _>>()?;
    points.check_ndim(ndim)?;

    let shape = BufferShape {
        scales: voxel_sizes.len(),
        max_voxels,
        max_points: max_pointses.iter().copied().max().unwrap_or(0),
        row_width: points.row_width(),
        ndim,
    };
    shape.check([voxels.len(), coords.len(), num_points_per_voxel.len()])?;

    let exec = backend.executor()?;

    if !deterministic && !backend.honors_non_deterministic() {
        log::debug!(
            "non-deterministic hard voxelization is not available on the {:?} backend, nothing produced",
            backend
        );
        return Ok(Vec::new());
    }

    let voxel_stride = shape.voxel_stride();
    let row_width = shape.row_width;
    let mut voxel_nums = Vec::with_capacity(shape.scales);

    for (scale, (grid, max_points)) in grids.iter().zip(max_pointses).enumerate() {
        let assignment = exec.assign(
            points,
            grid,
            Capacity::Bounded(*max_points),
            Capacity::Bounded(max_voxels),
        );
        let num_voxels = assignment.num_voxels();
        let first = scale * max_voxels;

        let scale_voxels =
            &mut voxels[first * voxel_stride..(first + num_voxels) * voxel_stride];
        exec.fill_chunks(scale_voxels, voxel_stride, |slot, dst| {
            for (k, point_id) in assignment.members(slot).iter().enumerate() {
                dst[k * row_width..(k + 1) * row_width].copy_from_slice(points.row(*point_id));
            }
        });

        for (slot, coord) in assignment.coords.iter().enumerate() {
            let start = (first + slot) * ndim;
            coords[start..start + ndim].copy_from_slice(coord);
            num_points_per_voxel[first + slot] = assignment.num_points[slot] as GridInt;
        }

        log::debug!(
            "scale {}: {} voxels from {} points ({} out of range, {} over max_voxels, {} over max_points)",
            scale,
            num_voxels,
            assignment.stats.num_points,
            assignment.stats.out_of_range,
            assignment.stats.dropped_by_max_voxels,
            assignment.stats.dropped_by_max_points,
        );
        voxel_nums.push(num_voxels);
    }

    Ok(voxel_nums)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct BufferShape {
    scales: usize,
    max_voxels: usize,
    max_points: usize,
    row_width: usize,
    ndim: usize,
}

impl BufferShape {
    /// The number of values per voxel in the voxels buffer.
    ///
    /// Only valid once [`BufferShape::required_lens`] did not overflow.
    fn voxel_stride(&self) -> usize {
        self.max_points * self.row_width
    }

    /// The number of elements of the voxels, coords, and num_points_per_voxel
    /// buffers, `None` if it does not fit in a `usize`.
    fn required_lens(&self) -> [(&'static str, Option<usize>); 3] {
        let slots = self.scales.checked_mul(self.max_voxels);
        let voxel_stride = self.max_points.checked_mul(self.row_width);

        [
            (
                "voxels",
                slots
                    .zip(voxel_stride)
                    .and_then(|(slots, stride)| slots.checked_mul(stride)),
            ),
            ("coords", slots.and_then(|slots| slots.checked_mul(self.ndim))),
            ("num_points_per_voxel", slots),
        ]
    }

    fn check(&self, found: [usize; 3]) -> Result<(), InvalidArgument> {
        for ((buffer, required), found) in self.required_lens().into_iter().zip(found) {
            let required = required.unwrap_or(usize::MAX);
            if found < required {
                return Err(InvalidArgument::BufferTooSmall {
                    buffer,
                    required,
                    found,
                });
            }
        }

        Ok(())
    }
}

/// Zero-initialized output buffers for [`hard_voxelize`].
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelBuffers {
    max_pointses: Vec<usize>,
    shape: BufferShape,
    voxels: Vec<Real>,
    coords: Vec<GridInt>,
    num_points_per_voxel: Vec<GridInt>,
}

impl VoxelBuffers {
    /// Allocates buffers for one scale per entry of `max_pointses`.
    ///
    /// Fails with [`InvalidArgument::BufferTooSmall`] if the size of a buffer does
    /// not fit in a `usize`.
    pub fn zeros(
        max_pointses: &[usize],
        max_voxels: usize,
        row_width: usize,
        ndim: usize,
    ) -> Result<Self, InvalidArgument> {
        let shape = BufferShape {
            scales: max_pointses.len(),
            max_voxels,
            max_points: max_pointses.iter().copied().max().unwrap_or(0),
            row_width,
            ndim,
        };

        let mut lens = [0; 3];
        for (len, (buffer, required)) in lens.iter_mut().zip(shape.required_lens()) {
            *len = required.ok_or(InvalidArgument::BufferTooSmall {
                buffer,
                required: usize::MAX,
                found: 0,
            })?;
        }

        Ok(Self {
            max_pointses: max_pointses.to_vec(),
            shape,
            voxels: vec![0.0; lens[0]],
            coords: vec![0; lens[1]],
            num_points_per_voxel: vec![0; lens[2]],
        })
    }

    /// Runs [`hard_voxelize`] on these buffers, with the `max_pointses` and
    /// `max_voxels` they were allocated for.
    pub fn voxelize<S: AsRef<[Real]>>(
        &mut self,
        points: &PointCloud,
        voxel_sizes: &[S],
        coords_range: &[Real],
        deterministic: bool,
        backend: Backend,
    ) -> Result<Vec<usize>, VoxelizationError> {
        if points.row_width() != self.shape.row_width {
            return Err(InvalidArgument::PointStride {
                row_width: points.row_width(),
                ndim: self.shape.ndim,
                len: points.as_slice().len(),
            }
            .into());
        }

        hard_voxelize(
            points,
            &mut self.voxels,
            &mut self.coords,
            &mut self.num_points_per_voxel,
            voxel_sizes,
            coords_range,
            &self.max_pointses,
            self.shape.max_voxels,
            self.shape.ndim,
            deterministic,
            backend,
        )
    }

    /// The number of scales.
    pub fn num_scales(&self) -> usize {
        self.shape.scales
    }

    /// The raw buffers: voxels, coordinates, and number of points per voxel.
    pub fn as_mut_slices(&mut self) -> (&mut [Real], &mut [GridInt], &mut [GridInt]) {
        (
            &mut self.voxels,
            &mut self.coords,
            &mut self.num_points_per_voxel,
        )
    }

    /// The stored points of the `voxel`-th voxel of the given scale.
    ///
    /// All the `max_pointses[scale]` rows are returned; only the first
    /// `num_points_per_voxel(scale, ..)[voxel]` are meaningful.
    pub fn voxel_rows(&self, scale: usize, voxel: usize) -> ChunksExact<'_, Real> {
        let stride = self.shape.voxel_stride();
        let start = (scale * self.shape.max_voxels + voxel) * stride;
        let len = self.max_pointses[scale] * self.shape.row_width;
        self.voxels[start..start + len].chunks_exact(self.shape.row_width)
    }

    /// The coordinates of the first `num_voxels` voxels of the given scale, as
    /// consecutive groups of `ndim` integers.
    pub fn coords(&self, scale: usize, num_voxels: usize) -> &[GridInt] {
        let start = scale * self.shape.max_voxels * self.shape.ndim;
        &self.coords[start..start + num_voxels * self.shape.ndim]
    }

    /// The number of points stored in the first `num_voxels` voxels of the given scale.
    pub fn num_points_per_voxel(&self, scale: usize, num_voxels: usize) -> &[GridInt] {
        let start = scale * self.shape.max_voxels;
        &self.num_points_per_voxel[start..start + num_voxels]
    }
}
