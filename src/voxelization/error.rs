use crate::voxelization::Backend;

/// Errors that can occur while voxelizing a point cloud.
///
/// All of them are detected before any point is processed: a call that fails
/// never leaves partially written output behind.
///
/// Note that a non-deterministic request that cannot be honored by the selected
/// backend is **not** an error. It produces an empty output instead, see
/// [`Voxelizer::voxelize`](crate::voxelization::Voxelizer::voxelize).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum VoxelizationError {
    /// One of the arguments is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    /// The requested execution backend is not available in this build.
    #[error("unsupported operation: the {0:?} backend is not compiled in (enable the `parallel` feature)")]
    UnsupportedOperation(Backend),
}

impl VoxelizationError {
    /// Is this an [`VoxelizationError::InvalidArgument`] error?
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// Is this an [`VoxelizationError::UnsupportedOperation`] error?
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedOperation(_))
    }
}

/// Details about an argument rejected by the validation step.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InvalidArgument {
    /// The reduce mode string is not one of `"sum"`, `"mean"`, `"max"`.
    #[error("do not support reduce type {0}")]
    UnknownReduceMode(String),
    /// The number of spatial dimensions is zero.
    #[error("the number of spatial dimensions must be at least 1")]
    ZeroDimension,
    /// A per-dimension vector does not have the expected length.
    #[error("{what} has {found} components, expected {expected}")]
    DimensionMismatch {
        /// The name of the offending argument.
        what: &'static str,
        /// The expected number of components.
        expected: usize,
        /// The actual number of components.
        found: usize,
    },
    /// A voxel size component is zero, negative, or not finite.
    #[error("voxel size along dimension {dim} is {value}, it must be finite and positive")]
    NonPositiveVoxelSize {
        /// The dimension of the bad component.
        dim: usize,
        /// The value of the bad component, widened to `f64`.
        value: f64,
    },
    /// The coordinates range along some dimension is empty or not finite.
    #[error("the coordinates range along dimension {dim} is [{min}, {max}], expected min < max")]
    EmptyRange {
        /// The dimension of the bad range.
        dim: usize,
        /// The lower bound, widened to `f64`.
        min: f64,
        /// The upper bound, widened to `f64`.
        max: f64,
    },
    /// A capacity of zero was given; use a negative sentinel for "unbounded".
    #[error("{0} must be at least 1 (or negative for unbounded)")]
    ZeroCapacity(&'static str),
    /// The per-scale lists do not have the same number of entries.
    #[error("{voxel_sizes} voxel sizes were given for {max_points} point limits; every scale needs both")]
    ScaleCountMismatch {
        /// The number of voxel sizes.
        voxel_sizes: usize,
        /// The number of `max_points` entries.
        max_points: usize,
    },
    /// No scale was given to a multi-scale voxelization.
    #[error("at least one voxel size and max_points entry is required")]
    NoScale,
    /// The point buffer layout is inconsistent.
    #[error("a point row of width {row_width} cannot hold {ndim} spatial coordinates, or the buffer length {len} is not a multiple of it")]
    PointStride {
        /// The width of a point row.
        row_width: usize,
        /// The number of spatial dimensions.
        ndim: usize,
        /// The length of the flat point buffer.
        len: usize,
    },
    /// An output buffer is too small for the configured maxima.
    #[error("the {buffer} buffer holds {found} values but {required} are needed")]
    BufferTooSmall {
        /// The name of the buffer.
        buffer: &'static str,
        /// The required number of elements.
        required: usize,
        /// The actual number of elements.
        found: usize,
    },
}
