use crate::math::Real;
use crate::voxelization::InvalidArgument;
use core::fmt;
use core::str::FromStr;

/// How the points stored in a voxel are combined into a single feature row.
///
/// Every channel of the row (spatial coordinates included) is reduced
/// independently. Only the points actually *stored* in a voxel take part in the
/// reduction: points rejected because the voxel was full are ignored.
///
/// The string form accepted by [`ReduceMode::from_str`] is `"sum"`, `"mean"`, or
/// `"max"`:
///
/// ```
/// # #[cfg(feature = "f32")] {
/// use pillarvox::voxelization::ReduceMode;
///
/// assert_eq!("mean".parse::<ReduceMode>(), Ok(ReduceMode::Mean));
/// assert!("avg".parse::<ReduceMode>().is_err());
/// # }
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde-serialize", serde(rename_all = "lowercase"))]
pub enum ReduceMode {
    /// Channel-wise sum.
    Sum,
    /// Channel-wise arithmetic mean.
    Mean,
    /// Channel-wise maximum.
    Max,
}

impl ReduceMode {
    /// The name of this mode, as accepted by [`ReduceMode::from_str`].
    pub fn as_str(self) -> &'static str {
        match self {
            ReduceMode::Sum => "sum",
            ReduceMode::Mean => "mean",
            ReduceMode::Max => "max",
        }
    }

    /// Reduces `rows` into `out`, and returns the number of rows consumed.
    ///
    /// `out` is left untouched if `rows` is empty.
    pub fn reduce<'a>(self, rows: impl IntoIterator<Item = &'a [Real]>, out: &mut [Real]) -> usize {
        let mut count = 0;

        for row in rows {
            if count == 0 {
                out.copy_from_slice(row);
            } else {
                self.accumulate(out, row);
            }
            count += 1;
        }

        self.finalize(out, count);
        count
    }

    #[inline]
    pub(crate) fn accumulate(self, acc: &mut [Real], row: &[Real]) {
        match self {
            ReduceMode::Sum | ReduceMode::Mean => {
                acc.iter_mut().zip(row).for_each(|(a, r)| *a += *r);
            }
            ReduceMode::Max => {
                acc.iter_mut().zip(row).for_each(|(a, r)| *a = a.max(*r));
            }
        }
    }

    #[inline]
    pub(crate) fn finalize(self, acc: &mut [Real], count: usize) {
        if self == ReduceMode::Mean && count > 1 {
            let count = count as Real;
            acc.iter_mut().for_each(|a| *a /= count);
        }
    }
}

impl FromStr for ReduceMode {
    type Err = InvalidArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max" => Ok(ReduceMode::Max),
            "sum" => Ok(ReduceMode::Sum),
            "mean" => Ok(ReduceMode::Mean),
            _ => Err(InvalidArgument::UnknownReduceMode(s.to_owned())),
        }
    }
}

impl fmt::Display for ReduceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
