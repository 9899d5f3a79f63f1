use crate::utils::hashmap::{self, Entry, HashMap};
use crate::voxelization::{Capacity, VoxelGridCoord};

/// Counters describing what happened to the input points of a voxelization.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct VoxelizationStats {
    /// The number of input points.
    pub num_points: usize,
    /// Points outside of the coordinates range.
    pub out_of_range: usize,
    /// Points whose voxel could not be created because `max_voxels` was reached.
    pub dropped_by_max_voxels: usize,
    /// Points not stored because their voxel already held `max_points` points.
    pub dropped_by_max_points: usize,
}

impl VoxelizationStats {
    /// The number of points stored in some voxel.
    pub fn num_stored(&self) -> usize {
        self.num_points
            - self.out_of_range
            - self.dropped_by_max_voxels
            - self.dropped_by_max_points
    }
}

/// Admits voxels and points in the order they are pushed.
///
/// Slots are handed out to coordinates in first-seen order, so feeding the
/// points in input order yields the same assignment regardless of how the
/// coordinates were computed.
pub(crate) struct Assigner {
    slots: HashMap<VoxelGridCoord, u32>,
    max_points: Capacity,
    max_voxels: Capacity,
    coords: Vec<VoxelGridCoord>,
    seen: Vec<u32>,
    // (point index, slot) of every stored point, in input order.
    stored: Vec<(usize, u32)>,
    stats: VoxelizationStats,
}

impl Assigner {
    pub fn new(max_points: Capacity, max_voxels: Capacity, num_points: usize) -> Self {
        let expected_voxels = max_voxels.bound().unwrap_or(num_points).min(num_points);

        Self {
            slots: hashmap::with_capacity(expected_voxels),
            max_points,
            max_voxels,
            coords: Vec::with_capacity(expected_voxels),
            seen: Vec::with_capacity(expected_voxels),
            stored: Vec::with_capacity(num_points),
            stats: VoxelizationStats {
                num_points,
                ..Default::default()
            },
        }
    }

    #[inline]
    pub fn push(&mut self, point_id: usize, coord: Option<VoxelGridCoord>) {
        let Some(coord) = coord else {
            self.stats.out_of_range += 1;
            return;
        };

        let slot = match self.slots.entry(coord) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                if !self.max_voxels.admits(self.coords.len()) {
                    if self.stats.dropped_by_max_voxels == 0 {
                        log::trace!(
                            "voxel budget of {} exhausted at point {}",
                            self.coords.len(),
                            point_id
                        );
                    }
                    self.stats.dropped_by_max_voxels += 1;
                    return;
                }

                let slot = self.coords.len() as u32;
                self.coords.push(entry.key().clone());
                self.seen.push(0);
                let _ = entry.insert(slot);
                slot
            }
        };

        let rank = self.seen[slot as usize];
        self.seen[slot as usize] += 1;

        if self.max_points.admits(rank as usize) {
            self.stored.push((point_id, slot));
        } else {
            self.stats.dropped_by_max_points += 1;
        }
    }

    pub fn finish(self) -> Assignment {
        let num_points: Vec<u32> = self
            .seen
            .iter()
            .map(|seen| match self.max_points {
                Capacity::Bounded(cap) => (*seen as usize).min(cap) as u32,
                Capacity::Unbounded => *seen,
            })
            .collect();

        let mut offsets = Vec::with_capacity(num_points.len() + 1);
        offsets.push(0);
        for n in &num_points {
            offsets.push(offsets[offsets.len() - 1] + *n as usize);
        }

        // Counting sort of the stored points by slot. Points of the same slot keep
        // their input order.
        let mut cursors = offsets.clone();
        let mut members = vec![0; self.stored.len()];
        for (point_id, slot) in self.stored {
            members[cursors[slot as usize]] = point_id;
            cursors[slot as usize] += 1;
        }

        Assignment {
            coords: self.coords,
            num_points,
            true_num_points: self.seen,
            offsets,
            members,
            stats: self.stats,
        }
    }
}

/// The voxels admitted by an [`Assigner`], and the points stored in each of them.
pub(crate) struct Assignment {
    pub coords: Vec<VoxelGridCoord>,
    pub num_points: Vec<u32>,
    pub true_num_points: Vec<u32>,
    pub offsets: Vec<usize>,
    pub members: Vec<usize>,
    pub stats: VoxelizationStats,
}

impl Assignment {
    #[inline]
    pub fn num_voxels(&self) -> usize {
        self.coords.len()
    }

    /// Indices of the points stored in the voxel at `slot`, in input order.
    #[inline]
    pub fn members(&self, slot: usize) -> &[usize] {
        &self.members[self.offsets[slot]..self.offsets[slot + 1]]
    }
}
