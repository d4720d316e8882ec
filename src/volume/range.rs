//! Half-open, non-degenerate voxel ranges

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{I64Vec3, Result};
use crate::math::axis::Axis;

/// Voxel-index box `[x1, x2) × [y1, y2) × [z1, z2)`.
///
/// Always non-degenerate: every constructor widens an empty axis by setting
/// `hi = lo + 1`, so `x2 > x1`, `y2 > y1` and `z2 > z1` hold for every value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i64; 6]", into = "[i64; 6]")]
pub struct VoxelRange {
    lo: [i64; 3],
    hi: [i64; 3],
}

/// Widen an empty (or inverted) axis to one voxel
fn widen(lo: i64, hi: i64) -> i64 {
    if hi <= lo { lo + 1 } else { hi }
}

impl VoxelRange {
    /// Create a range from per-axis bounds, widening any empty axis
    pub fn new(x1: i64, x2: i64, y1: i64, y2: i64, z1: i64, z2: i64) -> Self {
        Self::from_bounds([x1, y1, z1], [x2, y2, z2])
    }

    /// Create a range from lower and upper corners, widening any empty axis
    pub fn from_bounds(lo: [i64; 3], hi: [i64; 3]) -> Self {
        Self {
            lo,
            hi: [widen(lo[0], hi[0]), widen(lo[1], hi[1]), widen(lo[2], hi[2])],
        }
    }

    /// Tightest range spanning a set of voxel points (each point's own index is
    /// used as both lower and upper bound, then widened).
    ///
    /// Returns `None` for an empty point set.
    pub fn spanning(points: impl IntoIterator<Item = I64Vec3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_bounds(min.to_array(), max.to_array()))
    }

    /// Strict constructor: fails instead of widening
    pub fn try_new(lo: [i64; 3], hi: [i64; 3]) -> Result<Self> {
        let range = Self { lo, hi };
        range.check()?;
        Ok(range)
    }

    /// Verify the non-degeneracy invariant.
    ///
    /// A failure here means a range was built without widening, which is a
    /// defect in this crate. It is logged and surfaced as an error.
    pub fn check(&self) -> Result<()> {
        if (0..3).all(|a| self.hi[a] > self.lo[a]) {
            Ok(())
        } else {
            log::error!("degenerate voxel range {:?}", self.to_array());
            Err(Error::DegenerateRegionUnrecoverable(self.to_array()))
        }
    }

    /// Inclusive lower corner
    pub fn lo(&self) -> [i64; 3] {
        self.lo
    }

    /// Exclusive upper corner
    pub fn hi(&self) -> [i64; 3] {
        self.hi
    }

    /// Lower bound along `axis`
    pub fn start(&self, axis: Axis) -> i64 {
        self.lo[axis.index()]
    }

    /// Upper (exclusive) bound along `axis`
    pub fn end(&self, axis: Axis) -> i64 {
        self.hi[axis.index()]
    }

    /// Number of voxels along `axis`
    pub fn extent(&self, axis: Axis) -> usize {
        (self.end(axis) - self.start(axis)) as usize
    }

    /// Number of voxels along each axis
    pub fn shape(&self) -> [usize; 3] {
        [self.extent(Axis::X), self.extent(Axis::Y), self.extent(Axis::Z)]
    }

    /// Total voxel count
    pub fn voxel_count(&self) -> usize {
        self.shape().iter().product()
    }

    /// Copy of this range with `axis` replaced by `[lo, hi)` (widened if empty)
    pub fn with_axis(&self, axis: Axis, lo: i64, hi: i64) -> Self {
        let mut lo_arr = self.lo;
        let mut hi_arr = self.hi;
        lo_arr[axis.index()] = lo;
        hi_arr[axis.index()] = hi;
        Self::from_bounds(lo_arr, hi_arr)
    }

    /// Whether `other` lies entirely inside this range
    pub fn contains(&self, other: &VoxelRange) -> bool {
        (0..3).all(|a| other.lo[a] >= self.lo[a] && other.hi[a] <= self.hi[a])
    }

    /// `(x1, x2, y1, y2, z1, z2)`
    pub fn to_array(&self) -> [i64; 6] {
        [self.lo[0], self.hi[0], self.lo[1], self.hi[1], self.lo[2], self.hi[2]]
    }
}

impl From<[i64; 6]> for VoxelRange {
    fn from(r: [i64; 6]) -> Self {
        Self::new(r[0], r[1], r[2], r[3], r[4], r[5])
    }
}

impl From<VoxelRange> for [i64; 6] {
    fn from(range: VoxelRange) -> Self {
        range.to_array()
    }
}

impl fmt::Display for VoxelRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}..{}, {}..{}, {}..{}]",
            self.lo[0], self.hi[0], self.lo[1], self.hi[1], self.lo[2], self.hi[2]
        )
    }
}
