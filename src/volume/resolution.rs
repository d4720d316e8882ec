//! Per-level voxel resolution and the scale description of a volume level

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{DVec3, Result};
use crate::math::axis::Axis;
use crate::volume::range::VoxelRange;

/// Physical size of one voxel (nm per voxel along x, y, z) at one level.
///
/// Every component is positive; construction checks this.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 3]", into = "[f64; 3]")]
pub struct VoxelResolution([f64; 3]);

impl VoxelResolution {
    /// Create a resolution, failing with `InvalidResolution` if any component is ≤ 0
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self> {
        Self::try_from([x, y, z])
    }

    /// Resolution component along `axis`
    pub fn along(&self, axis: Axis) -> f64 {
        self.0[axis.index()]
    }

    /// Components as `[x, y, z]`
    pub fn as_array(&self) -> [f64; 3] {
        self.0
    }

    /// Components as a vector
    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::from_array(self.0)
    }

    /// Resolution scaled by per-axis downsampling factors
    pub fn scaled(&self, factors: [usize; 3]) -> Self {
        Self([
            self.0[0] * factors[0] as f64,
            self.0[1] * factors[1] as f64,
            self.0[2] * factors[2] as f64,
        ])
    }
}

/// Check that every component of a raw resolution is a positive real
pub(crate) fn check_positive(raw: [f64; 3]) -> Result<[f64; 3]> {
    if raw.iter().all(|c| c.is_finite() && *c > 0.0) {
        Ok(raw)
    } else {
        Err(Error::InvalidResolution(raw))
    }
}

impl TryFrom<[f64; 3]> for VoxelResolution {
    type Error = Error;

    fn try_from(raw: [f64; 3]) -> Result<Self> {
        check_positive(raw).map(Self)
    }
}

impl From<VoxelResolution> for [f64; 3] {
    fn from(res: VoxelResolution) -> Self {
        res.0
    }
}

/// Description of one level of a volume, as returned by `describe`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScaleInfo {
    /// Voxel size at this level
    pub resolution: VoxelResolution,
    /// First valid voxel index along each axis
    pub voxel_offset: [i64; 3],
    /// Number of voxels along each axis
    pub size: [i64; 3],
}

impl ScaleInfo {
    /// The full voxel range covered by this level
    pub fn bounds(&self) -> VoxelRange {
        let [ox, oy, oz] = self.voxel_offset;
        let [sx, sy, sz] = self.size;
        VoxelRange::new(ox, ox + sx, oy, oy + sy, oz, oz + sz)
    }
}
