//! Resolution alignment between two volumes with different voxel sizes.
//!
//! An image volume and its segmentation are usually stored at different native
//! resolutions, and their ratio changes with the level pair. Everything that
//! maps an index from one grid into the other goes through this module, so the
//! fetch path and the re-sync path always agree.

use crate::core::error::Error;
use crate::core::types::{DVec3, Lod, Result};
use crate::math::axis::Axis;
use crate::volume::range::VoxelRange;
use crate::volume::resolution::{VoxelResolution, check_positive};
use crate::volume::source::VolumeSource;

/// Per-axis ratio `dst / src` between two grids.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolutionRatio {
    src: [f64; 3],
    dst: [f64; 3],
}

impl ResolutionRatio {
    /// Ratio from `src` voxels to `dst` voxels.
    ///
    /// Fails with `IncompatibleResolution` if any target component is ≤ 0.
    pub fn new(src: [f64; 3], dst: [f64; 3]) -> Result<Self> {
        let src = check_positive(src)?;
        if !dst.iter().all(|c| c.is_finite() && *c > 0.0) {
            return Err(Error::IncompatibleResolution(dst));
        }
        Ok(Self { src, dst })
    }

    /// Ratio between two already validated resolutions
    pub fn between(src: &VoxelResolution, dst: &VoxelResolution) -> Self {
        Self { src: src.as_array(), dst: dst.as_array() }
    }

    /// `dst[a] / src[a]` for every axis
    pub fn as_dvec3(&self) -> DVec3 {
        DVec3::from_array(self.dst) / DVec3::from_array(self.src)
    }

    /// Map a src voxel index on `axis` to the dst voxel containing its lower
    /// corner: `floor(index / r)`.
    #[inline]
    pub fn map_index(&self, axis: Axis, index: i64) -> i64 {
        let a = axis.index();
        // index * src / dst keeps integer ratios exact
        ((index as f64 * self.src[a]) / self.dst[a]).floor() as i64
    }

    /// Map a whole range, widening any axis that collapses
    pub fn map_range(&self, range: &VoxelRange) -> VoxelRange {
        let lo = Axis::ALL.map(|axis| self.map_index(axis, range.start(axis)));
        let hi = Axis::ALL.map(|axis| self.map_index(axis, range.end(axis)));
        VoxelRange::from_bounds(lo, hi)
    }

    /// The reverse mapping (dst → src)
    pub fn inverse(&self) -> Self {
        Self { src: self.dst, dst: self.src }
    }
}

/// Voxel range in the dst grid congruent to `src_range` in the src grid.
///
/// # Examples
/// ```
/// use voxslab::volume::{align_range, VoxelRange};
///
/// let range = VoxelRange::new(1000, 1008, 2000, 2008, 500, 501);
/// let aligned = align_range(&range, [8.0, 8.0, 40.0], [16.0, 16.0, 40.0]).unwrap();
/// assert_eq!(aligned, VoxelRange::new(500, 504, 1000, 1004, 500, 501));
/// ```
pub fn align_range(src_range: &VoxelRange, src_resolution: [f64; 3], dst_resolution: [f64; 3]) -> Result<VoxelRange> {
    let aligned = ResolutionRatio::new(src_resolution, dst_resolution)?.map_range(src_range);
    aligned.check()?;
    Ok(aligned)
}

/// Level-pair alignment between two sources.
///
/// Looks up both resolutions for the given levels and returns the ratio along
/// with the congruent range in `dst`.
pub fn align_levels<A: VolumeSource + ?Sized, B: VolumeSource + ?Sized>(
    src: &A,
    src_level: Lod,
    dst: &B,
    dst_level: Lod,
    src_range: &VoxelRange,
) -> Result<(ResolutionRatio, VoxelRange)> {
    let src_res = src.resolution(src_level)?;
    let dst_res = dst.resolution(dst_level)?;
    let ratio = ResolutionRatio::between(&src_res, &dst_res);
    let aligned = ratio.map_range(src_range);
    aligned.check()?;
    log::trace!(
        "aligned {} at level {} to {} at level {} (ratio {:?})",
        src_range, src_level, aligned, dst_level, ratio.as_dvec3()
    );
    Ok((ratio, aligned))
}
