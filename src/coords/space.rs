//! Conversions between physical units, per-level voxel indices and host-local units

use crate::core::error::Error;
use crate::core::types::{DVec3, I64Vec3, Result};
use crate::volume::resolution::{VoxelResolution, check_positive};

/// Tolerance (in voxels) within which a coordinate snaps to a voxel boundary
pub const VOXEL_SNAP_EPSILON: f64 = 1e-6;

/// Floor-divide a physical coordinate by the voxel size along each axis.
///
/// Fails with `InvalidResolution` if any resolution component is ≤ 0.
///
/// # Examples
/// ```
/// use voxslab::coords::to_voxels;
/// use glam::{DVec3, I64Vec3};
///
/// let v = to_voxels(DVec3::new(8001.0, 16.0, 400.0), [8.0, 8.0, 40.0]).unwrap();
/// assert_eq!(v, I64Vec3::new(1000, 2, 10));
/// ```
pub fn to_voxels(physical: DVec3, resolution: [f64; 3]) -> Result<I64Vec3> {
    let res = DVec3::from_array(check_positive(resolution)?);
    Ok((physical / res).floor().as_i64vec3())
}

/// Like [`to_voxels`], but values within [`VOXEL_SNAP_EPSILON`] of a voxel
/// boundary snap to it before flooring.
///
/// Geometry that went voxel → physical → local and back picks up float error
/// (999.9999999 instead of 1000); this keeps such points on their voxel.
pub fn to_voxels_snapped(physical: DVec3, resolution: [f64; 3]) -> Result<I64Vec3> {
    let res = DVec3::from_array(check_positive(resolution)?);
    let scaled = physical / res;
    let rounded = scaled.round();
    let snapped = DVec3::select(
        (scaled - rounded).abs().cmplt(DVec3::splat(VOXEL_SNAP_EPSILON)),
        rounded,
        scaled,
    );
    Ok(snapped.floor().as_i64vec3())
}

/// Physical coordinate of a voxel's lower corner
pub fn to_physical(voxel: I64Vec3, resolution: &VoxelResolution) -> DVec3 {
    voxel.as_dvec3() * resolution.as_dvec3()
}

/// Physical units → host-local units
pub fn to_local(physical: DVec3, scale_factor: f64) -> Result<DVec3> {
    check_scale(scale_factor)?;
    Ok(physical / scale_factor)
}

/// Host-local units → physical units
pub fn from_local(local: DVec3, scale_factor: f64) -> Result<DVec3> {
    check_scale(scale_factor)?;
    Ok(local * scale_factor)
}

fn check_scale(scale_factor: f64) -> Result<()> {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidScaleFactor(scale_factor))
    }
}
