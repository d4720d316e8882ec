//! Plane geometry for slab sections, in host-local units

use crate::core::types::{DVec3, I64Vec3, Result};
use crate::coords::space::{to_local, to_physical};
use crate::math::axis::Axis;
use crate::volume::range::VoxelRange;
use crate::volume::resolution::VoxelResolution;

/// Texture coordinates of the four corners returned by [`plane_corners`]
pub const CORNER_UVS: [[f32; 2]; 4] = [[1.0, 1.0], [0.0, 1.0], [0.0, 0.0], [1.0, 0.0]];

/// Single quad face over the four corners
pub const QUAD_FACE: [u32; 4] = [0, 1, 2, 3];

/// Corners of the plane at voxel `depth` along `axis`, spanning `range` in the
/// two in-plane axes.
///
/// Order is (u1, v1), (u2, v1), (u2, v2), (u1, v2) with (u, v) from
/// [`Axis::plane_axes`]. Points are voxel → physical → host-local.
pub fn plane_corners(
    range: &VoxelRange,
    axis: Axis,
    depth: i64,
    resolution: &VoxelResolution,
    scale_factor: f64,
) -> Result<[DVec3; 4]> {
    let (u, v) = axis.plane_axes();
    let corner = |cu: i64, cv: i64| {
        let mut p = [0i64; 3];
        p[axis.index()] = depth;
        p[u.index()] = cu;
        p[v.index()] = cv;
        to_local(to_physical(I64Vec3::from_array(p), resolution), scale_factor)
    };

    let (u1, u2) = (range.start(u), range.end(u));
    let (v1, v2) = (range.start(v), range.end(v));
    Ok([corner(u1, v1)?, corner(u2, v1)?, corner(u2, v2)?, corner(u1, v2)?])
}
