//! Global host transform: axis re-orientation composed with uniform scale

use crate::core::config::EngineConfig;
use crate::core::error::Error;
use crate::core::types::{DMat4, DVec3, Result};
use crate::math::axis::{AxisDirection, axis_conversion};

/// Forward/up axes of the volume frame as seen from the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orientation {
    pub forward: AxisDirection,
    pub up: AxisDirection,
}

impl Orientation {
    /// Orientation from explicit forward and up axes
    pub fn new(forward: AxisDirection, up: AxisDirection) -> Self {
        Self { forward, up }
    }

    /// Orientation configured in `config`
    pub fn from_config(config: &EngineConfig) -> Self {
        Self { forward: config.axis_forward, up: config.axis_up }
    }
}

/// `axis_conversion(forward, up) · Scale(1 / scale_factor)` as a 4x4 matrix
pub fn global_matrix(orientation: Orientation, scale_factor: f64) -> Result<DMat4> {
    if !(scale_factor.is_finite() && scale_factor > 0.0) {
        return Err(Error::InvalidScaleFactor(scale_factor));
    }
    let rotation = axis_conversion(orientation.forward, orientation.up)?;
    Ok(DMat4::from_mat3(rotation) * DMat4::from_scale(DVec3::splat(1.0 / scale_factor)))
}

/// Apply the global transform (or its inverse) to every point.
///
/// The matrix is rebuilt from `orientation` and `scale_factor` on each call,
/// so a changed configuration takes effect immediately.
pub fn apply_global_transform(
    points: &[DVec3],
    orientation: Orientation,
    scale_factor: f64,
    inverse: bool,
) -> Result<Vec<DVec3>> {
    let mut matrix = global_matrix(orientation, scale_factor)?;
    if inverse {
        matrix = matrix.inverse();
    }
    Ok(points.iter().map(|p| matrix.transform_point3(*p)).collect())
}
