//! Slice axes and signed axis directions for host orientation

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::{DMat3, DVec3, Result};

/// One of the three volume axes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    #[default]
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index (x = 0, y = 1, z = 2)
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// The two in-plane axes of a cross-section perpendicular to `self`,
    /// in (u, v) order.
    pub fn plane_axes(self) -> (Axis, Axis) {
        match self {
            Axis::X => (Axis::Y, Axis::Z),
            Axis::Y => (Axis::X, Axis::Z),
            Axis::Z => (Axis::X, Axis::Y),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Signed axis, used to describe which way a frame's forward and up point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisDirection {
    #[serde(rename = "X")]
    PosX,
    #[serde(rename = "Y")]
    PosY,
    #[serde(rename = "Z")]
    PosZ,
    #[serde(rename = "-X")]
    NegX,
    #[serde(rename = "-Y")]
    NegY,
    #[serde(rename = "-Z")]
    NegZ,
}

impl AxisDirection {
    /// The unsigned axis this direction lies on
    pub fn axis(self) -> Axis {
        match self {
            AxisDirection::PosX | AxisDirection::NegX => Axis::X,
            AxisDirection::PosY | AxisDirection::NegY => Axis::Y,
            AxisDirection::PosZ | AxisDirection::NegZ => Axis::Z,
        }
    }

    /// Unit vector pointing in this direction
    pub fn vector(self) -> DVec3 {
        match self {
            AxisDirection::PosX => DVec3::X,
            AxisDirection::PosY => DVec3::Y,
            AxisDirection::PosZ => DVec3::Z,
            AxisDirection::NegX => DVec3::NEG_X,
            AxisDirection::NegY => DVec3::NEG_Y,
            AxisDirection::NegZ => DVec3::NEG_Z,
        }
    }
}

impl fmt::Display for AxisDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisDirection::PosX => "X",
            AxisDirection::PosY => "Y",
            AxisDirection::PosZ => "Z",
            AxisDirection::NegX => "-X",
            AxisDirection::NegY => "-Y",
            AxisDirection::NegZ => "-Z",
        };
        f.write_str(name)
    }
}

/// Rotation taking a frame with the given forward/up axes onto the host frame
/// (forward = +Y, up = +Z, right = +X).
///
/// The source frame's right axis is `forward × up`, so the result is always a
/// proper rotation.
pub fn axis_conversion(forward: AxisDirection, up: AxisDirection) -> Result<DMat3> {
    if forward.axis() == up.axis() {
        return Err(Error::InvalidOrientation {
            forward: forward.to_string(),
            up: up.to_string(),
        });
    }

    let f = forward.vector();
    let u = up.vector();
    let r = f.cross(u);

    // Rows are (right, forward, up): a vector's components along the source
    // frame become its host x, y, z.
    Ok(DMat3::from_cols(r, f, u).transpose())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTIONS: [AxisDirection; 6] = [
        AxisDirection::PosX,
        AxisDirection::PosY,
        AxisDirection::PosZ,
        AxisDirection::NegX,
        AxisDirection::NegY,
        AxisDirection::NegZ,
    ];

    #[test]
    fn test_plane_axes() {
        assert_eq!(Axis::Z.plane_axes(), (Axis::X, Axis::Y));
        assert_eq!(Axis::Y.plane_axes(), (Axis::X, Axis::Z));
        assert_eq!(Axis::X.plane_axes(), (Axis::Y, Axis::Z));
    }

    #[test]
    fn test_host_frame_is_identity() {
        let m = axis_conversion(AxisDirection::PosY, AxisDirection::PosZ).unwrap();
        assert_eq!(m, DMat3::IDENTITY);
    }

    #[test]
    fn test_conversion_maps_forward_and_up() {
        let m = axis_conversion(AxisDirection::NegZ, AxisDirection::NegY).unwrap();
        assert!((m * DVec3::NEG_Z - DVec3::Y).length() < 1e-12);
        assert!((m * DVec3::NEG_Y - DVec3::Z).length() < 1e-12);
    }

    #[test]
    fn test_all_valid_pairs_are_rotations() {
        for forward in DIRECTIONS {
            for up in DIRECTIONS {
                match axis_conversion(forward, up) {
                    Ok(m) => assert!((m.determinant() - 1.0).abs() < 1e-12, "{forward} {up}"),
                    Err(_) => assert_eq!(forward.axis(), up.axis()),
                }
            }
        }
    }
}
