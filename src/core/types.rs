//! Core type aliases and re-exports

pub use glam::{DMat3, DMat4, DVec3, I64Vec3};

/// Linear RGB color with components in [0, 1]
pub type Rgb = [f32; 3];

/// Pure black, used for background and unassigned segments
pub const BLACK: Rgb = [0.0, 0.0, 0.0];

/// Level-of-detail (mip) index into a resolution pyramid. Higher is coarser.
pub type Lod = u32;

/// Standard Result type for voxslab
pub type Result<T> = std::result::Result<T, crate::core::error::Error>;
