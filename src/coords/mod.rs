//! Coordinate spaces: physical units, per-level voxel indices and host-local units.
//!
//! Everything here is a pure function of its arguments.

pub mod space;
pub mod transform;

pub use space::{from_local, to_local, to_physical, to_voxels, to_voxels_snapped, VOXEL_SNAP_EPSILON};
pub use transform::{Orientation, apply_global_transform, global_matrix};
