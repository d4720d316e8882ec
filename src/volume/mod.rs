//! Volume data model: resolutions, voxel ranges, blocks and the volume-access contract

pub mod resolution;
pub mod range;
pub mod block;
pub mod source;
pub mod memory;
pub mod align;

pub use resolution::{ScaleInfo, VoxelResolution};
pub use range::VoxelRange;
pub use block::{Block, Slice2};
pub use source::{Intensity, MeshData, MeshSource, VolumeSource};
pub use memory::{InMemoryMeshes, InMemoryVolume};
pub use align::{ResolutionRatio, align_levels, align_range};
