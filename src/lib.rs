//! voxslab - voxel addressing, resolution alignment and segmentation
//! colorization for slab rendering of multi-resolution volumes

pub mod core;
pub mod math;
pub mod coords;
pub mod color;
pub mod volume;
pub mod slab;
pub mod mesh;
