//! Segment meshes converted for the host

pub mod builder;

pub use builder::{MeshBatch, SegmentMesh, build_meshes};
