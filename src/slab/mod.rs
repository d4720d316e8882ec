//! Slab assembly: fetch, pair, decompose and place cross-sections

pub mod assembler;
pub mod cube;
pub mod export;
pub mod geometry;
pub mod metadata;
pub mod pixels;
pub mod request;
pub mod resync;
pub mod section;

pub use assembler::{SegmentationSource, Slab, SlabAssembler, SlabSection};
pub use cube::{CubeFace, fetch_cube};
pub use export::{read_metadata, write_slab};
pub use geometry::{CORNER_UVS, QUAD_FACE, plane_corners};
pub use metadata::SlabMetadata;
pub use request::{RegionRequest, SlabOptions, Units};
pub use resync::{ReSyncPlanner, StaleSlab};
pub use section::{CrossSection, SegmentationLayer, decompose};
