//! Region requests and slab build options

use crate::core::config::ShaderStyle;
use crate::core::types::{DVec3, Lod, Result};
use crate::coords::space::to_voxels;
use crate::math::axis::Axis;
use crate::volume::range::VoxelRange;
use crate::volume::resolution::VoxelResolution;

/// Units in which a region request's bounds are given
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Units {
    /// Voxel indices at the requested level
    #[default]
    Voxels,
    /// Physical units (nm)
    Physical,
}

/// A box to fetch, before it is pinned to a level's voxel grid
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionRequest {
    pub lo: DVec3,
    pub hi: DVec3,
    pub units: Units,
}

impl RegionRequest {
    /// Request in voxel indices `(x1, x2, y1, y2, z1, z2)`
    pub fn voxels(bounds: [i64; 6]) -> Self {
        let [x1, x2, y1, y2, z1, z2] = bounds.map(|b| b as f64);
        Self { lo: DVec3::new(x1, y1, z1), hi: DVec3::new(x2, y2, z2), units: Units::Voxels }
    }

    /// Request in physical units `(x1, x2, y1, y2, z1, z2)`
    pub fn physical(bounds: [f64; 6]) -> Self {
        let [x1, x2, y1, y2, z1, z2] = bounds;
        Self { lo: DVec3::new(x1, y1, z1), hi: DVec3::new(x2, y2, z2), units: Units::Physical }
    }

    /// Pin the request to the voxel grid of `resolution`, widening any empty axis
    pub fn resolve(&self, resolution: &VoxelResolution) -> Result<VoxelRange> {
        let (lo, hi) = match self.units {
            Units::Voxels => (self.lo.floor().as_i64vec3(), self.hi.floor().as_i64vec3()),
            Units::Physical => (
                to_voxels(self.lo, resolution.as_array())?,
                to_voxels(self.hi, resolution.as_array())?,
            ),
        };
        let range = VoxelRange::from_bounds(lo.to_array(), hi.to_array());
        range.check()?;
        Ok(range)
    }
}

impl From<VoxelRange> for RegionRequest {
    fn from(range: VoxelRange) -> Self {
        Self::voxels(range.to_array())
    }
}

/// How to build a slab
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlabOptions {
    /// Image level of detail
    pub level: Lod,
    /// Axis along which cross-sections are cut
    pub axis: Axis,
    /// Fetch and colorize the segmentation volume as well
    pub overlay_segmentation: bool,
    /// Segmentation level; defaults to `level`
    pub segmentation_level: Option<Lod>,
    /// Shader style to record; defaults to the engine config's
    pub shader: Option<ShaderStyle>,
}

impl SlabOptions {
    /// Image-only slab at `level`, sliced along `axis`
    pub fn new(level: Lod, axis: Axis) -> Self {
        Self {
            level,
            axis,
            overlay_segmentation: false,
            segmentation_level: None,
            shader: None,
        }
    }

    /// Enable or disable the segmentation overlay
    pub fn with_overlay(mut self, overlay: bool) -> Self {
        self.overlay_segmentation = overlay;
        self
    }

    /// Read segmentation at `level` instead of the image level
    pub fn with_segmentation_level(mut self, level: Lod) -> Self {
        self.segmentation_level = Some(level);
        self
    }

    /// Record `shader` instead of the configured default
    pub fn with_shader(mut self, shader: ShaderStyle) -> Self {
        self.shader = Some(shader);
        self
    }

    /// Slice along `axis`
    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }
}

impl Default for SlabOptions {
    fn default() -> Self {
        Self::new(0, Axis::Z)
    }
}
