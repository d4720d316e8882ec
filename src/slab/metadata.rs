//! Per-slab record kept by the sink and handed back on re-sync

use serde::{Deserialize, Serialize};

use crate::core::config::ShaderStyle;
use crate::core::types::{Lod, Result};
use crate::math::axis::Axis;
use crate::volume::range::VoxelRange;

/// What a materialized slab was built from.
///
/// The sink persists this verbatim and passes it back unchanged to
/// [`ReSyncPlanner`](crate::slab::ReSyncPlanner); only slab assembly and
/// re-sync ever produce or update it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabMetadata {
    pub level: Lod,
    /// Image-volume voxel range at `level`
    pub range: VoxelRange,
    pub axis: Axis,
    pub overlay_segmentation: bool,
    pub shader: ShaderStyle,
}

impl SlabMetadata {
    /// Stable object name `x1_x2_y1_y2_z1_z2`
    pub fn name(&self) -> String {
        let [x1, x2, y1, y2, z1, z2] = self.range.to_array();
        format!("{x1}_{x2}_{y1}_{y2}_{z1}_{z2}")
    }

    /// Serialize the record as the sink persists it
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a persisted record
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
