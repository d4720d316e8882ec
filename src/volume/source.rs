//! Contract of the external volume-access collaborator

use std::collections::HashMap;

use crate::core::types::{DVec3, Lod, Result};
use crate::volume::block::Block;
use crate::volume::range::VoxelRange;
use crate::volume::resolution::{ScaleInfo, VoxelResolution};

/// Random-access reader for one multi-resolution volume.
///
/// Implementations own their transport, caching and retries. Every operation
/// in this crate receives its sources explicitly; nothing holds a global handle.
pub trait VolumeSource: Send + Sync {
    /// Element type of blocks returned by `read`
    type Voxel: Copy + Send + Sync;

    /// Describe one level of the resolution pyramid
    fn describe(&self, level: Lod) -> Result<ScaleInfo>;

    /// Read the voxels of `range` at `level`. The returned block's shape must
    /// equal `range.shape()`.
    fn read(&self, level: Lod, range: &VoxelRange) -> Result<Block<Self::Voxel>>;

    /// Resolution of `level`
    fn resolution(&self, level: Lod) -> Result<VoxelResolution> {
        Ok(self.describe(level)?.resolution)
    }
}

/// Triangle mesh of one segment in physical units
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<DVec3>,
    pub faces: Vec<[u32; 3]>,
}

/// Source of precomputed segment meshes
pub trait MeshSource: Send + Sync {
    /// Fetch meshes for `ids`. IDs without a mesh are simply absent from the map.
    fn mesh_for_ids(&self, ids: &[u64]) -> Result<HashMap<u64, MeshData>>;
}

/// Voxel types that can be shown as image intensity
pub trait Intensity: Copy + Send + Sync {
    /// Intensity scaled to [0, 1]
    fn normalized(self) -> f32;
}

macro_rules! impl_int_intensity {
    ($($t:ty),*) => {
        $(impl Intensity for $t {
            #[inline]
            fn normalized(self) -> f32 {
                (self as f64 / <$t>::MAX as f64) as f32
            }
        })*
    };
}

impl_int_intensity!(u8, u16, u32);

impl Intensity for f32 {
    #[inline]
    fn normalized(self) -> f32 {
        self.clamp(0.0, 1.0)
    }
}

impl Intensity for f64 {
    #[inline]
    fn normalized(self) -> f32 {
        self.clamp(0.0, 1.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_intensity() {
        assert_eq!(0u8.normalized(), 0.0);
        assert_eq!(255u8.normalized(), 1.0);
        assert!((128u8.normalized() - 0.50196).abs() < 1e-4);
        assert_eq!(u16::MAX.normalized(), 1.0);
    }

    #[test]
    fn test_float_intensity_clamps() {
        assert_eq!(1.5f32.normalized(), 1.0);
        assert_eq!((-0.2f64).normalized(), 0.0);
        assert_eq!(0.25f32.normalized(), 0.25);
    }
}
