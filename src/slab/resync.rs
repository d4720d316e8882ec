//! Re-sync of materialized slabs after the user moved or scaled them.
//!
//! The sink hands back each slab's recorded metadata and its current corner
//! points in host-local units. Only slabs whose voxel range changed are
//! re-fetched. Deciding which ones changed is a linear scan; slab counts are
//! small so no spatial index is kept.

use crate::coords::space::{from_local, to_voxels_snapped};
use crate::core::types::{DVec3, Result};
use crate::slab::assembler::{Slab, SlabAssembler};
use crate::slab::metadata::SlabMetadata;
use crate::slab::request::SlabOptions;
use crate::volume::range::VoxelRange;
use crate::volume::source::{Intensity, VolumeSource};

/// A slab whose geometry no longer matches its recorded range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StaleSlab {
    /// Position of the slab in the scanned sequence
    pub index: usize,
    /// Range it now covers
    pub range: VoxelRange,
}

/// Decides which slabs are stale and rebuilds them through a [`SlabAssembler`]
pub struct ReSyncPlanner<'s, 'a, I> {
    assembler: &'s SlabAssembler<'a, I>,
}

impl<'s, 'a, I> ReSyncPlanner<'s, 'a, I>
where
    I: VolumeSource,
    I::Voxel: Intensity,
{
    /// Planner that rebuilds through `assembler`
    pub fn new(assembler: &'s SlabAssembler<'a, I>) -> Self {
        Self { assembler }
    }

    /// Voxel range the geometry `corners` covers at `metadata.level`, or `None`
    /// if it matches the recorded range.
    pub fn plan_update(&self, metadata: &SlabMetadata, corners: &[DVec3]) -> Result<Option<VoxelRange>> {
        let resolution = self.assembler.image().resolution(metadata.level)?.as_array();
        let scale_factor = self.assembler.config().scale_factor;

        let voxels = corners
            .iter()
            .map(|&local| to_voxels_snapped(from_local(local, scale_factor)?, resolution))
            .collect::<Result<Vec<_>>>()?;

        let Some(spanned) = VoxelRange::spanning(voxels.iter().copied()) else {
            log::warn!("slab {} has no geometry to re-sync", metadata.name());
            return Ok(None);
        };
        // Section planes sit on their depth index; the last one covers one more voxel
        let axis = metadata.axis;
        let deepest = voxels.iter().map(|v| v[axis.index()]).max().unwrap_or(spanned.start(axis));
        let range = spanned.with_axis(axis, spanned.start(axis), deepest + 1);
        range.check()?;

        if range == metadata.range {
            Ok(None)
        } else {
            Ok(Some(range))
        }
    }

    /// Scan every slab and report the stale ones
    pub fn scan<'m>(
        &self,
        slabs: impl IntoIterator<Item = (&'m SlabMetadata, &'m [DVec3])>,
    ) -> Result<Vec<StaleSlab>> {
        let mut stale = Vec::new();
        for (index, (metadata, corners)) in slabs.into_iter().enumerate() {
            if let Some(range) = self.plan_update(metadata, corners)? {
                log::info!("slab {} is stale, now covers {}", metadata.name(), range);
                stale.push(StaleSlab { index, range });
            }
        }
        Ok(stale)
    }

    /// Re-sync one slab.
    ///
    /// If it is stale, rebuilds exactly that slab (re-colorizing when overlay is
    /// enabled), updates `metadata` to the new range and returns the new
    /// pixels. The caller replaces the pixel content of its existing geometry;
    /// the geometry's position stays as the user left it.
    pub fn resync(&self, metadata: &mut SlabMetadata, corners: &[DVec3]) -> Result<Option<Slab>> {
        let Some(range) = self.plan_update(metadata, corners)? else {
            return Ok(None);
        };

        let options = SlabOptions::new(metadata.level, metadata.axis)
            .with_overlay(metadata.overlay_segmentation)
            .with_shader(metadata.shader);

        let slab = self.assembler.build_range(range, &options)?;
        log::info!("re-synced slab {} -> {}", metadata.name(), slab.metadata.name());
        *metadata = slab.metadata.clone();
        Ok(Some(slab))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::math::axis::Axis;
    use crate::slab::request::RegionRequest;
    use crate::volume::{Block, InMemoryVolume, VoxelResolution};

    fn image() -> InMemoryVolume<u8> {
        InMemoryVolume::new(
            VoxelResolution::new(8.0, 8.0, 40.0).unwrap(),
            [0; 3],
            Block::from_fn([64, 64, 16], |x, y, z| (x ^ y ^ z) as u8),
        )
    }

    fn built(assembler: &SlabAssembler<'_, InMemoryVolume<u8>>) -> Slab {
        assembler
            .build_slab(&RegionRequest::voxels([0, 10, 4, 20, 3, 4]), &SlabOptions::new(0, Axis::Z))
            .unwrap()
    }

    #[test]
    fn test_untouched_geometry_needs_no_update() {
        let config = EngineConfig { scale_factor: 3.0, ..Default::default() };
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = built(&assembler);
        let planner = ReSyncPlanner::new(&assembler);
        let plan = planner.plan_update(&slab.metadata, &slab.sections[0].corners).unwrap();
        assert_eq!(plan, None);
    }

    #[test]
    fn test_scaled_geometry_is_stale() {
        let config = EngineConfig::default();
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = built(&assembler);
        let planner = ReSyncPlanner::new(&assembler);

        // Stretch the plane along x from 10 to 12 voxels
        let stretch = 12.0 / 10.0;
        let corners = slab.sections[0].corners.map(|c| DVec3::new(c.x * stretch, c.y, c.z));
        let plan = planner.plan_update(&slab.metadata, &corners).unwrap();
        assert_eq!(plan, Some(VoxelRange::new(0, 12, 4, 20, 3, 4)));
    }

    #[test]
    fn test_resync_refetches_exactly_one_slab() {
        let config = EngineConfig::default();
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = built(&assembler);
        let planner = ReSyncPlanner::new(&assembler);
        let reads_before = image.read_count();

        let mut metadata = slab.metadata.clone();
        let moved = slab.sections[0].corners.map(|c| c + DVec3::new(0.0, 0.0, 40.0 * 2.0 / config.scale_factor));
        let updated = planner.resync(&mut metadata, &moved).unwrap().unwrap();

        assert_eq!(image.read_count(), reads_before + 1);
        assert_eq!(metadata.range, VoxelRange::new(0, 10, 4, 20, 5, 6));
        assert_eq!(updated.sections.len(), 1);
        assert_eq!(updated.sections[0].depth, 5);

        // Second pass over the same geometry is a no-op
        assert!(planner.resync(&mut metadata, &moved).unwrap().is_none());
        assert_eq!(image.read_count(), reads_before + 1);
    }

    #[test]
    fn test_scan_reports_only_changed_slabs() {
        let config = EngineConfig::default();
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let planner = ReSyncPlanner::new(&assembler);

        let slabs: Vec<Slab> = (0..4)
            .map(|z| {
                assembler
                    .build_slab(&RegionRequest::voxels([0, 8, 0, 8, z, z + 1]), &SlabOptions::default())
                    .unwrap()
            })
            .collect();
        let mut geometry: Vec<Vec<DVec3>> = slabs.iter().map(|s| s.sections[0].corners.to_vec()).collect();
        // Shift slab 2 by one voxel in y
        for c in &mut geometry[2] {
            c.y += 8.0 / config.scale_factor;
        }

        let stale = planner
            .scan(slabs.iter().zip(&geometry).map(|(s, g)| (&s.metadata, g.as_slice())))
            .unwrap();
        assert_eq!(stale, vec![StaleSlab { index: 2, range: VoxelRange::new(0, 8, 1, 9, 2, 3) }]);
    }

    #[test]
    fn test_thick_slab_round_trips() {
        let config = EngineConfig::default();
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = assembler
            .build_slab(&RegionRequest::voxels([8, 16, 0, 4, 2, 7]), &SlabOptions::new(0, Axis::Y))
            .unwrap();
        assert_eq!(slab.sections.len(), 4);
        let corners: Vec<DVec3> = slab.sections.iter().flat_map(|s| s.corners).collect();
        let planner = ReSyncPlanner::new(&assembler);
        assert_eq!(planner.plan_update(&slab.metadata, &corners).unwrap(), None);
    }

    #[test]
    fn test_untouched_planes_of_thick_slab_need_no_update() {
        let config = EngineConfig::default();
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = assembler
            .build_slab(&RegionRequest::voxels([0, 10, 0, 10, 2, 6]), &SlabOptions::new(0, Axis::Z))
            .unwrap();
        let planner = ReSyncPlanner::new(&assembler);
        let reads = image.read_count();

        for section in &slab.sections {
            let mut metadata = section.metadata.clone();
            assert_eq!(planner.plan_update(&metadata, &section.corners).unwrap(), None);
            assert!(planner.resync(&mut metadata, &section.corners).unwrap().is_none());
            assert_eq!(metadata, section.metadata);
        }
        assert_eq!(image.read_count(), reads);
    }

    #[test]
    fn test_moved_plane_resyncs_alone() {
        let config = EngineConfig::default();
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = assembler
            .build_slab(&RegionRequest::voxels([0, 10, 0, 10, 2, 6]), &SlabOptions::new(0, Axis::Z))
            .unwrap();
        let planner = ReSyncPlanner::new(&assembler);

        // Push plane z = 3 up to z = 7
        let section = &slab.sections[1];
        let lift = DVec3::new(0.0, 0.0, 40.0 * 4.0 / config.scale_factor);
        let moved = section.corners.map(|c| c + lift);
        let mut metadata = section.metadata.clone();
        let updated = planner.resync(&mut metadata, &moved).unwrap().unwrap();

        assert_eq!(metadata.range, VoxelRange::new(0, 10, 0, 10, 7, 8));
        assert_eq!(updated.sections.len(), 1);
        assert_eq!(updated.sections[0].metadata, metadata);
    }

    #[test]
    fn test_overlay_record_without_segmentation_volume() {
        let config = EngineConfig::default();
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = built(&assembler);
        let planner = ReSyncPlanner::new(&assembler);

        let mut metadata = SlabMetadata { overlay_segmentation: true, ..slab.metadata.clone() };
        let moved = slab.sections[0].corners.map(|c| c + DVec3::new(0.0, 8.0 / config.scale_factor, 0.0));
        let updated = planner.resync(&mut metadata, &moved).unwrap().unwrap();
        assert!(!metadata.overlay_segmentation);
        assert!(updated.color_map.is_none());
    }

    #[test]
    fn test_empty_geometry_is_ignored() {
        let config = EngineConfig::default();
        let image = image();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = built(&assembler);
        let planner = ReSyncPlanner::new(&assembler);
        assert_eq!(planner.plan_update(&slab.metadata, &[]).unwrap(), None);
    }
}
