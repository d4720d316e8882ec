//! Slab assembly: resolve, fetch, align, colorize, decompose.

use crate::color::colorize::{ColorMap, colorize_block};
use crate::core::config::EngineConfig;
use crate::core::error::Error;
use crate::core::types::{DVec3, Lod, Result, Rgb};
use crate::slab::geometry::plane_corners;
use crate::slab::metadata::SlabMetadata;
use crate::slab::request::{RegionRequest, SlabOptions};
use crate::slab::section::{SegmentationLayer, decompose};
use crate::volume::align::align_levels;
use crate::volume::block::{Block, Slice2};
use crate::volume::range::VoxelRange;
use crate::volume::source::{Intensity, VolumeSource};

/// Segmentation volume handle, as seen by the assembler
pub type SegmentationSource<'a> = &'a dyn VolumeSource<Voxel = u64>;

/// One planar element of a slab: pixels plus where to put them
#[derive(Clone, Debug, PartialEq)]
pub struct SlabSection {
    /// Image voxel coordinate along the slicing axis
    pub depth: i64,
    /// Image intensities normalized to [0, 1]
    pub image: Slice2<f32>,
    /// Colorized segmentation, when overlay is enabled
    pub color: Option<Slice2<Rgb>>,
    /// Plane corners in host-local units, see [`plane_corners`]
    pub corners: [DVec3; 4],
    /// Record for this plane alone: the slab's range narrowed to
    /// `[depth, depth + 1)` along the slicing axis
    pub metadata: SlabMetadata,
}

/// A built slab: its metadata record and ordered sections
#[derive(Clone, Debug)]
pub struct Slab {
    /// Record covering every section, for sinks that keep the planes grouped
    pub metadata: SlabMetadata,
    pub sections: Vec<SlabSection>,
    /// Colors used for the segmentation overlay, if any
    pub color_map: Option<ColorMap>,
}

/// Builds slabs from an image volume and an optional segmentation volume.
///
/// Sources are injected, never global. To cap parallelism, run calls inside
/// [`EngineConfig::thread_pool`] via `pool.install`.
pub struct SlabAssembler<'a, I> {
    image: &'a I,
    segmentation: Option<SegmentationSource<'a>>,
    config: &'a EngineConfig,
}

impl<'a, I> SlabAssembler<'a, I>
where
    I: VolumeSource,
    I::Voxel: Intensity,
{
    /// Assembler over an image volume only
    pub fn new(image: &'a I, config: &'a EngineConfig) -> Self {
        Self { image, segmentation: None, config }
    }

    /// Attach a co-registered segmentation volume
    pub fn with_segmentation(mut self, segmentation: SegmentationSource<'a>) -> Self {
        self.segmentation = Some(segmentation);
        self
    }

    /// Image volume the slabs are read from
    pub fn image(&self) -> &'a I {
        self.image
    }

    /// Configuration shared by every build
    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    /// Whether a segmentation volume is attached
    pub fn has_segmentation(&self) -> bool {
        self.segmentation.is_some()
    }

    /// Resolve a request to the image voxel grid at `level`
    pub fn resolve(&self, request: &RegionRequest, level: Lod) -> Result<VoxelRange> {
        let resolution = self.image.resolution(level)?;
        request.resolve(&resolution)
    }

    /// Build the slab for a region request.
    ///
    /// Yields one section per voxel along `options.axis`; a region that is
    /// degenerate along that axis still yields exactly one.
    pub fn build_slab(&self, request: &RegionRequest, options: &SlabOptions) -> Result<Slab> {
        let range = self.resolve(request, options.level)?;
        self.build_range(range, options)
    }

    /// Build the slab for an already resolved image voxel range
    pub fn build_range(&self, range: VoxelRange, options: &SlabOptions) -> Result<Slab> {
        range.check()?;
        let level = options.level;
        let resolution = self.image.resolution(level)?;

        let segmentation = if options.overlay_segmentation {
            if self.segmentation.is_none() {
                log::warn!("segmentation overlay requested but no segmentation volume is configured");
            }
            self.segmentation
        } else {
            None
        };
        log::debug!(
            "building slab {} at level {} along {} (overlay: {})",
            range, level, options.axis, segmentation.is_some()
        );

        // Independent reads; joined before decomposition
        let seg_level = options.segmentation_level.unwrap_or(level);
        let (image, layer) = rayon::join(
            || fetch_checked(self.image, level, &range),
            || {
                segmentation
                    .map(|seg| self.fetch_segmentation(seg, level, seg_level, &range))
                    .transpose()
            },
        );
        let image = image?.par_map(|v| v.normalized());
        let layer = layer?;

        let metadata = SlabMetadata {
            level,
            range,
            axis: options.axis,
            overlay_segmentation: layer.is_some(),
            shader: options.shader.unwrap_or(self.config.shader),
        };

        let sections = decompose(&image, &range, options.axis, layer.as_ref())
            .into_iter()
            .map(|cs| {
                let corners = plane_corners(&range, options.axis, cs.depth, &resolution, self.config.scale_factor)?;
                let plane = SlabMetadata {
                    range: range.with_axis(options.axis, cs.depth, cs.depth + 1),
                    ..metadata.clone()
                };
                Ok(SlabSection { depth: cs.depth, image: cs.image, color: cs.color, corners, metadata: plane })
            })
            .collect::<Result<Vec<_>>>()?;

        log::debug!("slab {} built with {} sections", metadata.name(), sections.len());

        Ok(Slab {
            metadata,
            sections,
            color_map: layer.map(|l| l.color_map),
        })
    }

    fn fetch_segmentation(
        &self,
        segmentation: SegmentationSource<'a>,
        image_level: Lod,
        seg_level: Lod,
        range: &VoxelRange,
    ) -> Result<SegmentationLayer> {
        let (ratio, seg_range) = align_levels(self.image, image_level, segmentation, seg_level, range)?;
        let ids = fetch_checked(segmentation, seg_level, &seg_range)?;
        let (colors, color_map) = colorize_block(self.config.color_seed, &ids);
        Ok(SegmentationLayer { colors, color_map, range: seg_range, ratio })
    }
}

/// Read `range` and check the returned shape
fn fetch_checked<V: VolumeSource + ?Sized>(source: &V, level: Lod, range: &VoxelRange) -> Result<Block<V::Voxel>> {
    let block = source.read(level, range)?;
    if block.shape() != range.shape() {
        return Err(Error::fetch(
            level,
            format!("read of {range} returned shape {:?}, expected {:?}", block.shape(), range.shape()),
        ));
    }
    Ok(block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::color_for_id;
    use crate::core::types::BLACK;
    use crate::math::axis::Axis;
    use crate::volume::{InMemoryVolume, ScaleInfo, VoxelResolution};

    fn image_volume() -> InMemoryVolume<u8> {
        let base = Block::from_fn([32, 32, 8], |x, y, z| ((x + y + z) % 256) as u8);
        InMemoryVolume::new(VoxelResolution::new(8.0, 8.0, 40.0).unwrap(), [0; 3], base)
            .with_pyramid([2, 2, 1], 1)
    }

    fn seg_volume() -> InMemoryVolume<u64> {
        // Segment per 4x4 column in seg voxels, 0 on the border
        let base = Block::from_fn([16, 16, 8], |x, y, _| {
            if x == 0 || y == 0 { 0 } else { (x / 4 + 10 * (y / 4)) as u64 + 1 }
        });
        InMemoryVolume::new(VoxelResolution::new(16.0, 16.0, 40.0).unwrap(), [0; 3], base)
    }

    #[test]
    fn test_image_only_slab() {
        let config = EngineConfig::default();
        let image = image_volume();
        let assembler = SlabAssembler::new(&image, &config);
        let slab = assembler
            .build_slab(&RegionRequest::voxels([4, 12, 8, 12, 2, 5]), &SlabOptions::new(0, Axis::Z))
            .unwrap();

        assert_eq!(slab.sections.len(), 3);
        assert!(slab.color_map.is_none());
        assert!(!slab.metadata.overlay_segmentation);
        let first = &slab.sections[0];
        assert_eq!(first.depth, 2);
        assert_eq!((first.image.width, first.image.height), (8, 4));
        assert_eq!(first.image.get(0, 0), Some(14u8.normalized()));
        assert!(first.color.is_none());

        // Each plane carries its own one-voxel record
        let ranges: Vec<[i64; 6]> = slab.sections.iter().map(|s| s.metadata.range.to_array()).collect();
        assert_eq!(ranges, vec![[4, 12, 8, 12, 2, 3], [4, 12, 8, 12, 3, 4], [4, 12, 8, 12, 4, 5]]);
        assert_eq!(first.metadata.name(), "4_12_8_12_2_3");
        assert_eq!(first.metadata.level, slab.metadata.level);
        assert_eq!(first.metadata.axis, Axis::Z);
    }

    #[test]
    fn test_overlay_slab_colors_match_ids() {
        let config = EngineConfig::default();
        let image = image_volume();
        let seg = seg_volume();
        let assembler = SlabAssembler::new(&image, &config).with_segmentation(&seg);
        let options = SlabOptions::new(0, Axis::Z).with_overlay(true);
        let slab = assembler.build_slab(&RegionRequest::voxels([0, 16, 0, 16, 3, 4]), &options).unwrap();

        assert_eq!(slab.sections.len(), 1);
        assert!(slab.metadata.overlay_segmentation);
        let color = slab.sections[0].color.as_ref().unwrap();
        assert_eq!((color.width, color.height), (8, 8));
        assert_eq!(color.get(0, 0), Some(BLACK));
        let id = seg.read(0, &VoxelRange::new(5, 6, 6, 7, 3, 4)).unwrap()[[0, 0, 0]];
        assert_eq!(color.get(5, 6), Some(color_for_id(config.color_seed, id)));
        assert!(slab.color_map.unwrap().get(id).is_some());
    }

    #[test]
    fn test_coarser_image_level_pairs_one_to_one() {
        let config = EngineConfig::default();
        let image = image_volume();
        let seg = seg_volume();
        let assembler = SlabAssembler::new(&image, &config).with_segmentation(&seg);
        // Image level 1 is 16nm, same as segmentation level 0
        let options = SlabOptions::new(1, Axis::Y).with_overlay(true).with_segmentation_level(0);
        let slab = assembler.build_slab(&RegionRequest::voxels([2, 6, 3, 5, 0, 2]), &options).unwrap();
        assert_eq!(slab.sections.len(), 2);
        for section in &slab.sections {
            let color = section.color.as_ref().unwrap();
            assert_eq!((color.width, color.height), (section.image.width, section.image.height));
        }
    }

    #[test]
    fn test_overlay_without_segmentation_volume() {
        let config = EngineConfig::default();
        let image = image_volume();
        let slab = SlabAssembler::new(&image, &config)
            .build_slab(&RegionRequest::voxels([0, 2, 0, 2, 0, 1]), &SlabOptions::default().with_overlay(true))
            .unwrap();
        assert!(!slab.metadata.overlay_segmentation);
        assert!(slab.sections[0].color.is_none());
    }

    #[test]
    fn test_degenerate_slicing_axis_yields_one_section() {
        let config = EngineConfig::default();
        let image = image_volume();
        let slab = SlabAssembler::new(&image, &config)
            .build_slab(&RegionRequest::voxels([0, 4, 6, 6, 0, 8]), &SlabOptions::new(0, Axis::Y))
            .unwrap();
        assert_eq!(slab.sections.len(), 1);
        assert_eq!(slab.sections[0].depth, 6);
        assert_eq!(slab.metadata.range.to_array(), [0, 4, 6, 7, 0, 8]);
    }

    #[test]
    fn test_physical_request() {
        let config = EngineConfig::default();
        let image = image_volume();
        let request = RegionRequest::physical([32.0, 64.0, 0.0, 8.0, 80.0, 80.0]);
        let slab = SlabAssembler::new(&image, &config).build_slab(&request, &SlabOptions::default()).unwrap();
        assert_eq!(slab.metadata.range.to_array(), [4, 8, 0, 1, 2, 3]);
        assert_eq!(slab.metadata.name(), "4_8_0_1_2_3");
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let config = EngineConfig::default();
        let image = image_volume();
        let err = SlabAssembler::new(&image, &config)
            .build_slab(&RegionRequest::voxels([30, 40, 0, 1, 0, 1]), &SlabOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::FetchFailure { level: 0, .. }));
    }

    struct WrongShape;

    impl VolumeSource for WrongShape {
        type Voxel = u8;

        fn describe(&self, _level: Lod) -> Result<ScaleInfo> {
            Ok(ScaleInfo {
                resolution: VoxelResolution::new(1.0, 1.0, 1.0)?,
                voxel_offset: [0; 3],
                size: [100; 3],
            })
        }

        fn read(&self, _level: Lod, _range: &VoxelRange) -> Result<Block<u8>> {
            Ok(Block::filled([1, 1, 1], 0))
        }
    }

    #[test]
    fn test_shape_mismatch_is_fetch_failure() {
        let config = EngineConfig::default();
        let err = SlabAssembler::new(&WrongShape, &config)
            .build_slab(&RegionRequest::voxels([0, 2, 0, 2, 0, 2]), &SlabOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::FetchFailure { .. }));
    }
}
