//! Cross-section decomposition and image/segmentation pairing

use crate::color::colorize::ColorMap;
use crate::core::types::Rgb;
use crate::math::axis::Axis;
use crate::volume::align::ResolutionRatio;
use crate::volume::block::{Block, Slice2};
use crate::volume::range::VoxelRange;

/// Colorized segmentation fetched for one slab, in its own voxel grid
#[derive(Clone, Debug)]
pub struct SegmentationLayer {
    pub colors: Block<Rgb>,
    pub color_map: ColorMap,
    /// Segmentation-volume range the block covers
    pub range: VoxelRange,
    /// Image → segmentation ratio for the level pair
    pub ratio: ResolutionRatio,
}

impl SegmentationLayer {
    /// Local segmentation slice index paired with image voxel `depth` on `axis`.
    ///
    /// Uses the global mapping `floor(depth / r)` and clamps into the fetched
    /// block.
    pub fn paired_index(&self, axis: Axis, depth: i64) -> usize {
        let global = self.ratio.map_index(axis, depth);
        let last = self.colors.depth(axis).saturating_sub(1) as i64;
        (global - self.range.start(axis)).clamp(0, last) as usize
    }
}

/// One cross-section before geometry is attached
#[derive(Clone, Debug, PartialEq)]
pub struct CrossSection {
    /// Image voxel coordinate along the slicing axis
    pub depth: i64,
    pub image: Slice2<f32>,
    pub color: Option<Slice2<Rgb>>,
}

/// Cut `image` (covering `range`) into cross-sections along `axis`, ordered by
/// depth, each paired with its segmentation cross-section if a layer is given.
pub fn decompose(
    image: &Block<f32>,
    range: &VoxelRange,
    axis: Axis,
    segmentation: Option<&SegmentationLayer>,
) -> Vec<CrossSection> {
    (0..image.depth(axis))
        .map(|i| {
            let depth = range.start(axis) + i as i64;
            let color = segmentation.map(|seg| seg.colors.slice(axis, seg.paired_index(axis, depth)));
            log::trace!("cross-section {} along {} at depth {}", i, axis, depth);
            CrossSection { depth, image: image.slice(axis, i), color }
        })
        .collect()
}
