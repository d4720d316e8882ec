//! Block colorization through a per-call color map

use std::collections::HashMap;

use rayon::prelude::*;

use crate::color::hash::{BACKGROUND_ID, color_for_id};
use crate::core::types::Rgb;
use crate::volume::block::Block;

/// Colors for the distinct segment IDs of one block.
///
/// Built fresh for every colorization call; colors depend only on
/// `(seed, id)`, never on previously seen blocks.
#[derive(Clone, Debug, Default)]
pub struct ColorMap {
    seed: u32,
    index: HashMap<u64, u32>,
    ids: Vec<u64>,
    colors: Vec<Rgb>,
}

impl ColorMap {
    /// Color map over the distinct values of `ids`
    pub fn from_ids(seed: u32, ids: impl IntoIterator<Item = u64>) -> Self {
        let mut map = Self { seed, ..Default::default() };
        for id in ids {
            map.intern(id);
        }
        map.fill_colors();
        map
    }

    /// Dense palette index for `id`, registering it if new
    fn intern(&mut self, id: u64) -> u32 {
        let next = self.ids.len() as u32;
        *self.index.entry(id).or_insert_with(|| {
            self.ids.push(id);
            next
        })
    }

    fn fill_colors(&mut self) {
        let seed = self.seed;
        self.colors = self.ids.par_iter().map(|&id| color_for_id(seed, id)).collect();
    }

    /// Seed the colors were hashed with
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Color of `id`, if it was present
    pub fn get(&self, id: u64) -> Option<Rgb> {
        self.index.get(&id).map(|&i| self.colors[i as usize])
    }

    /// Distinct IDs in first-seen order
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Number of distinct IDs, background included
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the block had no voxels
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of IDs that needed a hash (everything except background)
    pub fn hashed_count(&self) -> usize {
        self.ids.len() - usize::from(self.index.contains_key(&BACKGROUND_ID))
    }

    /// `(id, color)` pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (u64, Rgb)> + '_ {
        self.ids.iter().copied().zip(self.colors.iter().copied())
    }
}

/// Colorize a block of segmentation IDs.
///
/// One pass assigns each voxel a dense palette index, the palette is computed
/// once per distinct ID, and one remap pass substitutes colors. Cost is
/// proportional to voxels plus distinct IDs, independent of how many distinct
/// IDs share the block.
///
/// # Examples
/// ```
/// use voxslab::color::colorize_block;
/// use voxslab::volume::Block;
///
/// let ids = Block::from_fn([4, 4, 1], |x, _, _| x as u64);
/// let (colors, map) = colorize_block(42, &ids);
/// assert_eq!(colors.shape(), [4, 4, 1]);
/// assert_eq!(map.len(), 4);
/// assert_eq!(colors[[0, 2, 0]], [0.0, 0.0, 0.0]);
/// ```
pub fn colorize_block(seed: u32, ids: &Block<u64>) -> (Block<Rgb>, ColorMap) {
    let mut map = ColorMap { seed, ..Default::default() };

    // Segmentations come in long runs of one ID; skip the hash lookup for those
    let mut last: Option<(u64, u32)> = None;
    let labels = ids.map(|&id| match last {
        Some((prev, label)) if prev == id => label,
        _ => {
            let label = map.intern(id);
            last = Some((id, label));
            label
        }
    });
    map.fill_colors();

    let palette = &map.colors;
    let colors = labels.par_map(|&l| palette[l as usize]);
    log::trace!(
        "colorized {} voxels with {} distinct ids ({} hashed)",
        colors.len(), map.len(), map.hashed_count()
    );
    (colors, map)
}
