//! In-process volumes and mesh stores.
//!
//! These implement the volume-access contract over data held in memory. They
//! back the tests, benches and the `render_slabs` demo, and are a convenient
//! stand-in for a remote store when wiring up a host.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::error::Error;
use crate::core::types::{Lod, Result};
use crate::volume::block::Block;
use crate::volume::range::VoxelRange;
use crate::volume::resolution::{ScaleInfo, VoxelResolution};
use crate::volume::source::{MeshData, MeshSource, VolumeSource};

/// Multi-resolution volume with every level held in memory
#[derive(Debug)]
pub struct InMemoryVolume<T> {
    levels: Vec<(ScaleInfo, Block<T>)>,
    reads: AtomicUsize,
}

impl<T: Copy + Send + Sync> InMemoryVolume<T> {
    /// Single-level volume whose first voxel sits at `voxel_offset`
    pub fn new(resolution: VoxelResolution, voxel_offset: [i64; 3], base: Block<T>) -> Self {
        let shape = base.shape();
        let info = ScaleInfo {
            resolution,
            voxel_offset,
            size: [shape[0] as i64, shape[1] as i64, shape[2] as i64],
        };
        Self { levels: vec![(info, base)], reads: AtomicUsize::new(0) }
    }

    /// Add a coarser level by nearest-neighbour downsampling of the current
    /// coarsest level with per-axis integer `factors`.
    pub fn with_level(mut self, factors: [usize; 3]) -> Self {
        let factors = factors.map(|f| f.max(1));
        let Some((prev_info, prev)) = self.levels.last() else {
            return self;
        };
        let prev_shape = prev.shape();
        let shape = [0, 1, 2].map(|a| prev_shape[a].div_ceil(factors[a]));
        let block = Block::from_fn(shape, |x, y, z| {
            prev[[x * factors[0], y * factors[1], z * factors[2]]]
        });
        let info = ScaleInfo {
            resolution: prev_info.resolution.scaled(factors),
            voxel_offset: [0, 1, 2].map(|a| prev_info.voxel_offset[a].div_euclid(factors[a] as i64)),
            size: shape.map(|s| s as i64),
        };
        self.levels.push((info, block));
        self
    }

    /// Add `count` coarser levels, each downsampled by `factors`
    pub fn with_pyramid(mut self, factors: [usize; 3], count: usize) -> Self {
        for _ in 0..count {
            self = self.with_level(factors);
        }
        self
    }

    /// Number of levels in the pyramid
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of successful `read` calls so far
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    fn level(&self, level: Lod) -> Result<&(ScaleInfo, Block<T>)> {
        self.levels
            .get(level as usize)
            .ok_or_else(|| Error::fetch(level, format!("volume has {} levels", self.levels.len())))
    }
}

impl<T: Copy + Send + Sync> VolumeSource for InMemoryVolume<T> {
    type Voxel = T;

    fn describe(&self, level: Lod) -> Result<ScaleInfo> {
        Ok(self.level(level)?.0)
    }

    fn read(&self, level: Lod, range: &VoxelRange) -> Result<Block<T>> {
        let (info, block) = self.level(level)?;
        let bounds = info.bounds();
        if !bounds.contains(range) {
            return Err(Error::fetch(level, format!("range {range} outside volume bounds {bounds}")));
        }

        let lo = range.lo();
        let origin = [0, 1, 2].map(|a| (lo[a] - info.voxel_offset[a]) as usize);
        let out = Block::from_fn(range.shape(), |x, y, z| {
            block[[origin[0] + x, origin[1] + y, origin[2] + z]]
        });
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(out)
    }
}

/// Mesh store keyed by segment ID
#[derive(Clone, Debug, Default)]
pub struct InMemoryMeshes {
    meshes: HashMap<u64, MeshData>,
}

impl InMemoryMeshes {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the mesh of `id`
    pub fn insert(&mut self, id: u64, mesh: MeshData) {
        self.meshes.insert(id, mesh);
    }
}

impl MeshSource for InMemoryMeshes {
    fn mesh_for_ids(&self, ids: &[u64]) -> Result<HashMap<u64, MeshData>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.meshes.get(id).map(|mesh| (*id, mesh.clone())))
            .collect())
    }
}
