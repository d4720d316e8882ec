//! Converts precomputed segment meshes into host-local geometry with their
//! overlay color.

use std::collections::HashSet;

use crate::color::hash::color_for_id;
use crate::coords::space::to_local;
use crate::core::config::EngineConfig;
use crate::core::error::Error;
use crate::core::types::{DVec3, Result, Rgb};
use crate::volume::source::MeshSource;

/// One segment's mesh in host-local units
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentMesh {
    pub id: u64,
    pub vertices: Vec<DVec3>,
    pub faces: Vec<[u32; 3]>,
    /// Same color the segment gets in slab overlays
    pub color: Rgb,
}

/// Result of a mesh request
#[derive(Debug, Default)]
pub struct MeshBatch {
    /// Meshes in request order, one per distinct found ID
    pub meshes: Vec<SegmentMesh>,
    /// `Error::IdMismatch` for every requested ID the source did not return
    pub missing: Vec<Error>,
}

impl MeshBatch {
    /// IDs that were requested but absent
    pub fn missing_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.missing.iter().filter_map(|e| match e {
            Error::IdMismatch(id) => Some(*id),
            _ => None,
        })
    }

    /// Segment ID to color, for colorizing the meshes later
    pub fn colors(&self) -> impl Iterator<Item = (u64, Rgb)> + '_ {
        self.meshes.iter().map(|m| (m.id, m.color))
    }
}

/// Fetch meshes for `ids` and convert them with `config.scale_factor`.
///
/// Duplicate IDs are requested once. Missing IDs do not abort the batch; each
/// is reported in [`MeshBatch::missing`]. Errors from the source itself are
/// propagated.
pub fn build_meshes<M: MeshSource + ?Sized>(source: &M, ids: &[u64], config: &EngineConfig) -> Result<MeshBatch> {
    let mut seen = HashSet::with_capacity(ids.len());
    let unique: Vec<u64> = ids.iter().copied().filter(|id| seen.insert(*id)).collect();

    let mut found = source.mesh_for_ids(&unique)?;
    let mut batch = MeshBatch::default();

    for id in unique {
        let Some(mesh) = found.remove(&id) else {
            log::warn!("no mesh returned for segment {}", id);
            batch.missing.push(Error::IdMismatch(id));
            continue;
        };
        let vertices = mesh
            .vertices
            .into_iter()
            .map(|v| to_local(v, config.scale_factor))
            .collect::<Result<Vec<_>>>()?;
        log::trace!("segment {}: {} vertices, {} faces", id, vertices.len(), mesh.faces.len());
        batch.meshes.push(SegmentMesh {
            id,
            vertices,
            faces: mesh.faces,
            color: color_for_id(config.color_seed, id),
        });
    }

    log::debug!("built {} meshes, {} missing", batch.meshes.len(), batch.missing.len());
    Ok(batch)
}
