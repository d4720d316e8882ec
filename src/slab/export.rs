//! Writing built slabs to disk: one PNG per section plus a metadata record

use std::path::{Path, PathBuf};

use crate::core::types::Result;
use crate::slab::assembler::Slab;
use crate::slab::metadata::SlabMetadata;
use crate::slab::pixels::{color_texture, image_texture, to_rgba8};

/// File name of the metadata record inside a slab directory
pub const METADATA_FILE: &str = "metadata.json";

/// Write `slab` under `dir/<slab name>/`.
///
/// Each section produces `image_<depth>.png` and, with overlay, a
/// `segmentation_<depth>.png` with transparent background. Returns the slab
/// directory.
pub fn write_slab(slab: &Slab, dir: &Path) -> Result<PathBuf> {
    let slab_dir = dir.join(slab.metadata.name());
    std::fs::create_dir_all(&slab_dir)?;

    for section in &slab.sections {
        to_rgba8(&image_texture(&section.image)).save(slab_dir.join(format!("image_{}.png", section.depth)))?;
        if let Some(color) = &section.color {
            to_rgba8(&color_texture(color))
                .save(slab_dir.join(format!("segmentation_{}.png", section.depth)))?;
        }
    }

    std::fs::write(slab_dir.join(METADATA_FILE), slab.metadata.to_json()?)?;
    log::info!("wrote {} sections to {}", slab.sections.len(), slab_dir.display());
    Ok(slab_dir)
}

/// Read back the metadata record of a slab directory
pub fn read_metadata(slab_dir: &Path) -> Result<SlabMetadata> {
    let json = std::fs::read_to_string(slab_dir.join(METADATA_FILE))?;
    SlabMetadata::from_json(&json)
}
