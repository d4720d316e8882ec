//! Six-face "cube" composition of one-voxel-thick slabs

use crate::core::types::Result;
use crate::math::axis::Axis;
use crate::slab::assembler::{Slab, SlabAssembler};
use crate::slab::request::{RegionRequest, SlabOptions};
use crate::volume::range::VoxelRange;
use crate::volume::source::{Intensity, VolumeSource};

/// Face of a fetched box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    /// First z plane
    Top,
    /// Last z plane
    Bottom,
    /// First y plane
    Left,
    /// Last y plane
    Right,
    /// First x plane
    Front,
    /// Last x plane
    Back,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::Top,
        CubeFace::Bottom,
        CubeFace::Left,
        CubeFace::Right,
        CubeFace::Front,
        CubeFace::Back,
    ];

    /// Axis the face is perpendicular to (and sliced along)
    pub fn axis(self) -> Axis {
        match self {
            CubeFace::Top | CubeFace::Bottom => Axis::Z,
            CubeFace::Left | CubeFace::Right => Axis::Y,
            CubeFace::Front | CubeFace::Back => Axis::X,
        }
    }

    /// One-voxel-thick sub-range of `range` for this face
    pub fn range(self, range: &VoxelRange) -> VoxelRange {
        let axis = self.axis();
        let (lo, hi) = (range.start(axis), range.end(axis));
        match self {
            CubeFace::Top | CubeFace::Left | CubeFace::Front => range.with_axis(axis, lo, lo + 1),
            CubeFace::Bottom | CubeFace::Right | CubeFace::Back => range.with_axis(axis, hi - 1, hi),
        }
    }
}

/// Build the six faces of the box `request` at `options.level`.
///
/// The request is resolved to voxels once, so physical-unit requests produce
/// faces exactly one voxel thick. `options.axis` is ignored; each face is
/// sliced along its own normal.
pub fn fetch_cube<I>(
    assembler: &SlabAssembler<'_, I>,
    request: &RegionRequest,
    options: &SlabOptions,
) -> Result<Vec<(CubeFace, Slab)>>
where
    I: VolumeSource,
    I::Voxel: Intensity,
{
    let range = assembler.resolve(request, options.level)?;
    log::debug!("fetching cube {} at level {}", range, options.level);
    CubeFace::ALL
        .iter()
        .map(|&face| {
            let face_options = options.with_axis(face.axis());
            assembler
                .build_range(face.range(&range), &face_options)
                .map(|slab| (face, slab))
        })
        .collect()
}
