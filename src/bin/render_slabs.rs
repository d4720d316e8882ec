//! Slab renderer over a synthetic image + segmentation pair.
//!
//! Usage: cargo run --release --bin render_slabs -- [OPTIONS]
//!
//! Options:
//!   --region <X1,X2,Y1,Y2,Z1,Z2>  Image voxel range at the chosen level (default: 0,96,0,96,4,8)
//!   --level <N>                   Image level of detail (default: 0)
//!   --axis <x|y|z>                Slicing axis (default: z)
//!   --overlay                     Colorize the segmentation on top of the image
//!   --cube                        Write the six faces of the region instead of a slab
//!   --config <PATH>               EngineConfig JSON (default: built-in defaults)
//!   --out <DIR>                   Output directory (default: "slabs")
//!
//! Output structure:
//!   <out>/<x1_x2_y1_y2_z1_z2>/
//!     image_<depth>.png
//!     segmentation_<depth>.png    # with --overlay
//!     metadata.json

use std::path::{Path, PathBuf};
use std::time::Instant;

use voxslab::core::{EngineConfig, Result, logging};
use voxslab::math::Axis;
use voxslab::slab::{RegionRequest, SlabAssembler, SlabOptions, fetch_cube, write_slab};
use voxslab::volume::{Block, InMemoryVolume, VoxelResolution};

const IMAGE_SHAPE: [usize; 3] = [256, 256, 32];

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let region = parse_region_arg(args, "--region").unwrap_or([0, 96, 0, 96, 4, 8]);
    let level = parse_u32_arg(args, "--level").unwrap_or(0);
    let axis = parse_axis_arg(args, "--axis").unwrap_or(Axis::Z);
    let overlay = has_flag(args, "--overlay");
    let cube = has_flag(args, "--cube");
    let out = PathBuf::from(parse_str_arg(args, "--out").unwrap_or_else(|| "slabs".to_string()));

    let config = match parse_str_arg(args, "--config") {
        Some(path) => EngineConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => EngineConfig::default(),
    };

    println!("=== voxslab slab renderer ===");
    println!("Region: {:?} at level {}", region, level);
    println!("Axis:   {}", axis);
    println!("Overlay: {}", overlay);
    println!("Output: {}", out.display());
    println!();

    let start = Instant::now();
    let (image, segmentation) = synthetic_volumes()?;
    println!("Volumes generated in {:.2}s", start.elapsed().as_secs_f64());

    let pool = config.thread_pool()?;
    let assembler = SlabAssembler::new(&image, &config).with_segmentation(&segmentation);
    let options = SlabOptions::new(level, axis).with_overlay(overlay);
    let request = RegionRequest::voxels(region);

    let start = Instant::now();
    let slabs = pool.install(|| -> Result<_> {
        if cube {
            Ok(fetch_cube(&assembler, &request, &options)?
                .into_iter()
                .map(|(_, slab)| slab)
                .collect::<Vec<_>>())
        } else {
            Ok(vec![assembler.build_slab(&request, &options)?])
        }
    })?;

    let mut sections = 0;
    for slab in &slabs {
        let dir = write_slab(slab, &out)?;
        sections += slab.sections.len();
        if let Some(colors) = &slab.color_map {
            println!("{}: {} segments colored", dir.display(), colors.hashed_count());
        }
    }
    println!();
    println!(
        "Wrote {} slabs ({} sections) in {:.2}s",
        slabs.len(),
        sections,
        start.elapsed().as_secs_f64()
    );
    write_config(&config, &out)?;
    Ok(())
}

/// Image of concentric shells over 3 levels, and a segmentation of large-ID
/// cells at half the in-plane resolution.
fn synthetic_volumes() -> Result<(InMemoryVolume<u8>, InMemoryVolume<u64>)> {
    let [nx, ny, nz] = IMAGE_SHAPE;
    let center = [nx as f64 / 2.0, ny as f64 / 2.0, nz as f64 / 2.0];
    let image = InMemoryVolume::new(
        VoxelResolution::new(8.0, 8.0, 40.0)?,
        [0; 3],
        Block::from_fn(IMAGE_SHAPE, |x, y, z| {
            let dx = x as f64 - center[0];
            let dy = y as f64 - center[1];
            let dz = (z as f64 - center[2]) * 5.0;
            let r = (dx * dx + dy * dy + dz * dz).sqrt();
            (128.0 + 127.0 * (r / 6.0).sin()) as u8
        }),
    )
    .with_pyramid([2, 2, 1], 2);

    let seg_shape = [nx / 2, ny / 2, nz];
    let segmentation = InMemoryVolume::new(
        VoxelResolution::new(16.0, 16.0, 40.0)?,
        [0; 3],
        Block::from_fn(seg_shape, |x, y, z| {
            let cell = (x / 16 + 8 * (y / 16)) as u64;
            if (x / 16 + y / 16 + z / 8) % 5 == 0 {
                0
            } else {
                864_691_135_000_000_000 + cell
            }
        }),
    )
    .with_pyramid([2, 2, 1], 2);

    Ok((image, segmentation))
}

fn write_config(config: &EngineConfig, out: &Path) -> Result<()> {
    std::fs::create_dir_all(out)?;
    std::fs::write(out.join("config.json"), config.to_json()?)?;
    Ok(())
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_axis_arg(args: &[String], flag: &str) -> Option<Axis> {
    match parse_str_arg(args, flag)?.to_ascii_lowercase().as_str() {
        "x" => Some(Axis::X),
        "y" => Some(Axis::Y),
        "z" => Some(Axis::Z),
        _ => None,
    }
}

fn parse_region_arg(args: &[String], flag: &str) -> Option<[i64; 6]> {
    let values: Vec<i64> = parse_str_arg(args, flag)?
        .split(',')
        .map(|s| s.trim().parse().ok())
        .collect::<Option<_>>()?;
    values.try_into().ok()
}
