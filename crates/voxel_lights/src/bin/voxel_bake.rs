//! Offline bake tool
//!
//! Reads a bake configuration (TOML or RON), bakes its lights and writes the index texture
//! to `<output_dir>/<texture_key>/VoxelPointInfo.exr`.
//!
//! Usage: cargo run --bin voxel_bake bake.toml

use std::env;
use std::error::Error;
use std::path::PathBuf;

use voxel_lights::bake::BakeStats;
use voxel_lights::core::{BakeConfig, Config};
use voxel_lights::foundation::logging;
use voxel_lights::storage::{ExrTextureStore, TextureKey};
use voxel_lights::VoxelLightVolume;

fn bake_scene(config: &BakeConfig) -> Result<(BakeStats, PathBuf), Box<dyn Error>> {
    config.validate()?;

    let key = TextureKey::new(config.texture_key.as_str())?;
    let mut store = ExrTextureStore::new(&config.output_dir);
    let mut volume = VoxelLightVolume::from_bake_config(config);

    let stats = volume.bake_into(&mut store, &key)?;
    Ok((stats, store.texture_path(&key)))
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} bake.toml|bake.ron", args[0]);
        eprintln!("Bakes the configured point lights into a light-index texture");
        std::process::exit(1);
    }

    let config = match BakeConfig::load_from_file(&args[1]) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading {}: {}", args[1], e);
            std::process::exit(1);
        }
    };

    logging::init_with_filter(&config.log_filter);

    match bake_scene(&config) {
        Ok((stats, path)) => {
            println!("Baked {} lights into {}", stats.lights, path.display());
            println!(
                "   Tiles: {}/{} lit, {} truncated, max {} lights per tile",
                stats.lit_tiles, stats.tiles, stats.truncated_tiles, stats.max_candidates
            );
        }
        Err(e) => {
            eprintln!("Bake failed: {}", e);
            std::process::exit(1);
        }
    }
}
