//! Emberfall Interactive App
//!
//! Opens a window and runs the ambient background in it until closed.

mod renderer;
mod viewer;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use emberfall_params::SPRITE_PATH;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Initial window width in logical pixels
    #[arg(long, default_value = "1280")]
    width: f64,

    /// Initial window height in logical pixels
    #[arg(long, default_value = "800")]
    height: f64,

    /// Hand sprite image
    #[arg(short, long, default_value = SPRITE_PATH)]
    sprite: PathBuf,

    /// Random seed; omit for a different sky every run
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    log::info!("Starting emberfall viewer");
    log::info!("Window: {}x{}", cli.width, cli.height);
    log::info!("Sprite: {}", cli.sprite.display());
    if let Some(seed) = cli.seed {
        log::info!("Seed: {}", seed);
    }

    pollster::block_on(viewer::run_viewer(viewer::ViewerConfig {
        size: [cli.width, cli.height],
        sprite: cli.sprite,
        seed: cli.seed,
    }))?;

    Ok(())
}
