mod metrics;
mod snapshots;

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use emberfall_core::{
    Background, HandFxLayer, PixmapSurface, SoftwareFx, SpriteImage, SpriteLoad, Tunables,
};
use emberfall_params::SPRITE_PATH;
use metrics::MetricsWriter;
use snapshots::SnapshotWriter;

#[derive(Parser)]
#[command(name = "emberfall-headless")]
#[command(about = "Render emberfall frames to PNG with per-frame metrics")]
struct Cli {
    /// Output directory for results
    #[arg(short, long, value_name = "DIR")]
    out: PathBuf,

    /// Viewport width in logical pixels
    #[arg(long, default_value = "1280")]
    width: f32,

    /// Viewport height in logical pixels
    #[arg(long, default_value = "800")]
    height: f32,

    /// Device pixel ratio (capped at 2)
    #[arg(long, default_value = "1.0")]
    dpr: f32,

    /// Number of frames to render
    #[arg(short, long, default_value = "120")]
    frames: u32,

    /// Synthetic frame rate driving the timestamps
    #[arg(long, default_value = "60")]
    fps: f64,

    /// Hand sprite image
    #[arg(short, long, value_name = "FILE", default_value = SPRITE_PATH)]
    sprite: PathBuf,

    /// Write a PNG every N frames (0 disables snapshots)
    #[arg(long, default_value = "30")]
    snapshot_every: u32,

    /// Random seed; omit to seed from entropy
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.width < 1.0 || cli.height < 1.0 {
        anyhow::bail!("Viewport too small ({}x{}).", cli.width, cli.height);
    }
    if cli.frames == 0 {
        anyhow::bail!("Frame count must be greater than 0.");
    }
    if !cli.fps.is_finite() || cli.fps <= 0.0 {
        anyhow::bail!("Frame rate must be positive.");
    }

    std::fs::create_dir_all(&cli.out)?;

    // Decode up front so every run sees the sprite from its first frame
    let (sprite_tx, sprite) = SpriteLoad::pending();
    let decoded = SpriteImage::open(&cli.sprite);
    if let Ok(image) = &decoded {
        log::info!("Loaded sprite {}x{} from {}", image.width, image.height, cli.sprite.display());
    }
    sprite_tx
        .send(decoded)
        .map_err(|_| anyhow::anyhow!("sprite channel closed"))?;

    let fx = HandFxLayer::create(SoftwareFx::new(), sprite);
    let rng = match cli.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut background = Background::attach(Some(PixmapSurface::new()), fx, rng)
        .ok_or_else(|| anyhow::anyhow!("no drawing surface"))?;
    background.resize(cli.width, cli.height, cli.dpr);
    background.start();

    let mut metrics = MetricsWriter::new(&cli.out)?;
    let snapshots = SnapshotWriter::new(&cli.out)?;
    snapshots.write_tunables(&Tunables::default())?;

    let frame_ms = 1000.0 / cli.fps;
    let run_start = Instant::now();

    for frame in 0..cli.frames {
        let timestamp_ms = frame as f64 * frame_ms;
        let frame_start = Instant::now();
        let Some(report) = background.tick(timestamp_ms) else {
            break;
        };
        let frame_time = frame_start.elapsed();

        metrics.write_frame(frame, timestamp_ms, &report, frame_time)?;

        let last = frame + 1 == cli.frames;
        if cli.snapshot_every > 0 && (frame % cli.snapshot_every == 0 || last) {
            if let Some(particles) = background.surface().pixmap() {
                let overlay = background
                    .fx()
                    .filter(|_| report.fx_rendered)
                    .and_then(|fx| fx.backend().overlay());
                let path = snapshots.write_frame(frame, particles, overlay)?;
                log::debug!("Wrote {}", path.display());
            }
        }

        if frame % 30 == 0 {
            log::info!(
                "Frame {}/{}: {} diamonds, {} embers, overlay {}",
                frame,
                cli.frames,
                report.diamonds,
                report.embers,
                if report.fx_rendered { "drawn" } else { "idle" }
            );
        }
    }

    let (frames, fx_frames) = metrics.finish()?;
    log::info!(
        "Rendered {} frames ({} with overlay) in {:.2?} to {}",
        frames,
        fx_frames,
        run_start.elapsed(),
        cli.out.display()
    );

    Ok(())
}
