use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use gallery_host::{FsSceneLoader, Script, logging};
use gallery_shared::{Session, SimParams};

/// Walk a visitor through a gallery scene without rendering it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene directory holding `main.ron` and the exhibit models
    #[arg(long)]
    scene: PathBuf,

    /// Simulation parameters (RON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input script (RON list of segments); walks forward when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(long)]
    frames: Option<u32>,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_delta: f32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

const DEFAULT_FRAMES: u32 = 600;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    pollster::block_on(run(args))
}

async fn run(args: Args) -> anyhow::Result<()> {
    let params = match &args.config {
        Some(path) => SimParams::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimParams::default(),
    };
    let script = match &args.script {
        Some(path) => Script::load(path)?,
        None => Script::walk_forward(args.frames.unwrap_or(DEFAULT_FRAMES)),
    };
    let limit = args.frames.map_or(usize::MAX, |n| n as usize);

    let loader = FsSceneLoader::new(&args.scene);
    log::info!("loading scene from {}", loader.root().display());
    let main_model = loader
        .load_main()
        .with_context(|| format!("failed to load scene {}", loader.root().display()))?;
    let mut session =
        Session::new(params, &main_model, loader).context("invalid scene or parameters")?;

    let mut frames = 0;
    for frame in script.frames().take(limit) {
        if let Some(azimuth) = frame.azimuth {
            session.camera_mut().set_azimuth(azimuth);
        }
        let out = session.tick(args.frame_delta, frame.input).await;
        frames += 1;

        log::debug!(
            "frame {frames}: pos {:.3?} ground {} floor {:?} {}",
            out.position,
            out.on_ground,
            out.floor,
            session.status().text()
        );
        if let Some(floor) = out.event.new_floor_name.as_deref() {
            log::info!("frame {frames}: now on `{floor}`");
        }
        if out.resets > 0 {
            log::warn!("frame {frames}: visitor reset {} time(s)", out.resets);
        }
        if session.detector().is_failed() {
            log::error!("{}; stopping", session.status().text());
            break;
        }
    }

    log::info!(
        "ran {frames} frames; visitor at {:.3?} in `{}`",
        session.world_position(),
        session.active().name()
    );
    Ok(())
}
