use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use undula::{Bounds, Engine, EngineConfig, ManualClock};

#[derive(Parser, Debug)]
#[command(name = "undula", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Render a frame sequence as numbered PNGs.
    Sequence(SequenceArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Frame timestamp in milliseconds.
    #[arg(long, default_value_t = 0.0)]
    time_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Optional engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the placement seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Surface width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Number of frames to render.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Milliseconds advanced per frame.
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    interval_ms: f64,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Optional engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the placement seed.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
    }
}

fn read_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<EngineConfig> {
    let mut cfg = match path {
        Some(p) => {
            let bytes = std::fs::read(p)
                .with_context(|| format!("read engine config '{}'", p.display()))?;
            serde_json::from_slice(&bytes).with_context(|| "parse engine config JSON")?
        }
        None => EngineConfig::default(),
    };
    // PNG output wants fully opaque pixels; clear to the site's near-black
    // unless the config says otherwise.
    cfg.clear_rgba = cfg.clear_rgba.or(Some([5, 5, 5, 255]));
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
    Ok(cfg)
}

fn build_engine(cfg: EngineConfig, width: u32, height: u32) -> anyhow::Result<(Engine, Rc<ManualClock>)> {
    let clock = Rc::new(ManualClock::new(0.0));
    let mut engine = Engine::new(cfg, Box::new(Rc::clone(&clock)))?;
    engine.attach(Bounds::new(width, height))?;
    engine.start();
    Ok((engine, clock))
}

fn save_png(engine: &Engine, path: &Path) -> anyhow::Result<()> {
    let frame = engine
        .frame_rgba8()
        .context("engine produced no frame (zero-area surface?)")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    image::save_buffer_with_format(
        path,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref(), args.seed)?;
    let (mut engine, clock) = build_engine(cfg, args.width, args.height)?;

    clock.set(args.time_ms);
    engine.tick()?;

    save_png(&engine, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let cfg = read_config(args.config.as_deref(), args.seed)?;
    let (mut engine, clock) = build_engine(cfg, args.width, args.height)?;

    for i in 0..args.frames {
        clock.set(f64::from(i) * args.interval_ms);
        engine.tick()?;
        let path = args.out_dir.join(format!("frame_{i:04}.png"));
        save_png(&engine, &path)?;
    }

    eprintln!("wrote {} frames to {}", args.frames, args.out_dir.display());
    Ok(())
}
