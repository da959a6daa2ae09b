use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use sha2::Digest as _;
use tracing_subscriber::EnvFilter;

use gifscrub::{
    ControlState, FileSource, FrameChange, GifDecoder, LoadedSession, LoopMode, ManualTimer,
    MemorySurface, PlayerConfig, SimulatedDisplay, SourceLoopCount, SpeedOption,
};

#[derive(Parser, Debug)]
#[command(name = "gifscrub", version)]
struct Cli {
    /// Log debug events to stderr (overridden by `RUST_LOG`).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a JSON summary of a GIF.
    Info(InfoArgs),
    /// Write one composited frame as a PNG.
    Frame(FrameArgs),
    /// Play a GIF headlessly and print the frame timeline as JSON.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Player config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Include a SHA-256 digest of every composited frame.
    #[arg(long)]
    digest: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input GIF.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Player config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Playback rate (overrides the config).
    #[arg(long)]
    rate: Option<f64>,

    /// Loop policy (overrides the config).
    #[arg(long = "loop", value_enum)]
    loop_mode: Option<LoopChoice>,

    /// Simulated display refresh interval.
    #[arg(long, default_value_t = 16.0)]
    refresh_ms: f64,

    /// Stop after this much simulated time even if playback has not ended.
    #[arg(long, default_value_t = 10_000.0)]
    max_ms: f64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LoopChoice {
    Source,
    Infinite,
    None,
}

impl From<LoopChoice> for LoopMode {
    fn from(c: LoopChoice) -> Self {
        match c {
            LoopChoice::Source => LoopMode::Source,
            LoopChoice::Infinite => LoopMode::Infinite,
            LoopChoice::None => LoopMode::None,
        }
    }
}

#[derive(serde::Serialize)]
struct InfoReport {
    path: String,
    width: u32,
    height: u32,
    frames: usize,
    delays_ms: Vec<u32>,
    cycle_ms: u64,
    loop_count: SourceLoopCount,
    reduced_mode: bool,
    warning: Option<String>,
    speed_options: Vec<SpeedOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frame_sha256: Option<Vec<String>>,
}

#[derive(serde::Serialize)]
struct PlayReport {
    elapsed_ms: f64,
    timeline: Vec<FrameChange>,
    final_state: ControlState,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Info(args) => cmd_info(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "gifscrub=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PlayerConfig> {
    match path {
        Some(p) => Ok(PlayerConfig::from_path(p)?),
        None => Ok(PlayerConfig::default()),
    }
}

fn open(
    in_path: &Path,
    config: &PlayerConfig,
) -> anyhow::Result<LoadedSession<MemorySurface, ManualTimer>> {
    let id = in_path.to_string_lossy();
    let session = gifscrub::load_session(
        &FileSource::new(),
        &id,
        &GifDecoder,
        MemorySurface::new,
        ManualTimer::new(),
        config,
    )?;
    Ok(session)
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let config = PlayerConfig {
        autoplay: false,
        ..load_config(args.config.as_deref())?
    };
    let session = open(&args.in_path, &config)?;
    let player = &session.player;

    let frame_sha256 = args
        .digest
        .then(|| player.frames().iter().map(|f| sha256_hex(&f.data)).collect());
    let report = InfoReport {
        path: args.in_path.display().to_string(),
        width: session.canvas.width,
        height: session.canvas.height,
        frames: player.frames().len(),
        delays_ms: player.delays_ms().to_vec(),
        cycle_ms: player.delays_ms().iter().map(|d| u64::from(*d)).sum(),
        loop_count: session.source_loop_count,
        reduced_mode: session.policy.reduced_mode,
        warning: session.policy.warning_text.clone(),
        speed_options: session.speed_options.clone(),
        frame_sha256,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = PlayerConfig {
        autoplay: false,
        ..PlayerConfig::default()
    };
    let session = open(&args.in_path, &config)?;
    let frames = session.player.frames();
    let frame = frames.get(args.frame).with_context(|| {
        format!(
            "frame {} out of range (animation has {} frames)",
            args.frame,
            frames.len()
        )
    })?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        &frame.data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let mut config = PlayerConfig {
        autoplay: true,
        ..load_config(args.config.as_deref())?
    };
    if let Some(rate) = args.rate {
        config.initial_playback_rate = rate;
    }
    if let Some(mode) = args.loop_mode {
        config.initial_loop_mode = mode.into();
    }

    let mut session = open(&args.in_path, &config)?;
    let mut display = SimulatedDisplay::new(args.refresh_ms)?;
    let timeline = display.run(&mut session.player, args.max_ms)?;

    let report = PlayReport {
        elapsed_ms: display.now_ms(),
        timeline,
        final_state: session.control_state(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
