use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "revela", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the reveal frame at one elapsed fraction as a PNG.
    Frame(FrameArgs),
    /// Drive a full reveal and write numbered PNG frames.
    Sequence(SequenceArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long)]
    image: PathBuf,

    /// Elapsed fraction of the reveal, in [0, 1].
    #[arg(long)]
    at: f64,

    /// Reveal mode.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Speed curve preset.
    #[arg(long, value_enum)]
    curve: Option<CurveChoice>,

    /// Settings JSON; command-line flags override its values.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Bilinear filtering for the pixelation stages.
    #[arg(long)]
    smoothing: bool,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Input image (any format the `image` crate decodes).
    #[arg(long)]
    image: PathBuf,

    /// Tick rate of the playback loop.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Reveal duration in seconds; overrides the settings value.
    #[arg(long)]
    duration: Option<f64>,

    /// Reveal mode.
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,

    /// Speed curve preset.
    #[arg(long, value_enum)]
    curve: Option<CurveChoice>,

    /// Settings JSON; command-line flags override its values.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Bilinear filtering for the pixelation stages.
    #[arg(long)]
    smoothing: bool,

    /// Output directory for numbered PNG frames.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModeChoice {
    Pixelate,
    CenterZoom,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CurveChoice {
    Linear,
    Suspense,
    Tortoise,
    Flash,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
    }
}

fn load_settings(
    path: Option<&Path>,
    mode: Option<ModeChoice>,
    curve: Option<CurveChoice>,
    smoothing: bool,
    duration: Option<f64>,
) -> anyhow::Result<revela::RevealSettings> {
    let mut settings = match path {
        Some(p) => {
            let f = File::open(p).with_context(|| format!("open settings '{}'", p.display()))?;
            let r = BufReader::new(f);
            serde_json::from_reader(r).with_context(|| "parse settings JSON")?
        }
        None => revela::RevealSettings::default(),
    };

    if let Some(mode) = mode {
        settings.mode = match mode {
            ModeChoice::Pixelate => revela::RevealMode::Pixelate,
            ModeChoice::CenterZoom => revela::RevealMode::CenterZoom,
        };
    }
    if let Some(curve) = curve {
        settings.curve = match curve {
            CurveChoice::Linear => revela::CurvePreset::Linear,
            CurveChoice::Suspense => revela::CurvePreset::Suspense,
            CurveChoice::Tortoise => revela::CurvePreset::Tortoise,
            CurveChoice::Flash => revela::CurvePreset::Flash,
        }
        .curve();
    }
    if smoothing {
        settings.smoothing = true;
    }
    if let Some(duration) = duration {
        settings.duration_secs = duration;
    }

    settings.validate()?;
    Ok(settings)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&args.at) {
        anyhow::bail!("--at must lie in [0, 1]");
    }
    let settings = load_settings(
        args.settings.as_deref(),
        args.mode,
        args.curve,
        args.smoothing,
        None,
    )?;

    let image = revela::load_image_file(&args.image)?;
    let mut renderer = revela::RevealRenderer::new(&settings);
    let mut surface = revela::RasterSurface::new(image.width, image.height);

    let visual = settings.visual_progress(args.at);
    renderer.render(&image, visual, &mut surface)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&args.out, &surface.into_raster())?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be >= 1");
    }
    let settings = load_settings(
        args.settings.as_deref(),
        args.mode,
        args.curve,
        args.smoothing,
        args.duration,
    )?;

    let image = revela::load_image_file(&args.image)?;
    let (width, height) = (image.width, image.height);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut session = revela::RevealSession::new(settings, revela::ManualScheduler::new())?;
    let mut surface = revela::RasterSurface::new(width, height);

    let token = session.begin_image();
    session.image_ready(token, image);

    let dt = 1.0 / f64::from(args.fps);
    let mut now = 0.0;
    let mut frames = 0u64;

    // Frame zero is the initial state before playback starts.
    session.render_now(&mut surface)?;
    write_png(&frame_path(&args.out_dir, frames), surface.raster())?;
    frames += 1;

    session.play(now)?;
    while let Some(tick) = session.scheduler_mut().take() {
        now += dt;
        session.tick(tick, now, &mut surface)?;
        write_png(&frame_path(&args.out_dir, frames), surface.raster())?;
        frames += 1;
    }

    eprintln!("wrote {} frames to {}", frames, args.out_dir.display());
    Ok(())
}

fn frame_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

fn write_png(path: &Path, raster: &revela::Raster) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        &raster.data,
        raster.width,
        raster.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}
