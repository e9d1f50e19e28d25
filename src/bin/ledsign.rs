use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

use ledsign::{
    Alignment, CancelToken, ContentItem, Direction, DisplaySettings, EffectConfig, EffectType,
    FontRegistry, Rgb8, SignPreview, TransitionPhase, ZoomLevel, play_effect,
};

#[derive(Parser, Debug)]
#[command(name = "ledsign", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one preview frame as a PNG.
    Frame(FrameArgs),
    /// Play an entry effect and write every frame as `frame_NNNN.png`.
    Effect(EffectArgs),
}

#[derive(Args, Debug)]
struct SignArgs {
    /// Display settings JSON. Defaults apply when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Font file (BMFont XML, atlas JSON or bit-matrix JSON).
    #[arg(long)]
    font: PathBuf,

    /// Text to show.
    #[arg(long)]
    text: String,

    /// Text color as `#rrggbb`.
    #[arg(long, default_value = "#ffffff")]
    color: Rgb8,

    #[arg(long, value_enum, default_value_t = AlignArg::Center)]
    align: AlignArg,

    /// Enable the glow post-process.
    #[arg(long, default_value_t = false)]
    glow: bool,

    /// Preview zoom in percent (50..=400).
    #[arg(long, default_value_t = 100)]
    zoom: u32,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    sign: SignArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct EffectArgs {
    #[command(flatten)]
    sign: SignArgs,

    #[arg(long, value_enum, default_value_t = EffectArg::SlideIn)]
    effect: EffectArg,

    #[arg(long, value_enum, default_value_t = DirectionArg::Left)]
    direction: DirectionArg,

    /// Effect duration in milliseconds.
    #[arg(long, default_value_t = 500)]
    speed_ms: u64,

    /// Directory receiving the frame PNGs.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlignArg {
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EffectArg {
    Immediate,
    SlideIn,
    FadeIn,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Left,
    Right,
    Up,
    Down,
}

impl From<AlignArg> for Alignment {
    fn from(v: AlignArg) -> Self {
        match v {
            AlignArg::Left => Self::Left,
            AlignArg::Center => Self::Center,
            AlignArg::Right => Self::Right,
        }
    }
}

impl From<EffectArg> for EffectType {
    fn from(v: EffectArg) -> Self {
        match v {
            EffectArg::Immediate => Self::Immediate,
            EffectArg::SlideIn => Self::SlideIn,
            EffectArg::FadeIn => Self::FadeIn,
        }
    }
}

impl From<DirectionArg> for Direction {
    fn from(v: DirectionArg) -> Self {
        match v {
            DirectionArg::Left => Self::Left,
            DirectionArg::Right => Self::Right,
            DirectionArg::Up => Self::Up,
            DirectionArg::Down => Self::Down,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Effect(args) => cmd_effect(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

const FONT_NAME: &str = "cli";

fn build_preview(sign: &SignArgs) -> anyhow::Result<(SignPreview, ContentItem)> {
    let settings = match &sign.settings {
        Some(p) => DisplaySettings::from_path(p)
            .with_context(|| format!("load settings '{}'", p.display()))?,
        None => DisplaySettings::default(),
    };
    let mut registry = FontRegistry::new();
    registry
        .load(FONT_NAME, &sign.font)
        .with_context(|| format!("load font '{}'", sign.font.display()))?;

    let mut preview = SignPreview::new(registry, settings);
    preview.set_glow(sign.glow);
    preview.set_zoom(ZoomLevel::new(sign.zoom));

    let item = ContentItem::text(sign.text.clone(), FONT_NAME)
        .with_color(sign.color)
        .with_alignment(sign.align.into());
    Ok((preview, item))
}

fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}

fn write_png(path: &Path, img: &image::RgbaImage) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut preview, item) = build_preview(&args.sign)?;
    let frame = preview.render_item(&item, TransitionPhase::Visible, now())?;
    write_png(&args.out, &frame)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_effect(args: EffectArgs) -> anyhow::Result<()> {
    let (mut preview, mut item) = build_preview(&args.sign)?;
    item.entry = EffectConfig::new(args.effect.into(), args.speed_ms, args.direction.into());
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut written = 0usize;
    let mut failure: Option<anyhow::Error> = None;
    let cancel = CancelToken::new();
    play_effect(&item.entry, &cancel, |progress| {
        let result = preview
            .render_item(&item, TransitionPhase::Entry(progress), now())
            .map_err(anyhow::Error::from)
            .and_then(|frame| {
                let path = args.out_dir.join(format!("frame_{written:04}.png"));
                write_png(&path, &frame)
            });
        match result {
            Ok(()) => {
                tracing::debug!(frame = written, progress, "wrote effect frame");
                written += 1;
            }
            Err(e) => {
                failure.get_or_insert(e);
                cancel.cancel();
            }
        }
    });
    if let Some(e) = failure {
        return Err(e);
    }

    eprintln!("wrote {written} frames to {}", args.out_dir.display());
    Ok(())
}
