use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use rasterfx::{
    render_frame, AnimationDriver, EffectKind, EffectSettings, LoadedMedia, RasterBuffer,
    RasterSurface,
};

#[derive(Parser, Debug)]
#[command(name = "rasterfx", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the available effects.
    ListEffects,
    /// Apply an effect to an image and write the result as a PNG.
    Apply(ApplyArgs),
    /// Render an image as ASCII text on stdout.
    Ascii(AsciiArgs),
    /// Render the matrix-rain overlay for a number of ticks and write the
    /// final frame as a PNG.
    Rain(RainArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Effect id (see `list-effects`).
    #[arg(long)]
    effect: String,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Uniform scale factor applied to the source before the effect.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Settings document (JSON), e.g. '{"pixelate": {"block_size": 4}}'.
    #[arg(long)]
    settings: Option<String>,
}

#[derive(Parser, Debug)]
struct AsciiArgs {
    /// Input image path.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Maximum output columns.
    #[arg(long, default_value_t = 120)]
    columns: u32,

    /// Settings document (JSON); the `ascii` section applies.
    #[arg(long)]
    settings: Option<String>,
}

#[derive(Parser, Debug)]
struct RainArgs {
    /// Optional backing image whose brightness modulates the glyphs.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Surface size as WIDTHxHEIGHT.
    #[arg(long, default_value = "640x480")]
    size: String,

    /// Number of animation ticks to run.
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// RNG seed; the animation is reproducible per seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Settings document (JSON); the `matrix_rain` section applies.
    #[arg(long)]
    settings: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::ListEffects => cmd_list_effects(),
        Command::Apply(args) => cmd_apply(args),
        Command::Ascii(args) => cmd_ascii(args),
        Command::Rain(args) => cmd_rain(args),
    }
}

fn parse_settings(doc: Option<&str>) -> anyhow::Result<EffectSettings> {
    match doc {
        Some(json) => Ok(EffectSettings::from_json(json)?),
        None => Ok(EffectSettings::default()),
    }
}

fn write_png(path: &Path, buffer: &RasterBuffer) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    image::save_buffer_with_format(
        path,
        buffer.data(),
        buffer.width(),
        buffer.height(),
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write '{}'", path.display()))?;
    Ok(())
}

fn cmd_list_effects() -> anyhow::Result<()> {
    for kind in EffectKind::ALL {
        println!("{:<16} {:<24} {}", kind.id(), kind.label(), kind.description());
    }
    Ok(())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let kind = EffectKind::parse(&args.effect)?;
    anyhow::ensure!(
        !kind.is_animated(),
        "'{}' is animated; use the `rain` subcommand",
        kind.id()
    );
    let settings = parse_settings(args.settings.as_deref())?;
    let media = LoadedMedia::from_path(&args.in_path)?;

    let scaled_w = (media.width() as f32 * args.scale).round() as u32;
    let scaled_h = (media.height() as f32 * args.scale).round() as u32;
    let mut surface = RasterSurface::new(scaled_w, scaled_h);
    let transcript = render_frame(kind, media.first_frame(), &mut surface, &settings, args.scale)?;

    write_png(&args.out, surface.buffer())?;
    if let Some(text) = transcript {
        println!("{text}");
    }
    Ok(())
}

fn cmd_ascii(args: AsciiArgs) -> anyhow::Result<()> {
    let mut settings = parse_settings(args.settings.as_deref())?;
    settings.ascii.output_width = args.columns;
    let media = LoadedMedia::from_path(&args.in_path)?;

    let mut surface = RasterSurface::new(media.width(), media.height());
    let transcript = render_frame(
        EffectKind::Ascii,
        media.first_frame(),
        &mut surface,
        &settings,
        1.0,
    )?;
    println!("{}", transcript.unwrap_or_default());
    Ok(())
}

fn cmd_rain(args: RainArgs) -> anyhow::Result<()> {
    let (width, height) = parse_size(&args.size)?;
    let settings = parse_settings(args.settings.as_deref())?;
    let backing = match &args.in_path {
        Some(path) => Some(LoadedMedia::from_path(path)?.first_frame().clone()),
        None => None,
    };

    let mut driver = AnimationDriver::new();
    driver.start_rain(width, height, &settings, backing, args.seed);

    let mut surface = RasterSurface::new(width, height);
    // Fixed 60fps-style cadence; the session gates itself by speed.
    for _ in 0..args.ticks {
        driver.tick(&mut surface, 16.0, None)?;
    }
    driver.stop();

    write_png(&args.out, surface.buffer())
}

fn parse_size(s: &str) -> anyhow::Result<(u32, u32)> {
    let (w, h) = s
        .split_once('x')
        .with_context(|| format!("bad --size '{s}', expected WIDTHxHEIGHT"))?;
    Ok((
        w.parse().with_context(|| format!("bad width '{w}'"))?,
        h.parse().with_context(|| format!("bad height '{h}'"))?,
    ))
}
