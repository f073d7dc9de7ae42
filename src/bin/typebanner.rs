use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::{SeedableRng as _, rngs::StdRng};
use tracing::Level;

use typebanner::{
    AccentColor, AssembleOpts, CursorMode, Fps, FrameRenderer, FrameSource as _, RenderRequest,
    WelcomeArtifacts, WelcomeConfig, ensure_parent_dir, layout, welcome_text,
};

#[derive(Parser, Debug)]
#[command(name = "typebanner", version, about = "Terminal typing-banner videos")]
struct Cli {
    /// Log at DEBUG level (also reports skipped frames).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single banner frame as a PNG.
    Frame(FrameArgs),
    /// Render a typing animation to MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the welcome greeting video for a member name.
    Welcome(WelcomeArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Full line of text.
    #[arg(long)]
    text: String,

    /// Characters revealed (defaults to the whole text).
    #[arg(long)]
    count: Option<usize>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Accent color: palette name or #RRGGBB.
    #[arg(long, default_value_t = AccentColor::MATRIX_GREEN)]
    color: AccentColor,

    /// Background image.
    #[arg(long)]
    bg: Option<PathBuf>,

    /// Overlay opacity over the background image.
    #[arg(long, default_value_t = layout::DEFAULT_OVERLAY_OPACITY)]
    opacity: f32,

    /// Render as the held final frame (no cursor).
    #[arg(long = "final")]
    final_frame: bool,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Line of text to type.
    #[arg(long)]
    text: String,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Frames per second [default: 5, or the config value].
    #[arg(long)]
    fps: Option<u32>,

    /// Times the completed frame is repeated [default: 30, or the config value].
    #[arg(long)]
    hold: Option<u32>,

    /// Background image.
    #[arg(long)]
    bg: Option<PathBuf>,

    /// Accent color: palette name or #RRGGBB.
    #[arg(long)]
    color: Option<AccentColor>,

    /// JSON config supplying defaults for the other options.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct WelcomeArgs {
    /// Member display name.
    #[arg(long)]
    name: String,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Background image (overrides the config).
    #[arg(long)]
    bg: Option<PathBuf>,

    /// Seed for the accent color pick.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON welcome config.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args, cli.verbose),
        Command::Welcome(args) => cmd_welcome(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Option<WelcomeConfig>> {
    path.map(|p| {
        WelcomeConfig::from_path(p).with_context(|| format!("load config '{}'", p.display()))
    })
    .transpose()
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let renderer = FrameRenderer::with_font_dirs(&args.font_dirs);
    let backdrop = args.bg.as_deref().and_then(|p| renderer.open_backdrop(p));
    let count = args.count.unwrap_or_else(|| args.text.chars().count());
    let cursor = if args.final_frame {
        CursorMode::Hidden
    } else {
        CursorMode::Auto
    };

    let req = RenderRequest::new(&args.text, count, args.color)
        .with_background(backdrop.as_ref())
        .with_overlay_opacity(args.opacity)
        .with_cursor(cursor);
    let frame = renderer.render_frame(&req)?;

    ensure_parent_dir(&args.out)?;
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs, verbose: bool) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;

    let mut opts = match &config {
        Some(cfg) => cfg.assemble_opts(cfg.text_color.unwrap_or_default()),
        None => AssembleOpts::default(),
    };
    if let Some(fps) = args.fps {
        opts.fps = Fps::new(fps)?;
    }
    if let Some(hold) = args.hold {
        opts.hold_frames = hold;
    }
    if let Some(bg) = args.bg {
        opts.background = Some(bg);
    }
    if let Some(color) = args.color {
        opts.color = color;
    }
    opts.verbose = verbose;

    let out = typebanner::assemble(&args.text, &args.out, &opts)?;
    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_welcome(args: WelcomeArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?.unwrap_or_default();
    let background = args.bg.unwrap_or_else(|| config.background.clone());
    let artifacts = WelcomeArtifacts::new(config).with_background(Some(background));

    let out = match args.seed {
        Some(seed) => {
            artifacts.generate_with(&mut StdRng::seed_from_u64(seed), &args.name, &args.out)?
        }
        None => artifacts.generate_with(&mut rand::thread_rng(), &args.name, &args.out)?,
    };
    eprintln!("wrote {} ({})", out.display(), welcome_text(&args.name));
    Ok(())
}
