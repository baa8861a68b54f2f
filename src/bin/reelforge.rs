use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "reelforge", version)]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a narrated reel (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Print the planned timeline as JSON without rendering.
    Plan(PlanArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Narration text.
    #[arg(long, conflicts_with = "script", required_unless_present = "script")]
    text: Option<String>,

    /// Script JSON with `hindi_quote`, `english_translation`, `caption` and `hashtags`.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Base configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Visual pool directory.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Seconds per clip slot.
    #[arg(long)]
    clip: Option<f64>,

    /// Crossfade length as a fraction of the clip duration.
    #[arg(long)]
    overlap: Option<f64>,

    /// Skip the speech engine and narrate silently.
    #[arg(long, default_value_t = false)]
    no_voice: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Output directory (wiped at the start of the run).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Output video file name.
    #[arg(long)]
    name: Option<String>,

    /// Output frame rate.
    #[arg(long)]
    fps: Option<u32>,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// Write an upload manifest (paths and caption) to this JSON file.
    #[arg(long)]
    manifest: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    #[command(flatten)]
    input: InputArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (mut cfg, text, script) = load_input(&args.input)?;
    if let Some(dir) = args.out_dir {
        cfg.output_dir = dir;
    }
    if let Some(name) = args.name {
        cfg.output_name = name;
    }
    if let Some(num) = args.fps {
        cfg.fps = reelforge::Fps::new(num, 1)?;
    }
    if args.threads.is_some() {
        cfg.threads = args.threads;
    }

    let session = reelforge::ReelSession::new(cfg)?;
    let artifact = session.run(&text)?;

    if let Some(path) = args.manifest {
        let manifest = match script.as_ref() {
            Some(script) => reelforge::UploadManifest::from_script(&artifact, script),
            None => reelforge::UploadManifest::new(&artifact, text.trim()),
        };
        manifest.write_to(&path)?;
        eprintln!("wrote {}", path.display());
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&artifact).context("serialize artifact")?
    );
    eprintln!("wrote {}", artifact.video_path.display());
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let (cfg, text, _) = load_input(&args.input)?;
    let session = reelforge::ReelSession::new(cfg)?;
    let planned = session.plan(&text)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&planned.report()).context("serialize plan")?
    );
    Ok(())
}

fn load_input(
    args: &InputArgs,
) -> anyhow::Result<(reelforge::ReelConfig, String, Option<reelforge::ScriptFields>)> {
    let mut cfg = match args.config.as_ref() {
        Some(path) => reelforge::ReelConfig::from_path(path)?,
        None => reelforge::ReelConfig::default(),
    };
    if let Some(dir) = args.images.as_ref() {
        cfg.images_dir = dir.clone();
    }
    if let Some(clip) = args.clip {
        cfg.clip_duration_secs = clip;
    }
    if let Some(overlap) = args.overlap {
        cfg.overlap_fraction = overlap;
    }
    if args.no_voice {
        cfg.voice.enabled = false;
    }

    let (text, script) = match (args.text.as_ref(), args.script.as_ref()) {
        (Some(text), _) => (text.clone(), None),
        (None, Some(path)) => {
            let script = reelforge::ScriptFields::from_path(path)?;
            (script.narration_text().to_string(), Some(script))
        }
        (None, None) => anyhow::bail!("either --text or --script is required"),
    };
    Ok((cfg, text, script))
}
