use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use grafel::{
    ActionRegistry, Canvas, Color, ExportOpts, Fps, RecordingBackend, Script, Stage, StageSettings,
};

#[derive(Parser, Debug)]
#[command(name = "grafel", version, about = "Keyframe animation from Grafel scripts")]
struct Cli {
    /// Log engine activity (same as RUST_LOG=grafel=debug).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and build a script, then print its timeline.
    Check(CheckArgs),
    /// Print the parsed script as JSON.
    Dump(DumpArgs),
    /// Run to one frame and write it as SVG or PNG.
    Frame(FrameArgs),
    /// Render every frame into a directory, or into an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct StageArgs {
    /// Canvas size.
    #[arg(long, default_value = "1280x720", value_parser = Canvas::parse)]
    size: Canvas,

    /// Frames per second.
    #[arg(long, default_value_t = 25)]
    fps: u32,

    /// Frames per pass.
    #[arg(long, default_value_t = 150)]
    num_frames: u64,

    /// Background color (name or #rrggbb).
    #[arg(long, default_value = "black", value_parser = Color::parse)]
    background: Color,

    /// Foreground color used by the grid.
    #[arg(long, default_value = "white", value_parser = Color::parse)]
    foreground: Color,

    /// Draw a reference grid.
    #[arg(long)]
    grid: bool,

    /// Replay the timeline this many times.
    #[arg(long, default_value_t = 1)]
    loops: u32,
}

impl StageArgs {
    fn settings(&self) -> anyhow::Result<StageSettings> {
        Ok(StageSettings {
            canvas: self.size,
            fps: Fps::new(self.fps, 1)?,
            num_frames: self.num_frames,
            background: self.background,
            foreground: self.foreground,
            grid: self.grid,
        })
    }
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Script file (`.grafel`, or `.json`).
    script: PathBuf,

    #[command(flatten)]
    stage: StageArgs,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// Script file (`.grafel`, or `.json`).
    script: PathBuf,

    /// Print the draw calls of every frame instead of the script.
    #[arg(long)]
    calls: bool,

    #[command(flatten)]
    stage: StageArgs,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Script file (`.grafel`, or `.json`).
    script: PathBuf,

    /// Frame index (0-based).
    #[arg(long)]
    frame: u64,

    /// Output path; `.svg` or `.png`.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    stage: StageArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Svg,
    Png,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Script file (`.grafel`, or `.json`).
    script: PathBuf,

    /// Directory for numbered frame files.
    #[arg(long, conflicts_with = "mp4", required_unless_present = "mp4")]
    out_dir: Option<PathBuf>,

    /// Frame file format for `--out-dir`.
    #[arg(long, value_enum, default_value_t = FormatChoice::Svg)]
    format: FormatChoice,

    /// Write an MP4 instead of frame files.
    #[arg(long)]
    mp4: Option<PathBuf>,

    /// Rasterize PNG frames one at a time.
    #[arg(long)]
    sequential: bool,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    stage: StageArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Check(args) => cmd_check(args),
        Command::Dump(args) => cmd_dump(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "grafel=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path, stage: &StageArgs) -> anyhow::Result<(Script, Stage)> {
    let script =
        Script::from_path(path).with_context(|| format!("load script '{}'", path.display()))?;
    let stage = script
        .build(stage.settings()?, &ActionRegistry::standard())
        .with_context(|| format!("build stage from '{}'", path.display()))?;
    Ok((script, stage))
}

fn export_opts(stage: &Stage, args: &StageArgs) -> ExportOpts {
    ExportOpts {
        loops: args.loops,
        ..ExportOpts::for_stage(stage)
    }
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let (_, stage) = load(&args.script, &args.stage)?;
    let scheduler = stage.scheduler();
    print!(
        "{}",
        scheduler.timeline(stage.cast(), stage.settings().num_frames)?
    );
    for c in scheduler.conflicts() {
        let actor = stage.cast().get(c.actor)?.name();
        let first = scheduler.action(c.first).map(ToString::to_string);
        let second = scheduler.action(c.second).map(ToString::to_string);
        println!(
            "warning: '{actor}' {:?} written by both {} and {}",
            c.field,
            first.unwrap_or_default(),
            second.unwrap_or_default()
        );
    }
    Ok(())
}

fn cmd_dump(args: DumpArgs) -> anyhow::Result<()> {
    let (script, mut stage) = load(&args.script, &args.stage)?;
    if !args.calls {
        println!("{}", script.to_json()?);
        return Ok(());
    }

    let mut backend = RecordingBackend::new();
    let opts = export_opts(&stage, &args.stage);
    grafel::play(&mut stage, &mut backend, &opts)?;
    for call in backend.calls() {
        println!("{call:?}");
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (_, mut stage) = load(&args.script, &args.stage)?;
    grafel::export_frame(&mut stage, args.frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (_, mut stage) = load(&args.script, &args.stage)?;
    let opts = ExportOpts {
        parallel: !args.sequential,
        threads: args.threads,
        ..export_opts(&stage, &args.stage)
    };

    if let Some(mp4) = &args.mp4 {
        let stats = grafel::export_mp4(&mut stage, mp4, &opts)?;
        eprintln!("wrote {} ({} frames)", mp4.display(), stats.frames);
        return Ok(());
    }

    let dir = args
        .out_dir
        .as_deref()
        .context("either --out-dir or --mp4 is required")?;
    let stats = match args.format {
        FormatChoice::Svg => grafel::export_svg(&mut stage, dir, &opts)?,
        FormatChoice::Png => grafel::export_png(&mut stage, dir, &opts)?,
    };
    eprintln!("wrote {} frames to {}", stats.written.len(), dir.display());
    Ok(())
}
