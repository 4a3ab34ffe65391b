use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use scrollweave::{
    ElementId, Engine, EngineConfig, EngineStats, InMemoryMedia, InMemoryStyleSink,
    MotionPreference, Property, Scene, SharedMotionPreference, StyleValue,
};

#[derive(Parser, Debug)]
#[command(name = "scrollweave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Mount a scene, scroll through it and print the resulting styles as JSON.
    Simulate(SimulateArgs),
    /// Print the reduced-motion terminal styles of a scene as JSON.
    FinalState(FinalStateArgs),
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Engine config JSON (overrides any config embedded in the scene).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run with the reduced-motion preference.
    #[arg(long, default_value_t = false)]
    reduced: bool,

    /// Scroll positions to visit, in order.
    #[arg(long, value_delimiter = ',', default_value = "0")]
    scroll: Vec<f64>,

    /// Frame interval (ms).
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f64,

    /// Frames run after each scroll step.
    #[arg(long, default_value_t = 60)]
    settle_frames: u32,
}

#[derive(Parser, Debug)]
struct FinalStateArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Engine config JSON (overrides any config embedded in the scene).
    #[arg(long)]
    config: Option<PathBuf>,
}

type Styles = BTreeMap<ElementId, BTreeMap<Property, StyleValue>>;

#[derive(serde::Serialize)]
struct Step {
    scroll_y: f64,
    styles: Styles,
}

#[derive(serde::Serialize)]
struct SimulateReport {
    steps: Vec<Step>,
    media_started: Vec<ElementId>,
    stats: EngineStats,
}

#[derive(serde::Serialize)]
struct FinalStateReport {
    styles: Styles,
    media_started: Vec<ElementId>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Simulate(args) => cmd_simulate(args),
        Command::FinalState(args) => cmd_final_state(args),
    }
}

fn load(scene: &Path, config: Option<&Path>) -> anyhow::Result<(Scene, EngineConfig)> {
    let scene = Scene::from_json_path(scene)
        .with_context(|| format!("load scene '{}'", scene.display()))?;
    let config = match config {
        Some(p) => EngineConfig::from_json_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => scene.config_or_default(),
    };
    Ok((scene, config))
}

fn run_engine(
    scene: Scene,
    config: EngineConfig,
    preference: MotionPreference,
) -> anyhow::Result<Engine<scrollweave::SceneGeometry, InMemoryStyleSink, InMemoryMedia>> {
    let source = SharedMotionPreference::new(preference);
    let mut engine = Engine::new(
        scene.geometry,
        InMemoryStyleSink::new(),
        InMemoryMedia::new(),
        config,
        Rc::new(source),
    )
    .context("create engine")?;
    let mounted = engine.mount_page(&scene.refs);
    tracing::info!(sequences = mounted.len(), "scene mounted");
    Ok(engine)
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.frame_ms.is_finite() && args.frame_ms > 0.0,
        "--frame-ms must be > 0"
    );
    let (scene, config) = load(&args.scene, args.config.as_deref())?;
    let preference = if args.reduced {
        MotionPreference::Reduced
    } else {
        MotionPreference::Full
    };
    let mut engine = run_engine(scene, config, preference)?;

    let mut now = 0.0;
    let mut steps = Vec::with_capacity(args.scroll.len());
    for &y in &args.scroll {
        now += args.frame_ms;
        engine.scroll_to(y, now);
        for _ in 0..args.settle_frames {
            now += args.frame_ms;
            engine.on_frame(now);
        }
        engine.pump();
        steps.push(Step {
            scroll_y: y,
            styles: engine.sink().styles().clone(),
        });
    }

    let report = SimulateReport {
        steps,
        media_started: engine.media().started.clone(),
        stats: engine.stats(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn cmd_final_state(args: FinalStateArgs) -> anyhow::Result<()> {
    let (scene, config) = load(&args.scene, args.config.as_deref())?;
    let engine = run_engine(scene, config, MotionPreference::Reduced)?;
    let report = FinalStateReport {
        styles: engine.sink().styles().clone(),
        media_started: engine.media().started.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
