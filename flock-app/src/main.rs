use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use flock_app::{FlockingApp, ScriptedFrontend, WindowFrontend};
use flock_core::{FlockConfig, IsolationPolicy, UpdateStrategy};
use flock_shared::{AppSettings, EventScript};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

const WINDOW_TITLE: &str = "Flocking Demo";

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    /// Steer and move each boid before looking at the next
    Sequential,
    /// Steer every boid from the previous frame, then move them all
    TwoPhase,
}

impl From<Strategy> for UpdateStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Sequential => UpdateStrategy::Sequential,
            Strategy::TwoPhase => UpdateStrategy::TwoPhase,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Isolation {
    /// Lone boids still align to zero velocity and drift toward the origin
    PullToOrigin,
    /// Lone boids skip alignment and cohesion
    Ignore,
}

impl From<Isolation> for IsolationPolicy {
    fn from(isolation: Isolation) -> Self {
        match isolation {
            Isolation::PullToOrigin => IsolationPolicy::PullToOrigin,
            Isolation::Ignore => IsolationPolicy::Ignore,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Flock of boids following the mouse pointer", long_about = None)]
struct Args {
    /// Window width in pixels
    #[arg(long, default_value_t = 1524)]
    width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 1024)]
    height: u32,

    /// Number of boids placed at startup and on every reset
    #[arg(short = 'n', long, default_value_t = 300)]
    flock_size: usize,

    /// Frame-rate cap (0 for none)
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Seed for placement and jitter; random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Order in which boids are updated within a frame
    #[arg(long, value_enum, default_value_t = Strategy::Sequential)]
    strategy: Strategy,

    /// Steering of boids with no neighbors
    #[arg(long, value_enum, default_value_t = Isolation::PullToOrigin)]
    isolation: Isolation,

    /// Run without a window, replaying input from --script
    #[arg(long)]
    headless: bool,

    /// JSON event script for headless runs
    #[arg(long, requires = "headless")]
    script: Option<PathBuf>,

    /// Stop after this many frames
    #[arg(short, long)]
    frames: Option<u64>,

    /// Print the final frame as JSON when a headless run ends
    #[arg(long, requires = "headless")]
    dump: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn settings(&self) -> AppSettings {
        AppSettings {
            width: self.width,
            height: self.height,
            flock_size: self.flock_size,
            // headless runs as fast as it can
            frame_rate: if self.headless { 0 } else { self.fps },
        }
    }

    fn config(&self) -> FlockConfig {
        FlockConfig {
            strategy: self.strategy.into(),
            isolation: self.isolation.into(),
            ..FlockConfig::default()
        }
    }
}

fn run_headless(args: &Args, seed: u64) -> Result<()> {
    let frontend = match &args.script {
        Some(path) => ScriptedFrontend::from_path(path)?,
        None => ScriptedFrontend::new(EventScript::default()),
    };
    // without a frame budget the script decides when to stop
    let frontend = frontend.close_when_exhausted(args.frames.is_none());

    let mut app = FlockingApp::new(args.settings(), seed, args.config(), frontend)
        .context("Failed to initialize simulation")?;
    app.run(args.frames).context("Simulation error")?;

    if args.dump {
        let report = serde_json::to_string(&app.report())?;
        println!("{}", report);
    }

    Ok(())
}

fn run_windowed(args: &Args, seed: u64) -> Result<()> {
    let frontend = WindowFrontend::new(WINDOW_TITLE, args.width, args.height)
        .context("Failed to open window")?;

    let mut app = FlockingApp::new(args.settings(), seed, args.config(), frontend)
        .context("Failed to initialize simulation")?;
    app.run(args.frames).context("Simulation error")?;

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let seed = args.seed.unwrap_or_else(|| SmallRng::from_entropy().gen());

    log::info!("Flocking demo starting...");
    log::info!("Window: {}x{}", args.width, args.height);
    log::info!("Flock size: {}", args.flock_size);
    log::info!("Seed: {}", seed);
    log::info!(
        "Update strategy: {:?}, isolation policy: {:?}",
        args.strategy,
        args.isolation
    );

    if args.headless {
        run_headless(&args, seed)
    } else {
        run_windowed(&args, seed)
    }
}
