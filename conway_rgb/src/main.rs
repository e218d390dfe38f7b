// main.rs - Colored Game of Life streamed as pixel frames
// Frames go to stdout as JSON lines, or to a local preview window with --preview.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use conway::{JsonLinesSink, World, patterns};
use tracing::info;

mod config;
mod driver;
mod ui;

use config::AppConfig;
use driver::Driver;

#[derive(Parser, Debug)]
#[command(name = "conway-rgb", version, about = "Stream a self-restarting Game of Life as RGB pixels")]
struct Cli {
    /// JSON config file; flags below override its values.
    #[arg(long, env = "CONWAY_RGB_CONFIG")]
    config: Option<PathBuf>,

    /// World width in cells.
    #[arg(long)]
    width: Option<usize>,

    /// World height in cells.
    #[arg(long)]
    height: Option<usize>,

    /// Seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Milliseconds between frames.
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stop after this many frames.
    #[arg(long)]
    frames: Option<u64>,

    /// Start from a named pattern (block, blinker, toad, beacon, glider, r-pentomino)
    /// instead of a random seeding.
    #[arg(long)]
    pattern: Option<String>,

    /// Show frames in a desktop window instead of writing them to stdout.
    #[arg(long)]
    preview: bool,
}

impl Cli {
    fn app_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if self.seed.is_some() {
            config.world.seed = self.seed;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.app_config()?;

    let mut world = World::from_config(&config.world)?;
    match &cli.pattern {
        Some(name) => {
            let pattern = patterns::find(name).ok_or_else(|| anyhow!("unknown pattern {name:?}"))?;
            let (pw, ph) = pattern.extent();
            let x = config.world.width.saturating_sub(pw) / 2;
            let y = config.world.height.saturating_sub(ph) / 2;
            world
                .stamp(pattern, x, y)
                .with_context(|| format!("placing pattern {}", pattern.name))?;
        }
        None => world.seed_random(),
    }

    info!(
        width = config.world.width,
        height = config.world.height,
        live = world.live_count(),
        window = ?config.window,
        interval_ms = config.interval_ms,
        "Starting game of life"
    );

    let mut driver = Driver::new(world, config.window)?;

    if cli.preview {
        return ui::Preview::new(driver, config.interval()).run();
    }

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    let mut sink = JsonLinesSink::new(io::stdout().lock());
    let frames = runtime.block_on(driver.run(&mut sink, config.interval(), cli.frames))?;

    info!(frames, generation = driver.world().generation(), "Game done");
    Ok(())
}

// Logs go to stderr; stdout carries frames.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
