//! Marga-Nav - headless grid navigation run
//!
//! Loads a scenario, drives the agent start → goal → start and prints a
//! summary. Announcements and events go to the log.
//!
//! Usage:
//!   marga-nav                        # marga.toml if present, else defaults
//!   marga-nav -c scenario.toml --seed 7 --frames frames.jsonl
//!   marga-nav --threaded             # real-time two-thread mode

use clap::Parser;
use parking_lot::Mutex;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use marga_nav::announce::Announcer;
use marga_nav::runner::SharedSimulation;
use marga_nav::{HeadlessRunner, NavConfig, Phase, Result, Simulation, spawn_threads};

/// Grid navigation simulator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed override (0 = entropy)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Time limit in seconds (simulated, or wall-clock with --threaded)
    #[arg(short, long)]
    duration: Option<f32>,

    /// Tick rate override (Hz)
    #[arg(long)]
    tick_hz: Option<f32>,

    /// Run environment and motion on separate real-time threads
    #[arg(long)]
    threaded: bool,

    /// Write JSON frames (one per line) to this file
    #[arg(long)]
    frames: Option<PathBuf>,

    /// Ticks between dumped frames
    #[arg(long, default_value_t = 30)]
    frame_every: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("marga_nav=info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let mut sim = Simulation::new(config)?;
    let announcer = Announcer::spawn(sim.subscribe(32))?;

    if args.threaded {
        run_threaded(sim, &args)?;
    } else {
        run_headless(sim, &args)?;
    }

    let spoken = announcer.join();
    info!("{} announcements", spoken);
    Ok(())
}

fn load_config(args: &Args) -> Result<NavConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            NavConfig::load(path)?
        }
        None if Path::new("marga.toml").exists() => {
            info!("Loading configuration from marga.toml");
            NavConfig::load(Path::new("marga.toml"))?
        }
        None => {
            info!("Using default configuration");
            NavConfig::default()
        }
    };

    if let Some(seed) = args.seed {
        config.simulation.random_seed = seed;
    }
    if let Some(secs) = args.duration {
        config.simulation.max_duration_secs = secs;
    }
    if let Some(hz) = args.tick_hz {
        config.simulation.tick_hz = hz;
    }
    Ok(config)
}

fn run_headless(sim: Simulation, args: &Args) -> Result<()> {
    let mut runner = HeadlessRunner::new(sim);
    let mut writer = match &args.frames {
        Some(path) => Some(BufWriter::new(File::create(path)?)),
        None => None,
    };
    let every = args.frame_every.max(1);
    let mut write_error = None;

    let summary = runner.run_with(|sim| {
        let Some(out) = writer.as_mut() else {
            return;
        };
        if write_error.is_some() || sim.ticks() % every != 0 {
            return;
        }
        let written = serde_json::to_writer(&mut *out, &sim.frame())
            .map_err(std::io::Error::from)
            .and_then(|_| out.write_all(b"\n"));
        if let Err(e) = written {
            write_error = Some(e);
        }
    });

    if let Some(e) = write_error {
        return Err(e.into());
    }
    if let Some(mut out) = writer {
        out.flush()?;
    }

    println!("{}", serde_json::to_string_pretty(&summary).map_err(std::io::Error::from)?);
    let sim = runner.into_inner();
    for event in sim.events().recent(sim.config().simulation.frame_events) {
        println!("{}", event);
    }
    Ok(())
}

fn run_threaded(sim: Simulation, args: &Args) -> Result<()> {
    let tick_hz = sim.config().simulation.tick_hz;
    let limit = sim.config().run_limit()?;
    if args.frames.is_some() {
        warn!("--frames is only supported in headless mode");
    }

    let shared: SharedSimulation = Arc::new(Mutex::new(sim));
    let threads = spawn_threads(Arc::clone(&shared), tick_hz)?;
    if let marga_nav::CommandOutcome::Rejected(fault) = shared.lock().start() {
        warn!("start rejected: {}", fault);
    }

    let begin = Instant::now();
    loop {
        std::thread::sleep(Duration::from_millis(50));
        let settled = shared.lock().controller().is_settled();
        if settled || begin.elapsed() >= limit {
            break;
        }
    }
    threads.join();

    let sim = shared.lock();
    let stats = sim.controller().stats();
    info!(
        "finished in {:?} after {:.2}s wall clock ({} planner calls, {} replans)",
        sim.phase(),
        begin.elapsed().as_secs_f32(),
        stats.planner_calls,
        stats.replans
    );
    if sim.phase() != Phase::Arrived {
        warn!("round trip not completed");
    }
    Ok(())
}
