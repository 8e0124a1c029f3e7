//! ponger: smallest runnable host for the tick-host framework.
//!
//! Registers the sample behaviors, spawns the instances listed in a TOML
//! run file, and drives them for the configured number of frames.
//!
//! ```text
//! RUST_LOG=debug cargo run -p ponger -- --config demos/ponger/ponger.toml
//! ```

mod config;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use th_behavior::NoopBehavior;
use th_core::FrameClock;
use th_host::{Fault, FrameReport, HostBuilder, HostObserver, Lifecycle};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::RunConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML run file.  Without one, a countdown and a spinner run at 60 Hz.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `host.total_frames`.
    #[arg(short, long)]
    frames: Option<u64>,
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Logs a heartbeat once per second of logical time and tallies the run.
#[derive(Default)]
struct Heartbeat {
    frames_per_beat: u64,
    updates:         usize,
    faults:          usize,
    violations:      usize,
}

impl HostObserver for Heartbeat {
    fn on_fault(&mut self, fault: &Fault) {
        self.faults += 1;
        warn!(id = %fault.id, phase = ?fault.phase, error = %fault.error, "instance disabled");
    }

    fn on_frame_end(&mut self, report: &FrameReport) {
        self.updates += report.updated;
        self.violations += report.violations;
        if self.frames_per_beat > 0 && report.clock.frame.is_multiple_of(self.frames_per_beat) {
            info!(clock = %report.clock, updates = self.updates, "heartbeat");
        }
    }

    fn on_finish(&mut self, final_clock: FrameClock) {
        info!(clock = %final_clock, "finished");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut run = match &args.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::builtin(),
    };
    if let Some(frames) = args.frames {
        run.host.total_frames = frames;
    }
    info!(
        frame_rate_hz = run.host.frame_rate_hz,
        total_frames = run.host.total_frames,
        delta = %run.host.delta(),
        "starting ponger v{}",
        env!("CARGO_PKG_VERSION")
    );

    // 1. Register the sample kinds.
    let mut host = HostBuilder::new(run.host.clone())
        .register("countdown", run.countdown.behavior())
        .register("spinner", run.spinner.behavior())
        .register("noop", NoopBehavior)
        .build()?;

    // 2. Spawn what the run file asks for.
    for group in &run.instances {
        let kind = host.kind(&group.kind)?;
        for _ in 0..group.count {
            host.spawn(kind, group.location())?;
        }
    }
    info!(instances = host.live_count(), "population ready");

    // 3. Run.
    let mut obs = Heartbeat { frames_per_beat: u64::from(run.host.frame_rate_hz), ..Heartbeat::default() };
    let t0 = Instant::now();
    host.run(&mut obs)?;
    let elapsed = t0.elapsed();

    // 4. Summary.
    println!();
    println!("Ran {} frames in {:.3} s", host.clock().frame, elapsed.as_secs_f64());
    println!("  updates    : {}", obs.updates);
    println!("  faults     : {}", obs.faults);
    println!("  violations : {}", obs.violations);
    println!();
    println!("{:<18} {:<10} {:<14} {:<24}", "Instance", "Kind", "Lifecycle", "Position");
    println!("{}", "-".repeat(68));
    for id in host.instance_ids() {
        let Some(kind) = host.kind_of(id) else { continue };
        let lifecycle = match host.lifecycle(id) {
            Some(Lifecycle::Uninitialized) => "new",
            Some(Lifecycle::Initialized) => "active",
            Some(Lifecycle::Faulted) => "faulted",
            None => "gone",
        };
        let position = host
            .location(id)
            .map(|l| l.position())
            .map(|p| format!("({:.2}, {:.2}, {:.2})", p.x, p.y, p.z))
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<18} {:<10} {:<14} {:<24}",
            id.to_string(),
            host.kind_name(kind).unwrap_or("?"),
            lifecycle,
            position
        );
    }

    Ok(())
}
