//! Software-in-the-loop runner for the inactivity monitor.
//!
//! Drives the monitor with a simulated IMU on the host. Notifications are
//! written to the log.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use motionwatch::Monitor;

use crate::board::SimulatedBoard;
use crate::config::SitlConfig;
use crate::imu::Scenario;
use crate::notifier::LogNotifier;

mod board;
mod clock;
mod config;
mod imu;
mod notifier;

/// Run the inactivity monitor against a simulated IMU
#[derive(Parser, Debug)]
#[command(name = "sitl")]
#[command(version)]
struct Args {
    /// TOML configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Net acceleration that counts as motion (m/s²)
    #[arg(long)]
    threshold: Option<f32>,

    /// Inactivity period before a notification (ms)
    #[arg(long, value_name = "MS")]
    idle_timeout_ms: Option<u32>,

    /// Delay between sensor polls (ms)
    #[arg(long, value_name = "MS")]
    sample_period_ms: Option<u32>,

    /// Resting acceleration magnitude (m/s²)
    #[arg(long)]
    gravity: Option<f32>,

    /// Simulated sensor behaviour
    #[arg(short, long, value_enum)]
    scenario: Option<Scenario>,

    /// Samples between shake bursts (at least 4)
    #[arg(long, value_name = "SAMPLES")]
    shake_every: Option<u32>,

    /// Advance a simulated clock instead of sleeping
    #[arg(long)]
    virtual_time: bool,

    /// Stop after this many polls
    #[arg(short = 'n', long)]
    iterations: Option<u64>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    fn resolve(&self) -> Result<SitlConfig> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)?,
            None => SitlConfig::default(),
        };

        let motion = &mut config.motion;
        if let Some(threshold) = self.threshold {
            motion.motion_threshold = threshold;
        }
        if let Some(timeout) = self.idle_timeout_ms {
            motion.idle_timeout_ms = timeout;
        }
        if let Some(period) = self.sample_period_ms {
            motion.sample_period_ms = period;
        }
        if let Some(gravity) = self.gravity {
            motion.gravity = gravity;
        }

        let simulation = &mut config.simulation;
        if let Some(scenario) = self.scenario {
            simulation.scenario = scenario;
        }
        if let Some(shake_every) = self.shake_every {
            simulation.shake_every = shake_every;
        }
        if self.virtual_time {
            simulation.virtual_time = true;
        }
        if self.iterations.is_some() {
            simulation.iterations = self.iterations;
        }

        Ok(config)
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    let config = args.resolve()?;
    log::debug!("{:?}", config);

    let simulation = &config.simulation;
    let board = SimulatedBoard::new(
        simulation.scenario,
        simulation.shake_every,
        simulation.virtual_time,
    );

    // A sensor that does not come up halts here for good
    let mut monitor = Monitor::start(board, config.motion, Box::new(LogNotifier::new()));

    match simulation.iterations {
        Some(iterations) => {
            let stats = monitor.run_for(iterations);
            log::info!(
                "{} polls, {} with motion, {} notifications",
                stats.polls,
                stats.motion_events,
                stats.notifications
            );
            Ok(())
        }
        None => monitor.run(),
    }
}
