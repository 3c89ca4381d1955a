//! fee-sim - replay synthetic load against a route's fee controller
//!
//! Each load phase offers a fixed number of requests per second for a number
//! of simulated seconds. Requests are spread evenly across the second and
//! quoted concurrently by a pool of workers; after every second the route's
//! metrics are printed.

#![allow(missing_docs)]

use anyhow::{Context, bail};
use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use surge_pricing::{
    Clock, FeeConfigPatch, FeeMetrics, FeeRegistry, ManualClock, PricingConfig, PricingError,
    SystemClock,
};
use tracing::level_filters::LevelFilter;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fee-sim", version, about = "Replay synthetic load against a fee controller")]
struct Args {
    /// Pricing file; without one the route uses the built-in defaults
    #[arg(short, long, env = "SURGE_PRICING_CONFIG")]
    config: Option<PathBuf>,

    /// Route to load
    #[arg(short, long, default_value = "/api")]
    route: String,

    /// Concurrent workers quoting requests
    #[arg(short, long, default_value_t = 4, value_parser = clap::value_parser!(u16).range(1..))]
    workers: u16,

    /// Load phases as RPSxSECONDS, run in order
    #[arg(
        short,
        long = "phase",
        num_args = 1..,
        default_values = ["5x5", "40x10", "0x10"]
    )]
    phases: Vec<Phase>,

    /// Print one JSON object per simulated second
    #[arg(long)]
    json: bool,

    /// Maximum log level; RUST_LOG takes precedence when set
    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

/// Constant offered load for a number of seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Phase {
    rps: u32,
    secs: u32,
}

impl FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rps, secs) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected RPSxSECONDS, got {:?}", s))?;
        let rps = rps
            .trim()
            .parse()
            .map_err(|e| format!("invalid rate {:?}: {}", rps, e))?;
        let secs = secs
            .trim()
            .parse()
            .map_err(|e| format!("invalid duration {:?}: {}", secs, e))?;
        Ok(Self { rps, secs })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} rps for {}s", self.rps, self.secs)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level).into())
        .from_env_lossy();

    // Logs go to stderr; stdout carries the report
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);
    if args.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let clock = ManualClock::new(SystemClock.now_ms());
    let config = load_config(&args).await?;
    let registry = FeeRegistry::from_config(&config, clock.now_ms())?;
    if registry.get(&args.route).is_none() {
        bail!(
            "Route {:?} is not configured (available: {})",
            args.route,
            registry.routes().join(", ")
        );
    }

    info!(
        route = %args.route,
        workers = args.workers,
        phases = args.phases.len(),
        "Starting simulation"
    );

    let mut elapsed = 0u64;
    for phase in &args.phases {
        info!("Phase: {}", phase);
        for _ in 0..phase.secs {
            let second_start = clock.now_ms();
            quote_second(&registry, &args.route, *phase, args.workers, second_start).await?;

            let metrics = registry.metrics(&args.route, second_start + 999)?;
            report(elapsed, *phase, &metrics, args.json);

            clock.advance(1_000);
            elapsed += 1;
        }
    }

    let metrics = registry.metrics(&args.route, clock.now_ms())?;
    info!(
        seconds = elapsed,
        final_fee = %metrics.current_fee,
        "Simulation finished"
    );
    Ok(())
}

async fn load_config(args: &Args) -> anyhow::Result<PricingConfig> {
    let config = match &args.config {
        Some(path) => PricingConfig::from_file(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => {
            let mut config = PricingConfig::default();
            config.set_route(args.route.clone(), FeeConfigPatch::default());
            config
        }
    };
    Ok(config.with_env_overrides()?)
}

/// Quote one simulated second of `phase` across `workers` tasks
async fn quote_second(
    registry: &FeeRegistry,
    route: &str,
    phase: Phase,
    workers: u16,
    second_start: i64,
) -> anyhow::Result<()> {
    let rps = phase.rps as usize;
    let handles: Vec<_> = (0..workers as usize)
        .map(|worker| {
            let registry = registry.clone();
            let route = route.to_string();
            tokio::spawn(async move {
                for request in (worker..rps).step_by(workers as usize) {
                    let offset = (request as i64 * 1_000) / rps as i64;
                    registry.quote(&route, second_start + offset)?;
                    tokio::task::yield_now().await;
                }
                Ok::<_, PricingError>(())
            })
        })
        .collect();

    for handle in handles {
        handle.await??;
    }
    Ok(())
}

fn report(second: u64, phase: Phase, metrics: &FeeMetrics, json: bool) {
    if json {
        let line = serde_json::json!({
            "second": second,
            "offered_rps": phase.rps,
            "metrics": metrics,
        });
        println!("{}", line);
    } else {
        println!(
            "{:>4}s  offered {:>4} rps  measured {:>6.1} rps  utilization {:>7}  fee {}",
            second, phase.rps, metrics.current_rps, metrics.utilization, metrics.current_fee
        );
    }
}
