use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flock_core::config::SimConfig;
use flock_core::world::World;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const WARMUP_STEPS: usize = 120;
const BENCHMARK_STEPS: usize = 300;
const TARGET_SPS: f64 = 60.0;

#[derive(Parser)]
#[command(name = "flock")]
#[command(about = "Foraging flock simulation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single simulation
    Run {
        /// Path to config file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output directory for results (optional)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of simulation steps to run
        #[arg(long, default_value_t = 3600)]
        steps: usize,

        /// Record metrics every N steps
        #[arg(long, default_value_t = 60)]
        sample_every: usize,
    },
    /// Time the all-pairs tick at increasing flock sizes
    Benchmark {
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let file = File::open(path).with_context(|| format!("failed to open config file {path:?}"))?;
    let config: SimConfig =
        serde_json::from_reader(BufReader::new(file)).context("failed to parse config")?;
    Ok(config)
}

fn run_benchmark(boid_count: usize, seed: u64) -> Result<()> {
    let config = SimConfig {
        seed,
        boid_count,
        spawn_interval: 0.0,
        entrance_duration: 0.0,
        ..SimConfig::default()
    };
    let mut world = World::staggered(config).context("failed to initialize world")?;

    for _ in 0..WARMUP_STEPS {
        world.step();
    }

    let mut total_aggregate = 0u64;
    let mut total_decide = 0u64;
    let mut total_apply = 0u64;
    let mut total_time = 0u64;
    for _ in 0..BENCHMARK_STEPS {
        let timings = world.step();
        total_aggregate += timings.aggregate_us;
        total_decide += timings.decide_us;
        total_apply += timings.apply_us;
        total_time += timings.total_us;
    }

    let avg_step_us = (total_time as f64 / BENCHMARK_STEPS as f64).max(1.0);
    let steps_per_sec = 1_000_000.0 / avg_step_us;

    println!("--- {boid_count} boids ---");
    println!("  Avg step:      {avg_step_us:.0} us ({steps_per_sec:.1} steps/sec)");
    println!(
        "  Breakdown:     aggregate={:.0} us, decide={:.0} us, apply={:.0} us",
        total_aggregate as f64 / BENCHMARK_STEPS as f64,
        total_decide as f64 / BENCHMARK_STEPS as f64,
        total_apply as f64 / BENCHMARK_STEPS as f64,
    );
    let verdict = if steps_per_sec >= TARGET_SPS {
        "OK"
    } else {
        "SLOW"
    };
    println!("  Verdict:       {verdict} (target: >={TARGET_SPS} steps/sec)");
    println!("  Meals so far:  {}", world.total_meals());
    println!();
    Ok(())
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Benchmark { seed } => {
            if cfg!(debug_assertions) {
                eprintln!("WARNING: running in debug mode. Results are not representative.");
                eprintln!("         Use: cargo run -p flock-cli --release -- benchmark");
                eprintln!();
            }
            println!("=== Flock Tick Benchmark ===");
            println!("Warmup: {WARMUP_STEPS} steps, Benchmark: {BENCHMARK_STEPS} steps");
            println!();
            for boid_count in [30, 100, 300, 1000] {
                run_benchmark(boid_count, seed)?;
            }
        }
        Commands::Run {
            config,
            out,
            steps,
            sample_every,
        } => {
            let sim_config = load_config(config.as_ref())?;
            sim_config.validate().context("config validation error")?;

            tracing::info!(
                seed = sim_config.seed,
                boids = sim_config.boid_count,
                steps,
                "starting run"
            );
            let mut world = World::staggered(sim_config).context("failed to initialize world")?;
            let summary = world
                .try_run_experiment(steps, sample_every)
                .context("invalid run parameters")?;

            if let Some(out_dir) = out {
                std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
                let summary_path = out_dir.join("summary.json");
                let file = File::create(summary_path).context("failed to create summary file")?;
                serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;
                println!("Run complete. Results saved to {:?}", out_dir);
            } else {
                println!(
                    "Run complete. Boids: {}, meals: {}",
                    summary.final_boid_count, summary.total_meals
                );
            }
        }
    }
    Ok(())
}
