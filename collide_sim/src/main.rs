//! Collide Simulator CLI
//!
//! Run the two-body merge engine through deterministic scenarios, a custom
//! scenario file, or a real-time playback on the wall clock.

use clap::Parser;
use collide_core::Simulation;
use collide_env::TokioClock;
use collide_sim::{
    parse_events, Driver, DriverConfig, Expectation, HarnessError, ScenarioFile, ScenarioId,
    ScenarioResult, ScenarioRunner, ScenarioSpec, ScriptedInput, SimExport,
};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Collide deterministic scenario CLI
#[derive(Parser, Debug)]
#[command(name = "collide-sim")]
#[command(about = "Run deterministic collision scenarios", long_about = None)]
struct Args {
    /// Scenario to run (two_body_merge, reset_after_collision, stationary_pair,
    /// head_on, chase, receding, equal_velocity, pause_resume, randomized, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of consecutive seeds to run (randomized sweep)
    #[arg(long, default_value = "1")]
    seeds: usize,

    /// Maximum clock duration per run in seconds
    #[arg(short, long, default_value = "10")]
    duration: f64,

    /// Frame rate of the driver loop in Hz
    #[arg(short, long, default_value = "60")]
    tick_rate: u32,

    /// Scenario file (JSON) to run instead of the built-ins
    #[arg(short, long)]
    config: Option<String>,

    /// Input script, e.g. "toggle@1.0,toggle@1.5,reset@3.0"
    #[arg(short, long)]
    inputs: Option<String>,

    /// Play back on the wall clock instead of virtual time
    #[arg(long)]
    realtime: bool,

    /// Export frame-by-frame data to a JSON file
    #[arg(long)]
    export: Option<String>,

    /// JSON output for CI parsing
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging; RUST_LOG overrides the default level
    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    match run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Runs whatever the arguments ask for; `Ok(false)` means a run failed.
fn run(args: &Args) -> Result<bool, HarnessError> {
    if !args.json {
        info!("Collide Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    let base_seed = resolve_seed(args.seed, std::time::SystemTime::now());

    if let Some(path) = &args.config {
        let mut file = ScenarioFile::load(path)?;
        if args.inputs.is_some() {
            file.inputs = args.inputs.clone();
        }
        let runner = runner_for(args, base_seed);
        if args.realtime {
            let spec = runner.spec_from_file(&file)?;
            return run_realtime(args, &file.name, &spec, base_seed);
        }
        let mut export = args
            .export
            .as_ref()
            .map(|_| SimExport::new(&file.name, base_seed, args.tick_rate));
        let result = runner.run_file(&file, export.as_mut());
        write_export(args, export.as_ref())?;
        return report(args, vec![result]);
    }

    let scenarios: Vec<ScenarioId> = if args.scenario == "all" {
        ScenarioId::all()
    } else {
        vec![args.scenario.parse().map_err(HarnessError::Config)?]
    };

    if (args.export.is_some() || args.realtime) && (scenarios.len() > 1 || args.seeds > 1) {
        return Err(HarnessError::config(
            "--export and --realtime need a single scenario and a single seed",
        ));
    }

    if args.realtime {
        let scenario = scenarios[0];
        let spec = scripted(scenario.spec(base_seed)?, args)?;
        return run_realtime(args, scenario.name(), &spec, base_seed);
    }

    let mut results = Vec::new();
    for seed_offset in 0..args.seeds {
        let seed = base_seed.wrapping_add(seed_offset as u64);
        let runner = runner_for(args, seed);

        for scenario in &scenarios {
            let mut export = args
                .export
                .as_ref()
                .map(|_| SimExport::new(scenario.name(), seed, args.tick_rate));
            let result = if args.inputs.is_some() {
                let spec = scripted(scenario.spec(seed)?, args)?;
                runner.run_spec(scenario.name(), &spec, export.as_mut())
            } else {
                match export.as_mut() {
                    Some(export) => runner.run_exported(*scenario, export),
                    None => runner.run(*scenario),
                }
            };
            write_export(args, export.as_ref())?;

            if !args.json {
                log_result(&result);
            }
            results.push(result);
        }
    }

    report(args, results)
}

/// Seed 0 means "pick one from the clock"; anything unrepresentable falls
/// back to 42.
fn resolve_seed(seed: u64, now: std::time::SystemTime) -> u64 {
    if seed != 0 {
        return seed;
    }
    now.duration_since(std::time::UNIX_EPOCH)
        .ok()
        .and_then(|d| u64::try_from(d.as_nanos()).ok())
        .unwrap_or(42)
}

fn runner_for(args: &Args, seed: u64) -> ScenarioRunner {
    ScenarioRunner::new(seed)
        .with_tick_rate(args.tick_rate)
        .with_duration(args.duration)
}

/// Replaces a built-in scenario's inputs with the `--inputs` script. The
/// outcome then depends on the script, so only invariants are checked.
fn scripted(mut spec: ScenarioSpec, args: &Args) -> Result<ScenarioSpec, HarnessError> {
    if let Some(script) = &args.inputs {
        spec.inputs = parse_events(script)?;
        spec.expectation = Expectation::Invariants;
    }
    Ok(spec)
}

/// Plays a scenario on the wall clock, logging merges as they happen.
fn run_realtime(
    args: &Args,
    name: &str,
    spec: &ScenarioSpec,
    seed: u64,
) -> Result<bool, HarnessError> {
    info!("Real-time playback: {}", name);
    let config = DriverConfig::default()
        .with_tick_rate(args.tick_rate)
        .with_duration(spec.duration_secs.unwrap_or(args.duration));
    let mut driver = Driver::new(
        Simulation::new(spec.initial)?,
        TokioClock::shared(),
        ScriptedInput::new(&spec.inputs)?,
        config,
    )?;

    let mut export = args
        .export
        .as_ref()
        .map(|_| SimExport::new(name, seed, args.tick_rate));
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let summary = runtime.block_on(driver.run(|frame| {
        if let Some(report) = &frame.collision {
            let merged = report.merger.merged;
            info!(
                "t={:.3}s merged: mass={} velocity={:.6} position={:.3}",
                frame.clock_secs,
                merged.mass(),
                merged.velocity(),
                merged.position()
            );
        }
        if let Some(export) = export.as_mut() {
            export.add_frame(frame);
        }
    }))?;
    debug!("{:?}", summary);

    let sim = driver.simulation();
    if let Some(export) = export.as_mut() {
        export.finalize(true, sim.has_collided(), sim.particles(), None);
    }
    write_export(args, export.as_ref())?;

    info!(
        "{} frames over {:.2}s, {} merge(s), {} reset(s)",
        summary.frames, summary.clock_secs, summary.collisions, summary.resets
    );
    for (i, p) in sim.particles().iter().enumerate() {
        info!(
            "  particle {}: mass={} velocity={:.6} position={:.3}",
            i,
            p.mass(),
            p.velocity(),
            p.position()
        );
    }
    Ok(true)
}

fn write_export(args: &Args, export: Option<&SimExport>) -> Result<(), HarnessError> {
    if let (Some(path), Some(export)) = (&args.export, export) {
        export.write_to_file(path)?;
        info!("Exported {} frames to {}", export.frames.len(), path);
    }
    Ok(())
}

fn log_result(result: &ScenarioResult) {
    if result.passed {
        info!("✓ {} (seed={}) PASSED", result.scenario, result.seed);
    } else {
        error!(
            "✗ {} (seed={}) FAILED: {}",
            result.scenario,
            result.seed,
            result.failure_reason.as_deref().unwrap_or("unknown")
        );
    }
}

/// Prints the summary and returns whether every run passed.
fn report(args: &Args, results: Vec<ScenarioResult>) -> Result<bool, HarnessError> {
    let total = results.len();
    let failed: Vec<&ScenarioResult> = results.iter().filter(|r| !r.passed).collect();

    if args.json {
        let summary = serde_json::json!({
            "total": total,
            "passed": total - failed.len(),
            "failed": failed.len(),
            "results": results,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        if args.config.is_some() {
            for result in &results {
                log_result(result);
            }
        }
        info!("");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        if failed.is_empty() {
            info!("✅ All {} scenario runs passed!", total);
        } else {
            error!("❌ {}/{} scenario runs failed!", failed.len(), total);
            for result in &failed {
                error!(
                    "  - {} seed={}: {}",
                    result.scenario,
                    result.seed,
                    result.failure_reason.as_deref().unwrap_or("unknown")
                );
            }
        }
    }

    Ok(failed.is_empty())
}
