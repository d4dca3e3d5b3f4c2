//! forage: a population of foragers on a wrapping grid.
//!
//! ```text
//! forage [CONFIG.json] [OUTPUT_DIR]
//! ```
//!
//! Without a config the built-in defaults are used.  Output goes to
//! `output/forage` unless a directory is given.  Set `RUST_LOG=debug` (or
//! `trace`) for per-cycle and per-dooder records.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Deserialize;

use dd_behavior::{Forager, ForagerSettings};
use dd_core::SimConfig;
use dd_output::{CsvWriter, SimOutputObserver};
use dd_sim::{MetricsRecorder, RunOutcome, SimBuilder};

/// The simulation settings plus the forager's own knobs.
#[derive(Debug, Default, Deserialize)]
struct DemoConfig {
    #[serde(flatten)]
    sim: SimConfig,
    #[serde(default)]
    forager: ForagerSettings,
}

fn load_config(path: Option<&PathBuf>) -> Result<DemoConfig> {
    let Some(path) = path else {
        return Ok(DemoConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: DemoConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    config.sim.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let config_path = args.next();
    let out_dir = args.next().unwrap_or_else(|| PathBuf::from("output/forage"));

    let config = load_config(config_path.as_ref())?;
    tracing::info!(
        seed = config.sim.seed,
        width = config.sim.world.width,
        height = config.sim.world.height,
        torus = config.sim.world.torus,
        "Starting forage"
    );

    // 1. Build the sim.
    let behavior = Forager::new(config.forager)?;
    let mut sim = SimBuilder::new(config.sim, behavior).build()?;

    // 2. Output.
    let writer = CsvWriter::new(&out_dir).with_context(|| format!("opening {}", out_dir.display()))?;
    let mut output = SimOutputObserver::new(writer);
    let mut metrics = MetricsRecorder::default();

    // 3. Run.
    let t0 = Instant::now();
    let report = sim.run(&mut (&mut output, &mut metrics));
    let elapsed = t0.elapsed();

    if let Some(e) = output.take_error() {
        eprintln!("output error: {e}");
    }

    // 4. Summary.
    match &report.outcome {
        RunOutcome::Stopped(reason) => println!("Stopped after {} cycles: {reason}", report.summary.cycles),
        RunOutcome::Failed { cycle, error } => println!("Failed at cycle {}: {error}", cycle.0),
    }
    println!("Ran in {:.3} s", elapsed.as_secs_f64());
    if let Some(peak) = metrics.rows().iter().max_by_key(|m| m.active) {
        println!("Peak population {} at cycle {}", peak.active, peak.cycle.0);
    }
    println!("{}", serde_json::to_string_pretty(&report.summary)?);
    println!("Output written to {}", out_dir.display());

    if report.is_failure() {
        anyhow::bail!("simulation failed");
    }
    Ok(())
}
