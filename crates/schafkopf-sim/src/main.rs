use std::path::PathBuf;

use clap::Parser;

use schafkopf_sim::config::{ResolvedOutputs, SimulationConfig};
use schafkopf_sim::logging::init_logging;
use schafkopf_sim::runner::SimulationRunner;

/// Self-play harness for the Schafkopf rule engine.
#[derive(Debug, Parser)]
#[command(
    name = "schafkopf-sim",
    author,
    version,
    about = "Deterministic Schafkopf self-play simulation"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "sim/sim.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of deals to play.
    #[arg(long, value_name = "GAMES")]
    games: Option<usize>,

    /// Override the RNG seed for shuffling and agents.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no deal is played).
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimulationConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(games) = cli.games {
        config.deals.games = games;
    }

    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let games = config.deals.games;
    let seed = config.deals.seed.unwrap_or(0);

    println!("Loaded configuration '{run_id}' with 4 agents ({games} games, seed {seed})");

    if cli.validate_only {
        SimulationRunner::new(config, outputs)?;
        println!("Validation-only mode: simulation execution skipped.");
        return Ok(());
    }

    let _logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = SimulationRunner::new(config, outputs)?;
    let summary = runner.run()?;

    println!(
        "Simulation complete for '{run_id}': {} played, {} passed → {} rows at {}",
        summary.games_played,
        summary.games_passed,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    let report = &summary.report;
    println!(
        "  Sauspiel {} / Wenz {} / Solo {}, caller won {}, mean Laufende {:.2}",
        report.played.sauspiel,
        report.played.wenz,
        report.played.solo,
        report.caller_wins,
        report.mean_laufende
    );
    for seat in &report.seats {
        println!("  seat {} {:<12} {:>8}", seat.seat, seat.name, seat.reward);
    }
    println!("Summary: {}", summary.summary_path.display());
    if let Some(telemetry_path) = summary.telemetry_path.as_ref() {
        println!("Telemetry log: {}", telemetry_path.display());
    }

    Ok(())
}
