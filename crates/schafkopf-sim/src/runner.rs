use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use thiserror::Error;
use tracing::{Level, event};

use crate::agent::{Agent, build_agent};
use crate::config::{ResolvedOutputs, SEATS, SimulationConfig};
use crate::logging::TELEMETRY_FILE;
use crate::report::{DealRow, ReportCollector, SimulationReport};
use crate::session::{GameSession, SessionError};

/// Plays the configured number of deals and writes the deal log and summary.
pub struct SimulationRunner {
    config: SimulationConfig,
    outputs: ResolvedOutputs,
    logging_enabled: bool,
}

/// Summary details returned after a run.
#[derive(Debug)]
pub struct RunSummary {
    pub games_played: usize,
    pub games_passed: usize,
    pub rows_written: usize,
    pub jsonl_path: PathBuf,
    pub summary_path: PathBuf,
    pub telemetry_path: Option<PathBuf>,
    pub report: SimulationReport,
}

impl SimulationRunner {
    /// Build a runner from a validated configuration.
    pub fn new(config: SimulationConfig, outputs: ResolvedOutputs) -> Result<Self, RunnerError> {
        if config.agents.len() != SEATS {
            return Err(RunnerError::SeatCount {
                found: config.agents.len(),
            });
        }

        Ok(Self {
            logging_enabled: config.logging.enable_structured,
            config,
            outputs,
        })
    }

    /// Execute the simulation, streaming one JSONL row per deal.
    pub fn run(&self) -> Result<RunSummary, RunnerError> {
        ensure_parent(self.outputs.deals_jsonl.parent())?;
        ensure_parent(self.outputs.summary_json.parent())?;

        let mut writer = BufWriter::new(File::create(&self.outputs.deals_jsonl)?);
        let mut rng = StdRng::seed_from_u64(self.config.deals.seed.unwrap_or(0));
        let mut session = GameSession::new(self.build_table(&mut rng)?, rng.next_u64());
        let mut collector =
            ReportCollector::new(&self.config.run_id, &self.config.agents, self.config.tariff);
        let mut rows_written = 0usize;

        for game_index in 0..self.config.deals.games {
            let kommt_raus = session.kommt_raus();
            let row = match session.play_game()? {
                Some(game) => {
                    collector.record_game(&game);
                    DealRow::played(&self.config.run_id, game_index, &game, &self.config.tariff)
                }
                None => {
                    collector.record_pass();
                    DealRow::passed(&self.config.run_id, game_index, kommt_raus)
                }
            };

            if self.logging_enabled && tracing::enabled!(Level::INFO) {
                event!(
                    target: "schafkopf_sim::runner",
                    Level::INFO,
                    run_id = %self.config.run_id,
                    game_index = game_index as u64,
                    call = row.call.as_deref().unwrap_or("Weiter"),
                    caller_won = row.caller_won,
                    value = row.value
                );
            }

            serde_json::to_writer(&mut writer, &row)?;
            writer.write_all(b"\n")?;
            rows_written += 1;
        }
        writer.flush()?;

        let report = collector.finish();
        report.write_json(&self.outputs.summary_json)?;

        let telemetry_path = self
            .logging_enabled
            .then(|| self.outputs.output_dir().join(TELEMETRY_FILE));

        Ok(RunSummary {
            games_played: report.played.total(),
            games_passed: report.passed,
            rows_written,
            jsonl_path: self.outputs.deals_jsonl.clone(),
            summary_path: self.outputs.summary_json.clone(),
            telemetry_path,
            report,
        })
    }

    fn build_table(&self, rng: &mut StdRng) -> Result<[Box<dyn Agent>; 4], RunnerError> {
        let agents: Vec<Box<dyn Agent>> = self
            .config
            .agents
            .iter()
            .map(|agent| build_agent(agent.kind, rng.next_u64()))
            .collect();
        let found = agents.len();
        agents
            .try_into()
            .map_err(|_| RunnerError::SeatCount { found })
    }
}

fn ensure_parent(path: Option<&Path>) -> Result<(), RunnerError> {
    if let Some(dir) = path.filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("failed to serialize deal row: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
    #[error("game execution failed: {0}")]
    Game(#[from] SessionError),
    #[error("configuration requires exactly 4 agents but found {found}")]
    SeatCount { found: usize },
}
