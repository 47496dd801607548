use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use schafkopf_core::game::score::Tariff;
use schafkopf_core::model::player::PlayerId;
use schafkopf_core::rules::call::GameMode;
use serde::Serialize;

use crate::config::{AgentConfig, AgentKind};
use crate::session::PlayedGame;

/// One line of the deal log. Passed deals carry no call and no score.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DealRow {
    pub run_id: String,
    pub game_index: usize,
    pub kommt_raus: u8,
    pub call: Option<String>,
    pub call_id: Option<u16>,
    pub klopfer: u8,
    pub kontra: bool,
    pub re: bool,
    pub caller_points: u8,
    pub opponent_points: u8,
    pub caller_won: bool,
    pub schneider: bool,
    pub schwarz: bool,
    pub laufende: u8,
    pub value: u32,
    pub rewards: [i64; 4],
}

impl DealRow {
    pub fn passed(run_id: &str, game_index: usize, kommt_raus: PlayerId) -> Self {
        Self {
            run_id: run_id.to_string(),
            game_index,
            kommt_raus: kommt_raus.id(),
            call: None,
            call_id: None,
            klopfer: 0,
            kontra: false,
            re: false,
            caller_points: 0,
            opponent_points: 0,
            caller_won: false,
            schneider: false,
            schwarz: false,
            laufende: 0,
            value: 0,
            rewards: [0; 4],
        }
    }

    pub fn played(run_id: &str, game_index: usize, game: &PlayedGame, tariff: &Tariff) -> Self {
        let eval = &game.evaluation;
        let call = eval.call();
        Self {
            run_id: run_id.to_string(),
            game_index,
            kommt_raus: game.log.kommt_raus().id(),
            call: Some(call.to_string()),
            call_id: Some(call.id()),
            klopfer: game.log.klopfer(),
            kontra: game.log.is_kontra(),
            re: game.log.is_re(),
            caller_points: eval.caller_points(),
            opponent_points: eval.opponent_points(),
            caller_won: eval.did_caller_win(),
            schneider: eval.is_schneider(),
            schwarz: eval.is_schwarz(),
            laufende: eval.charged_laufende(),
            value: eval.game_value(tariff),
            rewards: PlayerId::LOOP.map(|seat| eval.reward(seat, tariff)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ModeCounts {
    pub sauspiel: usize,
    pub wenz: usize,
    pub solo: usize,
}

impl ModeCounts {
    fn record(&mut self, mode: GameMode) {
        match mode {
            GameMode::Sauspiel => self.sauspiel += 1,
            GameMode::Wenz => self.wenz += 1,
            GameMode::Solo => self.solo += 1,
            GameMode::Weiter => {}
        }
    }

    pub fn total(&self) -> usize {
        self.sauspiel + self.wenz + self.solo
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeatSummary {
    pub seat: u8,
    pub name: String,
    pub kind: AgentKind,
    pub calls: usize,
    pub caller_wins: usize,
    pub reward: i64,
}

/// Aggregate over a whole run, written as the summary JSON.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimulationReport {
    pub run_id: String,
    pub games: usize,
    pub passed: usize,
    pub played: ModeCounts,
    pub tout: usize,
    pub caller_wins: usize,
    pub schneider: usize,
    pub schwarz: usize,
    pub kontra: usize,
    pub re: usize,
    pub mean_laufende: f64,
    pub tariff: Tariff,
    pub seats: Vec<SeatSummary>,
}

impl SimulationReport {
    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

/// Accumulates deal results into a [`SimulationReport`].
#[derive(Debug, Clone)]
pub struct ReportCollector {
    report: SimulationReport,
    laufende_total: u64,
}

impl ReportCollector {
    pub fn new(run_id: &str, agents: &[AgentConfig], tariff: Tariff) -> Self {
        let seats = agents
            .iter()
            .enumerate()
            .map(|(seat, agent)| SeatSummary {
                seat: seat as u8,
                name: agent.name.clone(),
                kind: agent.kind,
                calls: 0,
                caller_wins: 0,
                reward: 0,
            })
            .collect();
        Self {
            report: SimulationReport {
                run_id: run_id.to_string(),
                games: 0,
                passed: 0,
                played: ModeCounts::default(),
                tout: 0,
                caller_wins: 0,
                schneider: 0,
                schwarz: 0,
                kontra: 0,
                re: 0,
                mean_laufende: 0.0,
                tariff,
                seats,
            },
            laufende_total: 0,
        }
    }

    pub fn record_pass(&mut self) {
        self.report.games += 1;
        self.report.passed += 1;
    }

    pub fn record_game(&mut self, game: &PlayedGame) {
        let eval = &game.evaluation;
        let call = eval.call();
        let tariff = self.report.tariff;
        let report = &mut self.report;

        report.games += 1;
        report.played.record(call.mode());
        report.tout += call.is_tout() as usize;
        report.schneider += eval.is_schneider() as usize;
        report.schwarz += eval.is_schwarz() as usize;
        report.kontra += game.log.is_kontra() as usize;
        report.re += game.log.is_re() as usize;
        self.laufende_total += eval.laufende() as u64;

        let caller_won = eval.did_caller_win();
        report.caller_wins += caller_won as usize;
        for (player, seat) in PlayerId::LOOP.into_iter().zip(report.seats.iter_mut()) {
            seat.reward += eval.reward(player, &tariff);
            if player == call.caller() {
                seat.calls += 1;
                seat.caller_wins += caller_won as usize;
            }
        }
    }

    pub fn finish(mut self) -> SimulationReport {
        let played = self.report.played.total();
        if played > 0 {
            self.report.mean_laufende = self.laufende_total as f64 / played as f64;
        }
        self.report
    }
}
