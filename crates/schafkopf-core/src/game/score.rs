use crate::game::log::{GameLog, GameLogError};
use crate::model::card::Card;
use crate::model::player::PlayerId;
use crate::rules::call::{GameCall, GameMode};
use serde::{Deserialize, Serialize};

/// Prices of a deal, in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tariff {
    pub sauspiel: u32,
    /// Base price of Solo and Wenz.
    pub solo: u32,
    pub per_laufender: u32,
    pub schneider: u32,
    pub schwarz: u32,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            sauspiel: 10,
            solo: 50,
            per_laufender: 10,
            schneider: 10,
            schwarz: 10,
        }
    }
}

/// Outcome of a finished deal seen from the caller's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreEvaluation {
    call: GameCall,
    caller_points: u8,
    opponent_points: u8,
    caller_tricks: u8,
    opponent_tricks: u8,
    laufende: u8,
    multiplier: u32,
}

impl ScoreEvaluation {
    pub fn from_log(log: &GameLog) -> Result<Self, GameLogError> {
        if !log.is_finished() {
            return Err(GameLogError::GameNotFinished);
        }
        let call = log.call();
        let points = log.points();
        let mut eval = Self {
            call,
            caller_points: 0,
            opponent_points: 0,
            caller_tricks: 0,
            opponent_tricks: 0,
            laufende: count_laufende(log),
            multiplier: log.multiplier(),
        };
        for player in PlayerId::LOOP {
            let tricks = log.tricks_won(player);
            if call.is_caller_side(player) {
                eval.caller_points += points[player.index()];
                eval.caller_tricks += tricks;
            } else {
                eval.opponent_points += points[player.index()];
                eval.opponent_tricks += tricks;
            }
        }
        Ok(eval)
    }

    pub fn call(&self) -> GameCall {
        self.call
    }

    pub fn caller_points(&self) -> u8 {
        self.caller_points
    }

    pub fn opponent_points(&self) -> u8 {
        self.opponent_points
    }

    pub fn caller_tricks(&self) -> u8 {
        self.caller_tricks
    }

    pub fn opponent_tricks(&self) -> u8 {
        self.opponent_tricks
    }

    /// A tout has to take every trick; otherwise 61 points win.
    pub fn did_caller_win(&self) -> bool {
        if self.call.is_tout() {
            self.opponent_tricks == 0
        } else {
            self.caller_points > self.opponent_points
        }
    }

    pub fn is_schneider(&self) -> bool {
        self.caller_points > 90 || self.caller_points < 30
    }

    pub fn is_schwarz(&self) -> bool {
        self.caller_points == 120 || self.caller_points == 0
    }

    /// Highest trumps in one side's initial hands, counted from the top.
    pub fn laufende(&self) -> u8 {
        self.laufende
    }

    /// Laufende that are paid for: from three on, from two on in a Wenz.
    pub fn charged_laufende(&self) -> u8 {
        let threshold = if self.call.mode() == GameMode::Wenz { 2 } else { 3 };
        if self.laufende >= threshold {
            self.laufende
        } else {
            0
        }
    }

    /// Price of the deal including Klopfer, Kontra and Re.
    pub fn game_value(&self, tariff: &Tariff) -> u32 {
        let base = match self.call.mode() {
            GameMode::Sauspiel => tariff.sauspiel,
            _ => tariff.solo,
        };
        let with_laufende = base + self.charged_laufende() as u32 * tariff.per_laufender;
        let value = if self.call.is_tout() {
            with_laufende * 2
        } else {
            let schneider = if self.is_schneider() { tariff.schneider } else { 0 };
            let schwarz = if self.is_schwarz() { tariff.schwarz } else { 0 };
            with_laufende + schneider + schwarz
        };
        value * self.multiplier
    }

    /// Money won (positive) or lost by `player`. Sums to zero over the table.
    pub fn reward(&self, player: PlayerId, tariff: &Tariff) -> i64 {
        let value = self.game_value(tariff) as i64;
        let caller_side = self.call.is_caller_side(player);
        let won = caller_side == self.did_caller_win();
        let stake = if self.call.mode().is_solo_game() && player == self.call.caller() {
            value * 3
        } else {
            value
        };
        if won { stake } else { -stake }
    }
}

fn count_laufende(log: &GameLog) -> u8 {
    let call = log.call();
    let holder_side = |card: Card| {
        PlayerId::LOOP
            .into_iter()
            .find(|player| log.initial_hand(*player).has_card(card))
            .map(|player| call.is_caller_side(player))
    };
    let order = call.trump_order();
    let Some(top_side) = order.first().and_then(|card| holder_side(*card)) else {
        return 0;
    };
    order
        .iter()
        .take_while(|card| holder_side(**card) == Some(top_side))
        .count() as u8
}
