use rand::SeedableRng;
use rand::rngs::StdRng;
use schafkopf_core::game::log::{GameLog, GameLogError};
use schafkopf_core::game::score::ScoreEvaluation;
use schafkopf_core::model::card::Card;
use schafkopf_core::model::deck::Deck;
use schafkopf_core::model::hand::{HAND_CAPACITY, Hand};
use schafkopf_core::model::player::PlayerId;
use schafkopf_core::model::rank::Rank;
use schafkopf_core::model::suit::Suit;
use schafkopf_core::rules::call::GameCall;
use schafkopf_core::rules::generator::GameCallGenerator;
use schafkopf_core::rules::legality::{GameRules, RulesError};
use thiserror::Error;
use tracing::{Level, event};

use crate::agent::Agent;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{agent} chose {call}, which was not offered")]
    UnofferedCall { agent: PlayerId, call: GameCall },
    #[error("{agent} chose {card}, which is not playable")]
    IllegalCard { agent: PlayerId, card: Card },
    #[error("{0} has no playable card")]
    NoPlayableCard(PlayerId),
    #[error(transparent)]
    Log(#[from] GameLogError),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// A deal that was played to the end.
#[derive(Debug, Clone)]
pub struct PlayedGame {
    pub log: GameLog,
    pub evaluation: ScoreEvaluation,
}

/// Plays consecutive deals at one table of four agents.
///
/// Seat `i` is driven by `agents[i]`. The player coming out moves one seat
/// on after every deal, passed or played.
pub struct GameSession {
    agents: [Box<dyn Agent>; 4],
    rules: GameRules,
    generator: GameCallGenerator,
    deck: Deck,
    rng: StdRng,
    kommt_raus: PlayerId,
}

impl GameSession {
    pub fn new(agents: [Box<dyn Agent>; 4], seed: u64) -> Self {
        Self {
            agents,
            rules: GameRules::new(),
            generator: GameCallGenerator::new(),
            deck: Deck::standard(),
            rng: StdRng::seed_from_u64(seed),
            kommt_raus: PlayerId::LOOP[0],
        }
    }

    pub fn kommt_raus(&self) -> PlayerId {
        self.kommt_raus
    }

    /// Deals, bids and plays one game. `None` when all four players pass.
    pub fn play_game(&mut self) -> Result<Option<PlayedGame>, SessionError> {
        let kommt_raus = self.kommt_raus;
        self.kommt_raus = kommt_raus.next();

        self.deck.shuffle_in_place(&mut self.rng);
        let hands = self.deck.initial_hands();

        let klopfer = self.ask_for_klopfer(&hands, kommt_raus);
        let call = self.make_calls(&hands, kommt_raus, klopfer)?;
        if call.is_weiter() {
            if tracing::enabled!(target: "schafkopf_sim::session", Level::DEBUG) {
                event!(
                    target: "schafkopf_sim::session",
                    Level::DEBUG,
                    kommt_raus = %kommt_raus,
                    "all players passed"
                );
            }
            return Ok(None);
        }

        let mut log = GameLog::new(call, hands, kommt_raus, klopfer)?;
        let mut buffer = [Card::new(Rank::Sieben, Suit::Schell); HAND_CAPACITY];
        while !log.is_finished() {
            if log.can_kontra_re() {
                self.ask_for_kontra_re(&mut log)?;
            }
            let player = log.driving_player();
            let possible = self.rules.possible_cards(&log, &mut buffer)?;
            if possible.is_empty() {
                return Err(SessionError::NoPlayableCard(player));
            }
            let card = self.agents[player.index()].choose_card(&log, possible);
            if !possible.contains(&card) {
                return Err(SessionError::IllegalCard {
                    agent: player,
                    card,
                });
            }
            let trick = log.next_card(card)?;

            if tracing::enabled!(target: "schafkopf_sim::session", Level::TRACE) {
                event!(
                    target: "schafkopf_sim::session",
                    Level::TRACE,
                    player = %player,
                    card = %card,
                    trick = %trick
                );
            }
        }

        let evaluation = ScoreEvaluation::from_log(&log)?;
        Ok(Some(PlayedGame { log, evaluation }))
    }

    fn ask_for_klopfer(&mut self, hands: &[Hand; 4], kommt_raus: PlayerId) -> u8 {
        let mut klopfer = 0;
        for player in kommt_raus.in_drawing_order() {
            let first_four: Vec<Card> = hands[player.index()].first_four().collect();
            if self.agents[player.index()].is_klopfer(player, &first_four) {
                klopfer += 1;
            }
        }
        klopfer
    }

    /// One bidding round in drawing order. Every bid has to outrank the best
    /// bid so far; passing keeps it.
    fn make_calls(
        &mut self,
        hands: &[Hand; 4],
        kommt_raus: PlayerId,
        klopfer: u8,
    ) -> Result<GameCall, SessionError> {
        let mut call = GameCall::weiter();
        for player in kommt_raus.in_drawing_order() {
            let possible = self.generator.all_possible_calls(player, hands, call);
            let next = self.agents[player.index()].make_call(
                &possible,
                player,
                hands[player.index()],
                klopfer,
            );
            if !possible.contains(&next) {
                return Err(SessionError::UnofferedCall {
                    agent: player,
                    call: next,
                });
            }
            if next.is_weiter() {
                continue;
            }

            if tracing::enabled!(target: "schafkopf_sim::session", Level::DEBUG) {
                event!(
                    target: "schafkopf_sim::session",
                    Level::DEBUG,
                    player = %player,
                    call = %next,
                    klopfer = klopfer as u32,
                    "bid"
                );
            }
            call = next;
        }
        Ok(call)
    }

    /// Opponents may double first, then the caller side may answer.
    fn ask_for_kontra_re(&mut self, log: &mut GameLog) -> Result<(), SessionError> {
        let call = log.call();
        if !log.is_kontra() {
            for player in call.opponent_ids() {
                if self.agents[player.index()].call_kontra(log) {
                    log.call_kontra()?;
                    break;
                }
            }
        }
        if log.is_kontra() && !log.is_re() {
            for player in call.caller_ids() {
                if self.agents[player.index()].call_re(log) {
                    log.call_re()?;
                    break;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{HeuristicAgent, RandomAgent};
    use schafkopf_core::rules::call::GameMode;

    fn random_table(seed: u64) -> [Box<dyn Agent>; 4] {
        [0, 1, 2, 3].map(|seat| Box::new(RandomAgent::new(seed + seat)) as Box<dyn Agent>)
    }

    /// Wants every double and bids the first plain Solo it is offered.
    struct Doubler;

    impl Agent for Doubler {
        fn is_klopfer(&mut self, _position: PlayerId, first_four: &[Card]) -> bool {
            assert_eq!(first_four.len(), 4);
            true
        }

        fn make_call(
            &mut self,
            possible: &[GameCall],
            _position: PlayerId,
            _hand: Hand,
            klopfer: u8,
        ) -> GameCall {
            assert_eq!(klopfer, 4);
            possible
                .iter()
                .copied()
                .find(|call| call.mode() == GameMode::Solo && !call.is_tout())
                .unwrap_or_else(GameCall::weiter)
        }

        fn choose_card(&mut self, _log: &GameLog, possible: &[Card]) -> Card {
            possible[0]
        }

        fn call_kontra(&mut self, _log: &GameLog) -> bool {
            true
        }

        fn call_re(&mut self, _log: &GameLog) -> bool {
            true
        }
    }

    #[test]
    fn random_tables_finish_every_played_deal() {
        let mut session = GameSession::new(random_table(10), 99);
        let mut played = 0;
        for _ in 0..40 {
            if let Some(game) = session.play_game().unwrap() {
                played += 1;
                assert!(game.log.is_finished());
                let points = game.evaluation.caller_points() as u32
                    + game.evaluation.opponent_points() as u32;
                assert_eq!(points, 120);
            }
        }
        assert!(played > 0);
    }

    #[test]
    fn kommt_raus_rotates_every_deal() {
        let mut session = GameSession::new(random_table(0), 1);
        for round in 0..8u8 {
            assert_eq!(session.kommt_raus(), PlayerId::new(round % 4).unwrap());
            session.play_game().unwrap();
        }
    }

    #[test]
    fn heuristic_table_plays_only_sauspiele() {
        let agents =
            [0u64, 1, 2, 3].map(|seat| Box::new(HeuristicAgent::new(seat)) as Box<dyn Agent>);
        let mut session = GameSession::new(agents, 5);
        for _ in 0..60 {
            if let Some(game) = session.play_game().unwrap() {
                assert_eq!(game.log.call().mode(), GameMode::Sauspiel);
            }
        }
    }

    #[test]
    fn doubles_and_klopfer_reach_the_log() {
        let agents = [0, 1, 2, 3].map(|_| Box::new(Doubler) as Box<dyn Agent>);
        let mut session = GameSession::new(agents, 3);
        let game = session.play_game().unwrap().expect("first seat plays a solo");

        let call = game.log.call();
        assert_eq!(call.caller(), PlayerId::LOOP[0]);
        assert_eq!(game.log.klopfer(), 4);
        assert!(game.log.is_kontra());
        assert!(game.log.is_re());
        assert_eq!(game.log.multiplier(), 64);
    }

    #[test]
    fn same_seed_replays_the_same_deals() {
        let mut first = GameSession::new(random_table(4), 12);
        let mut second = GameSession::new(random_table(4), 12);
        for _ in 0..10 {
            let a = first.play_game().unwrap().map(|game| game.log.call());
            let b = second.play_game().unwrap().map(|game| game.log.call());
            assert_eq!(a, b);
        }
    }
}
