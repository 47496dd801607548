use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schafkopf_core::game::log::GameLog;
use schafkopf_core::model::card::Card;
use schafkopf_core::model::hand::Hand;
use schafkopf_core::model::player::PlayerId;
use schafkopf_core::model::rank::Rank;
use schafkopf_core::model::suit::Suit;
use schafkopf_core::rules::call::{GameCall, GameMode};

use crate::config::AgentKind;

/// Decisions a seat has to take during one deal.
///
/// The option slices handed to `make_call` and `choose_card` are never
/// empty; the returned value must be one of them.
pub trait Agent {
    fn is_klopfer(&mut self, position: PlayerId, first_four: &[Card]) -> bool;

    fn make_call(
        &mut self,
        possible: &[GameCall],
        position: PlayerId,
        hand: Hand,
        klopfer: u8,
    ) -> GameCall;

    fn choose_card(&mut self, log: &GameLog, possible: &[Card]) -> Card;

    fn call_kontra(&mut self, log: &GameLog) -> bool;

    fn call_re(&mut self, log: &GameLog) -> bool;
}

/// Builds the agent for a configured seat.
pub fn build_agent(kind: AgentKind, seed: u64) -> Box<dyn Agent> {
    match kind {
        AgentKind::Random => Box::new(RandomAgent::new(seed)),
        AgentKind::Heuristic => Box::new(HeuristicAgent::new(seed)),
    }
}

/// Picks uniformly among the options and never doubles.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: StdRng,
}

impl RandomAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick<T: Copy>(&mut self, options: &[T]) -> T {
        options[self.rng.gen_range(0..options.len())]
    }
}

impl Agent for RandomAgent {
    fn is_klopfer(&mut self, _position: PlayerId, _first_four: &[Card]) -> bool {
        false
    }

    fn make_call(
        &mut self,
        possible: &[GameCall],
        _position: PlayerId,
        _hand: Hand,
        _klopfer: u8,
    ) -> GameCall {
        self.pick(possible)
    }

    fn choose_card(&mut self, _log: &GameLog, possible: &[Card]) -> Card {
        self.pick(possible)
    }

    fn call_kontra(&mut self, _log: &GameLog) -> bool {
        false
    }

    fn call_re(&mut self, _log: &GameLog) -> bool {
        false
    }
}

/// Calls a Sauspiel on a strong enough hand and plays random legal cards.
#[derive(Debug, Clone)]
pub struct HeuristicAgent {
    cards: RandomAgent,
}

impl HeuristicAgent {
    pub fn new(seed: u64) -> Self {
        Self {
            cards: RandomAgent::new(seed),
        }
    }
}

impl Agent for HeuristicAgent {
    fn is_klopfer(&mut self, _position: PlayerId, _first_four: &[Card]) -> bool {
        false
    }

    fn make_call(
        &mut self,
        possible: &[GameCall],
        _position: PlayerId,
        hand: Hand,
        _klopfer: u8,
    ) -> GameCall {
        sauspiel_call(possible, hand).unwrap_or_else(GameCall::weiter)
    }

    fn choose_card(&mut self, log: &GameLog, possible: &[Card]) -> Card {
        self.cards.choose_card(log, possible)
    }

    fn call_kontra(&mut self, _log: &GameLog) -> bool {
        false
    }

    fn call_re(&mut self, _log: &GameLog) -> bool {
        false
    }
}

/// The Sauspiel to announce with `hand`, if any.
///
/// Needs at least four trumps headed by one of the two top Ober, a second
/// Stammtrumpf below it, and either five trumps or a void callable suit.
/// Among the offered Sauspiele the one with the shortest searched suit wins.
pub fn sauspiel_call(possible: &[GameCall], hand: Hand) -> Option<GameCall> {
    let sauspiele: Vec<GameCall> = possible
        .iter()
        .copied()
        .filter(|call| call.mode() == GameMode::Sauspiel)
        .collect();
    let first = *sauspiele.first()?;

    let hand = hand.with_trump(|card| first.is_trump(card));
    let trumps: Vec<Card> = first
        .trump_order()
        .into_iter()
        .filter(|card| hand.has_card(*card))
        .collect();
    if trumps.len() < 4 {
        return None;
    }

    let (best, second) = (trumps[0], trumps[1]);
    let no_renner = best.rank() == Rank::Ober && best.suit() >= Suit::Gras;
    let two_stammtrumpf =
        second.rank() == Rank::Unter || (second.rank() == Rank::Ober && no_renner);
    let is_frei = Suit::CALLABLE.iter().any(|suit| !hand.has_suit(*suit));
    if !(no_renner && two_stammtrumpf && (trumps.len() >= 5 || is_frei)) {
        return None;
    }

    sauspiele
        .into_iter()
        .filter_map(|call| call.searched_suit().map(|suit| (hand.suit_count(suit), call)))
        .min_by_key(|(count, _)| *count)
        .map(|(_, call)| call)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schafkopf_core::model::deck::Deck;
    use schafkopf_core::rules::generator::GameCallGenerator;

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id).unwrap()
    }

    fn c(rank: Rank, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn deal_around(first: &[Card]) -> [Hand; 4] {
        let rest: Vec<Card> = Card::all().filter(|card| !first.contains(card)).collect();
        [
            Hand::new(first).unwrap(),
            Hand::new(&rest[0..8]).unwrap(),
            Hand::new(&rest[8..16]).unwrap(),
            Hand::new(&rest[16..24]).unwrap(),
        ]
    }

    fn offered(hands: &[Hand; 4]) -> Vec<GameCall> {
        GameCallGenerator::new().all_possible_calls(p(0), hands, GameCall::weiter())
    }

    #[test]
    fn strong_hand_calls_its_shortest_suit() {
        let cards = [
            c(Rank::Ober, Suit::Eichel),
            c(Rank::Unter, Suit::Gras),
            c(Rank::Sau, Suit::Herz),
            c(Rank::Koenig, Suit::Herz),
            c(Rank::Neun, Suit::Herz),
            c(Rank::Sieben, Suit::Schell),
            c(Rank::Acht, Suit::Gras),
            c(Rank::Neun, Suit::Gras),
        ];
        let hands = deal_around(&cards);
        let call = sauspiel_call(&offered(&hands), hands[0]).expect("a sauspiel");
        assert_eq!(call.searched_suit(), Some(Suit::Schell));
        assert_eq!(call.caller(), p(0));
    }

    #[test]
    fn four_trumps_need_a_void_suit() {
        let cards = [
            c(Rank::Ober, Suit::Gras),
            c(Rank::Unter, Suit::Eichel),
            c(Rank::Sau, Suit::Herz),
            c(Rank::Koenig, Suit::Herz),
            c(Rank::Sieben, Suit::Schell),
            c(Rank::Acht, Suit::Gras),
            c(Rank::Neun, Suit::Eichel),
            c(Rank::Zehn, Suit::Eichel),
        ];
        let hands = deal_around(&cards);
        assert_eq!(sauspiel_call(&offered(&hands), hands[0]), None);
    }

    #[test]
    fn low_ober_on_top_passes() {
        let cards = [
            c(Rank::Ober, Suit::Herz),
            c(Rank::Unter, Suit::Eichel),
            c(Rank::Unter, Suit::Gras),
            c(Rank::Sau, Suit::Herz),
            c(Rank::Koenig, Suit::Herz),
            c(Rank::Sieben, Suit::Schell),
            c(Rank::Acht, Suit::Gras),
            c(Rank::Neun, Suit::Gras),
        ];
        let hands = deal_around(&cards);
        assert_eq!(sauspiel_call(&offered(&hands), hands[0]), None);

        let mut agent = HeuristicAgent::new(1);
        assert_eq!(
            agent.make_call(&offered(&hands), p(0), hands[0], 0),
            GameCall::weiter()
        );
    }

    #[test]
    fn nothing_to_call_without_sauspiele() {
        let hands = Deck::standard().initial_hands();
        assert_eq!(sauspiel_call(&[GameCall::weiter()], hands[0]), None);
    }

    #[test]
    fn random_agent_stays_within_the_options() {
        let hands = Deck::shuffled_with_seed(4).initial_hands();
        let possible = offered(&hands);
        let mut agent = RandomAgent::new(17);
        for _ in 0..64 {
            let call = agent.make_call(&possible, p(0), hands[0], 0);
            assert!(possible.contains(&call));
        }
        assert!(!agent.is_klopfer(p(0), &[]));
    }

    #[test]
    fn equal_seeds_make_equal_choices() {
        let hands = Deck::shuffled_with_seed(8).initial_hands();
        let possible = offered(&hands);
        let mut first = RandomAgent::new(3);
        let mut second = RandomAgent::new(3);
        let a: Vec<GameCall> = (0..16)
            .map(|_| first.make_call(&possible, p(0), hands[0], 0))
            .collect();
        let b: Vec<GameCall> = (0..16)
            .map(|_| second.make_call(&possible, p(0), hands[0], 0))
            .collect();
        assert_eq!(a, b);
    }
}
