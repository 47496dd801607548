use crate::model::card::Card;
use crate::model::hand::{HAND_CAPACITY, Hand};
use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::rules::call::GameCall;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub const DECK_SIZE: usize = 32;

/// The 32-card Schafkopf deck. Eight consecutive cards form one hand.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: [Card; DECK_SIZE],
}

impl Deck {
    pub fn standard() -> Self {
        let mut cards = [Card::new(Rank::Sieben, Suit::Schell); DECK_SIZE];
        let mut slot = 0;
        for suit in Suit::ALL.iter().copied() {
            for rank in Rank::ORDERED.iter().copied() {
                cards[slot] = Card::new(rank, suit);
                slot += 1;
            }
        }
        Self { cards }
    }

    pub fn shuffled<R: rand::Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::standard();
        deck.shuffle_in_place(rng);
        deck
    }

    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    pub fn shuffle_in_place<R: rand::Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn hand_of(&self, player: PlayerId) -> Hand {
        let start = player.index() * HAND_CAPACITY;
        let mut cards = [Card::new(Rank::Sieben, Suit::Schell); HAND_CAPACITY];
        cards.copy_from_slice(&self.cards[start..start + HAND_CAPACITY]);
        Hand::pack(cards)
    }

    /// Player `i` receives cards `8i..8i+8`.
    pub fn initial_hands(&self) -> [Hand; 4] {
        PlayerId::LOOP.map(|player| self.hand_of(player))
    }

    /// Initial hands with the trump bits of `call` already cached.
    pub fn initial_hands_for(&self, call: GameCall) -> [Hand; 4] {
        self.initial_hands()
            .map(|hand| hand.with_trump(|card| call.is_trump(card)))
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::standard()
    }
}
