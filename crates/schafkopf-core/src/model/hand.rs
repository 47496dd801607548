use crate::model::card::{CARD_MASK, Card, EXISTS_FLAG, TRUMP_FLAG};
use crate::model::lanes::{self, first_lane, lane, lane_count, matching_lanes};
use crate::model::suit::Suit;
use core::fmt;
use thiserror::Error;

pub const HAND_CAPACITY: usize = 8;

/// Lane 0, bit 7: trump bits have been applied to every lane.
const TRUMP_CACHED: u64 = 0x80;
const IDENTITY_WITH_EXISTS: u8 = CARD_MASK | EXISTS_FLAG;
const SUIT_QUERY_MASK: u8 = EXISTS_FLAG | TRUMP_FLAG | 0x03;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandError {
    #[error("a hand holds at most 8 cards, got {count}")]
    TooManyCards { count: usize },
    #[error("card {0} appears twice")]
    DuplicateCard(Card),
    #[error("card {0} is not in the hand")]
    CardNotInHand(Card),
}

/// Up to eight cards packed one per byte lane of a `u64`.
///
/// A lane is the card identity plus the exists and trump flags. Discarding
/// clears the exists flag and leaves the lane in place, so lane order stays
/// the dealing order for the whole deal.
///
/// Every query has a `_scalar` twin that walks the lanes one by one. The
/// packed versions must agree with them for every hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand {
    cards: u64,
}

impl Hand {
    pub const EMPTY: Hand = Hand { cards: 0 };

    pub fn new(cards: &[Card]) -> Result<Self, HandError> {
        if cards.len() > HAND_CAPACITY {
            return Err(HandError::TooManyCards { count: cards.len() });
        }
        let mut hand = Hand::EMPTY;
        for (slot, card) in cards.iter().enumerate() {
            if hand.has_card(*card) {
                return Err(HandError::DuplicateCard(card.without_meta()));
            }
            hand.cards = lanes::set_lane(hand.cards, slot, card.index() as u8 | EXISTS_FLAG);
        }
        Ok(hand)
    }

    /// Packs a full hand whose cards are known to be distinct.
    pub(crate) fn pack(cards: [Card; HAND_CAPACITY]) -> Self {
        let bytes = cards.map(|card| card.index() as u8 | EXISTS_FLAG);
        Hand {
            cards: u64::from_le_bytes(bytes),
        }
    }

    /// Caches the trump bit of every held card. Trump and suit queries read
    /// that cache, so this has to run once per hand before they are used.
    pub fn with_trump(self, is_trump: impl Fn(Card) -> bool) -> Self {
        let mut cards = self.cards & !TRUMP_CACHED;
        for slot in 0..HAND_CAPACITY {
            let byte = lane(cards, slot);
            if byte & EXISTS_FLAG == 0 {
                continue;
            }
            let card = Card::from_lane(byte);
            let byte = card.with_trump(is_trump(card)).id();
            cards = lanes::set_lane(cards, slot, byte);
        }
        Hand {
            cards: cards | TRUMP_CACHED,
        }
    }

    pub const fn is_trump_cached(&self) -> bool {
        self.cards & TRUMP_CACHED != 0
    }

    /// Raw packed lanes, stable for feature export.
    pub const fn bits(&self) -> u64 {
        self.cards
    }

    pub const fn cards_count(&self) -> usize {
        lane_count(matching_lanes(self.cards, EXISTS_FLAG, EXISTS_FLAG))
    }

    pub const fn is_empty(&self) -> bool {
        self.cards_count() == 0
    }

    pub fn discard(self, card: Card) -> Result<Self, HandError> {
        let slot = first_lane(self.card_lanes(card)).ok_or(HandError::CardNotInHand(card))?;
        Ok(Hand {
            cards: self.cards & !((EXISTS_FLAG as u64) << (slot * 8)),
        })
    }

    pub const fn has_card(&self, card: Card) -> bool {
        self.card_lanes(card) != 0
    }

    pub fn has_card_scalar(&self, card: Card) -> bool {
        self.iter().any(|held| held == card)
    }

    pub fn has_trump(&self) -> bool {
        self.trump_count() > 0
    }

    pub fn has_trump_scalar(&self) -> bool {
        self.trump_count_scalar() > 0
    }

    pub fn trump_count(&self) -> usize {
        debug_assert!(self.is_trump_cached(), "trump bits were never applied");
        lane_count(self.trump_lanes())
    }

    pub fn trump_count_scalar(&self) -> usize {
        self.iter().filter(|card| card.trump_flag()).count()
    }

    /// True iff a non-trump card of `suit` is held.
    pub fn has_suit(&self, suit: Suit) -> bool {
        self.suit_count(suit) > 0
    }

    pub fn has_suit_scalar(&self, suit: Suit) -> bool {
        self.suit_count_scalar(suit) > 0
    }

    /// Number of non-trump cards of `suit`.
    pub fn suit_count(&self, suit: Suit) -> usize {
        debug_assert!(self.is_trump_cached(), "trump bits were never applied");
        lane_count(matching_lanes(
            self.cards,
            suit as u8 | EXISTS_FLAG,
            SUIT_QUERY_MASK,
        ))
    }

    pub fn suit_count_scalar(&self, suit: Suit) -> usize {
        self.iter()
            .filter(|card| !card.trump_flag() && card.suit() == suit)
            .count()
    }

    /// Held cards in dealing order, carrying their exists and trump flags.
    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        (0..HAND_CAPACITY)
            .map(|slot| lane(self.cards, slot))
            .filter(|byte| byte & EXISTS_FLAG != 0)
            .map(Card::from_lane)
    }

    /// The first four dealt cards still held, which is what a player sees
    /// when deciding to klopf.
    pub fn first_four(&self) -> impl Iterator<Item = Card> + '_ {
        (0..4)
            .map(|slot| lane(self.cards, slot))
            .filter(|byte| byte & EXISTS_FLAG != 0)
            .map(Card::from_lane)
    }

    const fn card_lanes(&self, card: Card) -> u64 {
        matching_lanes(
            self.cards,
            card.index() as u8 | EXISTS_FLAG,
            IDENTITY_WITH_EXISTS,
        )
    }

    const fn trump_lanes(&self) -> u64 {
        matching_lanes(
            self.cards,
            EXISTS_FLAG | TRUMP_FLAG,
            EXISTS_FLAG | TRUMP_FLAG,
        )
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for card in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
            first = false;
        }
        Ok(())
    }
}
