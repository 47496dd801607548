use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::hash::{Hash, Hasher};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SUIT_MASK: u8 = 0x03;
pub const RANK_MASK: u8 = 0x1C;
pub const CARD_MASK: u8 = SUIT_MASK | RANK_MASK;
/// Set while the card sits in a hand or trick slot.
pub const EXISTS_FLAG: u8 = 0x20;
/// Cached trump bit, only meaningful inside a hand or trick.
pub const TRUMP_FLAG: u8 = 0x40;
pub const CARD_MASK_WITH_META: u8 = CARD_MASK | EXISTS_FLAG | TRUMP_FLAG;

/// A single card packed into one byte: `0b0TE_RRR_SS`.
///
/// The low five bits (rank, suit) are the card's identity. The exists and
/// trump bits are context owned by [`Hand`](crate::model::hand::Hand) and
/// [`Trick`](crate::model::trick::Trick); equality and hashing ignore them.
#[derive(Clone, Copy, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct Card {
    id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("card id {0:#04x} has bits outside the card layout")]
pub struct InvalidCardId(pub u8);

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            id: ((rank as u8) << 2) | suit as u8,
        }
    }

    pub const fn with_meta(rank: Rank, suit: Suit, exists: bool, trump: bool) -> Self {
        Self::new(rank, suit).with_exists(exists).with_trump(trump)
    }

    pub const fn from_id(id: u8) -> Result<Self, InvalidCardId> {
        if id & !CARD_MASK_WITH_META != 0 {
            return Err(InvalidCardId(id));
        }
        Ok(Self { id })
    }

    /// Builds a card from a lane byte; bits above the meta flags are dropped.
    pub(crate) const fn from_lane(byte: u8) -> Self {
        Self {
            id: byte & CARD_MASK_WITH_META,
        }
    }

    /// All 32 cards ordered by identity.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..32u8).map(|id| Card { id })
    }

    /// The packed byte including meta bits.
    pub const fn id(self) -> u8 {
        self.id
    }

    /// Identity in `0..32`, stable for feature export.
    pub const fn index(self) -> usize {
        (self.id & CARD_MASK) as usize
    }

    pub const fn rank(self) -> Rank {
        Rank::from_bits(self.id >> 2)
    }

    pub const fn suit(self) -> Suit {
        Suit::from_bits(self.id)
    }

    pub const fn exists(self) -> bool {
        self.id & EXISTS_FLAG != 0
    }

    pub const fn trump_flag(self) -> bool {
        self.id & TRUMP_FLAG != 0
    }

    pub const fn with_exists(self, exists: bool) -> Self {
        let id = if exists {
            self.id | EXISTS_FLAG
        } else {
            self.id & !EXISTS_FLAG
        };
        Self { id }
    }

    pub const fn with_trump(self, trump: bool) -> Self {
        let id = if trump {
            self.id | TRUMP_FLAG
        } else {
            self.id & !TRUMP_FLAG
        };
        Self { id }
    }

    pub const fn without_meta(self) -> Self {
        Self {
            id: self.id & CARD_MASK,
        }
    }

    pub const fn is_ober_or_unter(self) -> bool {
        matches!(self.rank(), Rank::Ober | Rank::Unter)
    }

    pub const fn points(self) -> u8 {
        self.rank().points()
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.index() == other.index()
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index().hash(state);
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> Self {
        card.id
    }
}

impl TryFrom<u8> for Card {
    type Error = InvalidCardId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Card::from_id(id)
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card({}{})", self.suit(), self.rank())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit(), self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::{Card, InvalidCardId, Rank, Suit};
    use std::collections::HashSet;

    #[test]
    fn identity_bits_decode_to_rank_and_suit() {
        for rank in Rank::ORDERED {
            for suit in Suit::ALL {
                let card = Card::new(rank, suit);
                assert_eq!(card.rank(), rank);
                assert_eq!(card.suit(), suit);
                assert_eq!(card.index(), rank.index() * 4 + suit.index());
            }
        }
    }

    #[test]
    fn equality_ignores_meta_bits() {
        let plain = Card::new(Rank::Ober, Suit::Eichel);
        let flagged = Card::with_meta(Rank::Ober, Suit::Eichel, true, true);
        assert_ne!(plain.id(), flagged.id());
        assert_eq!(plain, flagged);

        let mut seen = HashSet::new();
        seen.insert(plain);
        assert!(seen.contains(&flagged));
    }

    #[test]
    fn meta_bits_toggle_independently() {
        let card = Card::new(Rank::Sau, Suit::Gras).with_exists(true);
        assert!(card.exists());
        assert!(!card.trump_flag());
        let card = card.with_trump(true).with_exists(false);
        assert!(!card.exists());
        assert!(card.trump_flag());
        assert_eq!(card.without_meta().id(), card.index() as u8);
    }

    #[test]
    fn from_id_rejects_high_bit() {
        assert_eq!(Card::from_id(0x80), Err(InvalidCardId(0x80)));
        assert!(Card::from_id(0x7F).is_ok());
    }

    #[test]
    fn display_is_suit_then_rank() {
        assert_eq!(Card::new(Rank::Zehn, Suit::Herz).to_string(), "H10");
        assert_eq!(Card::new(Rank::Ober, Suit::Eichel).to_string(), "EO");
    }

    #[test]
    fn serde_uses_the_packed_byte() {
        let card = Card::with_meta(Rank::Unter, Suit::Gras, true, false);
        let json = serde_json::to_string(&card).unwrap();
        assert_eq!(json, card.id().to_string());
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), card.id());
        assert!(serde_json::from_str::<Card>("200").is_err());
    }

    #[test]
    fn deck_has_32_distinct_cards_worth_120() {
        let cards: HashSet<Card> = Card::all().collect();
        assert_eq!(cards.len(), 32);
        let total: u32 = Card::all().map(|card| card.points() as u32).sum();
        assert_eq!(total, 120);
    }
}
