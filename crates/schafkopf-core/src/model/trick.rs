use crate::model::card::{Card, EXISTS_FLAG};
use crate::model::lanes::{lane, set_lane};
use crate::model::player::PlayerId;
use crate::model::suit::Suit;
use crate::rules::call::GameCall;
use core::cmp::Ordering;
use core::fmt;
use thiserror::Error;

const LEADER_SHIFT: u32 = 32;
const COUNT_SHIFT: u32 = 34;
const SEARCHED_FLAG: u64 = 1 << 37;
const CALL_SHIFT: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrickError {
    #[error("the trick already holds four cards")]
    TrickComplete,
    #[error("the trick is still open")]
    TrickNotDone,
}

/// One Stich packed into a `u64`.
///
/// Bytes 0-3 hold the card played by seat 0-3, with the exists and trump
/// flags set. Bits 32-33 are the leader, 34-36 the number of played cards,
/// bit 37 records that the searched suit of a Sauspiel was already led in an
/// earlier trick, and bits 40-55 carry the game call.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trick {
    bits: u64,
}

impl Trick {
    pub fn first(leader: PlayerId, call: GameCall) -> Self {
        Self::open(leader, call, false)
    }

    fn open(leader: PlayerId, call: GameCall, already_searched: bool) -> Self {
        let mut bits = ((call.id() as u64) << CALL_SHIFT) | ((leader.id() as u64) << LEADER_SHIFT);
        if already_searched {
            bits |= SEARCHED_FLAG;
        }
        Trick { bits }
    }

    /// Plays `card` for the seat whose turn it is.
    pub fn next_card(self, card: Card) -> Result<Self, TrickError> {
        if self.is_done() {
            return Err(TrickError::TrickComplete);
        }
        let seat = self.next_player().index();
        let byte = card
            .without_meta()
            .with_exists(true)
            .with_trump(self.call().is_trump(card))
            .id();
        let count = self.cards_count() as u64 + 1;
        let bits = set_lane(self.bits, seat, byte) & !(0x7u64 << COUNT_SHIFT);
        Ok(Trick {
            bits: bits | (count << COUNT_SHIFT),
        })
    }

    /// Opens the following trick, led by this trick's winner.
    pub fn next_trick(self) -> Result<Self, TrickError> {
        let winner = self.winner().ok_or(TrickError::TrickNotDone)?;
        let searched_now = match (self.call().searched_suit(), self.led_suit()) {
            (Some(searched), Some(led)) => searched == led,
            _ => false,
        };
        Ok(Self::open(
            winner,
            self.call(),
            self.already_searched() || searched_now,
        ))
    }

    pub const fn bits(&self) -> u64 {
        self.bits
    }

    pub const fn leader(&self) -> PlayerId {
        PlayerId::from_bits((self.bits >> LEADER_SHIFT) as u8)
    }

    pub const fn cards_count(&self) -> usize {
        ((self.bits >> COUNT_SHIFT) & 0x7) as usize
    }

    pub const fn is_done(&self) -> bool {
        self.cards_count() == 4
    }

    pub const fn call(&self) -> GameCall {
        GameCall::from_bits((self.bits >> CALL_SHIFT) as u16)
    }

    /// The searched suit was led in an earlier trick of this deal.
    pub const fn already_searched(&self) -> bool {
        self.bits & SEARCHED_FLAG != 0
    }

    /// Seat to play next; once the trick is done this is the leader again.
    pub const fn next_player(&self) -> PlayerId {
        self.leader().offset(self.cards_count() as u8)
    }

    pub fn card_of(&self, player: PlayerId) -> Option<Card> {
        let byte = lane(self.bits, player.index());
        (byte & EXISTS_FLAG != 0).then(|| Card::from_lane(byte))
    }

    pub fn first_card(&self) -> Option<Card> {
        self.card_of(self.leader())
    }

    pub fn is_trump_led(&self) -> bool {
        self.first_card().is_some_and(|card| card.trump_flag())
    }

    /// Suit that has to be followed, `None` when trump was led or nothing
    /// was played yet.
    pub fn led_suit(&self) -> Option<Suit> {
        self.first_card()
            .filter(|card| !card.trump_flag())
            .map(|card| card.suit())
    }

    /// Played cards with their seats, in play order.
    pub fn plays(&self) -> impl Iterator<Item = (PlayerId, Card)> + '_ {
        self.leader()
            .in_drawing_order()
            .into_iter()
            .take(self.cards_count())
            .filter_map(|player| self.card_of(player).map(|card| (player, card)))
    }

    /// Augen of the played cards.
    pub fn points(&self) -> u8 {
        (0..4)
            .map(|seat| lane(self.bits, seat))
            .filter(|byte| byte & EXISTS_FLAG != 0)
            .map(|byte| Card::from_lane(byte).points())
            .sum()
    }

    /// Seat taking the trick, `None` while it is still open.
    ///
    /// Trump led: highest card overall. Otherwise the highest card among
    /// those that follow the led suit or are trump, so a trump always takes
    /// a led plain suit.
    pub fn winner(&self) -> Option<PlayerId> {
        if !self.is_done() {
            return None;
        }
        let call = self.call();
        let led = self.led_suit();
        let mut best: Option<(PlayerId, Card)> = None;
        for (player, card) in self.plays() {
            let eligible = match led {
                None => true,
                Some(suit) => card.trump_flag() || card.suit() == suit,
            };
            if !eligible {
                continue;
            }
            best = match best {
                Some((_, top)) if call.compare_cards(card, top) != Ordering::Greater => best,
                _ => Some((player, card)),
            };
        }
        best.map(|(player, _)| player)
    }
}

impl fmt::Debug for Trick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trick")
            .field("leader", &self.leader())
            .field("call", &self.call())
            .field("cards", &self.plays().collect::<Vec<_>>())
            .field("already_searched", &self.already_searched())
            .finish()
    }
}

impl fmt::Display for Trick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.leader())?;
        for (_, card) in self.plays() {
            write!(f, " {card}")?;
        }
        Ok(())
    }
}
