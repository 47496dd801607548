use crate::model::card::Card;
use crate::model::hand::{HAND_CAPACITY, Hand, HandError};
use crate::model::player::PlayerId;
use crate::model::trick::{Trick, TrickError};
use crate::rules::call::GameCall;
use thiserror::Error;

pub const TRICKS_PER_DEAL: usize = 8;
pub const CARDS_PER_DEAL: usize = 32;
pub const MAX_KLOPFER: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GameLogError {
    #[error("{0} cannot be played")]
    UnplayableCall(GameCall),
    #[error("{player} holds {count} cards, expected 8")]
    InvalidHandSize { player: PlayerId, count: usize },
    #[error("the initial hands share cards")]
    OverlappingHands,
    #[error("at most 4 players can klopf, got {0}")]
    TooManyKlopfer(u8),
    #[error("all 32 cards have been played")]
    GameFinished,
    #[error("the deal is still running")]
    GameNotFinished,
    #[error("kontra and re are only allowed before the second card")]
    KontraReClosed,
    #[error("re needs a kontra first")]
    ReWithoutKontra,
    #[error(transparent)]
    Hand(#[from] HandError),
    #[error(transparent)]
    Trick(#[from] TrickError),
}

/// State of a single deal: the call, the hands and the eight tricks.
///
/// [`GameLog::next_card`] is the only way cards enter the deal. It does not
/// check legality; ask [`GameRules`](crate::rules::legality::GameRules) first.
#[derive(Debug, Clone)]
pub struct GameLog {
    call: GameCall,
    initial_hands: [Hand; 4],
    hands: [Hand; 4],
    tricks: [Trick; TRICKS_PER_DEAL],
    card_count: usize,
    points: [u8; 4],
    tricks_won: [u8; 4],
    kommt_raus: PlayerId,
    klopfer: u8,
    kontra: bool,
    re: bool,
}

impl GameLog {
    /// Starts a deal. `hands` are indexed by player id and must partition the
    /// deck; `kommt_raus` leads the first trick.
    pub fn new(
        call: GameCall,
        hands: [Hand; 4],
        kommt_raus: PlayerId,
        klopfer: u8,
    ) -> Result<Self, GameLogError> {
        if call.is_weiter() {
            return Err(GameLogError::UnplayableCall(call));
        }
        if klopfer > MAX_KLOPFER {
            return Err(GameLogError::TooManyKlopfer(klopfer));
        }
        let mut seen = 0u32;
        for (player, hand) in PlayerId::LOOP.into_iter().zip(hands.iter()) {
            let count = hand.cards_count();
            if count != HAND_CAPACITY {
                return Err(GameLogError::InvalidHandSize { player, count });
            }
            for card in hand.iter() {
                seen |= 1 << card.index();
            }
        }
        if seen.count_ones() as usize != CARDS_PER_DEAL {
            return Err(GameLogError::OverlappingHands);
        }

        let hands = hands.map(|hand| hand.with_trump(|card| call.is_trump(card)));
        Ok(Self {
            call,
            initial_hands: hands,
            hands,
            tricks: [Trick::first(kommt_raus, call); TRICKS_PER_DEAL],
            card_count: 0,
            points: [0; 4],
            tricks_won: [0; 4],
            kommt_raus,
            klopfer,
            kontra: false,
            re: false,
        })
    }

    /// Plays `card` for the player to move and returns the trick it went
    /// into. Completing a trick books its points and opens the next one.
    pub fn next_card(&mut self, card: Card) -> Result<Trick, GameLogError> {
        if self.is_finished() {
            return Err(GameLogError::GameFinished);
        }
        let slot = self.card_count / 4;
        let trick = self.tricks[slot];
        let player = trick.next_player();
        let hand = self.hands[player.index()].discard(card)?;
        let trick = trick.next_card(card)?;

        self.hands[player.index()] = hand;
        self.tricks[slot] = trick;
        self.card_count += 1;

        if let Some(winner) = trick.winner() {
            self.points[winner.index()] += trick.points();
            self.tricks_won[winner.index()] += 1;
            if slot + 1 < TRICKS_PER_DEAL {
                self.tricks[slot + 1] = trick.next_trick()?;
            }
        }
        Ok(trick)
    }

    pub fn call(&self) -> GameCall {
        self.call
    }

    pub fn kommt_raus(&self) -> PlayerId {
        self.kommt_raus
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    /// Tricks holding at least one card.
    pub fn turn_count(&self) -> usize {
        self.card_count.div_ceil(4)
    }

    pub fn is_finished(&self) -> bool {
        self.card_count == CARDS_PER_DEAL
    }

    /// The trick the next card goes into, or the last trick once finished.
    pub fn current_trick(&self) -> Trick {
        self.tricks[(self.card_count / 4).min(TRICKS_PER_DEAL - 1)]
    }

    /// Every trick holding at least one card, in play order.
    pub fn tricks(&self) -> &[Trick] {
        &self.tricks[..self.turn_count()]
    }

    pub fn driving_player(&self) -> PlayerId {
        self.current_trick().next_player()
    }

    pub fn hand(&self, player: PlayerId) -> Hand {
        self.hands[player.index()]
    }

    pub fn initial_hand(&self, player: PlayerId) -> Hand {
        self.initial_hands[player.index()]
    }

    pub fn initial_hands(&self) -> &[Hand; 4] {
        &self.initial_hands
    }

    /// Augen taken so far, by player id.
    pub fn points(&self) -> [u8; 4] {
        self.points
    }

    pub fn tricks_won(&self, player: PlayerId) -> u8 {
        self.tricks_won[player.index()]
    }

    pub fn klopfer(&self) -> u8 {
        self.klopfer
    }

    pub fn can_kontra_re(&self) -> bool {
        self.card_count <= 1
    }

    pub fn call_kontra(&mut self) -> Result<(), GameLogError> {
        if !self.can_kontra_re() {
            return Err(GameLogError::KontraReClosed);
        }
        self.kontra = true;
        Ok(())
    }

    pub fn call_re(&mut self) -> Result<(), GameLogError> {
        if !self.can_kontra_re() {
            return Err(GameLogError::KontraReClosed);
        }
        if !self.kontra {
            return Err(GameLogError::ReWithoutKontra);
        }
        self.re = true;
        Ok(())
    }

    pub fn is_kontra(&self) -> bool {
        self.kontra
    }

    pub fn is_re(&self) -> bool {
        self.re
    }

    /// Klopfer plus Kontra plus Re.
    pub fn doublings(&self) -> u32 {
        self.klopfer as u32 + self.kontra as u32 + self.re as u32
    }

    pub fn multiplier(&self) -> u32 {
        1 << self.doublings()
    }
}
