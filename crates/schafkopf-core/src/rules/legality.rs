use crate::game::log::GameLog;
use crate::model::card::Card;
use crate::model::hand::{HAND_CAPACITY, Hand};
use crate::model::trick::Trick;
use crate::rules::call::{GameCall, GameMode};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("game mode {0} has no card play")]
    UnsupportedMode(GameMode),
}

/// Decides which cards a player may put into the current trick.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameRules;

impl GameRules {
    pub fn new() -> Self {
        Self
    }

    /// Whether `hand` may play `card` into `trick` under `call`.
    ///
    /// A Weiter call has no card play at all and is rejected whatever the
    /// card. Otherwise cards the hand does not hold are never playable.
    pub fn can_play_card(
        &self,
        call: GameCall,
        card: Card,
        trick: &Trick,
        hand: &Hand,
    ) -> Result<bool, RulesError> {
        if call.is_weiter() {
            return Err(RulesError::UnsupportedMode(GameMode::Weiter));
        }
        if !hand.has_card(card) {
            return Ok(false);
        }
        let hand = if hand.is_trump_cached() {
            *hand
        } else {
            hand.with_trump(|held| call.is_trump(held))
        };
        let card = card.with_trump(call.is_trump(card));
        match call.mode() {
            GameMode::Weiter => Err(RulesError::UnsupportedMode(GameMode::Weiter)),
            GameMode::Wenz | GameMode::Solo => {
                Ok(follows_suit(card, trick, &hand).unwrap_or(true))
            }
            GameMode::Sauspiel => Ok(sauspiel_allows(call, card, trick, &hand)),
        }
    }

    /// Fills `buffer` with the legal cards of the player to move and returns
    /// the filled part. Empty once the deal is over.
    pub fn possible_cards<'a>(
        &self,
        log: &GameLog,
        buffer: &'a mut [Card; HAND_CAPACITY],
    ) -> Result<&'a [Card], RulesError> {
        let call = log.call();
        let trick = log.current_trick();
        let hand = log.hand(log.driving_player());
        let mut count = 0;
        for card in hand.iter() {
            if self.can_play_card(call, card, &trick, &hand)? {
                buffer[count] = card;
                count += 1;
            }
        }
        Ok(&buffer[..count])
    }
}

/// Trump and suit obligations shared by every mode. `None` when the player
/// leads or can follow neither, so any card goes.
fn follows_suit(card: Card, trick: &Trick, hand: &Hand) -> Option<bool> {
    if trick.cards_count() == 0 {
        return None;
    }
    if trick.is_trump_led() && hand.has_trump() {
        return Some(card.trump_flag());
    }
    match trick.led_suit() {
        Some(led) if hand.has_suit(led) => Some(!card.trump_flag() && card.suit() == led),
        _ => None,
    }
}

fn sauspiel_allows(call: GameCall, card: Card, trick: &Trick, hand: &Hand) -> bool {
    let (Some(ace), Some(searched)) = (call.searched_ace(), call.searched_suit()) else {
        return true;
    };
    let holds_ace = hand.has_card(ace) && !trick.already_searched();

    if trick.cards_count() == 0 {
        // with fewer than four cards of the suit the ace may not be ducked
        let leads_searched = !card.trump_flag() && card.suit() == searched;
        let may_run_away = hand.suit_count(searched) >= 4;
        return !(holds_ace && leads_searched && !may_run_away) || card == ace;
    }

    if trick.is_trump_led() && hand.has_trump() {
        return card.trump_flag();
    }
    if let Some(led) = trick.led_suit().filter(|led| hand.has_suit(*led)) {
        let follows = !card.trump_flag() && card.suit() == led;
        let must_give_ace = led == searched && holds_ace;
        return follows && (!must_give_ace || card == ace);
    }

    // free choice, but the searched ace stays in the hand until its last card
    !holds_ace || card != ace || hand.cards_count() == 1
}
