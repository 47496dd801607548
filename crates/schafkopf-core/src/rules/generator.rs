use crate::model::card::Card;
use crate::model::hand::Hand;
use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::rules::call::{GameCall, GameMode};
use crate::rules::ordering;

/// Enumerates the bids open to a player during the bidding round.
#[derive(Debug, Clone, Copy, Default)]
pub struct GameCallGenerator;

impl GameCallGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Every bid `player` may announce given the best bid so far.
    ///
    /// Sauspiele come first, one per callable suit the player neither holds
    /// the ace of nor is void in, then Wenz and Solo in plain and tout form.
    /// Unless `previous` is Weiter only bids ranking above it remain. The
    /// last entry is always Weiter.
    pub fn all_possible_calls(
        &self,
        player: PlayerId,
        hands: &[Hand; 4],
        previous: GameCall,
    ) -> Vec<GameCall> {
        let hand = hands[player.index()];
        let mut calls = Vec::with_capacity(14);

        let sauspiel_hand =
            hand.with_trump(|card| ordering::is_trump(GameMode::Sauspiel, Suit::Herz, card));
        for suit in Suit::CALLABLE {
            let ace = Card::new(Rank::Sau, suit);
            if hand.has_card(ace) || !sauspiel_hand.has_suit(suit) {
                continue;
            }
            let partner = PlayerId::LOOP
                .into_iter()
                .find(|seat| *seat != player && hands[seat.index()].has_card(ace));
            calls.extend(
                partner.and_then(|partner| GameCall::sauspiel(player, partner, suit).ok()),
            );
        }

        for tout in [false, true] {
            calls.push(GameCall::wenz(player, tout));
        }
        for tout in [false, true] {
            for trump in Suit::ALL {
                calls.push(GameCall::solo(player, trump, tout));
            }
        }

        if !previous.is_weiter() {
            calls.retain(|call| call.outranks(previous));
        }
        calls.push(GameCall::weiter());
        calls
    }
}

#[cfg(test)]
mod tests {
    use super::GameCallGenerator;
    use crate::model::card::Card;
    use crate::model::hand::Hand;
    use crate::model::player::PlayerId;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use crate::rules::call::{GameCall, GameMode};

    fn deal_around(first: &[Card]) -> [Hand; 4] {
        let rest: Vec<Card> = Card::all().filter(|card| !first.contains(card)).collect();
        [
            Hand::new(first).unwrap(),
            Hand::new(&rest[0..8]).unwrap(),
            Hand::new(&rest[8..16]).unwrap(),
            Hand::new(&rest[16..24]).unwrap(),
        ]
    }

    fn others() -> Vec<Card> {
        vec![
            Card::new(Rank::Ober, Suit::Eichel),
            Card::new(Rank::Ober, Suit::Gras),
            Card::new(Rank::Sau, Suit::Herz),
            Card::new(Rank::Koenig, Suit::Herz),
            Card::new(Rank::Unter, Suit::Eichel),
        ]
    }

    fn sauspiel_suits(calls: &[GameCall]) -> Vec<Suit> {
        calls
            .iter()
            .filter(|call| call.mode() == GameMode::Sauspiel)
            .filter_map(|call| call.searched_suit())
            .collect()
    }

    #[test]
    fn callable_suits_follow_the_hand() {
        // every subset of callable suits: a seven makes the suit callable,
        // holding the ace locks it
        for mask in 0..8u8 {
            let mut cards = others();
            let mut expected = Vec::new();
            for (bit, suit) in Suit::CALLABLE.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    cards.push(Card::new(Rank::Sieben, *suit));
                    expected.push(*suit);
                } else {
                    cards.push(Card::new(Rank::Sau, *suit));
                }
            }
            let hands = deal_around(&cards);
            let calls = GameCallGenerator::new().all_possible_calls(
                PlayerId::LOOP[0],
                &hands,
                GameCall::weiter(),
            );
            assert_eq!(sauspiel_suits(&calls), expected, "mask {mask:03b}");
            assert_eq!(calls.len(), 11 + expected.len());
            assert_eq!(calls.last(), Some(&GameCall::weiter()));
        }
    }

    #[test]
    fn partner_is_the_holder_of_the_ace() {
        let mut cards = others();
        cards.extend([
            Card::new(Rank::Sieben, Suit::Schell),
            Card::new(Rank::Sau, Suit::Gras),
            Card::new(Rank::Sau, Suit::Eichel),
        ]);
        let hands = deal_around(&cards);
        let ace = Card::new(Rank::Sau, Suit::Schell);
        let holder = PlayerId::LOOP
            .into_iter()
            .find(|seat| hands[seat.index()].has_card(ace))
            .unwrap();
        let calls = GameCallGenerator::new().all_possible_calls(
            PlayerId::LOOP[0],
            &hands,
            GameCall::weiter(),
        );
        assert_eq!(calls[0].partner(), Some(holder));
        assert_eq!(calls[0].caller(), PlayerId::LOOP[0]);
    }

    #[test]
    fn trump_cards_do_not_make_a_suit_callable() {
        // only Ober/Unter of Gras: trump in a Sauspiel, so the player is void
        let mut cards = others();
        cards.extend([
            Card::new(Rank::Unter, Suit::Gras),
            Card::new(Rank::Sau, Suit::Schell),
            Card::new(Rank::Sau, Suit::Eichel),
        ]);
        let hands = deal_around(&cards);
        let calls = GameCallGenerator::new().all_possible_calls(
            PlayerId::LOOP[0],
            &hands,
            GameCall::weiter(),
        );
        assert!(sauspiel_suits(&calls).is_empty());
    }

    #[test]
    fn a_wenz_leaves_only_higher_bids() {
        let hands = deal_around(&others());
        let previous = GameCall::wenz(PlayerId::LOOP[2], false);
        let calls =
            GameCallGenerator::new().all_possible_calls(PlayerId::LOOP[0], &hands, previous);
        // Wenz tout + 8 Solo + Weiter
        assert_eq!(calls.len(), 10);
        assert!(calls[..9].iter().all(|call| call.outranks(previous)));
    }
}
