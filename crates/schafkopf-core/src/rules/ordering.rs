//! Trump membership and card ranking as pure functions of the game mode and
//! trump suit.
//!
//! [`compare`] is the reference ordering. [`compare_fast`] collapses every
//! card into a single score byte and must give identical results for every
//! pair of cards under every mode.

use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::rules::call::GameMode;
use core::cmp::Ordering;

/// Trumps of a Solo or Sauspiel, highest first, for the given trump suit.
pub fn trump_order(mode: GameMode, trump: Suit) -> Vec<Card> {
    let mut order = Vec::with_capacity(14);
    match mode {
        GameMode::Weiter => {}
        GameMode::Wenz => {
            order.extend(Suit::ALL.iter().rev().map(|suit| Card::new(Rank::Unter, *suit)));
        }
        GameMode::Sauspiel | GameMode::Solo => {
            for rank in [Rank::Ober, Rank::Unter] {
                order.extend(Suit::ALL.iter().rev().map(|suit| Card::new(rank, *suit)));
            }
            order.extend(
                Rank::ORDERED
                    .iter()
                    .rev()
                    .filter(|rank| !matches!(rank, Rank::Ober | Rank::Unter))
                    .map(|rank| Card::new(*rank, trump)),
            );
        }
    }
    order
}

pub const fn is_trump(mode: GameMode, trump: Suit, card: Card) -> bool {
    match mode {
        GameMode::Weiter => false,
        GameMode::Wenz => matches!(card.rank(), Rank::Unter),
        GameMode::Sauspiel | GameMode::Solo => {
            card.suit() as u8 == trump as u8 || card.is_ober_or_unter()
        }
    }
}

/// Reference ordering used for trick resolution.
///
/// Any trump beats any non-trump. Non-trumps rank by their rank and fall
/// back to the suit only to keep the order total; inside a trick the
/// candidates always share the led suit, so that tie-break never decides a
/// trick. Wenz trumps rank by suit, other trumps by
/// `rank * 4 + suit + 8` for Ober and Unter and by rank for the rest.
pub fn compare(mode: GameMode, trump: Suit, a: Card, b: Card) -> Ordering {
    let a_trump = is_trump(mode, trump, a);
    let b_trump = is_trump(mode, trump, b);
    match (a_trump, b_trump) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a
            .rank()
            .cmp(&b.rank())
            .then_with(|| a.suit().cmp(&b.suit())),
        (true, true) if mode == GameMode::Wenz => a.suit().cmp(&b.suit()),
        (true, true) => trump_rank_score(a).cmp(&trump_rank_score(b)),
    }
}

fn trump_rank_score(card: Card) -> usize {
    if card.is_ober_or_unter() {
        card.rank().index() * 4 + card.suit().index() + 8
    } else {
        card.rank().index()
    }
}

/// One byte per card whose natural order equals [`compare`].
///
/// Non-trumps land in `0..32`, trumps in `32..64`.
pub const fn card_score(mode: GameMode, trump: Suit, card: Card) -> u8 {
    let rank = card.rank() as u8;
    let suit = card.suit() as u8;
    if !is_trump(mode, trump, card) {
        return rank * 4 + suit;
    }
    match mode {
        GameMode::Wenz => 32 + suit,
        _ if card.is_ober_or_unter() => 32 + rank * 4 + suit + 8,
        _ => 32 + rank,
    }
}

pub const fn compare_fast(mode: GameMode, trump: Suit, a: Card, b: Card) -> Ordering {
    let a = card_score(mode, trump, a);
    let b = card_score(mode, trump, b);
    if a < b {
        Ordering::Less
    } else if a > b {
        Ordering::Greater
    } else {
        Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::{GameMode, card_score, compare, compare_fast, is_trump, trump_order};
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;
    use core::cmp::Ordering;

    const MODES: [GameMode; 4] = [
        GameMode::Weiter,
        GameMode::Sauspiel,
        GameMode::Wenz,
        GameMode::Solo,
    ];

    #[test]
    fn fast_path_matches_reference_for_every_pair() {
        for mode in MODES {
            for trump in Suit::ALL {
                for a in Card::all() {
                    for b in Card::all() {
                        assert_eq!(
                            compare(mode, trump, a, b),
                            compare_fast(mode, trump, a, b),
                            "{mode:?} {trump:?} {a} {b}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn ordering_is_strict_and_total() {
        for mode in MODES {
            for trump in Suit::ALL {
                for a in Card::all() {
                    for b in Card::all() {
                        let ab = compare(mode, trump, a, b);
                        assert_eq!(ab, compare(mode, trump, b, a).reverse());
                        assert_eq!(ab == Ordering::Equal, a == b);
                    }
                }
                let mut scores: Vec<u8> = Card::all()
                    .map(|card| card_score(mode, trump, card))
                    .collect();
                scores.sort_unstable();
                scores.dedup();
                assert_eq!(scores.len(), 32, "scores must be unique");
            }
        }
    }

    #[test]
    fn schell_solo_trump_hierarchy() {
        let mut trumps: Vec<Card> = Card::all()
            .filter(|card| is_trump(GameMode::Solo, Suit::Schell, *card))
            .collect();
        trumps.sort_by(|a, b| compare(GameMode::Solo, Suit::Schell, *a, *b));

        let schell = |rank| Card::new(rank, Suit::Schell);
        let mut expected = vec![
            schell(Rank::Sieben),
            schell(Rank::Acht),
            schell(Rank::Neun),
            schell(Rank::Koenig),
            schell(Rank::Zehn),
            schell(Rank::Sau),
        ];
        for rank in [Rank::Unter, Rank::Ober] {
            expected.extend(Suit::ALL.iter().map(|suit| Card::new(rank, *suit)));
        }
        assert_eq!(trumps, expected);

        let mut descending = expected.clone();
        descending.reverse();
        assert_eq!(trump_order(GameMode::Solo, Suit::Schell), descending);
    }

    #[test]
    fn wenz_trumps_are_unter_only() {
        let trumps: Vec<Card> = Card::all()
            .filter(|card| is_trump(GameMode::Wenz, Suit::Herz, *card))
            .collect();
        assert_eq!(trumps.len(), 4);
        assert!(trumps.iter().all(|card| card.rank() == Rank::Unter));
        let eichel_unter = Card::new(Rank::Unter, Suit::Eichel);
        let schell_unter = Card::new(Rank::Unter, Suit::Schell);
        assert_eq!(
            compare(GameMode::Wenz, Suit::Herz, eichel_unter, schell_unter),
            Ordering::Greater
        );
        // an Ober is a plain card in a Wenz
        let ober = Card::new(Rank::Ober, Suit::Eichel);
        assert_eq!(
            compare(GameMode::Wenz, Suit::Herz, schell_unter, ober),
            Ordering::Greater
        );
        assert_eq!(trump_order(GameMode::Wenz, Suit::Herz)[0], eichel_unter);
    }

    #[test]
    fn any_trump_beats_any_plain_card() {
        let herz_seven = Card::new(Rank::Sieben, Suit::Herz);
        let eichel_sau = Card::new(Rank::Sau, Suit::Eichel);
        assert_eq!(
            compare(GameMode::Sauspiel, Suit::Herz, herz_seven, eichel_sau),
            Ordering::Greater
        );
        assert_eq!(trump_order(GameMode::Sauspiel, Suit::Herz).len(), 14);
    }
}
