use crate::model::card::Card;
use crate::model::player::PlayerId;
use crate::model::rank::Rank;
use crate::model::suit::Suit;
use crate::rules::ordering;
use core::cmp::Ordering;
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SEARCHED_SHIFT: u16 = 0;
const TRUMP_SHIFT: u16 = 2;
const PARTNER_SHIFT: u16 = 4;
const CALLER_SHIFT: u16 = 6;
const MODE_SHIFT: u16 = 8;
const TOUT_FLAG: u16 = 1 << 10;
const CALL_MASK: u16 = (TOUT_FLAG << 1) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum GameMode {
    Weiter = 0,
    Sauspiel = 1,
    Wenz = 2,
    Solo = 3,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [
        GameMode::Weiter,
        GameMode::Sauspiel,
        GameMode::Wenz,
        GameMode::Solo,
    ];

    const fn from_bits(bits: u16) -> Self {
        Self::ALL[(bits & 0x3) as usize]
    }

    /// Solo and Wenz are played alone against the other three seats.
    pub const fn is_solo_game(self) -> bool {
        matches!(self, GameMode::Wenz | GameMode::Solo)
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameMode::Weiter => "Weiter",
            GameMode::Sauspiel => "Sauspiel",
            GameMode::Wenz => "Wenz",
            GameMode::Solo => "Solo",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CallError {
    #[error("{0} cannot search their own ace")]
    SamePlayer(PlayerId),
    #[error("the {0} ace cannot be searched")]
    UncallableSuit(Suit),
    #[error("call id {0:#06x} does not encode a valid game call")]
    InvalidId(u16),
}

/// A bid packed into the low eleven bits of a `u16`.
///
/// | bits | field                          |
/// |------|--------------------------------|
/// | 0-1  | searched suit (Sauspiel only)  |
/// | 2-3  | trump suit                     |
/// | 4-5  | partner (Sauspiel only)        |
/// | 6-7  | caller                         |
/// | 8-9  | mode                           |
/// | 10   | tout                           |
///
/// Fields a mode does not use are zero, so every call has exactly one id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub struct GameCall {
    id: u16,
}

impl GameCall {
    pub const fn weiter() -> Self {
        Self { id: 0 }
    }

    pub fn sauspiel(
        caller: PlayerId,
        partner: PlayerId,
        searched: Suit,
    ) -> Result<Self, CallError> {
        if caller == partner {
            return Err(CallError::SamePlayer(caller));
        }
        if !searched.is_callable() {
            return Err(CallError::UncallableSuit(searched));
        }
        Ok(Self::pack(
            GameMode::Sauspiel,
            caller,
            partner.id(),
            Suit::Herz,
            searched as u16,
            false,
        ))
    }

    pub const fn wenz(caller: PlayerId, tout: bool) -> Self {
        Self::pack(GameMode::Wenz, caller, 0, Suit::Schell, 0, tout)
    }

    pub const fn solo(caller: PlayerId, trump: Suit, tout: bool) -> Self {
        Self::pack(GameMode::Solo, caller, 0, trump, 0, tout)
    }

    /// Decodes a packed id, rejecting any bit pattern no constructor produces.
    pub fn from_id(id: u16) -> Result<Self, CallError> {
        let call = Self { id };
        let invalid = Err(CallError::InvalidId(id));
        if id & !CALL_MASK != 0 {
            return invalid;
        }
        let searched = (id >> SEARCHED_SHIFT) & 0x3;
        let trump = (id >> TRUMP_SHIFT) & 0x3;
        let partner = (id >> PARTNER_SHIFT) & 0x3;
        let caller = (id >> CALLER_SHIFT) & 0x3;
        let well_formed = match call.mode() {
            GameMode::Weiter => id == 0,
            GameMode::Sauspiel => {
                trump == Suit::Herz as u16
                    && Suit::from_bits(searched as u8).is_callable()
                    && partner != caller
                    && !call.is_tout()
            }
            GameMode::Wenz => searched == 0 && trump == 0 && partner == 0,
            GameMode::Solo => searched == 0 && partner == 0,
        };
        if well_formed { Ok(call) } else { invalid }
    }

    /// Unchecked decode for ids stored by this crate.
    pub(crate) const fn from_bits(id: u16) -> Self {
        Self { id: id & CALL_MASK }
    }

    const fn pack(
        mode: GameMode,
        caller: PlayerId,
        partner: u8,
        trump: Suit,
        searched: u16,
        tout: bool,
    ) -> Self {
        let mut id = ((mode as u16) << MODE_SHIFT)
            | ((caller.id() as u16) << CALLER_SHIFT)
            | ((partner as u16) << PARTNER_SHIFT)
            | ((trump as u16) << TRUMP_SHIFT)
            | (searched << SEARCHED_SHIFT);
        if tout {
            id |= TOUT_FLAG;
        }
        Self { id }
    }

    /// The packed value, stable for feature export.
    pub const fn id(self) -> u16 {
        self.id
    }

    pub const fn mode(self) -> GameMode {
        GameMode::from_bits(self.id >> MODE_SHIFT)
    }

    pub const fn is_tout(self) -> bool {
        self.id & TOUT_FLAG != 0
    }

    pub const fn is_weiter(self) -> bool {
        matches!(self.mode(), GameMode::Weiter)
    }

    pub const fn caller(self) -> PlayerId {
        PlayerId::from_bits((self.id >> CALLER_SHIFT) as u8)
    }

    pub const fn partner(self) -> Option<PlayerId> {
        match self.mode() {
            GameMode::Sauspiel => Some(PlayerId::from_bits((self.id >> PARTNER_SHIFT) as u8)),
            _ => None,
        }
    }

    /// Herz for every Sauspiel, `None` for Wenz and Weiter.
    pub const fn trump(self) -> Option<Suit> {
        match self.mode() {
            GameMode::Sauspiel | GameMode::Solo => Some(self.trump_bits()),
            _ => None,
        }
    }

    const fn trump_bits(self) -> Suit {
        Suit::from_bits((self.id >> TRUMP_SHIFT) as u8)
    }

    pub const fn searched_suit(self) -> Option<Suit> {
        match self.mode() {
            GameMode::Sauspiel => Some(Suit::from_bits((self.id >> SEARCHED_SHIFT) as u8)),
            _ => None,
        }
    }

    /// The gsuchte Sau of a Sauspiel.
    pub const fn searched_ace(self) -> Option<Card> {
        match self.searched_suit() {
            Some(suit) => Some(Card::new(Rank::Sau, suit)),
            None => None,
        }
    }

    pub const fn is_trump(self, card: Card) -> bool {
        ordering::is_trump(self.mode(), self.trump_bits(), card)
    }

    /// Trick-resolution order of two cards under this call.
    pub fn compare_cards(self, a: Card, b: Card) -> Ordering {
        ordering::compare_fast(self.mode(), self.trump_bits(), a, b)
    }

    /// Trumps of this call, highest first.
    pub fn trump_order(self) -> Vec<Card> {
        ordering::trump_order(self.mode(), self.trump_bits())
    }

    /// Bid ranking: Weiter < Sauspiel < Wenz < Wenz tout < Solo < Solo tout.
    pub fn cmp_bid(self, other: GameCall) -> Ordering {
        (self.mode(), self.is_tout()).cmp(&(other.mode(), other.is_tout()))
    }

    pub fn outranks(self, other: GameCall) -> bool {
        self.cmp_bid(other) == Ordering::Greater
    }

    pub fn is_caller_side(self, player: PlayerId) -> bool {
        player == self.caller() || self.partner() == Some(player)
    }

    pub fn caller_ids(self) -> Vec<PlayerId> {
        PlayerId::LOOP
            .into_iter()
            .filter(|player| self.is_caller_side(*player))
            .collect()
    }

    pub fn opponent_ids(self) -> Vec<PlayerId> {
        PlayerId::LOOP
            .into_iter()
            .filter(|player| !self.is_caller_side(*player))
            .collect()
    }
}

impl Default for GameCall {
    fn default() -> Self {
        Self::weiter()
    }
}

impl From<GameCall> for u16 {
    fn from(call: GameCall) -> Self {
        call.id
    }
}

impl TryFrom<u16> for GameCall {
    type Error = CallError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        GameCall::from_id(id)
    }
}

impl fmt::Debug for GameCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GameCall({self})")
    }
}

impl fmt::Display for GameCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tout = if self.is_tout() { " tout" } else { "" };
        match self.mode() {
            GameMode::Weiter => f.write_str("Weiter"),
            GameMode::Sauspiel => {
                let suit = self.searched_suit().unwrap_or(Suit::Schell);
                let partner = self.partner().unwrap_or(self.caller());
                write!(f, "Sauspiel {}A {}+{}", suit, self.caller(), partner)
            }
            GameMode::Wenz => write!(f, "Wenz{tout} {}", self.caller()),
            GameMode::Solo => write!(f, "{} Solo{tout} {}", self.trump_bits(), self.caller()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CallError, GameCall, GameMode};
    use crate::model::card::Card;
    use crate::model::player::PlayerId;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn p(id: u8) -> PlayerId {
        PlayerId::new(id).unwrap()
    }

    #[test]
    fn sauspiel_fields_survive_packing() {
        let call = GameCall::sauspiel(p(2), p(0), Suit::Gras).unwrap();
        assert_eq!(call.mode(), GameMode::Sauspiel);
        assert_eq!(call.caller(), p(2));
        assert_eq!(call.partner(), Some(p(0)));
        assert_eq!(call.trump(), Some(Suit::Herz));
        assert_eq!(call.searched_ace(), Some(Card::new(Rank::Sau, Suit::Gras)));
        assert!(!call.is_tout());
        assert_eq!(GameCall::from_id(call.id()), Ok(call));
    }

    #[test]
    fn sauspiel_rejects_invalid_partnerships() {
        assert_eq!(
            GameCall::sauspiel(p(1), p(1), Suit::Eichel),
            Err(CallError::SamePlayer(p(1)))
        );
        assert_eq!(
            GameCall::sauspiel(p(1), p(2), Suit::Herz),
            Err(CallError::UncallableSuit(Suit::Herz))
        );
    }

    #[test]
    fn solo_and_wenz_have_no_partner() {
        let solo = GameCall::solo(p(3), Suit::Eichel, true);
        assert_eq!(solo.partner(), None);
        assert_eq!(solo.trump(), Some(Suit::Eichel));
        assert!(solo.is_tout());
        assert_eq!(solo.opponent_ids(), vec![p(0), p(1), p(2)]);

        let wenz = GameCall::wenz(p(0), false);
        assert_eq!(wenz.trump(), None);
        assert!(wenz.is_trump(Card::new(Rank::Unter, Suit::Herz)));
        assert!(!wenz.is_trump(Card::new(Rank::Ober, Suit::Herz)));
        assert_eq!(GameCall::from_id(wenz.id()), Ok(wenz));
    }

    #[test]
    fn from_id_rejects_unused_fields() {
        assert_eq!(GameCall::from_id(1), Err(CallError::InvalidId(1)));
        let wenz_with_trump = GameCall::wenz(p(0), false).id() | (1 << 2);
        assert!(GameCall::from_id(wenz_with_trump).is_err());
        assert!(GameCall::from_id(0x0800).is_err());
        // Sauspiel searching Herz
        let herz = GameCall::sauspiel(p(0), p(1), Suit::Schell).unwrap().id() | 0x1;
        assert!(GameCall::from_id(herz).is_err());
    }

    #[test]
    fn bid_ranking_orders_mode_then_tout() {
        let ladder = [
            GameCall::weiter(),
            GameCall::sauspiel(p(0), p(1), Suit::Schell).unwrap(),
            GameCall::wenz(p(0), false),
            GameCall::wenz(p(0), true),
            GameCall::solo(p(0), Suit::Schell, false),
            GameCall::solo(p(0), Suit::Schell, true),
        ];
        for pair in ladder.windows(2) {
            assert!(pair[1].outranks(pair[0]), "{} > {}", pair[1], pair[0]);
            assert!(!pair[0].outranks(pair[1]));
        }
        let herz_solo = GameCall::solo(p(1), Suit::Herz, false);
        assert!(!herz_solo.outranks(ladder[4]));
    }

    #[test]
    fn serde_round_trips_through_the_id() {
        let call = GameCall::solo(p(1), Suit::Gras, false);
        let json = serde_json::to_string(&call).unwrap();
        assert_eq!(json, call.id().to_string());
        assert_eq!(serde_json::from_str::<GameCall>(&json).unwrap(), call);
        assert!(serde_json::from_str::<GameCall>("3").is_err());
    }

    #[test]
    fn display_names_the_bid() {
        let call = GameCall::sauspiel(p(0), p(2), Suit::Eichel).unwrap();
        assert_eq!(call.to_string(), "Sauspiel EA P0+P2");
        assert_eq!(GameCall::wenz(p(1), true).to_string(), "Wenz tout P1");
        assert_eq!(GameCall::solo(p(3), Suit::Herz, false).to_string(), "H Solo P3");
    }
}
