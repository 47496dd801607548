use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seat at the table, always in `0..4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub struct PlayerId(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid player id {0}, needs to be within [0, 3]")]
pub struct InvalidPlayerId(pub u8);

impl PlayerId {
    pub const LOOP: [PlayerId; 4] = [PlayerId(0), PlayerId(1), PlayerId(2), PlayerId(3)];

    pub const fn new(id: u8) -> Option<Self> {
        if id < 4 { Some(Self(id)) } else { None }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < 4 {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Masks to two bits; only for ids read back from packed fields.
    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x3)
    }

    pub const fn id(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn next(self) -> PlayerId {
        self.offset(1)
    }

    pub const fn offset(self, steps: u8) -> PlayerId {
        Self((self.0 + steps % 4) % 4)
    }

    /// All seats in drawing order starting at `self`.
    pub fn in_drawing_order(self) -> [PlayerId; 4] {
        [self, self.offset(1), self.offset(2), self.offset(3)]
    }
}

impl From<PlayerId> for u8 {
    fn from(player: PlayerId) -> Self {
        player.0
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = InvalidPlayerId;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        PlayerId::new(id).ok_or(InvalidPlayerId(id))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
