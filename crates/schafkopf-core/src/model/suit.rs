use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Suit {
    Schell = 0,
    Herz = 1,
    Gras = 2,
    Eichel = 3,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Schell, Suit::Herz, Suit::Gras, Suit::Eichel];

    /// Suits whose ace may be searched in a Sauspiel. Herz is always trump there.
    pub const CALLABLE: [Suit; 3] = [Suit::Schell, Suit::Gras, Suit::Eichel];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Suit::Schell),
            1 => Some(Suit::Herz),
            2 => Some(Suit::Gras),
            3 => Some(Suit::Eichel),
            _ => None,
        }
    }

    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self::ALL[(bits & 0x3) as usize]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_callable(self) -> bool {
        !matches!(self, Suit::Herz)
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Suit::Schell => "S",
            Suit::Herz => "H",
            Suit::Gras => "G",
            Suit::Eichel => "E",
        };
        f.write_str(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::Suit;

    #[test]
    fn display_returns_ascii_symbols() {
        assert_eq!(Suit::Schell.to_string(), "S");
        assert_eq!(Suit::Eichel.to_string(), "E");
    }

    #[test]
    fn from_index_maps_valid_values() {
        assert_eq!(Suit::from_index(2), Some(Suit::Gras));
        assert_eq!(Suit::from_index(4), None);
    }

    #[test]
    fn herz_is_never_callable() {
        assert!(!Suit::Herz.is_callable());
        assert!(Suit::CALLABLE.iter().all(|suit| suit.is_callable()));
    }
}
