use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[repr(u8)]
pub enum Rank {
    Sieben = 0,
    Acht = 1,
    Neun = 2,
    Unter = 3,
    Ober = 4,
    Koenig = 5,
    Zehn = 6,
    Sau = 7,
}

impl Rank {
    pub const ORDERED: [Rank; 8] = [
        Rank::Sieben,
        Rank::Acht,
        Rank::Neun,
        Rank::Unter,
        Rank::Ober,
        Rank::Koenig,
        Rank::Zehn,
        Rank::Sau,
    ];

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ORDERED.len() {
            Some(Self::ORDERED[index])
        } else {
            None
        }
    }

    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self::ORDERED[(bits & 0x7) as usize]
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Augen the rank is worth when a trick is counted.
    pub const fn points(self) -> u8 {
        match self {
            Rank::Sieben | Rank::Acht | Rank::Neun => 0,
            Rank::Unter => 2,
            Rank::Ober => 3,
            Rank::Koenig => 4,
            Rank::Zehn => 10,
            Rank::Sau => 11,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Rank::Sieben => "7",
            Rank::Acht => "8",
            Rank::Neun => "9",
            Rank::Unter => "U",
            Rank::Ober => "O",
            Rank::Koenig => "K",
            Rank::Zehn => "10",
            Rank::Sau => "A",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::Rank;

    #[test]
    fn from_index_maps() {
        assert_eq!(Rank::from_index(3), Some(Rank::Unter));
        assert_eq!(Rank::from_index(8), None);
    }

    #[test]
    fn display_matches_symbols() {
        assert_eq!(Rank::Ober.to_string(), "O");
        assert_eq!(Rank::Zehn.to_string(), "10");
    }

    #[test]
    fn all_ranks_sum_to_thirty_augen() {
        let total: u8 = Rank::ORDERED.iter().map(|rank| rank.points()).sum();
        assert_eq!(total, 30);
    }
}
