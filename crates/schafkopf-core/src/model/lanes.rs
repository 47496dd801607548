//! Byte-lane queries over a packed `u64` of cards.
//!
//! Each lane holds one card byte. A query masks every lane, compares it with
//! a broadcast pattern and reports matches as the high bit of the lane, which
//! keeps membership and counting branch free. The scalar loops in
//! [`Hand`](crate::model::hand::Hand) are the reference these must agree with.

const LOW_BITS: u64 = 0x0101_0101_0101_0101;
const HIGH_BITS: u64 = 0x8080_8080_8080_8080;
const SEVEN_BITS: u64 = 0x7F7F_7F7F_7F7F_7F7F;

pub(crate) const fn broadcast(byte: u8) -> u64 {
    LOW_BITS * byte as u64
}

/// High bit set in every lane where `lane & mask == query`.
///
/// `query` must be a subset of `mask`, otherwise nothing matches.
pub(crate) const fn matching_lanes(word: u64, query: u8, mask: u8) -> u64 {
    let diff = (word & broadcast(mask)) ^ broadcast(query);
    // a lane's high bit ends up set iff the lane is non-zero; no carries cross lanes
    let nonzero = ((diff & SEVEN_BITS) + SEVEN_BITS) | diff;
    !nonzero & HIGH_BITS
}

pub(crate) const fn first_lane(matches: u64) -> Option<usize> {
    if matches == 0 {
        None
    } else {
        Some((matches.trailing_zeros() / 8) as usize)
    }
}

pub(crate) const fn lane_count(matches: u64) -> usize {
    matches.count_ones() as usize
}

pub(crate) const fn lane(word: u64, index: usize) -> u8 {
    (word >> (index * 8)) as u8
}

pub(crate) const fn set_lane(word: u64, index: usize, byte: u8) -> u64 {
    let shift = index * 8;
    (word & !(0xFFu64 << shift)) | ((byte as u64) << shift)
}

#[cfg(test)]
mod tests {
    use super::{broadcast, first_lane, lane, lane_count, matching_lanes, set_lane};

    #[test]
    fn matches_only_equal_lanes() {
        let word = u64::from_le_bytes([0x21, 0x00, 0x21, 0x7F, 0x20, 0xA1, 0x01, 0x21]);
        let hits = matching_lanes(word, 0x21, 0x7F);
        // lane 5 differs only above the mask and still matches
        assert_eq!(lane_count(hits), 4);
        assert_eq!(first_lane(hits), Some(0));
    }

    #[test]
    fn zero_query_matches_zero_lanes_without_false_positives() {
        let word = u64::from_le_bytes([0x00, 0x80, 0x01, 0x00, 0x7F, 0x40, 0x00, 0x10]);
        let hits = matching_lanes(word, 0x00, 0x7F);
        assert_eq!(lane_count(hits), 4);
    }

    #[test]
    fn no_match_reports_none() {
        assert_eq!(first_lane(matching_lanes(broadcast(0x12), 0x13, 0x1F)), None);
    }

    #[test]
    fn set_lane_replaces_a_single_byte() {
        let word = set_lane(broadcast(0x11), 3, 0x42);
        assert_eq!(lane(word, 3), 0x42);
        assert_eq!(lane(word, 2), 0x11);
        assert_eq!(lane(word, 4), 0x11);
    }
}
