//! Binary occupancy patterns over the protein slots.
//!
//! A pattern is the integer value of a k-character binary string whose
//! character `i` is the bound flag of protein slot `i`, so slot 0 is the
//! most significant bit. Configuration tables use the string form
//! (`"0100000"` = TFIIH bound = 32).

use std::fmt;

use anyhow::{bail, Result};

use super::{NUM_PROTEINS, NUM_STATES};

/// Occupancy pattern (index into an intermediate's state lattice)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OccupancyPattern(u8);

impl OccupancyPattern {
    /// Pattern with no protein bound
    pub const EMPTY: OccupancyPattern = OccupancyPattern(0);

    /// Pattern with exactly the given slots bound
    pub fn from_slots(slots: &[usize]) -> Self {
        let mut bits = 0u8;
        for &slot in slots {
            bits |= Self::slot_bit(slot);
        }
        Self(bits)
    }

    /// Parse the string form, e.g. `"1111010"`
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != NUM_PROTEINS {
            bail!(
                "occupancy pattern {:?} has {} characters, expected {}",
                s,
                s.len(),
                NUM_PROTEINS
            );
        }
        let mut bits = 0u8;
        for (slot, c) in s.chars().enumerate() {
            match c {
                '0' => {}
                '1' => bits |= Self::slot_bit(slot),
                _ => bail!("occupancy pattern {:?} contains {:?}", s, c),
            }
        }
        Ok(Self(bits))
    }

    /// Integer bit for a protein slot
    #[inline]
    fn slot_bit(slot: usize) -> u8 {
        assert!(slot < NUM_PROTEINS, "protein slot {} out of range", slot);
        1 << (NUM_PROTEINS - 1 - slot)
    }

    /// Index into a dense state vector
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Bound flag of a slot as 0 or 1
    #[inline]
    pub fn bit(&self, slot: usize) -> usize {
        usize::from(self.0 & Self::slot_bit(slot) != 0)
    }

    /// Whether a slot is bound
    #[inline]
    pub fn is_bound(&self, slot: usize) -> bool {
        self.bit(slot) == 1
    }

    /// All patterns in enumeration order
    pub fn all() -> impl Iterator<Item = OccupancyPattern> {
        (0..NUM_STATES).map(|i| OccupancyPattern(i as u8))
    }
}

impl fmt::Display for OccupancyPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in 0..NUM_PROTEINS {
            write!(f, "{}", self.bit(slot))?;
        }
        Ok(())
    }
}

/// Protein slots physically relevant to an intermediate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipationMask([bool; NUM_PROTEINS]);

impl ParticipationMask {
    /// Mask admitting every slot
    pub const FULL: ParticipationMask = ParticipationMask([true; NUM_PROTEINS]);

    pub fn new(slots: [bool; NUM_PROTEINS]) -> Self {
        Self(slots)
    }

    /// Build from a configuration list, which must have one entry per slot
    pub fn from_slice(slots: &[bool]) -> Result<Self> {
        let Ok(array) = <[bool; NUM_PROTEINS]>::try_from(slots) else {
            bail!(
                "participation mask has {} entries, expected {}",
                slots.len(),
                NUM_PROTEINS
            );
        };
        Ok(Self(array))
    }

    #[inline]
    pub fn contains(&self, slot: usize) -> bool {
        self.0[slot]
    }

    /// A pattern is valid iff it binds no slot outside the mask
    pub fn admits(&self, pattern: OccupancyPattern) -> bool {
        (0..NUM_PROTEINS).all(|slot| self.0[slot] || !pattern.is_bound(slot))
    }

    /// Number of participating slots
    pub fn popcount(&self) -> usize {
        self.0.iter().filter(|&&m| m).count()
    }

    /// Number of valid patterns (2^popcount)
    pub fn valid_state_count(&self) -> usize {
        1 << self.popcount()
    }

    /// Valid patterns in enumeration order
    pub fn valid_patterns(&self) -> impl Iterator<Item = OccupancyPattern> + '_ {
        OccupancyPattern::all().filter(move |p| self.admits(*p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_order() {
        let p = OccupancyPattern::parse("0100000").unwrap();
        assert_eq!(p.index(), 32);
        assert!(p.is_bound(1));
        assert!(!p.is_bound(0));

        let p = OccupancyPattern::parse("0000011").unwrap();
        assert_eq!(p.index(), 3);
        assert!(p.is_bound(5) && p.is_bound(6));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(OccupancyPattern::parse("010000").is_err());
        assert!(OccupancyPattern::parse("01000002").is_err());
        assert!(OccupancyPattern::parse("01x0000").is_err());
    }

    #[test]
    fn test_display_matches_parse() {
        let p = OccupancyPattern::parse("1111010").unwrap();
        assert_eq!(p.to_string(), "1111010");
        assert_eq!(OccupancyPattern::from_slots(&[0, 1, 2, 3, 5]), p);
    }

    #[test]
    fn test_mask_validity() {
        // damaged: XPC and TFIIH only
        let mask = ParticipationMask::new([true, true, false, false, false, false, false]);
        assert_eq!(mask.valid_state_count(), 4);

        let valid: Vec<usize> = mask.valid_patterns().map(|p| p.index()).collect();
        assert_eq!(valid, vec![0, 32, 64, 96]);

        assert!(!mask.admits(OccupancyPattern::from_slots(&[2])));
    }

    #[test]
    fn test_mask_length_checked() {
        assert!(ParticipationMask::from_slice(&[true; 6]).is_err());
        assert!(ParticipationMask::from_slice(&[true; 7]).is_ok());
    }
}
