//! Token colors and colored balances.
//!
//! A color is a 32-byte marker that gives tokens a meaning beyond the plain
//! base token. Colored balances keep their entries in ascending color order
//! so that every serialization of the same balances is byte-identical.

use crate::error::LedgerError;
use crate::output::{MAX_OUTPUT_BALANCE, MIN_OUTPUT_BALANCE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use weft_codec::{CodecError, Decode, Encode, Reader, Writer};

/// The length of a color in bytes.
pub const COLOR_LENGTH: usize = 32;

/// A marker associated to a token balance.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Color([u8; COLOR_LENGTH]);

impl Color {
    /// The zero color: plain, uncolored IOTA tokens.
    pub const IOTA: Self = Self([0u8; COLOR_LENGTH]);

    /// Placeholder color marking tokens to be colored when the transaction is
    /// booked; replaced by the hash of the minting output's id.
    pub const MINT: Self = Self([0xFF; COLOR_LENGTH]);

    pub fn new(bytes: [u8; COLOR_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COLOR_LENGTH] {
        &self.0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::IOTA => write!(f, "Color(IOTA)"),
            Self::MINT => write!(f, "Color(MINT)"),
            _ => {
                write!(f, "Color(")?;
                for b in &self.0[..4] {
                    write!(f, "{:02x}", b)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Encode for Color {
    fn encode(&self, w: &mut Writer) {
        w.write_bytes(&self.0);
    }
}

impl Decode for Color {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        Ok(Self(r.read_array()?))
    }
}

/// A collection of balances keyed by color, kept in ascending color order.
///
/// Zero balances are dropped on construction, so every stored amount is
/// non-zero and iteration order is deterministic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColoredBalances {
    balances: BTreeMap<Color, u64>,
}

impl ColoredBalances {
    pub fn new(balances: impl IntoIterator<Item = (Color, u64)>) -> Self {
        Self {
            balances: balances
                .into_iter()
                .filter(|(_, balance)| *balance != 0)
                .collect(),
        }
    }

    /// The balance of the given color, if present.
    pub fn get(&self, color: &Color) -> Option<u64> {
        self.balances.get(color).copied()
    }

    /// Iterate entries in ascending color order.
    pub fn iter(&self) -> impl Iterator<Item = (&Color, u64)> {
        self.balances.iter().map(|(color, balance)| (color, *balance))
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// A mutable working copy of the entries; modify it and construct a new
    /// `ColoredBalances` to keep the stored form immutable and ordered.
    pub fn to_map(&self) -> BTreeMap<Color, u64> {
        self.balances.clone()
    }

    /// The sum over all colors. Widened to avoid overflow when aggregating.
    pub fn total(&self) -> u128 {
        self.balances.values().map(|b| u128::from(*b)).sum()
    }

    /// Checks every entry against the per-output balance bounds.
    pub(crate) fn check_bounds(&self) -> Result<(), LedgerError> {
        for (_, balance) in self.iter() {
            if !(MIN_OUTPUT_BALANCE..=MAX_OUTPUT_BALANCE).contains(&balance) {
                return Err(LedgerError::BalanceOutOfRange(balance));
            }
        }
        Ok(())
    }
}

impl Encode for ColoredBalances {
    fn encode(&self, w: &mut Writer) {
        w.write_u16(self.balances.len() as u16);
        for (color, balance) in self.iter() {
            color.encode(w);
            w.write_u64(balance);
        }
    }
}

impl Decode for ColoredBalances {
    fn decode(r: &mut Reader<'_>) -> Result<Self, CodecError> {
        let count = r.read_u16()?;
        let mut balances = BTreeMap::new();
        for _ in 0..count {
            let color = Color::decode(r)?;
            let balance = r.read_u64()?;
            if balance != 0 {
                balances.insert(color, balance);
            }
        }
        Ok(Self { balances })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(byte: u8) -> Color {
        Color::new([byte; 32])
    }

    #[test]
    fn zero_balances_are_dropped() {
        let balances = ColoredBalances::new([(color(1), 100), (color(2), 0), (color(3), 50)]);
        assert_eq!(balances.len(), 2);
        assert_eq!(balances.get(&color(2)), None);
    }

    #[test]
    fn iteration_is_ascending() {
        let balances = ColoredBalances::new([(color(9), 1), (color(1), 2), (color(5), 3)]);
        let colors: Vec<u8> = balances.iter().map(|(c, _)| c.as_bytes()[0]).collect();
        assert_eq!(colors, vec![1, 5, 9]);
    }

    #[test]
    fn construction_order_does_not_matter() {
        let a = ColoredBalances::new([(color(1), 10), (color(2), 20)]);
        let b = ColoredBalances::new([(color(2), 20), (color(1), 10)]);
        assert_eq!(a, b);
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn bytes_layout() {
        let balances = ColoredBalances::new([(Color::IOTA, 1)]);
        let bytes = balances.to_bytes();
        assert_eq!(bytes.len(), 2 + 32 + 8);
        assert_eq!(&bytes[..2], &[1, 0]); // u16 count, little endian
        assert_eq!(&bytes[2..34], &[0u8; 32]); // IOTA color
        assert_eq!(&bytes[34..], &[1, 0, 0, 0, 0, 0, 0, 0]); // u64 amount, LE
    }

    #[test]
    fn roundtrip() {
        let balances = ColoredBalances::new([(color(7), 700), (Color::IOTA, 42)]);
        let decoded = ColoredBalances::from_bytes(&balances.to_bytes()).unwrap();
        assert_eq!(decoded, balances);
    }

    #[test]
    fn total_sums_all_colors() {
        let balances = ColoredBalances::new([(color(1), u64::MAX), (color(2), u64::MAX)]);
        assert_eq!(balances.total(), 2 * u128::from(u64::MAX));
    }

    #[test]
    fn to_map_is_a_copy() {
        let balances = ColoredBalances::new([(color(1), 10)]);
        let mut map = balances.to_map();
        map.insert(color(2), 20);
        assert_eq!(balances.len(), 1);
    }
}
