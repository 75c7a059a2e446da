//! Shared flower vocabulary: species identifiers and the two size classes.
//!
//! Every other module keys its data on ([Species], [Size]) pairs, so the
//! types here are small, `Copy`, and totally ordered to allow their use as
//! map keys with a deterministic iteration order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A flower species, identified by a single lowercase letter as it appears
/// in the textual records (e.g. the `a` in `aL` or `10a`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Species(pub char);

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The size class of a flower or a bouquet design. A design only ever
/// consumes flowers of its own size class.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Size {
    Large,
    Small,
}

impl Size {
    /// The single-letter symbol used in the textual records.
    pub fn symbol(&self) -> char {
        match self {
            Size::Large => 'L',
            Size::Small => 'S',
        }
    }

    pub fn from_symbol(c: char) -> Option<Size> {
        match c {
            'L' => Some(Size::Large),
            'S' => Some(Size::Small),
            _ => None,
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_symbol_roundtrip() {
        assert_eq!(Size::from_symbol('L'), Some(Size::Large));
        assert_eq!(Size::from_symbol('S'), Some(Size::Small));
        assert_eq!(Size::from_symbol('x'), None);
        assert_eq!(Size::Large.symbol(), 'L');
        assert_eq!(Size::Small.symbol(), 'S');
    }

    #[test]
    fn test_species_order_is_alphabetic() {
        assert!(Species('a') < Species('b'));
        assert!(Species('b') < Species('z'));
    }
}
