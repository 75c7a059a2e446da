//! Contains the built-in sample data set and some fixture builders which
//! are shared by the unit tests of different modules and by the benchmark.

use std::io::Cursor;

use crate::design::{external, Design};
use crate::flower::{Size, Species};
use crate::stock::Stock;

/// The bouquet designs of the built-in sample data set.
pub static SAMPLE_DESIGNS: [&str; 6] = [
    "AL10a15b5c30",
    "AS10a10b25",
    "BL15b1c21",
    "BS10b5c16",
    "CL20a15c45",
    "DL20b28",
];

pub fn sample_designs() -> Vec<Design> {
    build_designs(&SAMPLE_DESIGNS)
}

/// Ten flowers of each of the species a, b and c, in both size classes.
pub fn sample_stock() -> Stock {
    let mut stock = Stock::new();
    for species in ['a', 'b', 'c'] {
        for size in [Size::Large, Size::Small] {
            stock.add(Species(species), size, 10);
        }
    }
    stock
}

/// Parses and converts the given design lines. Panics on malformed lines,
/// which is fine for fixtures.
pub fn build_designs(lines: &[&str]) -> Vec<Design> {
    let mut input = Cursor::new(lines.join("\n"));
    let parsed = external::parse_designs(&mut input).expect("parsing design fixture failed");
    external::convert_designs(parsed)
}

pub fn build_stock(entries: &[(char, Size, u64)]) -> Stock {
    let mut stock = Stock::new();
    for &(species, size, quantity) in entries {
        stock.add(Species(species), size, quantity);
    }
    stock
}
