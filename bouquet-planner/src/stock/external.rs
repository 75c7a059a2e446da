use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::flower::{Size, Species};

use super::Stock;

/// ExternalFlower is the record format of a single flower line, e.g. `aL`:
/// one flower of species `a` in the large size class. Repeated lines for
/// the same (species, size) pair accumulate into the stock count.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExternalFlower {
    pub species: Species,
    pub size: Size,
}

#[derive(Debug)]
pub enum FlowerParseError {
    Io(std::io::Error),
    MalformedFlower { line_no: usize, line: String },
}

impl fmt::Display for FlowerParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FlowerParseError::Io(e) => write!(f, "failed to read flower records: {}", e),
            FlowerParseError::MalformedFlower { line_no, line } => write!(
                f,
                "malformed flower record on line {}: {:?} (expected e.g. \"aL\")",
                line_no, line
            ),
        }
    }
}

impl std::error::Error for FlowerParseError {}

impl From<std::io::Error> for FlowerParseError {
    fn from(e: std::io::Error) -> Self {
        FlowerParseError::Io(e)
    }
}

/// Parses flower records from a reader, one per line, until a blank line or
/// the end of input.
pub fn parse_flowers(reader: &mut impl BufRead) -> Result<Vec<ExternalFlower>, FlowerParseError> {
    let flower_re = Regex::new(r"^([a-z])([LS])$").expect("invalid flower regex");

    let mut flowers = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        let captures =
            flower_re
                .captures(trimmed)
                .ok_or_else(|| FlowerParseError::MalformedFlower {
                    line_no: line_no + 1,
                    line: trimmed.to_string(),
                })?;
        let species = Species(captures[1].chars().next().expect("species capture is empty"));
        let size = Size::from_symbol(captures[2].chars().next().expect("size capture is empty"))
            .expect("size capture outside [LS]");
        flowers.push(ExternalFlower { species, size });
    }
    Ok(flowers)
}

pub(super) fn parse_flowers_file(filepath: PathBuf) -> Result<Vec<ExternalFlower>, FlowerParseError> {
    let file = File::open(filepath)?;
    let mut reader = BufReader::new(file);
    parse_flowers(&mut reader)
}

/// Aggregates the parsed flower records into inventory counts.
pub fn convert_flowers(flowers: Vec<ExternalFlower>) -> Stock {
    let mut stock = Stock::new();
    for flower in flowers {
        stock.add(flower.species, flower.size, 1);
    }
    stock
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_flowers() {
        let mut input = Cursor::new("aL\nbS\naL\n");
        let flowers = parse_flowers(&mut input).unwrap();
        assert_eq!(flowers.len(), 3);
        assert_eq!(
            flowers[0],
            ExternalFlower {
                species: Species('a'),
                size: Size::Large
            }
        );
        assert_eq!(
            flowers[1],
            ExternalFlower {
                species: Species('b'),
                size: Size::Small
            }
        );
    }

    #[test]
    fn test_parse_flowers_stops_at_blank_line() {
        let mut input = Cursor::new("aL\n\nbS\n");
        let flowers = parse_flowers(&mut input).unwrap();
        assert_eq!(flowers.len(), 1);
    }

    #[test]
    fn test_parse_flowers_rejects_malformed_line() {
        let mut input = Cursor::new("aL\nAX\n");
        let err = parse_flowers(&mut input).unwrap_err();
        match err {
            FlowerParseError::MalformedFlower { line_no, line } => {
                assert_eq!(line_no, 2);
                assert_eq!(line, "AX");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_convert_flowers_accumulates_counts() {
        let mut input = Cursor::new("aL\naL\naS\n");
        let stock = convert_flowers(parse_flowers(&mut input).unwrap());
        assert_eq!(stock.available(Species('a'), Size::Large), 2);
        assert_eq!(stock.available(Species('a'), Size::Small), 1);
        assert_eq!(stock.total(), 3);
    }
}
