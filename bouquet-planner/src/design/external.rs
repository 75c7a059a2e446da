use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::flower::{Size, Species};

use super::{Design, DesignBuilder, DesignId};

/// ExternalDesign is the record format of a single design line, e.g.
/// `AL10a15b5c30`: design `A`, large, requiring 10 of `a`, 15 of `b` and
/// 5 of `c`, with a bouquet total of 30 flowers.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ExternalDesign {
    pub name: String,
    pub size: Size,
    pub total: u64,
    pub required: Vec<ExternalRequirement>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ExternalRequirement {
    pub species: Species,
    pub quantity: u64,
}

#[derive(Debug)]
pub enum DesignParseError {
    Io(std::io::Error),
    MalformedDesign { line_no: usize, line: String },
}

impl fmt::Display for DesignParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DesignParseError::Io(e) => write!(f, "failed to read design records: {}", e),
            DesignParseError::MalformedDesign { line_no, line } => write!(
                f,
                "malformed design record on line {}: {:?} (expected e.g. \"AL10a15b5c30\")",
                line_no, line
            ),
        }
    }
}

impl std::error::Error for DesignParseError {}

impl From<std::io::Error> for DesignParseError {
    fn from(e: std::io::Error) -> Self {
        DesignParseError::Io(e)
    }
}

/// Parses design records from a reader, one per line, until a blank line or
/// the end of input.
pub fn parse_designs(reader: &mut impl BufRead) -> Result<Vec<ExternalDesign>, DesignParseError> {
    let design_re =
        Regex::new(r"^([A-Z])([LS])((?:\d+[a-z])+)(\d+)$").expect("invalid design regex");
    let requirement_re = Regex::new(r"(\d+)([a-z])").expect("invalid requirement regex");

    let mut designs = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            break;
        }
        let malformed = || DesignParseError::MalformedDesign {
            line_no: line_no + 1,
            line: trimmed.to_string(),
        };

        let captures = design_re.captures(trimmed).ok_or_else(malformed)?;
        let name = captures[1].to_string();
        let size = Size::from_symbol(captures[2].chars().next().expect("size capture is empty"))
            .expect("size capture outside [LS]");
        let total: u64 = captures[4].parse().map_err(|_| malformed())?;

        let mut required = Vec::new();
        for requirement in requirement_re.captures_iter(&captures[3]) {
            let quantity: u64 = requirement[1].parse().map_err(|_| malformed())?;
            let species = Species(
                requirement[2]
                    .chars()
                    .next()
                    .expect("species capture is empty"),
            );
            required.push(ExternalRequirement { species, quantity });
        }

        designs.push(ExternalDesign {
            name,
            size,
            total,
            required,
        });
    }
    Ok(designs)
}

pub(super) fn parse_designs_file(filepath: PathBuf) -> Result<Vec<ExternalDesign>, DesignParseError> {
    let file = File::open(filepath)?;
    let mut reader = BufReader::new(file);
    parse_designs(&mut reader)
}

/// Converts the parsed records to internal designs, assigning ids in input
/// order. The `(name, size)` identity must be unique across the input.
pub fn convert_designs(designs: Vec<ExternalDesign>) -> Vec<Design> {
    let mut seen: HashSet<(String, Size)> = HashSet::new();

    designs
        .into_iter()
        .enumerate()
        .map(|(i, external)| {
            assert!(
                seen.insert((external.name.clone(), external.size)),
                "Design {}{} appears more than once in the input",
                external.name,
                external.size
            );
            let mut builder =
                DesignBuilder::new(DesignId(i), external.name, external.size, external.total);
            for requirement in external.required {
                builder = builder.require(requirement.species, requirement.quantity);
            }
            builder.build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_single_design() {
        let mut input = Cursor::new("AL10a15b5c30\n");
        let designs = parse_designs(&mut input).unwrap();
        assert_eq!(designs.len(), 1);
        let design = &designs[0];
        assert_eq!(design.name, "A");
        assert_eq!(design.size, Size::Large);
        assert_eq!(design.total, 30);
        assert_eq!(design.required.len(), 3);
        assert_eq!(design.required[1].species, Species('b'));
        assert_eq!(design.required[1].quantity, 15);
    }

    #[test]
    fn test_parse_designs_stops_at_blank_line() {
        let mut input = Cursor::new("AL10a15b5c30\n\nBS10b5c16\n");
        let designs = parse_designs(&mut input).unwrap();
        assert_eq!(designs.len(), 1);
    }

    #[test]
    fn test_parse_rejects_design_without_requirements() {
        let mut input = Cursor::new("AL30\n");
        let err = parse_designs(&mut input).unwrap_err();
        match err {
            DesignParseError::MalformedDesign { line_no, .. } => assert_eq!(line_no, 1),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_lowercase_name() {
        let mut input = Cursor::new("aL10a30\n");
        assert!(parse_designs(&mut input).is_err());
    }

    #[test]
    fn test_convert_assigns_ids_in_input_order() {
        let mut input = Cursor::new("AL10a15b5c30\nBS10b5c16\n");
        let designs = convert_designs(parse_designs(&mut input).unwrap());
        assert_eq!(designs.len(), 2);
        assert_eq!(designs[0].id, DesignId(0));
        assert_eq!(designs[0].name, "A");
        assert_eq!(designs[0].required_total(), 30);
        assert_eq!(designs[1].id, DesignId(1));
        assert_eq!(designs[1].size, Size::Small);
    }

    #[test]
    #[should_panic(expected = "appears more than once")]
    fn test_convert_rejects_duplicate_identity() {
        let mut input = Cursor::new("AL10a30\nAL5b10\n");
        let _ = convert_designs(parse_designs(&mut input).unwrap());
    }
}
