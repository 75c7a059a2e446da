//! Contains structs and methods to define and handle bouquet designs.
//!
//! Parsing and conversion of the textual design records lives in
//! [external]; the [Design] entity itself tracks, per flower entry, how
//! much the template demands and how much has actually been reserved from
//! the stock so far.

pub mod external;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::flower::{Size, Species};
use crate::stock::Stock;

pub use external::DesignParseError;

/// A unique identifier for a design, assigned in input order. Used as the
/// key in allocation outcomes and logs, and as the tie breaker of the
/// priority sort (stable sort keeps lower ids first).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Deserialize, PartialOrd, Ord, Serialize)]
pub struct DesignId(pub usize);

impl fmt::Display for DesignId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Distinguishes the role of an entry within a design. The two roles share
/// all behavior, so they are a tag rather than separate types.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Demanded by the template with a fixed quantity that must be fully
    /// reserved before any filler is added.
    Required,
    /// Added during allocation to top the bouquet up to its total.
    Filler,
}

/// One flower position within a design: the species, what the template
/// demands of it (`design_quantity`, 0 for filler), and how much has been
/// committed from stock so far (`reserved`).
///
/// Invariant: for a required entry, `reserved <= design_quantity` at all
/// times. Filler for a species that also has a required entry is kept in a
/// separate filler entry.
#[derive(Clone, Debug, Serialize)]
pub struct ItemEntry {
    pub species: Species,
    pub kind: EntryKind,
    pub design_quantity: u64,
    pub reserved: u64,
}

impl ItemEntry {
    /// How many flowers are still missing to meet the design quantity.
    pub fn outstanding(&self) -> u64 {
        self.design_quantity.saturating_sub(self.reserved)
    }
}

/// A bouquet design: a named, sized demand template with required flower
/// entries, plus the filler entries accumulated during allocation.
#[derive(Clone, Debug)]
pub struct Design {
    pub id: DesignId,
    /// Single uppercase token naming the design; `(name, size)` is unique
    /// across one run's input.
    pub name: String,
    pub size: Size,
    /// The total number of flowers in the finished bouquet, required plus
    /// filler.
    pub total: u64,
    entries: Vec<ItemEntry>,
    active: bool,
}

impl Design {
    pub fn entries(&self) -> &[ItemEntry] {
        &self.entries
    }

    /// Whether the design is still eligible for allocation attempts.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Permanently excludes the design from further allocation attempts.
    /// The reverse transition does not exist.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Sum of the quantities demanded by the template.
    pub fn required_total(&self) -> u64 {
        self.entries.iter().map(|e| e.design_quantity).sum()
    }

    /// Sum of everything reserved from stock so far, required and filler.
    pub fn reserved_total(&self) -> u64 {
        self.entries.iter().map(|e| e.reserved).sum()
    }

    /// Whether every required entry is fully reserved.
    pub fn required_complete(&self) -> bool {
        self.entries.iter().all(|e| e.reserved >= e.design_quantity)
    }

    /// A design is completed once all required entries are fully reserved
    /// and the reserved flowers add up to exactly the design total.
    pub fn completed(&self) -> bool {
        self.required_complete() && self.reserved_total() == self.total
    }

    /// How many filler flowers are still needed to reach the total.
    pub fn remaining_capacity(&self) -> u64 {
        self.total.saturating_sub(self.reserved_total())
    }

    /// The outstanding (species, quantity) demands of the required entries,
    /// in entry order. Empty iff the design is required-complete.
    pub fn required_outstanding(&self) -> Vec<(Species, u64)> {
        self.entries
            .iter()
            .filter(|e| e.outstanding() > 0)
            .map(|e| (e.species, e.outstanding()))
            .collect()
    }

    /// Marks every required entry as fully reserved. Must only be called
    /// after the matching stock decrements succeeded.
    pub fn commit_required(&mut self) {
        for entry in self.entries.iter_mut() {
            if entry.kind == EntryKind::Required {
                entry.reserved = entry.design_quantity;
            }
        }
    }

    /// Every species currently appearing in the design's entries, in entry
    /// order, without duplicates.
    pub fn species(&self) -> Vec<Species> {
        self.entries.iter().map(|e| e.species).unique().collect()
    }

    /// Books `quantity` filler flowers of `species` into the design,
    /// extending an existing filler entry or appending a new one. The
    /// matching stock decrement is the caller's responsibility.
    pub fn add_filler(&mut self, species: Species, quantity: u64) {
        if quantity == 0 {
            return;
        }
        let existing = self
            .entries
            .iter_mut()
            .find(|e| e.kind == EntryKind::Filler && e.species == species);
        match existing {
            Some(entry) => entry.reserved += quantity,
            None => self.entries.push(ItemEntry {
                species,
                kind: EntryKind::Filler,
                design_quantity: 0,
                reserved: quantity,
            }),
        }
    }

    /// Returns every reserved flower back to the stock, zeroing the
    /// required entries and dropping the filler entries. Releasing a design
    /// that holds nothing is a no-op, so a second release never
    /// double-credits the inventory. Returns the number of released
    /// flowers.
    pub fn release_into(&mut self, stock: &mut Stock) -> u64 {
        let mut released = 0;
        for entry in self.entries.iter_mut() {
            if entry.reserved > 0 {
                stock.release(entry.species, self.size, entry.reserved);
                released += entry.reserved;
                entry.reserved = 0;
            }
        }
        self.entries.retain(|e| e.kind == EntryKind::Required);
        released
    }

    /// The reserved flowers aggregated per species (required plus filler),
    /// in ascending species order. Only species with a nonzero reservation
    /// appear.
    pub fn reserved_by_species(&self) -> BTreeMap<Species, u64> {
        let mut result = BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.reserved > 0) {
            *result.entry(entry.species).or_insert(0) += entry.reserved;
        }
        result
    }
}

/// Formats the design as a finished bouquet in the input notation: name,
/// size symbol, then the reserved quantity of each species in species
/// order, e.g. `AS10a10b5c`.
impl fmt::Display for Design {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.name, self.size)?;
        for (species, quantity) in self.reserved_by_species() {
            write!(f, "{}{}", quantity, species)?;
        }
        Ok(())
    }
}

/// Preferred way to initialise designs manually. Initialize with
/// [DesignBuilder::new], append required entries with
/// [DesignBuilder::require], and extract the design with
/// [DesignBuilder::build].
pub struct DesignBuilder {
    design: Design,
}

impl DesignBuilder {
    pub fn new(id: DesignId, name: impl Into<String>, size: Size, total: u64) -> Self {
        DesignBuilder {
            design: Design {
                id,
                name: name.into(),
                size,
                total,
                entries: Vec::new(),
                active: true,
            },
        }
    }

    /// Adds a required entry for `species`. Each species may appear at most
    /// once among the required entries, and required quantities are
    /// strictly positive.
    pub fn require(mut self, species: Species, design_quantity: u64) -> Self {
        assert!(
            design_quantity > 0,
            "Required entry for species {} must have a positive quantity",
            species
        );
        assert!(
            !self
                .design
                .entries
                .iter()
                .any(|e| e.species == species && e.kind == EntryKind::Required),
            "Species {} appears twice among the required entries of design {}",
            species,
            self.design.name
        );
        self.design.entries.push(ItemEntry {
            species,
            kind: EntryKind::Required,
            design_quantity,
            reserved: 0,
        });
        self
    }

    pub fn build(self) -> Design {
        self.design
    }
}

/// Loads bouquet designs from the specified file, one design per line, and
/// converts them to the internal format.
pub fn load_designs(filepath: PathBuf) -> Result<Vec<Design>, DesignParseError> {
    let external_designs = external::parse_designs_file(filepath)?;
    Ok(external::convert_designs(external_designs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flower::{Size, Species};
    use crate::stock::Stock;

    fn two_species_design() -> Design {
        DesignBuilder::new(DesignId(0), "A", Size::Large, 10)
            .require(Species('a'), 3)
            .require(Species('b'), 4)
            .build()
    }

    #[test]
    fn test_fresh_design_is_incomplete() {
        let design = two_species_design();
        assert!(design.is_active());
        assert!(!design.required_complete());
        assert!(!design.completed());
        assert_eq!(design.required_total(), 7);
        assert_eq!(design.remaining_capacity(), 10);
        assert_eq!(
            design.required_outstanding(),
            vec![(Species('a'), 3), (Species('b'), 4)]
        );
    }

    #[test]
    fn test_commit_required_then_filler_completes() {
        let mut design = two_species_design();
        design.commit_required();
        assert!(design.required_complete());
        assert!(!design.completed());
        assert_eq!(design.remaining_capacity(), 3);

        design.add_filler(Species('c'), 2);
        design.add_filler(Species('c'), 1);
        assert!(design.completed());
        assert_eq!(design.remaining_capacity(), 0);
        // both filler grants merged into one entry
        assert_eq!(
            design
                .entries()
                .iter()
                .filter(|e| e.kind == EntryKind::Filler)
                .count(),
            1
        );
    }

    #[test]
    fn test_filler_on_required_species_uses_separate_entry() {
        let mut design = two_species_design();
        design.commit_required();
        design.add_filler(Species('a'), 3);
        let required_a = design
            .entries()
            .iter()
            .find(|e| e.species == Species('a') && e.kind == EntryKind::Required)
            .unwrap();
        assert_eq!(required_a.reserved, required_a.design_quantity);
        assert_eq!(design.reserved_by_species()[&Species('a')], 6);
    }

    #[test]
    fn test_release_returns_flowers_and_is_idempotent() {
        let mut stock = Stock::new();
        let mut design = two_species_design();
        design.commit_required();
        design.add_filler(Species('c'), 3);

        let released = design.release_into(&mut stock);
        assert_eq!(released, 10);
        assert_eq!(stock.available(Species('a'), Size::Large), 3);
        assert_eq!(stock.available(Species('b'), Size::Large), 4);
        assert_eq!(stock.available(Species('c'), Size::Large), 3);
        // required entries survive with zero reservation, filler is gone
        assert_eq!(design.entries().len(), 2);
        assert_eq!(design.reserved_total(), 0);

        let released_again = design.release_into(&mut stock);
        assert_eq!(released_again, 0);
        assert_eq!(stock.total(), 10);
    }

    #[test]
    fn test_display_aggregates_and_sorts_species() {
        let mut design = DesignBuilder::new(DesignId(3), "B", Size::Small, 9)
            .require(Species('c'), 2)
            .require(Species('a'), 4)
            .build();
        design.commit_required();
        design.add_filler(Species('c'), 3);
        assert_eq!(design.to_string(), "BS4a5c");
    }

    #[test]
    #[should_panic(expected = "appears twice")]
    fn test_builder_rejects_duplicate_required_species() {
        let _ = DesignBuilder::new(DesignId(0), "A", Size::Large, 10)
            .require(Species('a'), 3)
            .require(Species('a'), 4);
    }
}
