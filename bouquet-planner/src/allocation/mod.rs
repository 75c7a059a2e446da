//! The allocation engine: commits the flower stock to the ranked bouquet
//! designs.
//!
//! One allocation run alternates a reservation pass (required entries,
//! all-or-nothing per design) and a filler pass (top satisfied designs up
//! to their totals) until every remaining active design is completed, then
//! releases and deactivates the highest-priority blocked design and tries
//! again with the freed stock. Each iteration permanently deactivates
//! exactly one design, which bounds the loop by the number of designs.

pub mod ranking;
pub mod utils;

use log::{debug, trace};

use crate::design::{Design, DesignId};
use crate::flower::Species;
use crate::logging::{RuntimeKind, RuntimeMeasurement};
use crate::stock::Stock;

/// Contains the final partition of the designs after an allocation run:
/// ids of completed designs, and ids of abandoned (deactivated) ones.
/// Both are in priority order.
#[derive(Debug, Clone)]
pub struct BouquetAllocation {
    pub completed: Vec<DesignId>,

    pub abandoned: Vec<DesignId>,
}

/// Runs the allocation loop over the priority-sorted designs. The designs
/// are annotated in place: entries carry their final reserved quantities,
/// and every design ends up either completed or inactive.
pub fn construct_bouquets(
    stock: &mut Stock,
    designs: &mut [Design],
    runtime_measurements: &mut Vec<RuntimeMeasurement>,
) -> BouquetAllocation {
    loop {
        let mut reservation_meas = RuntimeMeasurement::start(RuntimeKind::ReservationPass);
        reservation_pass(stock, designs);
        runtime_measurements.push(reservation_meas.stop());

        let mut filler_meas = RuntimeMeasurement::start(RuntimeKind::FillerPass);
        filler_pass(stock, designs);
        runtime_measurements.push(filler_meas.stop());

        // the first blocked design is the highest-priority one still waiting
        match designs.iter().position(|d| d.is_active() && !d.completed()) {
            None => break,
            Some(blocked) => {
                let design = &mut designs[blocked];
                let released = design.release_into(stock);
                design.deactivate();
                debug!(
                    "Deactivated design {}{} and released {} flowers",
                    design.name, design.size, released
                );
            }
        }
    }

    let mut completed = Vec::new();
    let mut abandoned = Vec::new();
    for design in designs.iter() {
        if design.completed() {
            completed.push(design.id);
        } else {
            debug_assert!(!design.is_active(), "blocked design survived the loop");
            abandoned.push(design.id);
        }
    }
    BouquetAllocation {
        completed,
        abandoned,
    }
}

/// Commits the outstanding required entries of every eligible design, in
/// priority order. A design either gets all of its required flowers in one
/// transaction or none; a failed design stays incomplete for this round
/// and holds no stock afterwards.
fn reservation_pass(stock: &mut Stock, designs: &mut [Design]) {
    for design in designs.iter_mut() {
        if !design.is_active() || design.required_complete() {
            continue;
        }
        let demands = design.required_outstanding();
        if utils::reserve_all(stock, design.size, &demands) {
            design.commit_required();
            trace!("Reserved required flowers for design {}{}", design.name, design.size);
        } else {
            // also drop anything held from earlier rounds
            let released = design.release_into(stock);
            if released > 0 {
                trace!(
                    "Released {} flowers of deferred design {}{}",
                    released,
                    design.name,
                    design.size
                );
            }
        }
    }
}

/// Tops every required-complete design up to its total with flowers of any
/// species of its size class: first species already in the bouquet, then
/// the remaining stock in species order.
fn filler_pass(stock: &mut Stock, designs: &mut [Design]) {
    for design in designs.iter_mut() {
        if !design.is_active() || design.completed() || !design.required_complete() {
            continue;
        }

        for species in design.species() {
            top_up(stock, design, species);
            if design.completed() {
                break;
            }
        }
        if design.completed() {
            continue;
        }
        for species in stock.species_for_size(design.size) {
            top_up(stock, design, species);
            if design.completed() {
                break;
            }
        }
    }
}

/// Moves `min(available, remaining capacity)` flowers of one species from
/// the stock into a design's filler entries.
fn top_up(stock: &mut Stock, design: &mut Design, species: Species) {
    let remaining = design.remaining_capacity();
    if remaining == 0 {
        return;
    }
    let take = remaining.min(stock.available(species, design.size));
    if take == 0 {
        return;
    }
    let reserved = stock.reserve(species, design.size, take);
    assert!(
        reserved,
        "Stock underflow while topping up design {}{}",
        design.name, design.size
    );
    design.add_filler(species, take);
}
