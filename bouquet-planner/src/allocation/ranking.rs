//! Priority ranking of bouquet designs.
//!
//! Weights reflect design complexity: big bouquets and bouquets needing
//! rare species should be prepared first, since they are the least likely
//! to still be satisfiable once other designs have consumed shared stock.
//! Designs that cannot be satisfied by the initial stock at all are
//! deactivated here, before allocation starts.

use crate::design::{Design, EntryKind};
use crate::stock::Stock;

/// Scarcity weight of a single demand against the currently available
/// quantity: the fraction of the available stock the demand consumes.
pub fn entry_weight(available: u64, quantity: u64) -> f64 {
    debug_assert!(quantity <= available);
    1.0 - (available - quantity) as f64 / available as f64
}

/// The priority weight of a design against the given stock, or `None` if
/// the design is unsatisfiable: malformed (zero total or required
/// quantities above the total), a size class with less total stock than
/// the design total, or a required species with less stock than its
/// design quantity.
///
/// A satisfiable design weighs the sum of its required entries' scarcity
/// weights plus the scarcity of the design total within its size class.
/// The size-class total is at least the design total here, so the
/// division is never by zero.
pub fn design_weight(stock: &Stock, design: &Design) -> Option<f64> {
    if design.total == 0 || design.required_total() > design.total {
        return None;
    }
    let size_total = stock.total_for_size(design.size);
    if size_total < design.total {
        return None;
    }

    let mut weight = 0.0;
    for entry in design.entries() {
        if entry.kind != EntryKind::Required {
            continue;
        }
        let available = stock.available(entry.species, design.size);
        if entry.design_quantity > available {
            return None;
        }
        weight += entry_weight(available, entry.design_quantity);
    }
    Some(weight + entry_weight(size_total, design.total))
}

/// Establishes the processing order for allocation: deactivates every
/// unsatisfiable design (weight 0), then stable-sorts the list by weight
/// descending, so ties keep their input order. Returns the weights aligned
/// with the sorted list, for logging.
pub fn rank_designs(stock: &Stock, designs: &mut Vec<Design>) -> Vec<f64> {
    let mut weighted: Vec<(f64, Design)> = designs
        .drain(..)
        .map(|mut design| match design_weight(stock, &design) {
            Some(weight) if design.is_active() => (weight, design),
            _ => {
                design.deactivate();
                (0.0, design)
            }
        })
        .collect();

    weighted.sort_by(|(w1, _), (w2, _)| w2.total_cmp(w1));

    let mut weights = Vec::with_capacity(weighted.len());
    for (weight, design) in weighted {
        weights.push(weight);
        designs.push(design);
    }
    weights
}
