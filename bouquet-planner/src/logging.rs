//! This module contains various structs and functions that are used by
//! [run_program](crate::run_program) to log the outcome of an allocation
//! run.

use csv::Writer;
use log::trace;
use serde::Serialize;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

use crate::design::Design;
use crate::flower::Size;

/// Contains per-design information, written to design-log-output
#[derive(Serialize)]
pub struct DesignLogRow<'a> {
    decision: &'a str,
    name: &'a str,
    size: Size,
    total: u64,
    weight: f64,
    active: bool,
    flowers: String,
}

/// Contains per-phase timing information, written to runtime-log-output
#[derive(Serialize, Debug, Clone)]
pub struct RuntimeMeasurement {
    kind: RuntimeKind,
    measurement_millis: Option<u128>,

    #[serde(skip)]
    instant: Instant,
}

impl RuntimeMeasurement {
    pub fn start(kind: RuntimeKind) -> Self {
        Self {
            kind,
            measurement_millis: None,
            instant: Instant::now(),
        }
    }

    pub fn stop(&mut self) -> Self {
        self.measurement_millis = Some(self.instant.elapsed().as_millis());
        self.clone()
    }
}

#[derive(Serialize, Debug, Clone, Eq, PartialEq, Hash)]
pub enum RuntimeKind {
    TotalRun, // total run time ~ (RankDesigns + ConstructBouquets)

    RankDesigns,       // weight computation and priority sort
    ConstructBouquets, // the full fixed-point loop

    // one entry per loop iteration (part of ConstructBouquets)
    ReservationPass,
    FillerPass,
}

/// Contains global information, written to stats-output
#[derive(Serialize, Debug)]
pub struct RunStats {
    pub n_designs: usize,
    pub n_completed: usize,
    pub n_abandoned: usize,
    pub initial_stock: u64,
    pub reserved_flowers: u64,
    pub remaining_stock: u64,
}

/// Writes one row per design, in priority order, with the weight computed
/// by the ranker and the final reserved flowers.
pub fn write_design_log(path: &Path, designs: &[Design], weights: &[f64]) {
    assert_eq!(
        designs.len(),
        weights.len(),
        "One weight per ranked design is required"
    );
    let mut writer = Writer::from_path(path).expect("Couldn't open design log output file");
    for (design, weight) in designs.iter().zip(weights.iter()) {
        let flowers = design
            .reserved_by_species()
            .iter()
            .map(|(species, quantity)| format!("{}{}", quantity, species))
            .collect::<String>();
        let row = DesignLogRow {
            decision: if design.completed() {
                "completed"
            } else {
                "abandoned"
            },
            name: &design.name,
            size: design.size,
            total: design.total,
            weight: *weight,
            active: design.is_active(),
            flowers,
        };
        writer.serialize(row).expect("Couldn't write design log row");
    }
    writer.flush().expect("Couldn't flush design log");
    trace!("Wrote design log to {:?}", path);
}

pub fn write_runtime_log(path: &Path, measurements: &[RuntimeMeasurement]) {
    let mut writer = Writer::from_path(path).expect("Couldn't open runtime log output file");
    for measurement in measurements {
        writer
            .serialize(measurement)
            .expect("Couldn't write runtime log row");
    }
    writer.flush().expect("Couldn't flush runtime log");
    trace!("Wrote runtime log to {:?}", path);
}

pub fn write_run_stats(path: &Path, stats: &RunStats) {
    let file = File::create(path).expect("Couldn't open stats output file");
    serde_json::to_writer_pretty(file, stats).expect("Couldn't write run stats");
    trace!("Wrote run stats to {:?}", path);
}
