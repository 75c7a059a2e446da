//! This crate assembles bouquets from a finite flower stock: competing
//! bouquet designs are ranked by how scarce their required species are,
//! then greedily allocated required and filler flowers, releasing the
//! stock of designs that cannot be completed so it can benefit the rest.

use clap::Parser;
use log::{info, trace};
use std::io;

use crate::config::Cli;
use crate::design::Design;
use crate::logging::{RunStats, RuntimeKind, RuntimeMeasurement};
use crate::stock::Stock;

pub mod allocation;
pub mod config;
pub mod design;
pub mod flower;
pub mod logging;
pub mod stock;
pub mod util;

pub fn run_program() {
    #[cfg(debug_assertions)]
    info!("Debug mode enabled");

    let config: Cli = config::Cli::parse();

    trace!("Input config: {:?}", config);

    // Check that the output paths are valid
    let output_paths = config::check_output_paths(&config);

    // check that there are no misconfigurations
    config.check_config();

    let mut runtime_measurements: Vec<RuntimeMeasurement> = Vec::new();
    let mut total_meas = RuntimeMeasurement::start(RuntimeKind::TotalRun);

    let (mut designs, mut stock) = load_input(&config);
    info!(
        "Loaded {} designs and {} flowers",
        designs.len(),
        stock.total()
    );

    let initial_stock = stock.total();
    let n_designs = designs.len();

    let mut rank_meas = RuntimeMeasurement::start(RuntimeKind::RankDesigns);
    let weights = allocation::ranking::rank_designs(&stock, &mut designs);
    runtime_measurements.push(rank_meas.stop());

    let mut alloc_meas = RuntimeMeasurement::start(RuntimeKind::ConstructBouquets);
    let bouquet_allocation =
        allocation::construct_bouquets(&mut stock, &mut designs, &mut runtime_measurements);
    runtime_measurements.push(alloc_meas.stop());
    runtime_measurements.push(total_meas.stop());

    assert_eq!(
        bouquet_allocation.completed.len() + bouquet_allocation.abandoned.len(),
        n_designs,
        "Lost some designs while allocating"
    );

    let stats = RunStats {
        n_designs,
        n_completed: bouquet_allocation.completed.len(),
        n_abandoned: bouquet_allocation.abandoned.len(),
        initial_stock,
        reserved_flowers: designs.iter().map(|d| d.reserved_total()).sum(),
        remaining_stock: stock.total(),
    };
    assert_eq!(
        stats.reserved_flowers + stats.remaining_stock,
        stats.initial_stock,
        "Flowers were lost or invented while allocating"
    );

    if let Some(path) = &output_paths.design_log_output_path {
        logging::write_design_log(path, &designs, &weights);
    }
    if let Some(path) = &output_paths.runtime_log_output_path {
        logging::write_runtime_log(path, &runtime_measurements);
    }
    if let Some(path) = &output_paths.stats_output_path {
        logging::write_run_stats(path, &stats);
    }

    println!("\nResult:");
    for design in designs.iter().filter(|d| d.completed()) {
        println!("{}", design);
    }

    info!(
        "Completed {} bouquets, abandoned {} designs",
        stats.n_completed, stats.n_abandoned
    );
}

/// Loads designs and stock from the sample data, the configured files, or
/// interactively from stdin (designs first, flowers second, each section
/// terminated by a blank line).
fn load_input(config: &Cli) -> (Vec<Design>, Stock) {
    if config.input.sample {
        return (util::sample_designs(), util::sample_stock());
    }

    let designs = match &config.input.designs {
        Some(path) => design::load_designs(path.clone()).expect("loading designs failed"),
        None => {
            println!("Please enter bouquet designs:");
            let stdin = io::stdin();
            let mut lock = stdin.lock();
            let parsed = design::external::parse_designs(&mut lock)
                .expect("reading designs from stdin failed");
            design::external::convert_designs(parsed)
        }
    };
    trace!("Loaded {} designs", designs.len());

    let stock = match &config.input.flowers {
        Some(path) => stock::load_flowers(path.clone()).expect("loading flowers failed"),
        None => {
            println!("Please enter flowers:");
            let stdin = io::stdin();
            let mut lock = stdin.lock();
            let parsed =
                stock::external::parse_flowers(&mut lock).expect("reading flowers from stdin failed");
            stock::external::convert_flowers(parsed)
        }
    };

    (designs, stock)
}
