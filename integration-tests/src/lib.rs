//! Shared fixtures for the end-to-end sweep tests.

use std::path::PathBuf;

use xy_core::Lattice;
use xy_sweep::{Schedule, SweepConfig};

/// Returns a fresh path under the system temp directory, removing any file
/// a previous run left behind.
#[must_use]
pub fn temp_csv(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("xy_e2e_{}_{name}.csv", std::process::id()));
    std::fs::remove_file(&path).ok();
    path
}

/// A small but real sweep: a 4x4 lattice, two chains and a short schedule.
///
/// # Panics
///
/// Panics if the fixed values are rejected.
#[must_use]
pub fn small_config(temperatures: &[f64], seed: u64) -> SweepConfig {
    let lattice = Lattice::square(4).expect("4x4 lattice");
    let schedule = Schedule::new(temperatures.to_vec()).expect("ascending schedule");
    SweepConfig::new(lattice, schedule)
        .with_chains(2, 80)
        .expect("valid chain counts")
        .with_seed(seed)
}
