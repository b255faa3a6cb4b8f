//! Settings layer for the `xy-sweep` binary.
//!
//! A settings file is TOML. Every key is optional and falls back to the
//! [`SweepConfig`] defaults:
//!
//! ```toml
//! seed = 7
//! output = "energy_data.csv"
//!
//! [lattice]
//! dim_x = 4
//! dim_y = 4
//!
//! [sampling]
//! chain_count = 4
//! iteration_count = 5000
//! vorticity_sample_cap = 1000
//! r_hat_threshold = 1.1
//! vortex_threshold = 3.141592653589793
//!
//! [sampling.tuning]
//! adapt_delta = 0.7
//! max_tree_depth = 15
//!
//! [schedule]
//! step = 0.1
//! count = 20
//! ```
//!
//! An explicit `temperatures = [...]` list in `[schedule]` replaces the
//! linear `step`/`count` schedule.

mod settings;

pub use settings::{
    LatticeSettings, SamplingSettings, ScheduleSettings, Settings, SettingsError, TuningSettings,
};

/// The CSV file written when neither the settings nor the command line name one.
pub const DEFAULT_OUTPUT: &str = "energy_data.csv";
