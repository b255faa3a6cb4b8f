use xy_core::{TemperatureResult, WarmStart};

/// Indicates whether the sweep covered its whole schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every temperature in the schedule was sampled.
    Complete,

    /// Stopped early due to an observer decision.
    StoppedByObserver,
}

/// The result of a temperature sweep.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Final sweep status.
    pub status: Status,

    /// One row per completed temperature, in schedule order.
    pub results: Vec<TemperatureResult>,

    /// The state the next temperature would have started from.
    pub warm_start: WarmStart,

    /// Number of temperatures sampled.
    pub iters: usize,
}
