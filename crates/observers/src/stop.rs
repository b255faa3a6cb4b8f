use tracing::warn;
use xy_core::Observer;

use crate::traits::{CanStopEarly, HasResult};

/// Stops a sweep once too many results carry convergence warnings.
///
/// The offending row has already been persisted when the sweep stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopOnWarning {
    max_warnings: usize,
    seen: usize,
}

impl StopOnWarning {
    /// Stops at the `max_warnings`-th warned result.
    ///
    /// A `max_warnings` of zero is treated as one.
    #[must_use]
    pub fn new(max_warnings: usize) -> Self {
        Self {
            max_warnings: max_warnings.max(1),
            seen: 0,
        }
    }

    /// Returns the number of warned results observed so far.
    #[must_use]
    pub fn warnings(&self) -> usize {
        self.seen
    }
}

impl Default for StopOnWarning {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<E: HasResult, A: CanStopEarly> Observer<E, A> for StopOnWarning {
    fn observe(&mut self, event: &E) -> Option<A> {
        let warning = event.result()?.warning?;
        self.seen += 1;
        if self.seen < self.max_warnings {
            return None;
        }
        warn!(warnings = self.seen, %warning, "stopping sweep");
        Some(A::stop_early())
    }
}
