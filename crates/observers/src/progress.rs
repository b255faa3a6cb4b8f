use std::time::{Duration, Instant};

use tracing::info;
use xy_core::Observer;

use crate::traits::{HasProgress, HasResult};

/// Logs per-temperature progress and timing.
///
/// Never requests an action.
#[derive(Debug, Clone, Default)]
pub struct ProgressLogger {
    started: Option<Instant>,
    elapsed: Vec<Duration>,
}

impl ProgressLogger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the wall time of every completed temperature, in order.
    #[must_use]
    pub fn elapsed(&self) -> &[Duration] {
        &self.elapsed
    }
}

impl<E: HasProgress + HasResult, A> Observer<E, A> for ProgressLogger {
    fn observe(&mut self, event: &E) -> Option<A> {
        let Some(result) = event.result() else {
            self.started = Some(Instant::now());
            return None;
        };

        let elapsed = self.started.take().map(|t| t.elapsed()).unwrap_or_default();
        self.elapsed.push(elapsed);

        info!(
            done = event.index() + 1,
            of = event.count(),
            temperature = result.temperature,
            converged = result.is_converged(),
            seconds = elapsed.as_secs_f64(),
            "progress"
        );
        None
    }
}
