//! Capability traits for reusable sweep observers.
//!
//! These traits abstract over event and action types, so observers can be
//! written once and reused with any driver that emits compatible events.
//!
//! # Event traits
//!
//! - [`HasProgress`] — events that know their position in a schedule
//! - [`HasResult`] — events that may carry a completed [`TemperatureResult`]
//!
//! # Action traits
//!
//! - [`CanStopEarly`] — actions that can signal early termination
//!
//! # Example
//!
//! ```rust
//! use xy_core::Observer;
//! use xy_observers::traits::{CanStopEarly, HasResult};
//!
//! struct StopWhenHot {
//!     max_temperature: f64,
//! }
//!
//! impl<E: HasResult, A: CanStopEarly> Observer<E, A> for StopWhenHot {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let result = event.result()?;
//!         (result.temperature >= self.max_temperature).then(A::stop_early)
//!     }
//! }
//! ```

use xy_core::TemperatureResult;
use xy_sweep::sweep;

/// An event that knows where it sits in a schedule.
pub trait HasProgress {
    /// Returns the zero-based position of the event's temperature.
    fn index(&self) -> usize;

    /// Returns the number of temperatures in the schedule.
    fn count(&self) -> usize;

    /// Returns the event's temperature.
    fn temperature(&self) -> f64;
}

/// An event that may carry a completed result.
pub trait HasResult {
    /// Returns the result, or `None` for events that precede one.
    fn result(&self) -> Option<&TemperatureResult>;
}

/// An action type that can signal early termination.
pub trait CanStopEarly {
    /// Returns the action that stops the sweep early.
    fn stop_early() -> Self;
}

// --- sweep::Event ---

impl HasProgress for sweep::Event<'_> {
    fn index(&self) -> usize {
        sweep::Event::index(self)
    }

    fn count(&self) -> usize {
        match self {
            sweep::Event::Started { count, .. } | sweep::Event::Completed { count, .. } => *count,
        }
    }

    fn temperature(&self) -> f64 {
        sweep::Event::temperature(self)
    }
}

impl HasResult for sweep::Event<'_> {
    fn result(&self) -> Option<&TemperatureResult> {
        match self {
            sweep::Event::Started { .. } => None,
            sweep::Event::Completed { result, .. } => Some(result),
        }
    }
}

// --- CanStopEarly impls ---

impl CanStopEarly for sweep::Action {
    fn stop_early() -> Self {
        Self::StopEarly
    }
}
