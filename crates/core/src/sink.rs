use std::convert::Infallible;

use crate::result::TemperatureResult;

/// An append-only destination for per-temperature results.
///
/// An append must be durable before it returns, so an interrupted sweep
/// loses at most the row in flight.
pub trait ResultSink {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Appends one result row.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the row could not be persisted.
    fn append(&mut self, result: &TemperatureResult) -> Result<(), Self::Error>;
}

/// Collects results in memory.
impl ResultSink for Vec<TemperatureResult> {
    type Error = Infallible;

    fn append(&mut self, result: &TemperatureResult) -> Result<(), Self::Error> {
        self.push(result.clone());
        Ok(())
    }
}

impl<S: ResultSink + ?Sized> ResultSink for &mut S {
    type Error = S::Error;

    fn append(&mut self, result: &TemperatureResult) -> Result<(), Self::Error> {
        (**self).append(result)
    }
}
