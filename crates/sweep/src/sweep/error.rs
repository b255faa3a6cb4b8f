use crate::aggregate::OutputError;

use super::ConfigError;

/// Errors that can abort a sweep.
///
/// Every variant is fatal. Rows appended before the failure stay persisted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("sampler failed at T = {temperature}: {source}")]
    Sampler {
        temperature: f64,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("sampler output at T = {temperature} is malformed: {source}")]
    Output {
        temperature: f64,
        source: OutputError,
    },

    #[error("result sink failed at T = {temperature}: {source}")]
    Sink {
        temperature: f64,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Wraps a sampler error.
    pub(super) fn sampler(
        temperature: f64,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Sampler {
            temperature,
            source: Box::new(error),
        }
    }

    /// Wraps a sink error.
    pub(super) fn sink(
        temperature: f64,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Sink {
            temperature,
            source: Box::new(error),
        }
    }

    /// Returns the temperature the sweep failed at, if it got that far.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        match self {
            Self::Config(_) => None,
            Self::Sampler { temperature, .. }
            | Self::Output { temperature, .. }
            | Self::Sink { temperature, .. } => Some(*temperature),
        }
    }
}
