use xy_core::TemperatureResult;

/// Events emitted by the sweep.
///
/// Each temperature produces a [`Started`](Event::Started) event before its
/// sampler runs and a [`Completed`](Event::Completed) event once its row has
/// been appended to the sink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event<'a> {
    /// About to sample a temperature.
    Started {
        /// Position in the schedule.
        index: usize,

        /// Total temperatures in the schedule.
        count: usize,

        temperature: f64,
    },

    /// A temperature was aggregated and persisted.
    Completed {
        /// Position in the schedule.
        index: usize,

        /// Total temperatures in the schedule.
        count: usize,

        /// The persisted row.
        result: &'a TemperatureResult,
    },
}

impl Event<'_> {
    /// Returns the position of the temperature in the schedule.
    #[must_use]
    pub fn index(&self) -> usize {
        match self {
            Self::Started { index, .. } | Self::Completed { index, .. } => *index,
        }
    }

    /// Returns the temperature this event refers to.
    #[must_use]
    pub fn temperature(&self) -> f64 {
        match self {
            Self::Started { temperature, .. } => *temperature,
            Self::Completed { result, .. } => result.temperature,
        }
    }
}
