/// Actions an observer can take during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the sweep and return the results persisted so far.
    ///
    /// Returned from [`Event::Started`](super::Event::Started), the temperature
    /// is skipped without sampling. Returned from
    /// [`Event::Completed`](super::Event::Completed), the sweep stops after the
    /// row has been persisted.
    StopEarly,
}
