/// Watches a temperature sweep and may steer it.
///
/// A sweep reports twice per temperature: once before the sampler runs and
/// once after the temperature's row has been appended to the sink. Returning
/// `Some(action)` from either report asks the sweep to act on it, typically
/// to stop early; a stop requested after a completed temperature keeps that
/// temperature's row. Returning `None` lets the sweep carry on.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is the
/// observer that never intervenes.
pub trait Observer<E, A> {
    /// Receives one sweep event.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_see_every_event() {
        let mut seen = Vec::new();
        let mut observer = |event: &usize| -> Option<&'static str> {
            seen.push(*event);
            (*event == 2).then_some("stop")
        };

        let actions: Vec<_> = (0..4).map(|e| observer.observe(&e)).collect();

        assert_eq!(actions, [None, None, Some("stop"), None]);
        assert_eq!(seen, [0, 1, 2, 3]);
    }

    #[test]
    fn unit_never_intervenes() {
        let action: Option<()> = ().observe(&1.5_f64);
        assert_eq!(action, None);
    }
}
