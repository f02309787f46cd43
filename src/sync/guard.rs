//! Bookkeeping that must run even when a fetch future is dropped mid-flight.

/// Runs `on_cancel` on drop unless [`finish`](Self::finish) was called first.
pub(crate) struct InFlight<F: FnOnce()> {
    on_cancel: Option<F>,
}

impl<F: FnOnce()> InFlight<F> {
    pub(crate) fn new(on_cancel: F) -> Self {
        Self {
            on_cancel: Some(on_cancel),
        }
    }

    /// The fetch completed; the caller settles the counter itself
    pub(crate) fn finish(mut self) {
        self.on_cancel = None;
    }
}

impl<F: FnOnce()> Drop for InFlight<F> {
    fn drop(&mut self) {
        if let Some(on_cancel) = self.on_cancel.take() {
            on_cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_cancel_runs_only_when_unfinished() {
        let cancelled = Cell::new(0);

        drop(InFlight::new(|| cancelled.set(cancelled.get() + 1)));
        assert_eq!(cancelled.get(), 1);

        InFlight::new(|| cancelled.set(cancelled.get() + 1)).finish();
        assert_eq!(cancelled.get(), 1);
    }
}
