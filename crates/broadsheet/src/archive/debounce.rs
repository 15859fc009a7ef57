use std::time::Duration;

use tokio::time::Instant;

/// How long the search input must be quiet before a search runs.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces bursts of values so that only the last one in a burst is
/// acted upon.
///
/// At most one value is pending at a time; pushing a new value replaces
/// it and restarts the quiet period.
#[derive(Debug)]
pub struct Debounce<T> {
    quiet_period: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((now + self.quiet_period, value));
    }

    /// When the pending value becomes due, if there is one.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Takes the pending value if its quiet period has elapsed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match self.pending.take() {
            Some((deadline, value)) if deadline <= now => Some(value),
            pending => {
                self.pending = pending;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_only_last_value_in_burst_is_due() {
        let start = Instant::now();
        let mut debounce = Debounce::new(SEARCH_DEBOUNCE);

        debounce.push("r", start);
        debounce.push("ru", start + Duration::from_millis(100));
        debounce.push("rust", start + Duration::from_millis(200));

        assert_eq!(debounce.deadline(), Some(start + Duration::from_millis(500)));
        assert_eq!(debounce.take_due(start + Duration::from_millis(499)), None);
        assert_eq!(debounce.deadline(), Some(start + Duration::from_millis(500)));

        assert_eq!(debounce.take_due(start + Duration::from_millis(500)), Some("rust"));
        assert_eq!(debounce.deadline(), None);
        assert_eq!(debounce.take_due(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn test_nothing_pending_initially() {
        let debounce = Debounce::<String>::new(SEARCH_DEBOUNCE);

        assert_eq!(debounce.deadline(), None);
    }
}
