//! Throttled progress reporting.
//!
//! The rewrite loop may touch tens of thousands of characters; reporting
//! each one would flood the UI channel. A report is emitted only when at
//! least `min_interval` has passed since the previous one.

use std::time::{Duration, Instant};

use crate::messages::{self, UiMessage, UiSender};

/// Decide whether a report at `now` should be emitted.
///
/// The first report is always emitted.
pub fn should_emit(last_emit: Option<Instant>, now: Instant, min_interval: Duration) -> bool {
    match last_emit {
        None => true,
        Some(last) => now.saturating_duration_since(last) >= min_interval,
    }
}

#[derive(Debug)]
pub struct ProgressReporter {
    sink: UiSender,
    min_interval: Duration,
    last_emit: Option<Instant>,
    emitted: usize,
}

impl ProgressReporter {
    pub fn new(sink: UiSender, min_interval: Duration) -> Self {
        Self {
            sink,
            min_interval,
            last_emit: None,
            emitted: 0,
        }
    }

    /// Emit `changed: {current}/{total}` unless throttled.
    ///
    /// Returns whether a message was sent.
    pub fn report(&mut self, current: usize, total: usize) -> bool {
        let now = Instant::now();
        if !should_emit(self.last_emit, now, self.min_interval) {
            return false;
        }
        self.last_emit = Some(now);
        self.emitted += 1;
        messages::send(&self.sink, UiMessage::Progress { current, total });
        true
    }

    /// Number of progress messages emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrack_config::Config;
    use tokio::sync::mpsc;

    fn default_interval() -> Duration {
        Config::default().progress_interval()
    }

    #[test]
    fn test_should_emit_first_report() {
        assert!(should_emit(None, Instant::now(), default_interval()));
    }

    #[test]
    fn test_should_emit_respects_interval() {
        let start = Instant::now();
        let interval = Duration::from_millis(16);
        assert!(!should_emit(Some(start), start, interval));
        assert!(!should_emit(
            Some(start),
            start + Duration::from_millis(15),
            interval
        ));
        assert!(should_emit(
            Some(start),
            start + Duration::from_millis(16),
            interval
        ));
        assert!(should_emit(Some(start), start + Duration::from_secs(1), interval));
    }

    #[test]
    fn test_clock_going_backwards_does_not_emit() {
        let start = Instant::now() + Duration::from_secs(5);
        assert!(!should_emit(Some(start), Instant::now(), default_interval()));
    }

    #[test]
    fn test_reporter_throttles() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut reporter = ProgressReporter::new(tx, Duration::from_secs(3600));

        assert!(reporter.report(1, 10));
        for i in 2..=10 {
            assert!(!reporter.report(i, 10));
        }
        assert_eq!(reporter.emitted(), 1);
        assert_eq!(
            rx.try_recv().unwrap(),
            UiMessage::Progress {
                current: 1,
                total: 10
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_zero_interval_reports_everything() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut reporter = ProgressReporter::new(tx, Duration::ZERO);
        for i in 1..=5 {
            assert!(reporter.report(i, 5));
        }
        let mut seen = Vec::new();
        while let Ok(UiMessage::Progress { current, .. }) = rx.try_recv() {
            seen.push(current);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);
    }
}
