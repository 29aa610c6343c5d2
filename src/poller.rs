//! Bounded condition polling.
//!
//! Every explicit wait in the suite runs on a `PollTicker`: the first
//! evaluation happens immediately, later evaluations are spaced on a fixed
//! interval measured from the start of the poll, and the whole thing stops
//! at the timeout. There is no backoff; browser readiness is cheap to probe
//! and predictable latency matters more than request count here.

use std::thread;
use std::time::{Duration, Instant};

/// Fixed gap between poll evaluations.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How a wait call schedules its polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollCadence {
    /// Evaluate exactly once, immediately.
    NoWait,
    /// Poll every `interval` until `timeout` has elapsed.
    TimeoutWithInterval(Duration, Duration),
    /// As above, but guarantee a minimum number of evaluations even if the
    /// timeout has already passed.
    TimeoutWithIntervalAndMinTries(Duration, Duration, u32),
}

impl PollCadence {
    /// The standard cadence: the given timeout on the default interval.
    pub fn timeout(timeout: Duration) -> Self {
        PollCadence::TimeoutWithInterval(timeout, POLL_INTERVAL)
    }
}

pub struct PollTicker {
    timeout: Option<Duration>,
    interval: Option<Duration>,
    min_tries: u32,
    start: Instant,
    cur_tries: u32,
}

impl PollTicker {
    pub fn new(cadence: PollCadence) -> Self {
        let mut ticker = Self {
            timeout: None,
            interval: None,
            min_tries: 0,
            start: Instant::now(),
            cur_tries: 0,
        };

        match cadence {
            PollCadence::NoWait => {}
            PollCadence::TimeoutWithInterval(timeout, interval) => {
                ticker.timeout = Some(timeout);
                ticker.interval = Some(interval);
            }
            PollCadence::TimeoutWithIntervalAndMinTries(timeout, interval, min_tries) => {
                ticker.timeout = Some(timeout);
                ticker.interval = Some(interval);
                ticker.min_tries = min_tries;
            }
        }

        ticker
    }

    /// Record that an evaluation just happened and block until the next one
    /// is due. Returns false once the budget is exhausted.
    pub fn tick(&mut self) -> bool {
        self.cur_tries += 1;

        if self.timeout.filter(|t| &self.start.elapsed() < t).is_none()
            && self.cur_tries >= self.min_tries
        {
            return false;
        }

        if let Some(interval) = self.interval {
            // Next poll is due no earlier than this long after the first poll started.
            let minimum_elapsed = interval * self.cur_tries;
            let actual_elapsed = self.start.elapsed();

            if actual_elapsed < minimum_elapsed {
                let mut sleep_for = minimum_elapsed - actual_elapsed;
                // Never sleep past the deadline; the last evaluation lands on it.
                if let Some(timeout) = self.timeout {
                    if timeout > actual_elapsed {
                        sleep_for = sleep_for.min(timeout - actual_elapsed);
                    }
                }
                thread::sleep(sleep_for);
            }
        }

        true
    }

    pub fn tries(&self) -> u32 {
        self.cur_tries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_wait_allows_a_single_evaluation() {
        let mut ticker = PollTicker::new(PollCadence::NoWait);
        assert!(!ticker.tick());
        assert_eq!(ticker.tries(), 1);
    }

    #[test]
    fn timeout_bounds_the_poll() {
        let cadence =
            PollCadence::TimeoutWithInterval(Duration::from_millis(50), Duration::from_millis(10));
        let mut ticker = PollTicker::new(cadence);
        let start = Instant::now();
        while ticker.tick() {}
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        // Bounded well below an extra interval-per-try drift.
        assert!(elapsed < Duration::from_millis(500), "poll ran for {:?}", elapsed);
    }

    #[test]
    fn min_tries_are_honoured_after_timeout() {
        let cadence = PollCadence::TimeoutWithIntervalAndMinTries(
            Duration::ZERO,
            Duration::from_millis(1),
            3,
        );
        let mut ticker = PollTicker::new(cadence);
        let mut evaluations = 1;
        while ticker.tick() {
            evaluations += 1;
        }
        assert_eq!(evaluations, 3);
    }
}
