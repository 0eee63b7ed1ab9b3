//! Response-time bookkeeping for batch runs.

use std::time::Duration;

/// Cases between two rolling-average reports.
pub const ROLLING_WINDOW: usize = 3;

/// Collected per-case response times.
#[derive(Debug, Clone, Default)]
pub struct ResponseTimes {
    samples: Vec<Duration>,
}

/// Summary over every recorded case.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingStats {
    pub count: usize,
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
}

impl ResponseTimes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one case. Returns the running mean when the case completes a
    /// window of [`ROLLING_WINDOW`] cases.
    pub fn record(&mut self, elapsed: Duration) -> Option<Duration> {
        self.samples.push(elapsed);
        if self.samples.len() % ROLLING_WINDOW == 0 {
            mean(&self.samples)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `None` until a case is recorded.
    pub fn stats(&self) -> Option<TimingStats> {
        Some(TimingStats {
            count: self.samples.len(),
            mean: mean(&self.samples)?,
            min: self.samples.iter().min().copied()?,
            max: self.samples.iter().max().copied()?,
        })
    }
}

fn mean(samples: &[Duration]) -> Option<Duration> {
    let count = u32::try_from(samples.len()).ok().filter(|&n| n > 0)?;
    Some(samples.iter().sum::<Duration>() / count)
}

/// Milliseconds with fractional part, for display.
pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
