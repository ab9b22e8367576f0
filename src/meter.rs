use std::fmt;

use tracing::trace;

/// Weighted running mean of a scalar, e.g. the loss over one epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RunningAverage {
    last: f64,
    sum: f64,
    count: f64,
    average: f64,
}

impl RunningAverage {
    pub fn new() -> RunningAverage {
        RunningAverage::default()
    }

    pub fn reset(&mut self) {
        *self = RunningAverage::default();
    }

    pub fn update(&mut self, value: f64) {
        self.update_weighted(value, 1);
    }

    /// Records `value` as the mean of `weight` samples.
    ///
    /// A zero weight only replaces `last`; the mean is left as it was.
    pub fn update_weighted(&mut self, value: f64, weight: usize) {
        self.last = value;
        if weight == 0 {
            trace!(value, "zero-weight update");
            return;
        }
        let weight = weight as f64;
        self.sum += value * weight;
        self.count += weight;
        self.average = self.sum / self.count;
    }

    pub fn last(&self) -> f64 {
        self.last
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn count(&self) -> f64 {
        self.count
    }

    pub fn average(&self) -> f64 {
        self.average
    }
}

impl fmt::Display for RunningAverage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.4} ({:.4})", self.last, self.average)
    }
}

impl Extend<f64> for RunningAverage {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, iter: T) {
        for value in iter {
            self.update(value);
        }
    }
}

impl FromIterator<f64> for RunningAverage {
    fn from_iter<T: IntoIterator<Item = f64>>(iter: T) -> RunningAverage {
        let mut meter = RunningAverage::new();
        meter.extend(iter);
        meter
    }
}
