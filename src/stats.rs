//! Amplitude statistics for a single frame, and a running accumulator across frames

use crate::frame::CsiFrame;

/// Summary of one frame's subcarrier amplitudes
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct FrameStatistics {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population variance (divisor `n`)
    pub variance: f64,
    pub std_dev: f64,
    pub subcarrier_count: usize,
}

/// Amplitude statistics for `frame`, `None` if it has no subcarriers
pub fn analyze(frame: &CsiFrame) -> Option<FrameStatistics> {
    summarize(&frame.amplitudes())
}

/// Two-pass summary: mean/min/max first, then squared deviations from the mean
pub fn summarize(values: &[f64]) -> Option<FrameStatistics> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();
    let (sum, min, max) = values.iter().fold(
        (0f64, f64::INFINITY, f64::NEG_INFINITY),
        |(sum, min, max), &v| (sum + v, min.min(v), max.max(v)),
    );
    let mean = sum / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    Some(FrameStatistics {
        mean,
        min,
        max,
        variance,
        std_dev: variance.sqrt(),
        subcarrier_count: n,
    })
}

/// Welford accumulator for values that arrive one at a time
#[derive(Clone, Copy, Debug)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    pub fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Population variance
    pub fn variance(&self) -> Option<f64> {
        (self.count > 0).then(|| self.m2 / self.count as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    pub fn min(&self) -> Option<f64> {
        (self.count > 0).then_some(self.min)
    }

    pub fn max(&self) -> Option<f64> {
        (self.count > 0).then_some(self.max)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::RawFrame;
    use approx::assert_relative_eq;

    fn frame(samples: Vec<i8>) -> CsiFrame {
        RawFrame {
            samples,
            ..Default::default()
        }
        .validate(128)
        .unwrap()
    }

    #[test]
    fn test_flat_amplitudes() {
        let stats = analyze(&frame(vec![1, 0, 1, 0, 1, 0])).unwrap();
        assert_eq!(stats.mean, 1.0);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 1.0);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.subcarrier_count, 3);
    }

    #[test]
    fn test_empty_frame_has_no_stats() {
        assert!(analyze(&frame(vec![])).is_none());
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_population_variance() {
        // Amplitudes 5, 0, 10
        let stats = analyze(&frame(vec![3, 4, 0, 0, 6, 8])).unwrap();
        assert_relative_eq!(stats.mean, 5.0, epsilon = 1e-12);
        assert_eq!(stats.min, 0.0);
        assert_relative_eq!(stats.max, 10.0, epsilon = 1e-12);
        assert_relative_eq!(stats.variance, 50.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(stats.std_dev, (50.0f64 / 3.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_large_offset_is_stable() {
        let values: Vec<f64> = (0..1000).map(|i| 1e9 + (i % 2) as f64).collect();
        let stats = summarize(&values).unwrap();
        assert_relative_eq!(stats.variance, 0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_running_matches_batch() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let mut running = RunningStats::new();
        values.iter().for_each(|&v| running.push(v));
        let batch = summarize(&values).unwrap();
        assert_eq!(running.count(), 8);
        assert_relative_eq!(running.mean().unwrap(), batch.mean, epsilon = 1e-12);
        assert_relative_eq!(running.variance().unwrap(), batch.variance, epsilon = 1e-12);
        assert_relative_eq!(running.std_dev().unwrap(), 2.0, epsilon = 1e-12);
        assert_eq!(running.min(), Some(2.0));
        assert_eq!(running.max(), Some(9.0));
    }

    #[test]
    fn test_running_empty_and_reset() {
        let mut running = RunningStats::new();
        assert_eq!(running.mean(), None);
        assert_eq!(running.variance(), None);
        running.push(3.0);
        assert_eq!(running.variance(), Some(0.0));
        running.reset();
        assert_eq!(running.count(), 0);
        assert_eq!(running.max(), None);
    }
}
