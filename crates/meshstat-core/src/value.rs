//! Metric values and histogram summary statistics.

/// Kind tag for a [`MetricValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    GaugeFloat,
}

/// The value of one named metric at flush time.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Monotonic event count.
    Counter(i64),
    /// Arbitrary signed integer level.
    Gauge(i64),
    /// Distribution of observed values, summarized via [`HistogramSnapshot`].
    Histogram(HistogramSnapshot),
    /// Floating-point level. Not every sink understands this kind.
    GaugeFloat(f64),
}

impl MetricValue {
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricValue::Counter(_) => MetricKind::Counter,
            MetricValue::Gauge(_) => MetricKind::Gauge,
            MetricValue::Histogram(_) => MetricKind::Histogram,
            MetricValue::GaugeFloat(_) => MetricKind::GaugeFloat,
        }
    }

    pub fn as_counter(&self) -> Option<i64> {
        match self {
            MetricValue::Counter(count) => Some(*count),
            _ => None,
        }
    }

    pub fn as_gauge(&self) -> Option<i64> {
        match self {
            MetricValue::Gauge(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_histogram(&self) -> Option<&HistogramSnapshot> {
        match self {
            MetricValue::Histogram(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Immutable point-in-time view of a histogram.
///
/// Holds the total observation count and the (possibly sampled) values the
/// collector retained. Summary statistics are computed from the retained
/// samples on demand; an empty snapshot yields 0 for every statistic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramSnapshot {
    count: u64,
    samples: Vec<i64>,
}

impl HistogramSnapshot {
    /// Snapshot where every observation is retained as a sample.
    pub fn from_samples(mut samples: Vec<i64>) -> Self {
        samples.sort_unstable();
        HistogramSnapshot {
            count: samples.len() as u64,
            samples,
        }
    }

    /// Snapshot from a sampled collector: `count` observations total, of
    /// which only `samples` were retained.
    pub fn with_count(samples: Vec<i64>, count: u64) -> Self {
        let mut snapshot = HistogramSnapshot::from_samples(samples);
        snapshot.count = count;
        snapshot
    }

    /// Total observations, including ones the sampler dropped.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> i64 {
        self.samples.first().copied().unwrap_or(0)
    }

    pub fn max(&self) -> i64 {
        self.samples.last().copied().unwrap_or(0)
    }

    /// Sum of the retained samples.
    pub fn sum(&self) -> i64 {
        self.samples.iter().sum()
    }

    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.sum() as f64 / self.samples.len() as f64
    }

    /// Population standard deviation of the retained samples.
    pub fn stddev(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .samples
            .iter()
            .map(|v| {
                let d = *v as f64 - mean;
                d * d
            })
            .sum::<f64>()
            / self.samples.len() as f64;
        variance.sqrt()
    }

    /// Value at quantile `p` (0.0..=1.0).
    ///
    /// Rank is `p * (n + 1)` with linear interpolation between the two
    /// neighboring samples; ranks outside the sample range clamp to the
    /// first/last sample.
    pub fn percentile(&self, p: f64) -> f64 {
        let size = self.samples.len();
        if size == 0 {
            return 0.0;
        }
        let pos = p * (size as f64 + 1.0);
        if pos < 1.0 {
            self.samples[0] as f64
        } else if pos >= size as f64 {
            self.samples[size - 1] as f64
        } else {
            let lower = self.samples[pos as usize - 1] as f64;
            let upper = self.samples[pos as usize] as f64;
            lower + (pos - pos.floor()) * (upper - lower)
        }
    }

    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        ps.iter().map(|p| self.percentile(*p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_is_all_zeroes() {
        let h = HistogramSnapshot::default();
        assert_eq!(h.count(), 0);
        assert_eq!(h.min(), 0);
        assert_eq!(h.max(), 0);
        assert_eq!(h.sum(), 0);
        assert_eq!(h.mean(), 0.0);
        assert_eq!(h.stddev(), 0.0);
        assert_eq!(h.percentile(0.99), 0.0);
    }

    #[test]
    fn single_sample() {
        let h = HistogramSnapshot::from_samples(vec![5]);
        assert_eq!(h.count(), 1);
        assert_eq!(h.min(), 5);
        assert_eq!(h.max(), 5);
        assert_eq!(h.mean(), 5.0);
        assert_eq!(h.percentile(0.5), 5.0);
        assert_eq!(h.percentile(0.999), 5.0);
    }

    #[test]
    fn samples_sorted_on_construction() {
        let h = HistogramSnapshot::from_samples(vec![3, 1, 2]);
        assert_eq!(h.min(), 1);
        assert_eq!(h.max(), 3);
        assert_eq!(h.sum(), 6);
    }

    #[test]
    fn with_count_keeps_sampler_total() {
        let h = HistogramSnapshot::with_count(vec![1, 2, 3], 1000);
        assert_eq!(h.count(), 1000);
        // Statistics still come from the retained samples.
        assert_eq!(h.mean(), 2.0);
    }

    #[test]
    fn percentiles_interpolate_on_uniform_distribution() {
        // 1..=100: rank for p is p * 101.
        let h = HistogramSnapshot::from_samples((1..=100).collect());
        assert_eq!(h.percentile(0.5), 50.5);
        assert_eq!(h.percentile(0.75), 75.75);
        assert!((h.percentile(0.95) - 95.95).abs() < 1e-9);
        assert!((h.percentile(0.99) - 99.99).abs() < 1e-9);
        // Rank 100.899 clamps to the last sample.
        assert_eq!(h.percentile(0.999), 100.0);
    }

    #[test]
    fn stddev_is_population_not_sample() {
        let h = HistogramSnapshot::from_samples(vec![2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(h.mean(), 5.0);
        assert_eq!(h.stddev(), 2.0);
    }

    #[test]
    fn kind_and_accessors() {
        assert_eq!(MetricValue::Counter(5).kind(), MetricKind::Counter);
        assert_eq!(MetricValue::Gauge(-3).kind(), MetricKind::Gauge);
        assert_eq!(MetricValue::GaugeFloat(0.5).kind(), MetricKind::GaugeFloat);

        assert_eq!(MetricValue::Counter(5).as_counter(), Some(5));
        assert_eq!(MetricValue::Counter(5).as_gauge(), None);
        assert_eq!(MetricValue::Gauge(-3).as_gauge(), Some(-3));

        let h = HistogramSnapshot::from_samples(vec![1, 2]);
        let v = MetricValue::Histogram(h.clone());
        assert_eq!(v.kind(), MetricKind::Histogram);
        assert_eq!(v.as_histogram(), Some(&h));
        assert_eq!(v.as_counter(), None);
    }
}
