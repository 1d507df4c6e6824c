//! Metric groups: batches of named metrics sharing a type and label set.

use crate::value::MetricValue;

/// A batch of related named metrics, as seen by a sink.
///
/// Implementations come from the metrics registry. The label slices returned
/// by [`sorted_labels`](MetricGroup::sorted_labels) are parallel arrays: the
/// value at index `i` belongs to the key at index `i`, and keys are sorted
/// ascending.
pub trait MetricGroup {
    /// The group's type tag, e.g. `"listener"` or `"cluster"`.
    fn group_type(&self) -> &str;

    /// Parallel `(keys, values)` label slices, keys sorted ascending.
    fn sorted_labels(&self) -> (&[String], &[String]);

    /// Enumerate the contained metrics by name.
    fn each(&self, visit: &mut dyn FnMut(&str, &MetricValue));
}

impl<T: MetricGroup + ?Sized> MetricGroup for &T {
    fn group_type(&self) -> &str {
        (**self).group_type()
    }

    fn sorted_labels(&self) -> (&[String], &[String]) {
        (**self).sorted_labels()
    }

    fn each(&self, visit: &mut dyn FnMut(&str, &MetricValue)) {
        (**self).each(visit)
    }
}

impl<T: MetricGroup + ?Sized> MetricGroup for Box<T> {
    fn group_type(&self) -> &str {
        (**self).group_type()
    }

    fn sorted_labels(&self) -> (&[String], &[String]) {
        (**self).sorted_labels()
    }

    fn each(&self, visit: &mut dyn FnMut(&str, &MetricValue)) {
        (**self).each(visit)
    }
}

/// Owned [`MetricGroup`] for callers that assemble metrics by hand.
///
/// Labels are kept key-sorted regardless of insertion order; metrics are
/// enumerated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MetricSeries {
    group_type: String,
    label_keys: Vec<String>,
    label_values: Vec<String>,
    metrics: Vec<(String, MetricValue)>,
}

impl MetricSeries {
    pub fn new(group_type: impl Into<String>) -> Self {
        MetricSeries {
            group_type: group_type.into(),
            ..Default::default()
        }
    }

    /// Add a label, replacing the value if the key is already present.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.label_keys.binary_search(&key) {
            Ok(i) => self.label_values[i] = value,
            Err(i) => {
                self.label_keys.insert(i, key);
                self.label_values.insert(i, value);
            }
        }
        self
    }

    pub fn with_metric(mut self, key: impl Into<String>, value: MetricValue) -> Self {
        self.metrics.push((key.into(), value));
        self
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }
}

impl MetricGroup for MetricSeries {
    fn group_type(&self) -> &str {
        &self.group_type
    }

    fn sorted_labels(&self) -> (&[String], &[String]) {
        (&self.label_keys, &self.label_values)
    }

    fn each(&self, visit: &mut dyn FnMut(&str, &MetricValue)) {
        for (key, value) in &self.metrics {
            visit(key, value);
        }
    }
}
