//! meshstat-core: the metric data model consumed by meshstat sinks.
//!
//! A metrics registry (out of scope here) produces batches of named metrics
//! sharing a type and label set. This crate defines what those batches look
//! like to a sink: the [`MetricGroup`] trait, the [`MetricValue`] variants a
//! group enumerates, and [`HistogramSnapshot`], the point-in-time histogram
//! view that summary statistics are computed from at flush time.

pub mod group;
pub mod value;

pub use group::{MetricGroup, MetricSeries};
pub use value::{HistogramSnapshot, MetricKind, MetricValue};
