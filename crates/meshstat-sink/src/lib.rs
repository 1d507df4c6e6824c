//! meshstat-sink: output sinks for meshstat metric groups.
//!
//! # Architecture
//!
//! ```text
//! ConsoleSink
//!   └── flush() → Snapshot (type → namespace → key → value) → tab-indented JSON → writer
//!
//! Prometheus exposition
//!   └── render_prometheus() → text/plain for a /metrics endpoint
//! ```
//!
//! Both sinks are stateless between invocations: every flush or render
//! builds its view fresh from the supplied groups. Callers invoking a sink
//! from multiple tasks must serialize the calls themselves.

pub mod console;
pub mod error;
pub mod prometheus;

pub use console::{ConsoleSink, Snapshot};
pub use error::{SinkError, SinkResult};
pub use prometheus::render_prometheus;

/// Quantiles emitted for every histogram.
pub const QUANTILES: [f64; 5] = [0.5, 0.75, 0.95, 0.99, 0.999];
