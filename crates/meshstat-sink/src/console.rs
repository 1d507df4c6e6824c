//! Console JSON snapshot sink.
//!
//! On each flush the sink builds a nested string view of the supplied metric
//! groups (`type → namespace → metric key → value`) and writes it to the
//! configured writer as tab-indented JSON, in a single call. The namespace
//! is the plain concatenation of each sorted label key/value pair with no
//! separator, so `region=us, az=1a` becomes `az1aregionus`; distinct label
//! sets can collide if keys and values interleave ambiguously.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, trace};

use meshstat_core::{MetricGroup, MetricValue};

use crate::QUANTILES;
use crate::error::{SinkError, SinkResult};

type NamespaceData = BTreeMap<String, String>;

/// One flush's nested view of the metric groups.
///
/// Groups sharing a (type, namespace) pair merge into one flat mapping; a
/// later metric with the same key overwrites the earlier one. Maps are
/// ordered so the encoded output is deterministic.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct Snapshot(BTreeMap<String, BTreeMap<String, NamespaceData>>);

impl Snapshot {
    pub fn build<G: MetricGroup>(groups: &[G]) -> SinkResult<Self> {
        let mut all: BTreeMap<String, BTreeMap<String, NamespaceData>> = BTreeMap::new();

        for group in groups {
            let (keys, values) = group.sorted_labels();
            let namespace = namespace_key(keys, values)?;
            let data = all
                .entry(group.group_type().to_string())
                .or_default()
                .entry(namespace)
                .or_default();
            group.each(&mut |key, metric| record(data, key, metric));
        }

        Ok(Snapshot(all))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The flat key/value mapping for one (type, namespace) pair.
    pub fn get(&self, group_type: &str, namespace: &str) -> Option<&BTreeMap<String, String>> {
        self.0.get(group_type)?.get(namespace)
    }

    /// Encode as pretty-printed JSON with tab indentation.
    pub fn to_tab_json(&self) -> SinkResult<Vec<u8>> {
        let mut buf = Vec::with_capacity(128);
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}

/// Writes one JSON snapshot per flush to the configured writer.
///
/// The only configuration is the destination writer. `flush` takes
/// `&mut self`; concurrent callers must serialize invocations.
pub struct ConsoleSink<W> {
    writer: W,
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        ConsoleSink { writer }
    }

    /// Build a [`Snapshot`] from the groups, encode it, and write it out.
    pub fn flush<G: MetricGroup>(&mut self, groups: &[G]) -> SinkResult<()> {
        let snapshot = Snapshot::build(groups)?;
        let encoded = snapshot.to_tab_json()?;
        self.writer.write_all(&encoded)?;
        debug!(
            groups = groups.len(),
            bytes = encoded.len(),
            "flushed metrics snapshot"
        );
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn record(data: &mut NamespaceData, key: &str, metric: &MetricValue) {
    match metric {
        MetricValue::Counter(count) => {
            data.insert(key.to_string(), count.to_string());
        }
        MetricValue::Gauge(value) => {
            data.insert(key.to_string(), value.to_string());
        }
        MetricValue::Histogram(h) => {
            for (q, value) in QUANTILES.iter().zip(h.percentiles(&QUANTILES)) {
                let pct = q * 100.0;
                data.insert(format!("{key}.{pct:.2}%"), format!("{value:.2}"));
            }
            data.insert(format!("{key}.count"), h.count().to_string());
            data.insert(format!("{key}.min"), h.min().to_string());
            data.insert(format!("{key}.max"), h.max().to_string());
            data.insert(format!("{key}.mean"), format!("{:.2}", h.mean()));
            data.insert(format!("{key}.stddev"), format!("{:.2}", h.stddev()));
        }
        other => {
            // Skip just this entry; the rest of the group still renders.
            trace!(key, kind = ?other.kind(), "skipping unsupported metric kind");
        }
    }
}

fn namespace_key(keys: &[String], values: &[String]) -> SinkResult<String> {
    if keys.len() != values.len() {
        return Err(SinkError::LabelArityMismatch {
            keys: keys.len(),
            values: values.len(),
        });
    }
    let mut namespace = String::new();
    for (key, value) in keys.iter().zip(values) {
        namespace.push_str(key);
        namespace.push_str(value);
    }
    Ok(namespace)
}
