//! Prometheus text exposition format.
//!
//! Renders metric groups into the Prometheus text exposition format for
//! scraping by a Prometheus server or compatible agent. The metric name is
//! `<type>_<key>` with invalid characters mapped to `_`; the group's sorted
//! labels become Prometheus labels.

use meshstat_core::{MetricGroup, MetricValue};

use crate::QUANTILES;
use crate::error::{SinkError, SinkResult};

/// Render metric groups into Prometheus text format.
///
/// Counters and gauges become one sample line each; histograms become a
/// summary with one line per quantile in [`QUANTILES`] plus `_sum` and
/// `_count`.
pub fn render_prometheus<G: MetricGroup>(groups: &[G]) -> SinkResult<String> {
    let mut out = String::new();

    for group in groups {
        let (keys, values) = group.sorted_labels();
        if keys.len() != values.len() {
            return Err(SinkError::LabelArityMismatch {
                keys: keys.len(),
                values: values.len(),
            });
        }
        let labels = render_labels(keys, values);
        let group_type = group.group_type().to_string();

        group.each(&mut |key, metric| {
            let name = metric_name(&group_type, key);
            match metric {
                MetricValue::Counter(count) => {
                    out.push_str(&format!("# TYPE {name} counter\n"));
                    out.push_str(&format!("{name}{} {count}\n", sample_labels(&labels)));
                }
                MetricValue::Gauge(value) => {
                    out.push_str(&format!("# TYPE {name} gauge\n"));
                    out.push_str(&format!("{name}{} {value}\n", sample_labels(&labels)));
                }
                MetricValue::GaugeFloat(value) => {
                    out.push_str(&format!("# TYPE {name} gauge\n"));
                    out.push_str(&format!("{name}{} {value}\n", sample_labels(&labels)));
                }
                MetricValue::Histogram(h) => {
                    out.push_str(&format!("# TYPE {name} summary\n"));
                    for (q, value) in QUANTILES.iter().zip(h.percentiles(&QUANTILES)) {
                        out.push_str(&format!(
                            "{name}{} {value:.2}\n",
                            quantile_labels(&labels, *q)
                        ));
                    }
                    out.push_str(&format!(
                        "{name}_sum{} {}\n",
                        sample_labels(&labels),
                        h.sum()
                    ));
                    out.push_str(&format!(
                        "{name}_count{} {}\n",
                        sample_labels(&labels),
                        h.count()
                    ));
                }
            }
        });
    }

    Ok(out)
}

fn metric_name(group_type: &str, key: &str) -> String {
    format!("{group_type}_{key}")
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == ':' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn render_labels(keys: &[String], values: &[String]) -> String {
    keys.iter()
        .zip(values)
        .map(|(k, v)| format!("{k}=\"{}\"", escape_label_value(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn escape_label_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn sample_labels(labels: &str) -> String {
    if labels.is_empty() {
        String::new()
    } else {
        format!("{{{labels}}}")
    }
}

fn quantile_labels(labels: &str, q: f64) -> String {
    if labels.is_empty() {
        format!("{{quantile=\"{q}\"}}")
    } else {
        format!("{{{labels},quantile=\"{q}\"}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshstat_core::{HistogramSnapshot, MetricSeries};

    #[test]
    fn render_no_groups_is_empty() {
        let groups: [MetricSeries; 0] = [];
        assert_eq!(render_prometheus(&groups).unwrap(), "");
    }

    #[test]
    fn render_counter_with_labels() {
        let series = MetricSeries::new("listener")
            .with_label("region", "us")
            .with_label("az", "1a")
            .with_metric("request_total", MetricValue::Counter(5));

        let out = render_prometheus(&[series]).unwrap();
        assert!(out.contains("# TYPE listener_request_total counter\n"));
        assert!(out.contains("listener_request_total{az=\"1a\",region=\"us\"} 5\n"));
    }

    #[test]
    fn render_gauges_without_labels() {
        let series = MetricSeries::new("cluster")
            .with_metric("backlog", MetricValue::Gauge(-3))
            .with_metric("load", MetricValue::GaugeFloat(0.25));

        let out = render_prometheus(&[series]).unwrap();
        assert!(out.contains("# TYPE cluster_backlog gauge\n"));
        assert!(out.contains("cluster_backlog -3\n"));
        assert!(out.contains("# TYPE cluster_load gauge\n"));
        assert!(out.contains("cluster_load 0.25\n"));
    }

    #[test]
    fn render_histogram_as_summary() {
        let h = HistogramSnapshot::from_samples((1..=100).collect());
        let series = MetricSeries::new("listener")
            .with_label("region", "us")
            .with_metric("rtt", MetricValue::Histogram(h));

        let out = render_prometheus(&[series]).unwrap();
        assert!(out.contains("# TYPE listener_rtt summary\n"));
        assert!(out.contains("listener_rtt{region=\"us\",quantile=\"0.5\"} 50.50\n"));
        assert!(out.contains("listener_rtt{region=\"us\",quantile=\"0.999\"} 100.00\n"));
        assert!(out.contains("listener_rtt_sum{region=\"us\"} 5050\n"));
        assert!(out.contains("listener_rtt_count{region=\"us\"} 100\n"));
    }

    #[test]
    fn metric_names_are_sanitized() {
        let series = MetricSeries::new("tcp-proxy")
            .with_metric("read.bytes", MetricValue::Counter(1));

        let out = render_prometheus(&[series]).unwrap();
        assert!(out.contains("tcp_proxy_read_bytes 1\n"));
    }

    #[test]
    fn label_values_are_escaped() {
        let series = MetricSeries::new("listener")
            .with_label("addr", "0.0.0.0:80 \"main\"")
            .with_metric("request_total", MetricValue::Counter(1));

        let out = render_prometheus(&[series]).unwrap();
        assert!(out.contains("addr=\"0.0.0.0:80 \\\"main\\\"\""));
    }

    #[test]
    fn mismatched_label_arity_is_an_error() {
        struct Broken {
            keys: Vec<String>,
            values: Vec<String>,
        }
        impl MetricGroup for Broken {
            fn group_type(&self) -> &str {
                "listener"
            }
            fn sorted_labels(&self) -> (&[String], &[String]) {
                (&self.keys, &self.values)
            }
            fn each(&self, _visit: &mut dyn FnMut(&str, &MetricValue)) {}
        }

        let broken = Broken {
            keys: vec!["region".to_string()],
            values: Vec::new(),
        };
        let err = render_prometheus(&[broken]).unwrap_err();
        assert!(matches!(
            err,
            SinkError::LabelArityMismatch { keys: 1, values: 0 }
        ));
    }
}
