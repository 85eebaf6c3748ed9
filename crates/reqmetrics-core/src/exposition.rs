//! Prometheus text exposition (format 0.0.4).
//!
//! Output is a pure function of the snapshot: families in registration order,
//! series in label order, so the same snapshot always renders to the same
//! bytes.

use std::fmt::Write;

use crate::descriptor::MetricDescriptor;
use crate::error::{MetricsError, Result};
use crate::registry::RegistrySnapshot;
use crate::store::{FamilySnapshot, HistogramValue, SeriesValue};

/// Media type for the text exposition format.
pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Escape a label value (backslash, double quote, newline).
pub fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape HELP text (backslash, newline).
pub fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Shortest round-trip float, with the format's spelling of the specials.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{v}")
    }
}

/// Render a full registry snapshot.
pub fn render(snapshot: &RegistrySnapshot) -> Result<String> {
    let mut out = String::new();
    for family in &snapshot.families {
        render_family(family, &mut out)
            .map_err(|_| MetricsError::Internal(format!("render {} failed", family.descriptor.name)))?;
    }
    Ok(out)
}

fn render_family(family: &FamilySnapshot, out: &mut String) -> std::fmt::Result {
    let d = &family.descriptor;
    writeln!(out, "# HELP {} {}", d.name, escape_help(&d.help))?;
    writeln!(out, "# TYPE {} {}", d.name, d.kind)?;

    for (labels, value) in &family.series {
        let label_str = label_pairs(d, labels);
        match value {
            SeriesValue::Counter(v) | SeriesValue::Gauge(v) => {
                writeln!(out, "{}{} {}", d.name, braced(&label_str), format_value(*v))?;
            }
            SeriesValue::Histogram(h) => render_histogram(d, &label_str, h, out)?,
        }
    }
    Ok(())
}

fn render_histogram(
    d: &MetricDescriptor,
    label_str: &str,
    h: &HistogramValue,
    out: &mut String,
) -> std::fmt::Result {
    let prefix = if label_str.is_empty() {
        String::new()
    } else {
        format!("{label_str},")
    };

    for (le, count) in d.buckets.iter().zip(&h.buckets) {
        writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", d.name, prefix, format_value(*le), count)?;
    }
    writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", d.name, prefix, h.count)?;
    writeln!(out, "{}_sum{} {}", d.name, braced(label_str), format_value(h.sum))?;
    writeln!(out, "{}_count{} {}", d.name, braced(label_str), h.count)?;
    Ok(())
}

fn label_pairs(d: &MetricDescriptor, values: &[String]) -> String {
    d.label_names
        .iter()
        .zip(values)
        .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
        .collect::<Vec<_>>()
        .join(",")
}

fn braced(label_str: &str) -> String {
    if label_str.is_empty() {
        String::new()
    } else {
        format!("{{{label_str}}}")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::Registry;

    #[test]
    fn escapes() {
        assert_eq!(escape_label(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_label("x\ny"), "x\\ny");
        assert_eq!(escape_help("multi\nline \\"), "multi\\nline \\\\");
    }

    #[test]
    fn value_formatting() {
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(0.1), "0.1");
        assert_eq!(format_value(-2.5), "-2.5");
        assert_eq!(format_value(f64::INFINITY), "+Inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_value(f64::NAN), "NaN");
    }

    #[test]
    fn unlabeled_metric_has_no_braces() {
        let reg = Registry::new();
        let g = reg.register_gauge("in_flight", "In-flight requests", &[]).unwrap();
        g.set(&[], 2.0).unwrap();
        let text = render(&reg.snapshot().unwrap()).unwrap();
        assert_eq!(
            text,
            "# HELP in_flight In-flight requests\n# TYPE in_flight gauge\nin_flight 2\n"
        );
    }

    #[test]
    fn registered_but_untouched_metric_renders_header_only() {
        let reg = Registry::new();
        reg.register_counter("idle_total", "never used", &["x"]).unwrap();
        let text = render(&reg.snapshot().unwrap()).unwrap();
        assert_eq!(text, "# HELP idle_total never used\n# TYPE idle_total counter\n");
    }

    #[test]
    fn unlabeled_histogram() {
        let reg = Registry::new();
        let h = reg.register_histogram("h", "h", &[], &[1.0]).unwrap();
        h.observe(&[], 0.5).unwrap();
        let text = render(&reg.snapshot().unwrap()).unwrap();
        assert!(text.contains("h_bucket{le=\"1\"} 1\n"));
        assert!(text.contains("h_bucket{le=\"+Inf\"} 1\n"));
        assert!(text.contains("h_sum 0.5\n"));
        assert!(text.contains("h_count 1\n"));
    }
}
