//! Series storage for one metric family.
//!
//! A `SeriesStore` maps a label set to its current value. Series are created
//! lazily by [`SeriesStore::update`]; nothing else inserts into the map, so
//! this is the single place label cardinality can grow. Values are mutated
//! while the DashMap shard write guard is held and copied under the read
//! guard, so a snapshot never sees a half-applied histogram observation.

use std::sync::Arc;

use dashmap::DashMap;

use crate::descriptor::{MetricDescriptor, MetricKind};
use crate::error::{MetricsError, Result};

/// Label values in the same order as the descriptor's `label_names`.
pub type LabelSet = Vec<String>;

/// A single mutation applied to one series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Update {
    /// Counter: add a non-negative delta.
    Increment(f64),
    /// Gauge: overwrite.
    Set(f64),
    /// Gauge: signed relative adjustment.
    Adjust(f64),
    /// Histogram: record one observation.
    Observe(f64),
}

impl Update {
    fn name(self) -> &'static str {
        match self {
            Update::Increment(_) => "increment",
            Update::Set(_) => "set",
            Update::Adjust(_) => "adjust",
            Update::Observe(_) => "observe",
        }
    }
}

/// Histogram state. `buckets` is cumulative and has one slot per configured
/// bound plus a trailing `+Inf` slot, which always equals `count`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramValue {
    pub buckets: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

impl HistogramValue {
    fn new(bounds: usize) -> Self {
        Self {
            buckets: vec![0; bounds + 1],
            sum: 0.0,
            count: 0,
        }
    }

    fn observe(&mut self, bounds: &[f64], v: f64) {
        for (slot, &le) in self.buckets.iter_mut().zip(bounds) {
            if v <= le {
                *slot += 1;
            }
        }
        if let Some(inf) = self.buckets.last_mut() {
            *inf += 1;
        }
        self.sum += v;
        self.count += 1;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesValue {
    Counter(f64),
    Gauge(f64),
    Histogram(HistogramValue),
}

/// Point-in-time copy of one family, series sorted by label values.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilySnapshot {
    pub descriptor: Arc<MetricDescriptor>,
    pub series: Vec<(LabelSet, SeriesValue)>,
}

pub struct SeriesStore {
    descriptor: Arc<MetricDescriptor>,
    series: DashMap<LabelSet, SeriesValue>,
}

impl SeriesStore {
    pub(crate) fn new(descriptor: MetricDescriptor) -> Self {
        Self {
            descriptor: Arc::new(descriptor),
            series: DashMap::new(),
        }
    }

    pub fn descriptor(&self) -> &MetricDescriptor {
        &self.descriptor
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Apply `op` to the series for `labels`, creating it at zero first.
    /// Rejected updates leave the store untouched.
    pub fn update(&self, labels: &[&str], op: Update) -> Result<()> {
        self.check_labels(labels.len())?;
        self.check_op(op)?;

        let key: LabelSet = labels.iter().map(|v| v.to_string()).collect();
        let mut entry = self.series.entry(key).or_insert_with(|| self.zero());

        match (entry.value_mut(), op) {
            (SeriesValue::Counter(v), Update::Increment(d)) => *v += d,
            (SeriesValue::Gauge(v), Update::Set(x)) => *v = x,
            (SeriesValue::Gauge(v), Update::Adjust(d)) => *v += d,
            (SeriesValue::Histogram(h), Update::Observe(x)) => h.observe(&self.descriptor.buckets, x),
            // check_op already matched kind against op
            _ => return Err(self.kind_mismatch(op)),
        }
        Ok(())
    }

    /// Current value for `labels`, if the series has been materialized.
    pub fn get(&self, labels: &[&str]) -> Option<SeriesValue> {
        let key: LabelSet = labels.iter().map(|v| v.to_string()).collect();
        self.series.get(&key).map(|r| r.value().clone())
    }

    /// Number of materialized series.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn snapshot(&self) -> FamilySnapshot {
        let mut series: Vec<(LabelSet, SeriesValue)> = self
            .series
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        series.sort_by(|a, b| a.0.cmp(&b.0));

        FamilySnapshot {
            descriptor: Arc::clone(&self.descriptor),
            series,
        }
    }

    fn zero(&self) -> SeriesValue {
        match self.descriptor.kind {
            MetricKind::Counter => SeriesValue::Counter(0.0),
            MetricKind::Gauge => SeriesValue::Gauge(0.0),
            MetricKind::Histogram => {
                SeriesValue::Histogram(HistogramValue::new(self.descriptor.buckets.len()))
            }
        }
    }

    fn check_labels(&self, got: usize) -> Result<()> {
        let expected = self.descriptor.label_names.len();
        if got != expected {
            return Err(MetricsError::LabelCardinalityMismatch {
                metric: self.descriptor.name.clone(),
                expected,
                got,
            });
        }
        Ok(())
    }

    fn check_op(&self, op: Update) -> Result<()> {
        match (self.descriptor.kind, op) {
            (MetricKind::Counter, Update::Increment(d)) => {
                if d < 0.0 || !d.is_finite() {
                    return Err(MetricsError::InvalidDelta {
                        metric: self.descriptor.name.clone(),
                        delta: d,
                    });
                }
                Ok(())
            }
            (MetricKind::Gauge, Update::Set(_) | Update::Adjust(_)) => Ok(()),
            (MetricKind::Histogram, Update::Observe(v)) => {
                if !v.is_finite() {
                    return Err(MetricsError::InvalidObservation {
                        metric: self.descriptor.name.clone(),
                        value: v,
                    });
                }
                Ok(())
            }
            _ => Err(self.kind_mismatch(op)),
        }
    }

    fn kind_mismatch(&self, op: Update) -> MetricsError {
        MetricsError::KindMismatch {
            metric: self.descriptor.name.clone(),
            kind: self.descriptor.kind.as_str(),
            op: op.name(),
        }
    }
}
