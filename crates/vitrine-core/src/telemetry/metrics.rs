// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt::{self, Display};
use thiserror::Error;

/// A namespaced metric name with optional labels, e.g. `assets:cache_hits`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetricId {
    /// Subsystem, e.g. `assets` or `gallery`.
    pub namespace: String,
    /// Metric name within the namespace.
    pub name: String,
    /// Label pairs, kept sorted by key.
    pub labels: Vec<(String, String)>,
}

impl MetricId {
    /// Creates an unlabelled id.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            labels: Vec::new(),
        }
    }

    /// Adds a label and returns the id.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.push((key.into(), value.into()));
        self.labels.sort_by(|a, b| a.0.cmp(&b.0));
        self
    }
}

impl Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if !self.labels.is_empty() {
            let labels = self
                .labels
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(",");
            write!(f, "[{labels}]")?;
        }
        Ok(())
    }
}

/// The kind of a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Monotonic count.
    Counter,
    /// Point-in-time value.
    Gauge,
    /// Bucketed distribution.
    Histogram,
}

/// The current value of a metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    /// Counter value.
    Counter(u64),
    /// Gauge value.
    Gauge(f64),
    /// Histogram state.
    Histogram {
        /// Number of recorded samples.
        count: u64,
        /// Sum of recorded samples.
        sum: f64,
        /// Inclusive upper bound of each bucket.
        bucket_bounds: Vec<f64>,
        /// Samples per bucket. One extra trailing slot counts overflow.
        bucket_counts: Vec<u64>,
    },
}

impl MetricValue {
    /// The [`MetricType`] of this value.
    pub fn metric_type(&self) -> MetricType {
        match self {
            MetricValue::Counter(_) => MetricType::Counter,
            MetricValue::Gauge(_) => MetricType::Gauge,
            MetricValue::Histogram { .. } => MetricType::Histogram,
        }
    }

    /// Counter value, if this is a counter.
    pub fn as_counter(&self) -> Option<u64> {
        match self {
            MetricValue::Counter(v) => Some(*v),
            _ => None,
        }
    }

    /// Gauge value, if this is a gauge.
    pub fn as_gauge(&self) -> Option<f64> {
        match self {
            MetricValue::Gauge(v) => Some(*v),
            _ => None,
        }
    }

    /// Sample count, if this is a histogram.
    pub fn histogram_count(&self) -> Option<u64> {
        match self {
            MetricValue::Histogram { count, .. } => Some(*count),
            _ => None,
        }
    }
}

/// Static description of a metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricMetadata {
    /// Identifier.
    pub id: MetricId,
    /// Kind.
    pub metric_type: MetricType,
    /// Human-readable description.
    pub description: String,
    /// Unit, e.g. `count` or `ms`.
    pub unit: String,
}

/// A metric together with its description.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Description.
    pub metadata: MetricMetadata,
    /// Current value.
    pub value: MetricValue,
}

impl Metric {
    /// A counter starting at zero.
    pub fn counter(id: MetricId, description: impl Into<String>) -> Self {
        Self {
            metadata: MetricMetadata {
                id,
                metric_type: MetricType::Counter,
                description: description.into(),
                unit: "count".to_string(),
            },
            value: MetricValue::Counter(0),
        }
    }

    /// A gauge starting at zero.
    pub fn gauge(id: MetricId, description: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            metadata: MetricMetadata {
                id,
                metric_type: MetricType::Gauge,
                description: description.into(),
                unit: unit.into(),
            },
            value: MetricValue::Gauge(0.0),
        }
    }

    /// An empty histogram. `bucket_bounds` must be sorted ascending.
    pub fn histogram(
        id: MetricId,
        description: impl Into<String>,
        unit: impl Into<String>,
        bucket_bounds: Vec<f64>,
    ) -> Self {
        let bucket_counts = vec![0; bucket_bounds.len() + 1];
        Self {
            metadata: MetricMetadata {
                id,
                metric_type: MetricType::Histogram,
                description: description.into(),
                unit: unit.into(),
            },
            value: MetricValue::Histogram {
                count: 0,
                sum: 0.0,
                bucket_bounds,
                bucket_counts,
            },
        }
    }
}

/// Result alias for metric operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Errors raised by metric operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricsError {
    /// No metric is registered under the id.
    #[error("metric not found: {0}")]
    MetricNotFound(MetricId),
    /// The operation does not apply to the metric's kind.
    #[error("type mismatch: expected {expected:?}, found {found:?}")]
    TypeMismatch {
        /// Kind the operation needs.
        expected: MetricType,
        /// Kind actually registered.
        found: MetricType,
    },
    /// The storage layer failed, e.g. a poisoned lock.
    #[error("storage error: {0}")]
    StorageError(String),
    /// The operation was malformed, e.g. unsorted histogram bounds.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_sorted_and_displayed() {
        let id = MetricId::new("assets", "load_failures")
            .with_label("stage", "decode")
            .with_label("kind", "fallback");
        assert_eq!(id.labels[0].0, "kind");
        assert_eq!(id.to_string(), "assets:load_failures[kind=fallback,stage=decode]");
        assert_eq!(MetricId::new("assets", "cache_hits").to_string(), "assets:cache_hits");
    }

    #[test]
    fn histogram_has_overflow_bucket() {
        let m = Metric::histogram(
            MetricId::new("assets", "decode_time"),
            "Decode time",
            "ms",
            vec![1.0, 5.0, 25.0],
        );
        match m.value {
            MetricValue::Histogram { bucket_counts, .. } => assert_eq!(bucket_counts.len(), 4),
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn accessors_match_kind() {
        assert_eq!(MetricValue::Counter(3).as_counter(), Some(3));
        assert_eq!(MetricValue::Counter(3).as_gauge(), None);
        assert_eq!(MetricValue::Gauge(2.5).as_gauge(), Some(2.5));
        assert_eq!(MetricValue::Gauge(2.5).metric_type(), MetricType::Gauge);
    }
}
