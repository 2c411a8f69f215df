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

//! Registry for managing metrics.

use crate::storage::{backend::MetricsBackend, memory_backend::InMemoryBackend};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use vitrine_core::telemetry::{Metric, MetricId, MetricValue, MetricsResult};

/// Entry point of the metrics system.
///
/// Registration returns a typed handle; handles are cheap to clone and can be
/// moved into decode workers.
#[derive(Debug, Clone)]
pub struct MetricsRegistry {
    backend: Arc<dyn MetricsBackend>,
}

impl MetricsRegistry {
    /// A registry over a fresh [`InMemoryBackend`].
    pub fn new() -> Self {
        Self {
            backend: Arc::new(InMemoryBackend::new()),
        }
    }

    /// A registry over a custom backend.
    pub fn with_backend(backend: Arc<dyn MetricsBackend>) -> Self {
        Self { backend }
    }

    /// Registers a counter, or returns a handle to the existing one.
    pub fn register_counter(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> MetricsResult<CounterHandle> {
        let id = MetricId::new(namespace, name);
        if !self.backend.contains_metric(&id) {
            self.backend
                .put_metric(Metric::counter(id.clone(), description))?;
        }
        Ok(CounterHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Registers a gauge, or returns a handle to the existing one.
    pub fn register_gauge(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
    ) -> MetricsResult<GaugeHandle> {
        let id = MetricId::new(namespace, name);
        if !self.backend.contains_metric(&id) {
            self.backend
                .put_metric(Metric::gauge(id.clone(), description, unit))?;
        }
        Ok(GaugeHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// Registers a histogram, or returns a handle to the existing one.
    pub fn register_histogram(
        &self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        buckets: Vec<f64>,
    ) -> MetricsResult<HistogramHandle> {
        let id = MetricId::new(namespace, name);
        if !self.backend.contains_metric(&id) {
            self.backend
                .put_metric(Metric::histogram(id.clone(), description, unit, buckets))?;
        }
        Ok(HistogramHandle {
            id,
            backend: self.backend.clone(),
        })
    }

    /// A copy of the metric registered under `id`.
    pub fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.backend.get_metric(id)
    }

    /// Returns `true` if `id` is registered.
    pub fn contains_metric(&self, id: &MetricId) -> bool {
        self.backend.contains_metric(id)
    }

    /// Every metric, sorted by id.
    pub fn snapshot(&self) -> Vec<Metric> {
        let mut metrics = self.backend.list_all_metrics();
        metrics.sort_by_key(|metric| metric.metadata.id.to_string());
        metrics
    }

    /// Every metric in `namespace`.
    pub fn namespace_metrics(&self, namespace: &str) -> Vec<Metric> {
        self.snapshot()
            .into_iter()
            .filter(|metric| metric.metadata.id.namespace == namespace)
            .collect()
    }

    /// Number of registered metrics.
    pub fn metric_count(&self) -> usize {
        self.backend.metric_count()
    }

    /// A JSON object keyed by metric id, for logs and reports.
    pub fn to_json(&self) -> Value {
        let mut out = Map::new();
        for metric in self.snapshot() {
            let value = match metric.value {
                MetricValue::Counter(v) => json!(v),
                MetricValue::Gauge(v) => json!(v),
                MetricValue::Histogram {
                    count,
                    sum,
                    bucket_bounds,
                    bucket_counts,
                } => json!({
                    "count": count,
                    "sum": sum,
                    "mean": if count == 0 { 0.0 } else { sum / count as f64 },
                    "bounds": bucket_bounds,
                    "buckets": bucket_counts,
                }),
            };
            out.insert(metric.metadata.id.to_string(), value);
        }
        Value::Object(out)
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to a registered counter.
#[derive(Debug, Clone)]
pub struct CounterHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl CounterHandle {
    /// Adds one.
    pub fn increment(&self) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, 1)
    }

    /// Adds `amount`.
    pub fn increment_by(&self, amount: u64) -> MetricsResult<u64> {
        self.backend.increment_counter(&self.id, amount)
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<u64> {
        Ok(self
            .backend
            .get_metric(&self.id)?
            .value
            .as_counter()
            .unwrap_or_default())
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle to a registered gauge.
#[derive(Debug, Clone)]
pub struct GaugeHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl GaugeHandle {
    /// Overwrites the value.
    pub fn set(&self, value: f64) -> MetricsResult<()> {
        self.backend.set_gauge(&self.id, value)
    }

    /// Current value.
    pub fn get(&self) -> MetricsResult<f64> {
        Ok(self
            .backend
            .get_metric(&self.id)?
            .value
            .as_gauge()
            .unwrap_or_default())
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

/// Handle to a registered histogram.
#[derive(Debug, Clone)]
pub struct HistogramHandle {
    id: MetricId,
    backend: Arc<dyn MetricsBackend>,
}

impl HistogramHandle {
    /// Records one sample.
    pub fn observe(&self, value: f64) -> MetricsResult<()> {
        self.backend.record_histogram_sample(&self.id, value)
    }

    /// The full metric.
    pub fn get_metric(&self) -> MetricsResult<Metric> {
        self.backend.get_metric(&self.id)
    }

    /// The metric id.
    pub fn id(&self) -> &MetricId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let registry = MetricsRegistry::new();
        let hits = registry
            .register_counter("assets", "cache_hits", "Requests served from the cache")
            .unwrap();
        assert_eq!(hits.increment().unwrap(), 1);
        assert_eq!(hits.increment_by(4).unwrap(), 5);
        assert_eq!(hits.get().unwrap(), 5);
        assert!(registry.contains_metric(hits.id()));
    }

    #[test]
    fn re_registering_keeps_the_value() {
        let registry = MetricsRegistry::new();
        let first = registry
            .register_counter("assets", "load_requests", "Loads started")
            .unwrap();
        first.increment_by(3).unwrap();
        let second = registry
            .register_counter("assets", "load_requests", "Loads started")
            .unwrap();
        assert_eq!(second.get().unwrap(), 3);
        assert_eq!(registry.metric_count(), 1);
    }

    #[test]
    fn gauges_overwrite() {
        let registry = MetricsRegistry::new();
        let entries = registry
            .register_gauge("assets", "cache_entries", "Cached scenes", "count")
            .unwrap();
        entries.set(12.0).unwrap();
        entries.set(7.0).unwrap();
        assert_eq!(entries.get().unwrap(), 7.0);
    }

    #[test]
    fn json_snapshot_is_keyed_by_id() {
        let registry = MetricsRegistry::new();
        registry
            .register_counter("assets", "evictions", "Entries evicted")
            .unwrap()
            .increment_by(2)
            .unwrap();
        let decode = registry
            .register_histogram("assets", "decode_time", "Decode time", "ms", vec![5.0])
            .unwrap();
        decode.observe(2.0).unwrap();
        decode.observe(4.0).unwrap();

        let json = registry.to_json();
        assert_eq!(json["assets:evictions"], 2);
        assert_eq!(json["assets:decode_time"]["count"], 2);
        assert_eq!(json["assets:decode_time"]["mean"], 3.0);
        assert_eq!(registry.namespace_metrics("assets").len(), 2);
        assert!(registry.namespace_metrics("gallery").is_empty());
    }
}
