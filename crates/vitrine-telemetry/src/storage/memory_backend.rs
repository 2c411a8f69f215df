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

use crate::storage::backend::MetricsBackend;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use vitrine_core::telemetry::{Metric, MetricId, MetricsError, MetricsResult};

/// Process-local metric storage behind a `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    storage: RwLock<HashMap<MetricId, Metric>>,
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> MetricsResult<RwLockReadGuard<'_, HashMap<MetricId, Metric>>> {
        self.storage
            .read()
            .map_err(|_| MetricsError::StorageError("metrics lock poisoned".to_string()))
    }

    fn write(&self) -> MetricsResult<RwLockWriteGuard<'_, HashMap<MetricId, Metric>>> {
        self.storage
            .write()
            .map_err(|_| MetricsError::StorageError("metrics lock poisoned".to_string()))
    }

    /// Every metric in `namespace`.
    pub fn get_metrics_by_namespace(&self, namespace: &str) -> Vec<Metric> {
        self.read()
            .map(|storage| {
                storage
                    .values()
                    .filter(|metric| metric.metadata.id.namespace == namespace)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl MetricsBackend for InMemoryBackend {
    fn put_metric(&self, metric: Metric) -> MetricsResult<()> {
        self.write()?.insert(metric.metadata.id.clone(), metric);
        Ok(())
    }

    fn get_metric(&self, id: &MetricId) -> MetricsResult<Metric> {
        self.read()?
            .get(id)
            .cloned()
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))
    }

    fn contains_metric(&self, id: &MetricId) -> bool {
        self.read()
            .map(|storage| storage.contains_key(id))
            .unwrap_or(false)
    }

    fn update_metric(
        &self,
        id: &MetricId,
        update: &mut dyn FnMut(&mut Metric) -> MetricsResult<()>,
    ) -> MetricsResult<()> {
        let mut storage = self.write()?;
        let metric = storage
            .get_mut(id)
            .ok_or_else(|| MetricsError::MetricNotFound(id.clone()))?;
        update(metric)
    }

    fn list_all_metrics(&self) -> Vec<Metric> {
        self.read()
            .map(|storage| storage.values().cloned().collect())
            .unwrap_or_default()
    }

    fn metric_count(&self) -> usize {
        self.read().map(|storage| storage.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use vitrine_core::telemetry::{MetricType, MetricValue};

    #[test]
    fn missing_metric_is_reported() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("assets", "cache_hits");
        assert_eq!(
            backend.increment_counter(&id, 1),
            Err(MetricsError::MetricNotFound(id.clone()))
        );
        assert!(!backend.contains_metric(&id));
    }

    #[test]
    fn wrong_kind_is_a_type_mismatch() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("assets", "cache_entries");
        backend
            .put_metric(Metric::gauge(id.clone(), "entries", "count"))
            .unwrap();
        assert_eq!(
            backend.increment_counter(&id, 1),
            Err(MetricsError::TypeMismatch {
                expected: MetricType::Counter,
                found: MetricType::Gauge,
            })
        );
    }

    #[test]
    fn histogram_samples_land_in_one_bucket() {
        let backend = InMemoryBackend::new();
        let id = MetricId::new("assets", "decode_time");
        backend
            .put_metric(Metric::histogram(id.clone(), "decode", "ms", vec![1.0, 10.0]))
            .unwrap();
        for sample in [0.5, 1.0, 4.0, 50.0] {
            backend.record_histogram_sample(&id, sample).unwrap();
        }
        match backend.get_metric(&id).unwrap().value {
            MetricValue::Histogram {
                count,
                sum,
                bucket_counts,
                ..
            } => {
                assert_eq!(count, 4);
                assert_eq!(sum, 55.5);
                assert_eq!(bucket_counts, vec![2, 1, 1]);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let backend = Arc::new(InMemoryBackend::new());
        let id = MetricId::new("assets", "loads_completed");
        backend
            .put_metric(Metric::counter(id.clone(), "loads"))
            .unwrap();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let backend = Arc::clone(&backend);
                let id = id.clone();
                thread::spawn(move || {
                    for _ in 0..250 {
                        backend.increment_counter(&id, 1).unwrap();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(
            backend.get_metric(&id).unwrap().value.as_counter(),
            Some(1_000)
        );
    }
}
