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

//! Metric handles owned by the asset agent.

use vitrine_core::telemetry::MetricsResult;
use vitrine_telemetry::{CounterHandle, GaugeHandle, HistogramHandle, MetricsRegistry};

const DECODE_BUCKETS_MS: [f64; 6] = [1.0, 5.0, 16.0, 33.0, 100.0, 500.0];

#[derive(Debug, Clone)]
pub(crate) struct AssetMetrics {
    pub load_requests: CounterHandle,
    pub cache_hits: CounterHandle,
    pub loads_completed: CounterHandle,
    pub load_failures: CounterHandle,
    pub discarded_completions: CounterHandle,
    pub evictions: CounterHandle,
    pub decode_time: HistogramHandle,
    pub cache_entries: GaugeHandle,
}

impl AssetMetrics {
    fn try_register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            load_requests: registry.register_counter(
                "assets",
                "load_requests",
                "Scene requests received",
            )?,
            cache_hits: registry.register_counter(
                "assets",
                "cache_hits",
                "Requests served from the cache",
            )?,
            loads_completed: registry.register_counter(
                "assets",
                "loads_completed",
                "Loads decoded and cached",
            )?,
            load_failures: registry.register_counter(
                "assets",
                "load_failures",
                "Loads that failed to fetch, decode or finish in time",
            )?,
            discarded_completions: registry.register_counter(
                "assets",
                "discarded_completions",
                "Completions dropped because the requester unmounted",
            )?,
            evictions: registry.register_counter("assets", "evictions", "Cache entries evicted")?,
            decode_time: registry.register_histogram(
                "assets",
                "decode_time",
                "Fetch and decode time",
                "ms",
                DECODE_BUCKETS_MS.to_vec(),
            )?,
            cache_entries: registry.register_gauge(
                "assets",
                "cache_entries",
                "Scenes currently cached",
                "count",
            )?,
        })
    }

    pub(crate) fn register(registry: &MetricsRegistry) -> Option<Self> {
        match Self::try_register(registry) {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                log::warn!("AssetAgent: Metrics unavailable: {e}");
                None
            }
        }
    }
}

/// Applies a metric update, logging instead of failing.
pub(crate) fn record<T>(result: MetricsResult<T>) {
    if let Err(e) = result {
        log::trace!("AssetAgent: Metric update failed: {e}");
    }
}
