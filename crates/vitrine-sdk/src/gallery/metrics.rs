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

//! Metric handles owned by the gallery.

use vitrine_core::telemetry::MetricsResult;
use vitrine_telemetry::{CounterHandle, GaugeHandle, MetricsRegistry};

#[derive(Debug, Clone)]
pub(crate) struct GalleryMetrics {
    pub continuous_instances: GaugeHandle,
    pub mounted_instances: GaugeHandle,
    pub frames: CounterHandle,
}

impl GalleryMetrics {
    pub(crate) fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self {
            continuous_instances: registry.register_gauge(
                "gallery",
                "continuous_instances",
                "Instances rendering continuously in the last frame",
                "count",
            )?,
            mounted_instances: registry.register_gauge(
                "gallery",
                "mounted_instances",
                "Instances currently mounted",
                "count",
            )?,
            frames: registry.register_counter("gallery", "frames", "Frames submitted")?,
        })
    }
}

pub(crate) fn record<T>(result: MetricsResult<T>) {
    if let Err(e) = result {
        log::trace!("Gallery: Metric update failed: {e}");
    }
}
