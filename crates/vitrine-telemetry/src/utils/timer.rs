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

//! RAII timers that feed histograms.

use crate::metrics::registry::HistogramHandle;
use vitrine_core::Stopwatch;

/// Records the time between its creation and its drop, in milliseconds.
pub struct ScopedMetricTimer<'a> {
    stopwatch: Stopwatch,
    histogram: &'a HistogramHandle,
}

impl<'a> ScopedMetricTimer<'a> {
    /// Starts timing into `histogram`.
    pub fn new(histogram: &'a HistogramHandle) -> Self {
        Self {
            stopwatch: Stopwatch::start(),
            histogram,
        }
    }
}

impl Drop for ScopedMetricTimer<'_> {
    fn drop(&mut self) {
        if let Some(elapsed_ms) = self.stopwatch.elapsed_ms_f64() {
            if let Err(e) = self.histogram.observe(elapsed_ms) {
                log::warn!("[ScopedMetricTimer] Failed to record {}: {e}", self.histogram.id());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetricsRegistry;

    #[test]
    fn drop_records_one_sample() {
        let registry = MetricsRegistry::new();
        let histogram = registry
            .register_histogram("assets", "decode_time", "Decode time", "ms", vec![1.0, 10.0])
            .unwrap();
        {
            let _timer = ScopedMetricTimer::new(&histogram);
        }
        let metric = histogram.get_metric().unwrap();
        assert_eq!(metric.value.histogram_count(), Some(1));
    }
}
