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

//! The asset loader agent.

use super::executor::{LoadExecutor, LoadJob};
use super::metrics::{record, AssetMetrics};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use vitrine_core::asset::{Asset, AssetHandle, AssetPath, AssetSource, LoadError};
use vitrine_core::{InstanceId, Liveness};
use vitrine_data::AssetCacheHandle;
use vitrine_lanes::AssetLoaderLane;
use vitrine_telemetry::{MetricsRegistry, ScopedMetricTimer};

/// The immediate answer to a request.
#[derive(Debug)]
pub enum LoadTicket<A: Asset> {
    /// The path was cached; the asset is available right away.
    Ready(AssetHandle<A>),
    /// A load was dispatched; its [`LoadCompletion`] arrives through
    /// [`AssetAgent::poll_completions`].
    Pending,
}

/// The outcome of a dispatched load, addressed to its requester.
#[derive(Debug)]
pub struct LoadCompletion<A: Asset> {
    /// The instance that asked.
    pub requester: InstanceId,
    /// The requester's load generation at the time of the request.
    pub generation: u64,
    /// The requested path (cache key).
    pub path: AssetPath,
    /// The decoded asset, or why there is none.
    pub result: Result<AssetHandle<A>, LoadError>,
}

struct Delivery<A> {
    requester: InstanceId,
    generation: u64,
    path: AssetPath,
    liveness: Liveness,
    result: Result<A, LoadError>,
}

/// Loads assets of type `A` through the shared cache.
pub struct AssetAgent<A: Asset> {
    source: Arc<dyn AssetSource>,
    lane: Arc<dyn AssetLoaderLane<A>>,
    executor: Box<dyn LoadExecutor>,
    cache: AssetCacheHandle<A>,
    sender: Sender<Delivery<A>>,
    receiver: Receiver<Delivery<A>>,
    metrics: Option<AssetMetrics>,
    in_flight: usize,
}

impl<A: Asset> AssetAgent<A> {
    /// Creates an agent reading from `source`, decoding with `lane` on `executor`
    /// and caching into `cache`.
    pub fn new(
        source: Arc<dyn AssetSource>,
        lane: Arc<dyn AssetLoaderLane<A>>,
        executor: Box<dyn LoadExecutor>,
        cache: AssetCacheHandle<A>,
    ) -> Self {
        log::info!(
            "AssetAgent: {} {} lane on {} executor, cache capacity {}.",
            lane.strategy_name(),
            lane.lane_kind(),
            executor.name(),
            cache.max_entries()
        );
        let (sender, receiver) = unbounded();
        Self {
            source,
            lane,
            executor,
            cache,
            sender,
            receiver,
            metrics: None,
            in_flight: 0,
        }
    }

    /// Reports into `registry` under the `assets` namespace.
    pub fn with_metrics(mut self, registry: &MetricsRegistry) -> Self {
        self.metrics = AssetMetrics::register(registry);
        self
    }

    /// The shared cache this agent populates.
    pub fn cache(&self) -> &AssetCacheHandle<A> {
        &self.cache
    }

    /// Loads dispatched and not yet polled.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Serves `path` from the cache, or dispatches a load for it.
    ///
    /// `liveness` is carried with the load so that a completion for an instance
    /// that has unmounted in the meantime is dropped instead of delivered.
    pub fn request(
        &mut self,
        requester: InstanceId,
        generation: u64,
        path: &AssetPath,
        liveness: &Liveness,
    ) -> LoadTicket<A> {
        if let Some(metrics) = &self.metrics {
            record(metrics.load_requests.increment());
        }

        if let Some(handle) = self.cache.get(path) {
            log::trace!("AssetAgent: Cache hit for '{path}' ({requester}).");
            if let Some(metrics) = &self.metrics {
                record(metrics.cache_hits.increment());
            }
            return LoadTicket::Ready(handle);
        }

        log::debug!("AssetAgent: Loading '{path}' for {requester} (generation {generation}).");
        let job = self.make_job(requester, generation, path.clone(), liveness.clone());
        self.in_flight += 1;
        self.executor.spawn(job);
        LoadTicket::Pending
    }

    fn make_job(
        &self,
        requester: InstanceId,
        generation: u64,
        path: AssetPath,
        liveness: Liveness,
    ) -> LoadJob {
        let source = Arc::clone(&self.source);
        let lane = Arc::clone(&self.lane);
        let sender = self.sender.clone();
        let decode_time = self.metrics.as_ref().map(|m| m.decode_time.clone());

        Box::new(move || {
            let result = {
                let _timer = decode_time.as_ref().map(ScopedMetricTimer::new);
                source
                    .fetch(&AssetPath::new(path.normalized()))
                    .and_then(|bytes| {
                        lane.load(&bytes).map_err(|e| LoadError::Decode {
                            path: path.clone(),
                            message: e.to_string(),
                        })
                    })
            };
            let delivery = Delivery {
                requester,
                generation,
                path,
                liveness,
                result,
            };
            if sender.send(delivery).is_err() {
                log::debug!("AssetAgent: Agent dropped before a load finished.");
            }
        })
    }

    /// Applies every finished load.
    ///
    /// Successful loads for live requesters are cached (followed by an eviction
    /// pass) and returned. Failures are returned without touching the cache.
    /// Loads whose requester unmounted are dropped and not cached.
    pub fn poll_completions(&mut self) -> Vec<LoadCompletion<A>> {
        let mut completions = Vec::new();
        let mut inserted = false;

        for delivery in self.receiver.try_iter() {
            self.in_flight = self.in_flight.saturating_sub(1);

            if !delivery.liveness.is_alive() {
                log::debug!(
                    "AssetAgent: Discarding late completion of '{}' for unmounted {}.",
                    delivery.path,
                    delivery.requester
                );
                if let Some(metrics) = &self.metrics {
                    record(metrics.discarded_completions.increment());
                }
                continue;
            }

            let result = match delivery.result {
                Ok(asset) => {
                    let handle = AssetHandle::new(asset);
                    self.cache.put(delivery.path.clone(), handle.clone());
                    inserted = true;
                    if let Some(metrics) = &self.metrics {
                        record(metrics.loads_completed.increment());
                    }
                    Ok(handle)
                }
                Err(error) => {
                    if let Some(metrics) = &self.metrics {
                        record(metrics.load_failures.increment());
                    }
                    Err(error)
                }
            };

            completions.push(LoadCompletion {
                requester: delivery.requester,
                generation: delivery.generation,
                path: delivery.path,
                result,
            });
        }

        if inserted {
            self.evict();
        }
        completions
    }

    /// The periodic eviction pass, independent of any insert.
    pub fn sweep(&self) -> Vec<AssetPath> {
        log::trace!("AssetAgent: Cache sweep ({} entries).", self.cache.len());
        self.evict()
    }

    /// Records a failure that never reached the executor's channel, e.g. a timeout.
    pub fn record_failure(&self, error: &LoadError) {
        log::debug!("AssetAgent: {error}");
        if let Some(metrics) = &self.metrics {
            record(metrics.load_failures.increment());
        }
    }

    fn evict(&self) -> Vec<AssetPath> {
        let evicted = self.cache.evict_to_capacity();
        if !evicted.is_empty() {
            log::debug!(
                "AssetAgent: Evicted {} scenes, {} remain cached.",
                evicted.len(),
                self.cache.len()
            );
        }
        if let Some(metrics) = &self.metrics {
            if !evicted.is_empty() {
                record(metrics.evictions.increment_by(evicted.len() as u64));
            }
            record(metrics.cache_entries.set(self.cache.len() as f64));
        }
        evicted
    }
}
