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

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use vitrine_agents::{AssetAgent, LoadExecutor, LoadJob};
use vitrine_core::asset::{AssetPath, AssetSource, LoadError};
use vitrine_core::scene::SceneGraph;
use vitrine_core::viewport::{
    ElementHandle, IntersectionEntry, IntersectionSink, ObserverConfig, SubscriptionHandle,
    ViewportObserver,
};
use vitrine_data::AssetCacheHandle;
use vitrine_lanes::{GlbWriter, GltfSceneLane};

/// An in-memory source keyed by normalized path, recording every fetch.
#[derive(Default)]
pub struct MapSource {
    files: HashMap<String, Vec<u8>>,
    fetches: Mutex<Vec<String>>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, normalized: &str) -> Self {
        self.files
            .insert(normalized.to_string(), GlbWriter::triangle(normalized).to_bytes());
        self
    }

    pub fn with_bytes(mut self, normalized: &str, bytes: Vec<u8>) -> Self {
        self.files.insert(normalized.to_string(), bytes);
        self
    }

    pub fn fetches(&self) -> Vec<String> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, normalized: &str) -> usize {
        self.fetches
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.as_str() == normalized)
            .count()
    }
}

impl AssetSource for MapSource {
    fn fetch(&self, path: &AssetPath) -> Result<Vec<u8>, LoadError> {
        self.fetches.lock().unwrap().push(path.as_str().to_string());
        self.files
            .get(path.as_str())
            .cloned()
            .ok_or_else(|| LoadError::Fetch {
                path: path.clone(),
                message: "not found".into(),
            })
    }
}

/// Holds jobs until the test runs them.
#[derive(Clone, Default)]
pub struct DeferredExecutor {
    jobs: Arc<Mutex<Vec<LoadJob>>>,
}

impl DeferredExecutor {
    pub fn pending(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    pub fn run_all(&self) -> usize {
        let jobs: Vec<LoadJob> = std::mem::take(&mut *self.jobs.lock().unwrap());
        let count = jobs.len();
        for job in jobs {
            job();
        }
        count
    }
}

impl LoadExecutor for DeferredExecutor {
    fn spawn(&self, job: LoadJob) {
        self.jobs.lock().unwrap().push(job);
    }

    fn name(&self) -> &'static str {
        "deferred"
    }
}

/// Hands out subscriptions and remembers which are active.
#[derive(Default)]
pub struct RecordingObserver {
    next: u64,
    pub active: HashSet<SubscriptionHandle>,
    pub configs: HashMap<SubscriptionHandle, (ElementHandle, ObserverConfig)>,
}

impl ViewportObserver for RecordingObserver {
    fn observe(
        &mut self,
        element: ElementHandle,
        config: ObserverConfig,
        _sink: IntersectionSink,
    ) -> SubscriptionHandle {
        self.next += 1;
        let handle = SubscriptionHandle(self.next);
        self.active.insert(handle);
        self.configs.insert(handle, (element, config));
        handle
    }

    fn unobserve(&mut self, subscription: SubscriptionHandle) {
        self.active.remove(&subscription);
    }
}

pub fn scene_agent(
    source: Arc<MapSource>,
    executor: Box<dyn LoadExecutor>,
    capacity: usize,
) -> AssetAgent<SceneGraph> {
    AssetAgent::new(
        source,
        Arc::new(GltfSceneLane::new()),
        executor,
        AssetCacheHandle::new(capacity),
    )
}

pub fn entry(subscription: SubscriptionHandle, is_intersecting: bool) -> IntersectionEntry {
    IntersectionEntry {
        subscription,
        is_intersecting,
        ratio: if is_intersecting { 1.0 } else { 0.0 },
    }
}
