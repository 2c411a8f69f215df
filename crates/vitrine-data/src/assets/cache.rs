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

//! A bounded, insertion-ordered store of decoded assets.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use vitrine_core::asset::{Asset, AssetHandle, AssetPath};

/// Maps asset paths to decoded assets and evicts in insertion order.
///
/// Eviction ignores access recency: a `get` never moves an entry. Replacing
/// the value of an existing key keeps the key's original position.
pub struct AssetCache<A: Asset> {
    order: VecDeque<AssetPath>,
    entries: HashMap<AssetPath, AssetHandle<A>>,
}

impl<A: Asset> Default for AssetCache<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Asset> AssetCache<A> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    /// Returns a handle to the cached asset for `path`, if present.
    pub fn get(&self, path: &AssetPath) -> Option<AssetHandle<A>> {
        self.entries.get(path).cloned()
    }

    /// Stores `handle` under `path`, replacing any previous value.
    ///
    /// Returns `true` if the key was not present before.
    pub fn put(&mut self, path: AssetPath, handle: AssetHandle<A>) -> bool {
        match self.entries.insert(path.clone(), handle) {
            Some(_) => false,
            None => {
                self.order.push_back(path);
                true
            }
        }
    }

    /// Drops the oldest entries until at most `max_entries` remain.
    ///
    /// Returns the evicted keys, oldest first.
    pub fn evict_if_over_capacity(&mut self, max_entries: usize) -> Vec<AssetPath> {
        let mut evicted = Vec::new();
        while self.entries.len() > max_entries {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            if self.entries.remove(&oldest).is_some() {
                log::debug!("AssetCache: Evicted '{oldest}'.");
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if `path` is cached.
    pub fn contains(&self, path: &AssetPath) -> bool {
        self.entries.contains_key(path)
    }

    /// Cached keys, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = &AssetPath> {
        self.order.iter()
    }
}

/// The shared, explicitly injected handle to the gallery's single cache.
///
/// Decode workers and the loop thread all go through the same mutex. Every
/// operation holds the lock only for the duration of the call.
pub struct AssetCacheHandle<A: Asset> {
    inner: Arc<Mutex<AssetCache<A>>>,
    max_entries: usize,
}

impl<A: Asset> Clone for AssetCacheHandle<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            max_entries: self.max_entries,
        }
    }
}

impl<A: Asset> AssetCacheHandle<A> {
    /// Creates an empty shared cache bounded to `max_entries`.
    pub fn new(max_entries: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AssetCache::new())),
            max_entries,
        }
    }

    fn lock(&self) -> MutexGuard<'_, AssetCache<A>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// The configured capacity.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// See [`AssetCache::get`].
    pub fn get(&self, path: &AssetPath) -> Option<AssetHandle<A>> {
        self.lock().get(path)
    }

    /// Stores `handle` under `path`. Does not evict.
    pub fn put(&self, path: AssetPath, handle: AssetHandle<A>) -> bool {
        self.lock().put(path, handle)
    }

    /// See [`AssetCache::evict_if_over_capacity`].
    pub fn evict_if_over_capacity(&self, max_entries: usize) -> Vec<AssetPath> {
        self.lock().evict_if_over_capacity(max_entries)
    }

    /// Evicts down to the configured capacity.
    pub fn evict_to_capacity(&self) -> Vec<AssetPath> {
        self.evict_if_over_capacity(self.max_entries)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns `true` if `path` is cached.
    pub fn contains(&self, path: &AssetPath) -> bool {
        self.lock().contains(path)
    }

    /// A snapshot of the cached keys, oldest first.
    pub fn keys(&self) -> Vec<AssetPath> {
        self.lock().keys().cloned().collect()
    }
}
