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

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use vitrine_core::asset::{Asset, AssetHandle, AssetPath};
use vitrine_data::AssetCache;

struct Payload(#[allow(dead_code)] Vec<u8>);
impl Asset for Payload {}

fn bench_cache(c: &mut Criterion) {
    let paths: Vec<AssetPath> = (1..=1_000)
        .map(|id| AssetPath::for_species("", id, None))
        .collect();

    let mut group = c.benchmark_group("AssetCache");

    group.bench_function("put + evict (capacity 50)", |b| {
        b.iter(|| {
            let mut cache = AssetCache::new();
            for path in &paths {
                cache.put(path.clone(), AssetHandle::new(Payload(Vec::new())));
                black_box(cache.evict_if_over_capacity(50));
            }
            black_box(cache.len());
        });
    });

    let mut warm = AssetCache::new();
    for path in paths.iter().take(50) {
        warm.put(path.clone(), AssetHandle::new(Payload(vec![0; 64])));
    }
    group.bench_function("get (hit)", |b| {
        b.iter(|| {
            for path in paths.iter().take(50) {
                black_box(warm.get(path));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cache);
criterion_main!(benches);
