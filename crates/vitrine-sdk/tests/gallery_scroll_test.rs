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

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use vitrine_core::asset::{AssetHandle, AssetPath};
use vitrine_core::config::CacheConfig;
use vitrine_core::control::{FrameMode, RenderBudget};
use vitrine_core::scene::SceneGraph;
use vitrine_core::viewport::ElementHandle;
use vitrine_core::GalleryConfig;
use vitrine_data::LoadState;
use vitrine_infra::{HeadlessRenderer, SimulatedViewport, SyntheticSceneSource};
use vitrine_sdk::prelude::ViewerProps;
use vitrine_sdk::{Catalog, Gallery, ListLayout, SpeciesRecord, VariantTable};

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn catalog(count: u32) -> Catalog {
    let types = ["fire", "water", "grass", "electric"];
    let records: Vec<SpeciesRecord> = (1..=count)
        .map(|id| SpeciesRecord {
            id,
            name: format!("species-{id}"),
            types: vec![types[id as usize % types.len()].to_string()],
        })
        .collect();
    Catalog::build(&records, &VariantTable::empty(), "")
}

fn build_gallery(
    config: GalleryConfig,
    source: Arc<SyntheticSceneSource>,
    count: u32,
) -> Result<Gallery<SimulatedViewport>> {
    let layout = ListLayout::new(count as usize, 40.0, 0.0, 600.0);
    let mut gallery = Gallery::new(config, SimulatedViewport::new(600.0), source, layout)?;
    gallery.mount_entries(catalog(count).entries());
    Ok(gallery)
}

#[test]
fn fast_scroll_never_exceeds_the_budget() -> Result<()> {
    let source = Arc::new(SyntheticSceneSource::new());
    let mut gallery = build_gallery(GalleryConfig::default(), source, 60)?;
    let mut renderer = HeadlessRenderer::new();

    gallery.tick(ms(0));
    let idle = gallery.frame(&mut renderer);
    assert_eq!(idle.continuous, 15);

    for step in 1..=10u64 {
        let now = ms(step * 50);
        gallery.scroll_viewport(now, step as f32 * 40.0);
        gallery.tick(now);
        let frame = gallery.frame(&mut renderer);

        let window = gallery.scroll_window();
        assert!(window.is_scrolling);
        assert_eq!((window.start_index, window.end_index), (step as usize, step as usize + 14));
        assert!(frame.continuous <= 8, "step {step}: {} continuous", frame.continuous);
        assert!(renderer.continuous_count() <= 8);
    }

    let settled = gallery.tick(ms(650));
    assert!(settled.scroll_settled);
    assert_eq!(gallery.frame(&mut renderer).continuous, 15);
    Ok(())
}

#[test]
fn a_frame_right_after_a_scroll_uses_the_new_window() -> Result<()> {
    let source = Arc::new(SyntheticSceneSource::new());
    let mut gallery = build_gallery(GalleryConfig::default(), source, 60)?;
    let mut renderer = HeadlessRenderer::new();

    gallery.tick(ms(0));
    let idle = gallery.frame(&mut renderer);
    assert_eq!(idle.continuous, 15);
    assert_eq!((idle.granted, idle.restricted), (0, 0));

    gallery.scroll_viewport(ms(50), 40.0);
    let frame = gallery.frame(&mut renderer);
    assert!(gallery.scroll_window().is_scrolling);
    assert!(frame.continuous <= 8, "{} continuous", frame.continuous);
    assert_eq!(frame.granted, 8);
    assert_eq!(frame.restricted, 52);
    assert!(renderer.continuous_count() <= 8);

    // Mounted mid-scroll, outside the first eight visible positions.
    let late = gallery.mount(
        ElementHandle(1_000),
        30,
        ViewerProps::new(AssetPath::for_species("", 61, None), AssetPath::fallback("")),
    );
    assert_eq!(gallery.budget_of(late), Some(RenderBudget::Restricted));
    assert!(gallery.frame(&mut renderer).continuous <= 8);
    Ok(())
}

#[test]
fn re_entering_instances_are_served_from_the_cache() -> Result<()> {
    let source = Arc::new(SyntheticSceneSource::new());
    let mut gallery = build_gallery(GalleryConfig::default(), source.clone(), 60)?;
    let mut renderer = HeadlessRenderer::new();

    gallery.tick(ms(0));
    gallery.frame(&mut renderer);
    assert_eq!(source.fetch_count(), 23);

    gallery.scroll_viewport(ms(100), 1800.0);
    gallery.tick(ms(100));
    gallery.frame(&mut renderer);
    assert_eq!(source.fetch_count(), 46);

    gallery.tick(ms(1100));
    let released = gallery.frame(&mut renderer);
    assert_eq!(released.released, 23);
    let top_loaded = gallery
        .instances()
        .filter(|(index, agent)| *index < 23 && agent.state().load_state == LoadState::Loaded)
        .count();
    assert_eq!(top_loaded, 0);

    gallery.scroll_viewport(ms(1200), 0.0);
    gallery.tick(ms(1200));
    let top_loaded = gallery
        .instances()
        .filter(|(index, agent)| *index < 23 && agent.state().load_state == LoadState::Loaded)
        .count();
    assert_eq!(top_loaded, 23);
    assert_eq!(source.fetch_count(), 46);
    assert_eq!(gallery.loads_in_flight(), 0);
    Ok(())
}

#[test]
fn failed_models_fall_back_and_then_show_the_card() -> Result<()> {
    let source = Arc::new(
        SyntheticSceneSource::new().with_failing(&AssetPath::new("/glbs/0003.glb")),
    );
    let mut gallery = build_gallery(GalleryConfig::default(), source, 5)?;
    let mut renderer = HeadlessRenderer::new();
    gallery.tick(ms(0));
    let frame = gallery.frame(&mut renderer);
    assert_eq!(frame.scenes, 5);

    let (_, third) = gallery.instances().find(|(index, _)| *index == 2).unwrap();
    assert!(third.state().using_fallback);
    assert_eq!(third.state().load_state, LoadState::Loaded);

    let broken = Arc::new(
        SyntheticSceneSource::new()
            .with_failing(&AssetPath::new("/glbs/0003.glb"))
            .with_failing(&AssetPath::fallback("")),
    );
    let mut gallery = build_gallery(GalleryConfig::default(), broken, 5)?;
    gallery.tick(ms(0));
    let frame = gallery.frame(&mut renderer);
    assert_eq!(frame.unavailable, 1);
    assert_eq!(frame.scenes, 4);
    Ok(())
}

#[test]
fn cache_stays_within_capacity() -> Result<()> {
    let config = GalleryConfig {
        cache: CacheConfig {
            max_entries: 10,
            ..CacheConfig::default()
        },
        ..GalleryConfig::default()
    };
    let source = Arc::new(SyntheticSceneSource::new());
    let mut gallery = build_gallery(config, source, 60)?;
    gallery.tick(ms(0));
    assert_eq!(gallery.cache().len(), 10);
    assert!(gallery.cache().contains(&AssetPath::new("/glbs/0023.glb")));
    assert!(!gallery.cache().contains(&AssetPath::new("/glbs/0001.glb")));

    let swept = gallery.tick(ms(60_000));
    assert_eq!(swept.evicted, 0);
    Ok(())
}

#[test]
fn periodic_sweep_trims_entries_inserted_outside_the_loader() -> Result<()> {
    let source = Arc::new(SyntheticSceneSource::new());
    let mut gallery = build_gallery(GalleryConfig::default(), source, 5)?;
    gallery.tick(ms(0));
    assert_eq!(gallery.cache().len(), 5);

    let empty = SceneGraph {
        nodes: Vec::new(),
        roots: Vec::new(),
        meshes: Vec::new(),
        bounds: None,
    };
    for id in 100..166 {
        gallery.cache().put(
            AssetPath::for_species("", id, None),
            AssetHandle::new(empty.clone()),
        );
    }
    assert_eq!(gallery.cache().len(), 71);

    let early = gallery.tick(ms(59_999));
    assert_eq!(early.evicted, 0);
    assert_eq!(gallery.cache().len(), 71);

    let swept = gallery.tick(ms(60_000));
    assert_eq!(swept.evicted, 21);
    assert_eq!(gallery.cache().len(), 50);
    assert!(!gallery.cache().contains(&AssetPath::new("/glbs/0001.glb")));
    Ok(())
}

#[test]
fn unmounted_instances_release_their_renderer() -> Result<()> {
    let source = Arc::new(SyntheticSceneSource::new());
    let mut gallery = build_gallery(GalleryConfig::default(), source, 10)?;
    let mut renderer = HeadlessRenderer::new();
    gallery.tick(ms(0));
    gallery.frame(&mut renderer);
    assert_eq!(renderer.active_count(), 10);

    let first = gallery.instances().next().map(|(_, agent)| agent.id()).unwrap();
    assert!(gallery.unmount(first));
    assert!(!gallery.unmount(first));
    let frame = gallery.frame(&mut renderer);
    assert_eq!(frame.released, 1);
    assert_eq!(renderer.active_count(), 9);
    assert_eq!(gallery.observer().subscription_count(), 18);

    gallery.shutdown(&mut renderer);
    assert_eq!(renderer.active_count(), 0);
    assert!(gallery.is_empty());
    Ok(())
}

#[test]
fn interaction_lifts_the_idle_lowering() -> Result<()> {
    let source = Arc::new(SyntheticSceneSource::new());
    let mut gallery = build_gallery(GalleryConfig::default(), source, 60)?;
    let mut renderer = HeadlessRenderer::new();
    gallery.tick(ms(0));
    gallery.frame(&mut renderer);

    // Index 20 sits in the preload zone but off screen.
    let (_, offscreen) = gallery.instances().find(|(index, _)| *index == 20).unwrap();
    let id = offscreen.id();
    assert_eq!(
        renderer.last_frame(id).unwrap().frame_mode,
        FrameMode::OnDemand
    );

    assert!(gallery.pointer_down(id));
    gallery.tick(ms(10));
    gallery.frame(&mut renderer);
    assert_eq!(
        renderer.last_frame(id).unwrap().frame_mode,
        FrameMode::Continuous
    );

    assert!(gallery.pointer_up(ms(20), id));
    gallery.tick(ms(1520));
    gallery.frame(&mut renderer);
    assert_eq!(
        renderer.last_frame(id).unwrap().frame_mode,
        FrameMode::OnDemand
    );
    Ok(())
}
