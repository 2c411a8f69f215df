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

mod common;

use common::{entry, scene_agent, DeferredExecutor, MapSource, RecordingObserver};
use std::sync::Arc;
use std::time::Duration;
use vitrine_agents::{AssetAgent, ViewerAgent, ViewerProps, ViewerSettings};
use vitrine_core::asset::AssetPath;
use vitrine_core::control::{FrameMode, RenderBudget, ResolutionScaleRange};
use vitrine_core::renderer::{Presentation, RenderRequest};
use vitrine_core::scene::SceneGraph;
use vitrine_core::viewport::{ElementHandle, IntersectionEntry, SubscriptionHandle};
use vitrine_core::InstanceId;
use vitrine_data::LoadState;
use vitrine_lanes::QualityScheduler;

const PRELOAD: SubscriptionHandle = SubscriptionHandle(1);
const STRICT: SubscriptionHandle = SubscriptionHandle(2);
const IDLE: RenderBudget = RenderBudget::Unrestricted;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn current_request(viewer: &ViewerAgent) -> Option<RenderRequest> {
    viewer.render_request(&QualityScheduler::default(), IDLE)
}

struct Harness {
    source: Arc<MapSource>,
    executor: DeferredExecutor,
    loader: AssetAgent<SceneGraph>,
    observer: RecordingObserver,
    sink: flume::Sender<IntersectionEntry>,
}

impl Harness {
    fn new(source: MapSource) -> Self {
        let source = Arc::new(source);
        let executor = DeferredExecutor::default();
        let loader = scene_agent(source.clone(), Box::new(executor.clone()), 50);
        let (sink, _receiver) = flume::unbounded();
        Self {
            source,
            executor,
            loader,
            observer: RecordingObserver::default(),
            sink,
        }
    }

    fn mount(&mut self, id: u64, path: &str, settings: ViewerSettings) -> ViewerAgent {
        let props = ViewerProps::new(AssetPath::new(path), AssetPath::fallback(""))
            .with_type_tags(["fire"]);
        ViewerAgent::mount(
            InstanceId(id),
            ElementHandle(id),
            props,
            settings,
            &mut self.observer,
            &self.sink,
        )
    }

    fn send(&mut self, viewer: &mut ViewerAgent, subscription: SubscriptionHandle, on: bool, now: Duration) {
        assert!(viewer.handle_intersection(&entry(subscription, on), now, &mut self.loader));
    }

    fn finish_loads(&mut self, viewer: &mut ViewerAgent, now: Duration) {
        self.executor.run_all();
        for completion in self.loader.poll_completions() {
            viewer.handle_completion(completion, now, &mut self.loader);
        }
    }
}

fn gallery_source() -> MapSource {
    MapSource::new()
        .with_model("glbs/0025.glb")
        .with_model("glbs/0000.glb")
}

#[test]
fn mount_observes_both_zones_without_loading() {
    let mut h = Harness::new(gallery_source());
    let viewer = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());

    assert_eq!(h.observer.active.len(), 2);
    let (_, preload) = h.observer.configs[&PRELOAD];
    let (_, strict) = h.observer.configs[&STRICT];
    assert_eq!(preload.root_margin_px, 300.0);
    assert_eq!(strict.threshold, 0.1);
    assert_eq!(viewer.state().load_state, LoadState::Idle);
    assert_eq!(h.executor.pending(), 0);
    assert!(current_request(&viewer).is_none());
}

#[test]
fn entering_the_preload_zone_loads_the_scene() {
    let mut h = Harness::new(gallery_source());
    let mut viewer = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());

    h.send(&mut viewer, PRELOAD, true, ms(0));
    assert!(viewer.state().in_preload_zone);
    assert_eq!(viewer.state().load_state, LoadState::Loading);
    let request = current_request(&viewer).unwrap();
    assert!(matches!(request.presentation, Presentation::Placeholder));

    h.finish_loads(&mut viewer, ms(20));
    assert_eq!(viewer.state().load_state, LoadState::Loaded);
    let request = current_request(&viewer).unwrap();
    assert!(request.presentation.scene().is_some());
    assert_eq!(h.source.fetches(), vec!["glbs/0025.glb".to_string()]);
}

#[test]
fn cached_scene_is_applied_without_a_new_load() {
    let mut h = Harness::new(gallery_source());
    let mut first = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());
    h.send(&mut first, PRELOAD, true, ms(0));
    h.finish_loads(&mut first, ms(10));

    let mut second = h.mount(2, "/glbs/0025.glb", ViewerSettings::default());
    let preload = SubscriptionHandle(3);
    h.send(&mut second, preload, true, ms(20));

    assert_eq!(second.state().load_state, LoadState::Loaded);
    assert_eq!(h.executor.pending(), 0);
    assert_eq!(h.source.fetch_count("glbs/0025.glb"), 1);
    assert!(second.scene().unwrap().ptr_eq(first.scene().unwrap()));
}

#[test]
fn quick_re_entry_never_leaves_the_zone() {
    let mut h = Harness::new(gallery_source());
    let mut viewer = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());
    h.send(&mut viewer, PRELOAD, true, ms(0));
    h.finish_loads(&mut viewer, ms(10));

    h.send(&mut viewer, PRELOAD, false, ms(100));
    viewer.advance(ms(900), &mut h.loader);
    assert!(viewer.state().in_preload_zone);
    h.send(&mut viewer, PRELOAD, true, ms(1000));
    viewer.advance(ms(5000), &mut h.loader);

    assert!(viewer.state().in_preload_zone);
    assert_eq!(viewer.state().load_state, LoadState::Loaded);
    assert_eq!(viewer.next_deadline(), None);
}

#[test]
fn leaving_releases_after_the_delay_and_re_entry_hits_the_cache() {
    let mut h = Harness::new(gallery_source());
    let mut viewer = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());
    h.send(&mut viewer, PRELOAD, true, ms(0));
    h.finish_loads(&mut viewer, ms(10));

    h.send(&mut viewer, PRELOAD, false, ms(100));
    viewer.advance(ms(1099), &mut h.loader);
    assert!(viewer.state().in_preload_zone);
    viewer.advance(ms(1100), &mut h.loader);
    assert!(!viewer.state().in_preload_zone);
    assert_eq!(viewer.state().load_state, LoadState::Idle);
    assert!(viewer.scene().is_none());
    assert!(current_request(&viewer).is_none());

    h.send(&mut viewer, PRELOAD, true, ms(2000));
    assert_eq!(viewer.state().load_state, LoadState::Loaded);
    assert_eq!(h.source.fetch_count("glbs/0025.glb"), 1);
}

#[test]
fn primary_failure_switches_to_the_substitute_once() {
    let mut h = Harness::new(MapSource::new().with_model("glbs/0000.glb"));
    let mut viewer = h.mount(1, "/glbs/0999.glb", ViewerSettings::default());
    h.send(&mut viewer, PRELOAD, true, ms(0));

    h.finish_loads(&mut viewer, ms(10));
    assert!(viewer.state().using_fallback);
    assert_eq!(viewer.state().load_state, LoadState::Loading);
    assert_eq!(h.executor.pending(), 1);

    h.finish_loads(&mut viewer, ms(20));
    assert_eq!(viewer.state().load_state, LoadState::Loaded);
    assert!(!viewer.state().fallback_failed);
    assert_eq!(
        h.source.fetches(),
        vec!["glbs/0999.glb".to_string(), "glbs/0000.glb".to_string()]
    );
}

#[test]
fn substitute_failure_is_terminal() {
    let mut h = Harness::new(MapSource::new());
    let mut viewer = h.mount(1, "/glbs/0999.glb", ViewerSettings::default());
    h.send(&mut viewer, PRELOAD, true, ms(0));
    h.finish_loads(&mut viewer, ms(10));
    h.finish_loads(&mut viewer, ms(20));

    assert!(viewer.state().fallback_failed);
    assert!(viewer.state().is_unavailable());
    assert_eq!(viewer.state().load_state, LoadState::Error);
    assert_eq!(h.executor.pending(), 0);
    assert_eq!(h.source.fetches().len(), 2);
    let request = current_request(&viewer).unwrap();
    assert!(matches!(request.presentation, Presentation::Unavailable));

    h.send(&mut viewer, PRELOAD, false, ms(100));
    viewer.advance(ms(1100), &mut h.loader);
    h.send(&mut viewer, PRELOAD, true, ms(1200));
    assert_eq!(h.executor.pending(), 0);
    assert_eq!(h.source.fetches().len(), 2);
}

#[test]
fn unmount_discards_the_pending_load() {
    let mut h = Harness::new(gallery_source());
    let mut viewer = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());
    h.send(&mut viewer, PRELOAD, true, ms(0));
    h.send(&mut viewer, PRELOAD, false, ms(10));
    assert!(viewer.next_deadline().is_some());

    viewer.unmount(&mut h.observer);
    h.executor.run_all();

    assert!(h.loader.poll_completions().is_empty());
    assert!(h.observer.active.is_empty());
    assert!(h.loader.cache().is_empty());
}

#[test]
fn slow_load_times_out_into_the_substitute() {
    let mut h = Harness::new(gallery_source());
    let settings = ViewerSettings {
        load_timeout: Some(ms(500)),
        ..ViewerSettings::default()
    };
    let mut viewer = h.mount(1, "/glbs/0025.glb", settings);
    h.send(&mut viewer, PRELOAD, true, ms(0));

    viewer.advance(ms(499), &mut h.loader);
    assert!(!viewer.state().using_fallback);
    viewer.advance(ms(500), &mut h.loader);
    assert!(viewer.state().using_fallback);
    assert_eq!(h.executor.pending(), 2);

    h.finish_loads(&mut viewer, ms(600));
    assert_eq!(viewer.state().load_state, LoadState::Loaded);
    assert!(viewer.state().using_fallback);
    assert_eq!(viewer.next_deadline(), None);
}

#[test]
fn interaction_keeps_full_quality_until_released() {
    let mut h = Harness::new(gallery_source());
    let mut viewer = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());
    let scheduler = QualityScheduler::default();
    h.send(&mut viewer, PRELOAD, true, ms(0));

    assert_eq!(viewer.quality(&scheduler, IDLE).frame_mode, FrameMode::OnDemand);
    viewer.pointer_down();
    assert_eq!(viewer.quality(&scheduler, IDLE).frame_mode, FrameMode::Continuous);
    assert_eq!(
        viewer.quality(&scheduler, IDLE).resolution_scale_range,
        ResolutionScaleRange::FULL
    );

    viewer.pointer_up(ms(100));
    viewer.advance(ms(1599), &mut h.loader);
    assert!(viewer.state().is_interacting);
    viewer.advance(ms(1600), &mut h.loader);
    assert!(!viewer.state().is_interacting);
    assert_eq!(viewer.quality(&scheduler, IDLE).frame_mode, FrameMode::OnDemand);
}

#[test]
fn restricted_budget_overrides_visibility() {
    let mut h = Harness::new(gallery_source());
    let mut viewer = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());
    let scheduler = QualityScheduler::default();
    h.send(&mut viewer, PRELOAD, true, ms(0));
    h.send(&mut viewer, STRICT, true, ms(0));

    let profile = viewer.quality(&scheduler, RenderBudget::Granted { rank: 0 });
    assert_eq!(profile.frame_mode, FrameMode::Continuous);
    assert!(profile.rotation_enabled);

    let profile = viewer.quality(&scheduler, RenderBudget::Restricted);
    assert_eq!(profile.frame_mode, FrameMode::OnDemand);
    assert_eq!(profile.resolution_scale_range, ResolutionScaleRange::REDUCED);
    assert!(!profile.rotation_enabled);
}

#[test]
fn foreign_entries_are_not_claimed() {
    let mut h = Harness::new(gallery_source());
    let mut viewer = h.mount(1, "/glbs/0025.glb", ViewerSettings::default());
    assert!(!viewer.handle_intersection(
        &entry(SubscriptionHandle(42), true),
        ms(0),
        &mut h.loader
    ));
}
