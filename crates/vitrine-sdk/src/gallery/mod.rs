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

//! The gallery event loop.

mod metrics;

use crate::catalog::CatalogEntry;
use crate::layout::ListLayout;
use anyhow::{Context, Result};
use metrics::{record, GalleryMetrics};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;
use vitrine_agents::{
    AssetAgent, InlineExecutor, LoadExecutor, ViewerAgent, ViewerProps, ViewerSettings,
    WorkerPoolExecutor,
};
use vitrine_core::asset::AssetSource;
use vitrine_core::control::{FrameMode, RenderBudget, ScrollWindow};
use vitrine_core::event::EventBus;
use vitrine_core::renderer::{Presentation, Renderer};
use vitrine_core::scene::SceneGraph;
use vitrine_core::schedule::TimerQueue;
use vitrine_core::viewport::{ElementHandle, IntersectionEntry, SubscriptionHandle, ViewportObserver};
use vitrine_core::{GalleryConfig, InstanceId};
use vitrine_data::{AssetCacheHandle, ViewerInstanceState};
use vitrine_infra::SimulatedViewport;
use vitrine_lanes::{GltfSceneLane, QualityScheduler};
use vitrine_control::ScrollBudgetController;
use vitrine_telemetry::MetricsRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GalleryTimer {
    CacheSweep,
}

struct Slot {
    agent: ViewerAgent,
    index: usize,
    rendered: bool,
}

/// What one [`Gallery::tick`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Intersection entries routed to instances.
    pub intersections: usize,
    /// Load completions delivered to instances.
    pub completions: usize,
    /// Cache entries evicted by the periodic sweep.
    pub evicted: usize,
    /// Whether scrolling ended during this tick.
    pub scroll_settled: bool,
}

/// What one [`Gallery::frame`] submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Requests submitted.
    pub submitted: usize,
    /// Requests in `Continuous` frame mode.
    pub continuous: usize,
    /// Requests showing a decoded scene.
    pub scenes: usize,
    /// Requests showing the loading placeholder.
    pub placeholders: usize,
    /// Requests showing the unavailable card.
    pub unavailable: usize,
    /// Renderers released this frame.
    pub released: usize,
    /// Mounted instances holding a full-detail slot while scrolling.
    pub granted: usize,
    /// Mounted instances forced to reduced quality while scrolling.
    pub restricted: usize,
}

/// Owns every mounted instance and drives them from one loop.
pub struct Gallery<O: ViewportObserver> {
    config: GalleryConfig,
    settings: ViewerSettings,
    observer: O,
    loader: AssetAgent<SceneGraph>,
    scheduler: QualityScheduler,
    scroll: ScrollBudgetController,
    layout: ListLayout,
    events: EventBus<IntersectionEntry>,
    slots: BTreeMap<InstanceId, Slot>,
    routes: HashMap<SubscriptionHandle, InstanceId>,
    timers: TimerQueue<GalleryTimer>,
    pending_releases: Vec<InstanceId>,
    next_id: u64,
    now: Duration,
    registry: MetricsRegistry,
    metrics: Option<GalleryMetrics>,
}

impl<O: ViewportObserver> Gallery<O> {
    /// Builds a gallery reading models from `source`.
    ///
    /// Decoding runs inline when `config.loader.worker_threads` is zero and on
    /// a worker pool otherwise.
    pub fn new(
        config: GalleryConfig,
        observer: O,
        source: Arc<dyn AssetSource>,
        layout: ListLayout,
    ) -> Result<Self> {
        let executor: Box<dyn LoadExecutor> = match config.loader.worker_threads {
            0 => Box::new(InlineExecutor),
            threads => Box::new(
                WorkerPoolExecutor::new(threads).context("failed to start decode workers")?,
            ),
        };
        Self::with_executor(config, observer, source, layout, executor)
    }

    /// Builds a gallery that decodes on `executor`.
    pub fn with_executor(
        config: GalleryConfig,
        observer: O,
        source: Arc<dyn AssetSource>,
        layout: ListLayout,
        executor: Box<dyn LoadExecutor>,
    ) -> Result<Self> {
        config.validate().context("invalid gallery configuration")?;

        let registry = MetricsRegistry::new();
        let metrics = match GalleryMetrics::register(&registry) {
            Ok(metrics) => Some(metrics),
            Err(e) => {
                log::warn!("Gallery: Metrics unavailable: {e}");
                None
            }
        };
        let cache = AssetCacheHandle::new(config.cache.max_entries);
        let loader = AssetAgent::new(source, Arc::new(GltfSceneLane::new()), executor, cache)
            .with_metrics(&registry);
        let scheduler = QualityScheduler::new(
            config.quality.full_resolution,
            config.quality.reduced_resolution,
        );
        let scroll = ScrollBudgetController::new(&config.scroll_budget);
        let mut timers = TimerQueue::new();
        timers.schedule(
            Duration::ZERO,
            config.cache.sweep_interval(),
            GalleryTimer::CacheSweep,
        );

        log::info!(
            "Gallery: {} items, cache {} entries, scroll budget {} slots.",
            layout.count,
            config.cache.max_entries,
            config.scroll_budget.active_limit
        );

        Ok(Self {
            settings: ViewerSettings::from(&config),
            config,
            observer,
            loader,
            scheduler,
            scroll,
            layout,
            events: EventBus::new(),
            slots: BTreeMap::new(),
            routes: HashMap::new(),
            timers,
            pending_releases: Vec::new(),
            next_id: 0,
            now: Duration::ZERO,
            registry,
            metrics,
        })
    }

    /// The configuration in effect.
    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// The list geometry.
    pub fn layout(&self) -> &ListLayout {
        &self.layout
    }

    /// The viewport observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The viewport observer, mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// The shared decode cache.
    pub fn cache(&self) -> &AssetCacheHandle<SceneGraph> {
        self.loader.cache()
    }

    /// Loads dispatched and not yet delivered.
    pub fn loads_in_flight(&self) -> usize {
        self.loader.in_flight()
    }

    /// The metrics of the loader and the gallery.
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.registry
    }

    /// The current scroll window.
    pub fn scroll_window(&self) -> ScrollWindow {
        self.scroll.window()
    }

    /// The time of the last tick.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of mounted instances.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if nothing is mounted.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// A mounted instance.
    pub fn instance(&self, id: InstanceId) -> Option<&ViewerAgent> {
        self.slots.get(&id).map(|slot| &slot.agent)
    }

    /// Mounted instances with their list positions, in id order.
    pub fn instances(&self) -> impl Iterator<Item = (usize, &ViewerAgent)> {
        self.slots.values().map(|slot| (slot.index, &slot.agent))
    }

    /// The budget the scroll window currently issues to `id`.
    pub fn budget_of(&self, id: InstanceId) -> Option<RenderBudget> {
        self.slots
            .get(&id)
            .map(|slot| self.scroll.budget_for(slot.index))
    }

    /// State snapshots of every mounted instance.
    pub fn states(&self) -> Vec<ViewerInstanceState> {
        self.slots.values().map(|slot| slot.agent.state().clone()).collect()
    }

    /// The earliest pending timer across the gallery.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.slots
            .values()
            .filter_map(|slot| slot.agent.next_deadline())
            .chain(self.scroll.next_deadline())
            .chain(self.timers.next_deadline())
            .min()
    }

    /// Mounts an instance for `element`, shown at list position `index`.
    pub fn mount(&mut self, element: ElementHandle, index: usize, props: ViewerProps) -> InstanceId {
        self.next_id += 1;
        let id = InstanceId(self.next_id);
        let agent = ViewerAgent::mount(
            id,
            element,
            props,
            self.settings.clone(),
            &mut self.observer,
            &self.events.sender(),
        );
        for subscription in agent.subscriptions() {
            self.routes.insert(subscription, id);
        }
        self.slots.insert(
            id,
            Slot {
                agent,
                index,
                rendered: false,
            },
        );
        self.update_mounted_gauge();
        id
    }

    /// Unmounts an instance. Its renderer is released on the next frame.
    pub fn unmount(&mut self, id: InstanceId) -> bool {
        let Some(slot) = self.slots.remove(&id) else {
            return false;
        };
        for subscription in slot.agent.subscriptions() {
            self.routes.remove(&subscription);
        }
        if slot.rendered {
            self.pending_releases.push(id);
        }
        slot.agent.unmount(&mut self.observer);
        self.update_mounted_gauge();
        true
    }

    /// Records a scroll to `scroll_top` and derives the visible window from the layout.
    pub fn scroll_to(&mut self, now: Duration, scroll_top: f32) {
        self.scroll.on_scroll(now);
        if let Some((start, end)) = self.layout.visible_range(scroll_top) {
            self.scroll.set_visible_range(start, end);
        }
    }

    /// Records the visible window as reported by an external list.
    pub fn report_visible_range(&mut self, start_index: usize, end_index: usize) {
        self.scroll.set_visible_range(start_index, end_index);
    }

    /// Pointer pressed on an instance.
    pub fn pointer_down(&mut self, id: InstanceId) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.agent.pointer_down();
                true
            }
            None => false,
        }
    }

    /// Pointer released on an instance.
    pub fn pointer_up(&mut self, now: Duration, id: InstanceId) -> bool {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.agent.pointer_up(now);
                true
            }
            None => false,
        }
    }

    /// Advances everything to `now`.
    ///
    /// Order: intersections, scroll debounce, instance timers, cache sweep,
    /// load completions.
    pub fn tick(&mut self, now: Duration) -> TickStats {
        self.now = now;
        let mut stats = TickStats::default();

        for entry in self.events.drain() {
            let Some(id) = self.routes.get(&entry.subscription) else {
                log::trace!("Gallery: Dropping entry for unknown {}.", entry.subscription);
                continue;
            };
            if let Some(slot) = self.slots.get_mut(id) {
                if slot.agent.handle_intersection(&entry, now, &mut self.loader) {
                    stats.intersections += 1;
                }
            }
        }

        stats.scroll_settled = self.scroll.advance(now);

        for slot in self.slots.values_mut() {
            slot.agent.advance(now, &mut self.loader);
        }

        while let Some(due) = self.timers.pop_due(now) {
            match due.task {
                GalleryTimer::CacheSweep => {
                    stats.evicted += self.loader.sweep().len();
                    self.timers.schedule(
                        due.deadline,
                        self.config.cache.sweep_interval(),
                        GalleryTimer::CacheSweep,
                    );
                }
            }
        }

        // A failed primary issues its substitute load from inside the handler,
        // so keep polling until a pass delivers nothing.
        loop {
            let completions = self.loader.poll_completions();
            if completions.is_empty() {
                break;
            }
            for completion in completions {
                match self.slots.get_mut(&completion.requester) {
                    Some(slot) => {
                        slot.agent.handle_completion(completion, now, &mut self.loader);
                        stats.completions += 1;
                    }
                    None => log::debug!(
                        "Gallery: Completion for unmounted {} dropped.",
                        completion.requester
                    ),
                }
            }
        }

        stats
    }

    /// Hands every in-zone instance's request to `renderer`, and releases the
    /// renderers of instances that left the zone or unmounted.
    ///
    /// Budgets come from the scroll window as it stands now, so a scroll
    /// recorded since the last tick already constrains this frame.
    pub fn frame<R: Renderer + ?Sized>(&mut self, renderer: &mut R) -> FrameStats {
        let mut stats = FrameStats::default();

        for id in self.pending_releases.drain(..) {
            renderer.release(id);
            stats.released += 1;
        }

        let allocation = self
            .scroll
            .allocate(self.slots.iter().map(|(id, slot)| (*id, slot.index)));
        stats.granted = allocation.granted;
        stats.restricted = allocation.restricted;

        for (id, budget) in allocation.budgets {
            let Some(slot) = self.slots.get_mut(&id) else {
                continue;
            };
            match slot.agent.render_request(&self.scheduler, budget) {
                Some(request) => {
                    renderer.submit(id, &request);
                    slot.rendered = true;
                    stats.submitted += 1;
                    if request.quality.frame_mode == FrameMode::Continuous {
                        stats.continuous += 1;
                    }
                    match request.presentation {
                        Presentation::Scene(_) => stats.scenes += 1,
                        Presentation::Placeholder => stats.placeholders += 1,
                        Presentation::Unavailable => stats.unavailable += 1,
                    }
                }
                None if slot.rendered => {
                    renderer.release(id);
                    slot.rendered = false;
                    stats.released += 1;
                }
                None => {}
            }
        }

        if let Some(metrics) = &self.metrics {
            record(metrics.continuous_instances.set(stats.continuous as f64));
            record(metrics.frames.increment());
        }
        stats
    }

    /// Releases every renderer and unmounts every instance.
    pub fn shutdown<R: Renderer + ?Sized>(&mut self, renderer: &mut R) {
        let ids: Vec<_> = self.slots.keys().copied().collect();
        for id in ids {
            self.unmount(id);
        }
        for id in self.pending_releases.drain(..) {
            renderer.release(id);
        }
        self.timers.clear();
        self.events.drain();
        log::info!(
            "Gallery: Shut down with {} cached scenes and {} loads in flight.",
            self.loader.cache().len(),
            self.loader.in_flight()
        );
    }

    fn update_mounted_gauge(&self) {
        if let Some(metrics) = &self.metrics {
            record(metrics.mounted_instances.set(self.slots.len() as f64));
        }
    }
}

impl Gallery<SimulatedViewport> {
    /// Places every entry in the simulated viewport according to the layout and
    /// mounts it.
    pub fn mount_entries(&mut self, entries: &[CatalogEntry]) -> Vec<InstanceId> {
        let base = self.config.asset_base.clone();
        let layout = self.layout;
        entries
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let element = ElementHandle(index as u64);
                self.observer
                    .place(element, layout.top_of(index), layout.item_height);
                self.mount(element, index, entry.props(&base, layout.item_height))
            })
            .collect()
    }

    /// Scrolls the simulated viewport and records the scroll.
    pub fn scroll_viewport(&mut self, now: Duration, scroll_top: f32) {
        let scroll_top = scroll_top.clamp(0.0, self.layout.max_scroll());
        self.observer.scroll_to(scroll_top);
        self.scroll_to(now, scroll_top);
    }
}
