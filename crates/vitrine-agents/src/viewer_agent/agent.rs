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

//! The per-instance viewer agent.

use super::fallback::{FailureOutcome, FallbackController, LoadAttempt};
use super::interaction::InteractionTracker;
use super::visibility::{PreloadTransition, VisibilityTracker, Zone};
use crate::asset_agent::{AssetAgent, LoadCompletion, LoadTicket};
use std::time::Duration;
use vitrine_core::asset::{AssetHandle, AssetPath, LoadError};
use vitrine_core::control::{QualityInputs, QualityProfile, RenderBudget};
use vitrine_core::renderer::{
    BackgroundGradient, LightingProfile, ModelTransform, Presentation, RenderRequest,
};
use vitrine_core::scene::SceneGraph;
use vitrine_core::schedule::{TaskHandle, TimerQueue};
use vitrine_core::viewport::{
    ElementHandle, IntersectionEntry, IntersectionSink, SubscriptionHandle, ViewportObserver,
};
use vitrine_core::{GalleryConfig, InstanceId, Liveness};
use vitrine_data::ViewerInstanceState;
use vitrine_lanes::QualityScheduler;

/// The delayed reactions a viewer schedules on its own queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerTimer {
    /// The preload-exit hysteresis elapsed.
    Unload,
    /// The post-pointer-up delay elapsed.
    InteractionRelease,
    /// The load with this generation took too long.
    LoadTimeout {
        /// Generation of the load being timed.
        generation: u64,
    },
}

/// Inbound per-instance properties.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerProps {
    /// The model to show.
    pub asset_path: AssetPath,
    /// The substitute shown when `asset_path` fails.
    pub fallback_path: AssetPath,
    /// Whether the model should spin when visible.
    pub requested_auto_rotate: bool,
    /// Whether detail may drop when the instance is idle.
    pub lower_detail_when_idle: bool,
    /// Container height in pixels.
    pub container_height: f32,
    /// Type tags, primary first. Selects lighting and background.
    pub type_tags: Vec<String>,
    /// Model placement.
    pub transform: ModelTransform,
}

impl ViewerProps {
    /// Props for `asset_path` with the gallery's usual presentation.
    pub fn new(asset_path: AssetPath, fallback_path: AssetPath) -> Self {
        Self {
            asset_path,
            fallback_path,
            requested_auto_rotate: true,
            lower_detail_when_idle: true,
            container_height: 300.0,
            type_tags: Vec::new(),
            transform: ModelTransform::default(),
        }
    }

    /// Sets the type tags.
    pub fn with_type_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.type_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the uniform model scale.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.transform.scale = scale;
        self
    }
}

/// The slice of [`GalleryConfig`] a viewer needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    /// Preload zone margin.
    pub preload_margin_px: f32,
    /// Strict zone threshold.
    pub strict_threshold: f32,
    /// Preload-exit hysteresis.
    pub unload_delay: Duration,
    /// Post-pointer-up delay.
    pub release_delay: Duration,
    /// Optional per-load timeout.
    pub load_timeout: Option<Duration>,
    /// Whether dual types blend their lighting.
    pub blend_types: bool,
}

impl From<&GalleryConfig> for ViewerSettings {
    fn from(config: &GalleryConfig) -> Self {
        Self {
            preload_margin_px: config.visibility.preload_margin_px,
            strict_threshold: config.visibility.strict_threshold,
            unload_delay: config.visibility.unload_delay(),
            release_delay: config.interaction.release_delay(),
            load_timeout: config.loader.load_timeout(),
            blend_types: config.quality.blend_dual_types,
        }
    }
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self::from(&GalleryConfig::default())
    }
}

/// One mounted gallery instance.
pub struct ViewerAgent {
    state: ViewerInstanceState,
    props: ViewerProps,
    settings: ViewerSettings,
    element: ElementHandle,
    liveness: Liveness,
    visibility: VisibilityTracker,
    interaction: InteractionTracker,
    fallback: FallbackController,
    timers: TimerQueue<ViewerTimer>,
    load_timeout: Option<TaskHandle>,
    scene: Option<AssetHandle<SceneGraph>>,
    lighting: LightingProfile,
    background: BackgroundGradient,
}

impl ViewerAgent {
    /// Creates the instance and starts observing `element` in both zones.
    ///
    /// Nothing loads until the preload zone reports the element.
    pub fn mount<O: ViewportObserver + ?Sized>(
        id: InstanceId,
        element: ElementHandle,
        props: ViewerProps,
        settings: ViewerSettings,
        observer: &mut O,
        sink: &IntersectionSink,
    ) -> Self {
        let mut visibility = VisibilityTracker::new();
        visibility.observe(
            observer,
            element,
            sink,
            settings.preload_margin_px,
            settings.strict_threshold,
        );
        let lighting = LightingProfile::for_types(&props.type_tags, settings.blend_types);
        let background = BackgroundGradient::soft_for_types(&props.type_tags);
        let fallback =
            FallbackController::new(props.asset_path.clone(), props.fallback_path.clone());
        log::debug!("ViewerAgent: Mounted {id} for '{}'.", props.asset_path);

        Self {
            state: ViewerInstanceState::new(id),
            props,
            settings,
            element,
            liveness: Liveness::new(),
            visibility,
            interaction: InteractionTracker::new(),
            fallback,
            timers: TimerQueue::new(),
            load_timeout: None,
            scene: None,
            lighting,
            background,
        }
    }

    /// Stops observing, clears every timer and turns any load still in flight
    /// into a no-op.
    pub fn unmount<O: ViewportObserver + ?Sized>(mut self, observer: &mut O) {
        self.liveness.revoke();
        self.timers.clear();
        self.visibility.unobserve(observer);
        log::debug!("ViewerAgent: Unmounted {}.", self.state.id);
    }

    /// The instance id.
    pub fn id(&self) -> InstanceId {
        self.state.id
    }

    /// The observed element.
    pub fn element(&self) -> ElementHandle {
        self.element
    }

    /// The props the instance was mounted with.
    pub fn props(&self) -> &ViewerProps {
        &self.props
    }

    /// A snapshot of the instance state.
    pub fn state(&self) -> &ViewerInstanceState {
        &self.state
    }

    /// The loaded scene, if any.
    pub fn scene(&self) -> Option<&AssetHandle<SceneGraph>> {
        self.scene.as_ref()
    }

    /// The two viewport subscriptions of this instance.
    pub fn subscriptions(&self) -> impl Iterator<Item = SubscriptionHandle> + '_ {
        self.visibility.subscriptions()
    }

    /// The earliest pending timer of this instance.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Routes an intersection entry. Returns `false` if it is for another instance.
    pub fn handle_intersection(
        &mut self,
        entry: &IntersectionEntry,
        now: Duration,
        loader: &mut AssetAgent<SceneGraph>,
    ) -> bool {
        match self.visibility.zone_of(entry.subscription) {
            Some(Zone::Preload) => {
                let transition = self.visibility.on_preload_entry(
                    entry,
                    &mut self.timers,
                    now,
                    self.settings.unload_delay,
                );
                match transition {
                    PreloadTransition::Entered => {
                        log::trace!("ViewerAgent: {} entered the preload zone.", self.state.id);
                        self.start_load(loader, now);
                    }
                    PreloadTransition::ExitScheduled => {
                        log::trace!(
                            "ViewerAgent: {} left the preload zone, unload in {:?}.",
                            self.state.id,
                            self.settings.unload_delay
                        );
                    }
                    PreloadTransition::Unchanged => {}
                }
            }
            Some(Zone::Strict) => {
                self.visibility.on_strict_entry(entry);
            }
            None => return false,
        }
        self.sync_state();
        true
    }

    /// Applies a load completion addressed to this instance.
    pub fn handle_completion(
        &mut self,
        completion: LoadCompletion<SceneGraph>,
        now: Duration,
        loader: &mut AssetAgent<SceneGraph>,
    ) {
        if !self.fallback.is_current(completion.generation) {
            log::debug!(
                "ViewerAgent: {} ignoring stale completion of '{}' (generation {}).",
                self.state.id,
                completion.path,
                completion.generation
            );
            return;
        }
        match completion.result {
            Ok(scene) => self.apply_loaded(completion.generation, scene),
            Err(error) => self.fail(completion.generation, error, loader, now),
        }
        self.sync_state();
    }

    /// Fires every timer due at `now`.
    pub fn advance(&mut self, now: Duration, loader: &mut AssetAgent<SceneGraph>) {
        while let Some(due) = self.timers.pop_due(now) {
            match due.task {
                ViewerTimer::Unload => {
                    if self.visibility.on_unload_timer(due.handle) {
                        self.release();
                    }
                }
                ViewerTimer::InteractionRelease => {
                    self.interaction.on_release_timer(due.handle);
                }
                ViewerTimer::LoadTimeout { generation } => {
                    if self.load_timeout != Some(due.handle) {
                        continue;
                    }
                    self.load_timeout = None;
                    if let Some(after) = self.settings.load_timeout {
                        let error = LoadError::TimedOut {
                            path: self.fallback.current_path().clone(),
                            after,
                        };
                        loader.record_failure(&error);
                        self.fail(generation, error, loader, due.deadline);
                    }
                }
            }
        }
        self.sync_state();
    }

    /// Pointer pressed on the instance.
    pub fn pointer_down(&mut self) {
        self.interaction.pointer_down(&mut self.timers);
        self.sync_state();
    }

    /// Pointer released; full quality persists for the release delay.
    pub fn pointer_up(&mut self, now: Duration) {
        self.interaction
            .pointer_up(&mut self.timers, now, self.settings.release_delay);
        self.sync_state();
    }

    /// The inputs the quality scheduler sees for this instance under `budget`.
    pub fn quality_inputs(&self, budget: RenderBudget) -> QualityInputs {
        QualityInputs {
            is_strictly_visible: self.state.is_strictly_visible,
            is_interacting: self.state.is_interacting,
            lower_detail_when_idle: self.props.lower_detail_when_idle,
            requested_auto_rotate: self.props.requested_auto_rotate,
            budget,
        }
    }

    /// The quality profile under the list's current `budget` for this instance.
    pub fn quality(&self, scheduler: &QualityScheduler, budget: RenderBudget) -> QualityProfile {
        scheduler.evaluate(&self.quality_inputs(budget))
    }

    /// Builds this frame's request. `None` outside the preload zone, where the
    /// instance holds no renderer.
    pub fn render_request(
        &self,
        scheduler: &QualityScheduler,
        budget: RenderBudget,
    ) -> Option<RenderRequest> {
        if !self.state.in_preload_zone {
            return None;
        }
        let presentation = if self.fallback.is_exhausted() {
            Presentation::Unavailable
        } else if let Some(scene) = &self.scene {
            Presentation::Scene(scene.clone())
        } else {
            Presentation::Placeholder
        };
        Some(RenderRequest {
            presentation,
            quality: self.quality(scheduler, budget),
            lighting: self.lighting,
            background: self.background.clone(),
            transform: self.props.transform,
            container_height: self.props.container_height,
        })
    }

    fn start_load(&mut self, loader: &mut AssetAgent<SceneGraph>, now: Duration) {
        if let Some(attempt) = self.fallback.begin() {
            self.issue(attempt, loader, now);
        }
    }

    fn issue(&mut self, attempt: LoadAttempt, loader: &mut AssetAgent<SceneGraph>, now: Duration) {
        match loader.request(
            self.state.id,
            attempt.generation,
            &attempt.path,
            &self.liveness,
        ) {
            LoadTicket::Ready(scene) => self.apply_loaded(attempt.generation, scene),
            LoadTicket::Pending => {
                if let Some(after) = self.settings.load_timeout {
                    self.cancel_load_timeout();
                    self.load_timeout = Some(self.timers.schedule(
                        now,
                        after,
                        ViewerTimer::LoadTimeout {
                            generation: attempt.generation,
                        },
                    ));
                }
            }
        }
    }

    fn apply_loaded(&mut self, generation: u64, scene: AssetHandle<SceneGraph>) {
        if self.fallback.on_loaded(generation) {
            self.cancel_load_timeout();
            self.scene = Some(scene);
        }
    }

    fn fail(
        &mut self,
        generation: u64,
        error: LoadError,
        loader: &mut AssetAgent<SceneGraph>,
        now: Duration,
    ) {
        match self.fallback.on_failed(generation) {
            FailureOutcome::Retry(attempt) => {
                self.cancel_load_timeout();
                log::warn!(
                    "ViewerAgent: {} {error}; falling back to '{}'.",
                    self.state.id,
                    attempt.path
                );
                self.issue(attempt, loader, now);
            }
            FailureOutcome::Exhausted => {
                self.cancel_load_timeout();
                log::error!(
                    "ViewerAgent: {} fallback failed, showing unavailable card: {error}",
                    self.state.id
                );
            }
            FailureOutcome::Stale => {
                log::debug!("ViewerAgent: {} ignoring stale failure: {error}", self.state.id);
            }
        }
    }

    fn release(&mut self) {
        log::debug!("ViewerAgent: {} released its renderer.", self.state.id);
        self.cancel_load_timeout();
        self.scene = None;
        self.fallback.release();
    }

    fn cancel_load_timeout(&mut self) {
        if let Some(handle) = self.load_timeout.take() {
            self.timers.cancel(handle);
        }
    }

    fn sync_state(&mut self) {
        self.state.load_state = self.fallback.load_state();
        self.state.in_preload_zone = self.visibility.in_preload_zone();
        self.state.is_strictly_visible = self.visibility.is_strictly_visible();
        self.state.is_interacting = self.interaction.is_interacting();
        self.state.using_fallback = self.fallback.using_fallback();
        self.state.fallback_failed = self.fallback.is_exhausted();
    }
}
