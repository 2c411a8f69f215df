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

//! Acts as the **[A]gent** for one mounted gallery instance.
//!
//! A [`ViewerAgent`] owns its [`ViewerInstanceState`](vitrine_data::ViewerInstanceState)
//! and composes three small controllers:
//! - [`VisibilityTracker`]: preload and strict zones, with unload hysteresis.
//! - [`InteractionTracker`]: pointer state with a delayed release.
//! - [`FallbackController`]: primary load, one substitute attempt, then "unavailable".
//!
//! All delayed reactions are tasks in the agent's own timer queue, so
//! unmounting clears every one of them at once.

mod agent;
mod fallback;
mod interaction;
mod visibility;

pub use agent::{ViewerAgent, ViewerProps, ViewerSettings, ViewerTimer};
pub use fallback::{FailureOutcome, FallbackController, FallbackPhase, LoadAttempt};
pub use interaction::InteractionTracker;
pub use visibility::{PreloadTransition, VisibilityTracker, Zone};
