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

//! The per-instance load state machine.

use vitrine_core::asset::AssetPath;
use vitrine_data::LoadState;

/// Where the controller is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackPhase {
    /// No load in progress and nothing loaded (initial, or released).
    Idle,
    /// Loading the instance's own path.
    LoadingPrimary,
    /// Loading the substitute path after the primary failed.
    LoadingFallback,
    /// A scene is loaded.
    Loaded,
    /// Both paths failed. Terminal.
    FallbackFailed,
}

/// A load the controller wants issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadAttempt {
    /// Path to request.
    pub path: AssetPath,
    /// Generation token to attach; completions carrying any other value are stale.
    pub generation: u64,
}

/// What to do after a failed load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureOutcome {
    /// The primary failed: issue the substitute load.
    Retry(LoadAttempt),
    /// The substitute failed too: show the unavailable card.
    Exhausted,
    /// The failure belongs to a superseded load and was ignored.
    Stale,
}

/// Primary load, at most one substitute load, then a terminal failure.
///
/// Once the substitute is in use it stays in use: a released and re-entered
/// instance reloads the substitute, never the primary again.
#[derive(Debug, Clone)]
pub struct FallbackController {
    primary: AssetPath,
    fallback: AssetPath,
    phase: FallbackPhase,
    using_fallback: bool,
    generation: u64,
}

impl FallbackController {
    /// Creates an idle controller.
    pub fn new(primary: AssetPath, fallback: AssetPath) -> Self {
        Self {
            primary,
            fallback,
            phase: FallbackPhase::Idle,
            using_fallback: false,
            generation: 0,
        }
    }

    /// The path the next load targets.
    pub fn current_path(&self) -> &AssetPath {
        if self.using_fallback {
            &self.fallback
        } else {
            &self.primary
        }
    }

    /// Current phase.
    pub fn phase(&self) -> FallbackPhase {
        self.phase
    }

    /// The generation of the load currently in flight (or last issued).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the substitute is the target.
    pub fn using_fallback(&self) -> bool {
        self.using_fallback
    }

    /// Whether both paths failed.
    pub fn is_exhausted(&self) -> bool {
        self.phase == FallbackPhase::FallbackFailed
    }

    /// Returns `true` while a load with `generation` is the one in flight.
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
            && matches!(
                self.phase,
                FallbackPhase::LoadingPrimary | FallbackPhase::LoadingFallback
            )
    }

    /// The [`LoadState`] this phase corresponds to.
    pub fn load_state(&self) -> LoadState {
        match self.phase {
            FallbackPhase::Idle => LoadState::Idle,
            FallbackPhase::LoadingPrimary | FallbackPhase::LoadingFallback => LoadState::Loading,
            FallbackPhase::Loaded => LoadState::Loaded,
            FallbackPhase::FallbackFailed => LoadState::Error,
        }
    }

    fn next_attempt(&mut self) -> LoadAttempt {
        self.generation += 1;
        LoadAttempt {
            path: self.current_path().clone(),
            generation: self.generation,
        }
    }

    /// Starts loading if idle. Returns `None` when a load is already running,
    /// a scene is loaded, or both paths have failed.
    pub fn begin(&mut self) -> Option<LoadAttempt> {
        if self.phase != FallbackPhase::Idle {
            return None;
        }
        self.phase = if self.using_fallback {
            FallbackPhase::LoadingFallback
        } else {
            FallbackPhase::LoadingPrimary
        };
        Some(self.next_attempt())
    }

    /// Records a success. Returns `false` for a stale generation.
    pub fn on_loaded(&mut self, generation: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.phase = FallbackPhase::Loaded;
        true
    }

    /// Records a failure and says what to do next.
    pub fn on_failed(&mut self, generation: u64) -> FailureOutcome {
        if !self.is_current(generation) {
            return FailureOutcome::Stale;
        }
        if self.using_fallback {
            self.phase = FallbackPhase::FallbackFailed;
            return FailureOutcome::Exhausted;
        }
        self.using_fallback = true;
        self.phase = FallbackPhase::LoadingFallback;
        FailureOutcome::Retry(self.next_attempt())
    }

    /// Forgets the loaded scene or abandons the load in flight.
    ///
    /// A terminal failure is kept. Any completion for the abandoned load is
    /// stale from now on.
    pub fn release(&mut self) {
        if self.phase == FallbackPhase::FallbackFailed {
            return;
        }
        self.phase = FallbackPhase::Idle;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> FallbackController {
        FallbackController::new(
            AssetPath::new("/glbs/0025.glb"),
            AssetPath::new("/glbs/0000.glb"),
        )
    }

    #[test]
    fn success_on_first_try() {
        let mut c = controller();
        let attempt = c.begin().unwrap();
        assert_eq!(attempt.path.as_str(), "/glbs/0025.glb");
        assert_eq!(c.load_state(), LoadState::Loading);
        assert!(c.on_loaded(attempt.generation));
        assert_eq!(c.phase(), FallbackPhase::Loaded);
        assert!(c.begin().is_none());
    }

    #[test]
    fn begin_is_idempotent_while_loading() {
        let mut c = controller();
        assert!(c.begin().is_some());
        assert!(c.begin().is_none());
    }

    #[test]
    fn stale_generations_are_ignored() {
        let mut c = controller();
        let first = c.begin().unwrap();
        c.release();
        let second = c.begin().unwrap();
        assert!(!c.on_loaded(first.generation));
        assert_eq!(c.on_failed(first.generation), FailureOutcome::Stale);
        assert!(c.on_loaded(second.generation));
    }

    #[test]
    fn release_keeps_terminal_failure() {
        let mut c = controller();
        let a = c.begin().unwrap();
        let FailureOutcome::Retry(b) = c.on_failed(a.generation) else {
            panic!("expected a retry");
        };
        assert_eq!(c.on_failed(b.generation), FailureOutcome::Exhausted);
        c.release();
        assert!(c.is_exhausted());
        assert!(c.begin().is_none());
    }

    #[test]
    fn re_entry_after_fallback_reloads_the_substitute() {
        let mut c = controller();
        let a = c.begin().unwrap();
        let FailureOutcome::Retry(b) = c.on_failed(a.generation) else {
            panic!("expected a retry");
        };
        assert!(c.on_loaded(b.generation));
        c.release();
        let again = c.begin().unwrap();
        assert_eq!(again.path.as_str(), "/glbs/0000.glb");
        assert_eq!(c.phase(), FallbackPhase::LoadingFallback);
    }
}
