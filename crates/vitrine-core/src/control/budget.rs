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

//! Scroll window and per-instance render budget.

/// The list's rendered index window and scroll state.
///
/// Owned and mutated only by the scroll budget controller; everyone else reads
/// copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollWindow {
    /// First visible list index (inclusive).
    pub start_index: usize,
    /// Last visible list index (inclusive).
    pub end_index: usize,
    /// Whether a scroll happened within the debounce window.
    pub is_scrolling: bool,
}

impl ScrollWindow {
    /// Returns `true` if `index` lies inside `[start_index, end_index]`.
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index <= self.end_index
    }

    /// Position of `index` within the window in visible order, if inside it.
    pub fn rank_of(&self, index: usize) -> Option<usize> {
        self.contains(index).then(|| index - self.start_index)
    }
}

/// The constraint the scroll budget controller places on one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderBudget {
    /// The list is idle: the instance's own flags decide.
    #[default]
    Unrestricted,
    /// The list is scrolling and the instance holds one of the full-detail slots.
    Granted {
        /// Position within the visible window, `0` being the first visible index.
        rank: usize,
    },
    /// The list is scrolling and the instance is over budget: it must render at
    /// reduced quality without rotation, whatever its own flags say.
    Restricted,
}
