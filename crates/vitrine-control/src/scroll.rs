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

//! Scroll-state debounce and full-detail slot allocation.

use std::time::Duration;
use vitrine_core::config::ScrollBudgetConfig;
use vitrine_core::control::{RenderBudget, ScrollWindow};
use vitrine_core::schedule::{TaskHandle, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SettleTimer;

/// The result of one allocation round.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetAllocation<K> {
    /// The budget issued to each key, in input order.
    pub budgets: Vec<(K, RenderBudget)>,
    /// How many keys received a full-detail slot.
    pub granted: usize,
    /// How many keys were forced to reduced quality.
    pub restricted: usize,
}

/// Owns the [`ScrollWindow`] and issues a [`RenderBudget`] per list index.
///
/// Any scroll event sets `is_scrolling` and (re)starts the debounce timer;
/// scrolling ends when the timer fires without another event in between.
/// While scrolling, only the first `active_limit` indices of the visible
/// window are granted full detail.
#[derive(Debug)]
pub struct ScrollBudgetController {
    window: ScrollWindow,
    active_limit: usize,
    debounce: Duration,
    timers: TimerQueue<SettleTimer>,
    settle: Option<TaskHandle>,
}

impl ScrollBudgetController {
    /// Creates an idle controller with an empty window at index 0.
    pub fn new(config: &ScrollBudgetConfig) -> Self {
        Self {
            window: ScrollWindow::default(),
            active_limit: config.active_limit,
            debounce: config.debounce(),
            timers: TimerQueue::new(),
            settle: None,
        }
    }

    /// A copy of the current window.
    pub fn window(&self) -> ScrollWindow {
        self.window
    }

    /// Whether a scroll happened within the debounce window.
    pub fn is_scrolling(&self) -> bool {
        self.window.is_scrolling
    }

    /// The number of full-detail slots while scrolling.
    pub fn active_limit(&self) -> usize {
        self.active_limit
    }

    /// When scrolling will be considered over, if it is in progress.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    /// Records a scroll event. Returns `true` if scrolling just started.
    pub fn on_scroll(&mut self, now: Duration) -> bool {
        if let Some(handle) = self.settle.take() {
            self.timers.cancel(handle);
        }
        self.settle = Some(self.timers.schedule(now, self.debounce, SettleTimer));

        let started = !self.window.is_scrolling;
        self.window.is_scrolling = true;
        if started {
            log::debug!("ScrollBudget: Scrolling started.");
        }
        started
    }

    /// Records the list's visible index window (both ends inclusive).
    pub fn set_visible_range(&mut self, start_index: usize, end_index: usize) {
        if end_index < start_index {
            log::warn!("ScrollBudget: Ignoring inverted window [{start_index}..{end_index}].");
            return;
        }
        self.window.start_index = start_index;
        self.window.end_index = end_index;
    }

    /// Fires the debounce timer if due. Returns `true` if scrolling just ended.
    pub fn advance(&mut self, now: Duration) -> bool {
        let mut ended = false;
        while let Some(due) = self.timers.pop_due(now) {
            if self.settle == Some(due.handle) {
                self.settle = None;
                self.window.is_scrolling = false;
                ended = true;
            }
        }
        if ended {
            log::debug!(
                "ScrollBudget: Scrolling settled at [{}..{}].",
                self.window.start_index,
                self.window.end_index
            );
        }
        ended
    }

    /// The budget for the instance at list position `index`.
    pub fn budget_for(&self, index: usize) -> RenderBudget {
        if !self.window.is_scrolling {
            return RenderBudget::Unrestricted;
        }
        match self.window.rank_of(index) {
            Some(rank) if rank < self.active_limit => RenderBudget::Granted { rank },
            _ => RenderBudget::Restricted,
        }
    }

    /// Issues a budget to every `(key, index)` pair.
    pub fn allocate<K>(&self, entries: impl IntoIterator<Item = (K, usize)>) -> BudgetAllocation<K> {
        let mut allocation = BudgetAllocation {
            budgets: Vec::new(),
            granted: 0,
            restricted: 0,
        };
        for (key, index) in entries {
            let budget = self.budget_for(index);
            match budget {
                RenderBudget::Granted { .. } => allocation.granted += 1,
                RenderBudget::Restricted => allocation.restricted += 1,
                RenderBudget::Unrestricted => {}
            }
            allocation.budgets.push((key, budget));
        }
        allocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller() -> ScrollBudgetController {
        ScrollBudgetController::new(&ScrollBudgetConfig::default())
    }

    #[test]
    fn first_k_visible_indices_are_granted_while_scrolling() {
        let mut c = controller();
        c.set_visible_range(10, 25);
        c.on_scroll(ms(0));

        for index in 10..=17 {
            assert_eq!(
                c.budget_for(index),
                RenderBudget::Granted { rank: index - 10 }
            );
        }
        for index in 18..=25 {
            assert_eq!(c.budget_for(index), RenderBudget::Restricted);
        }
        assert_eq!(c.budget_for(3), RenderBudget::Restricted);
    }

    #[test]
    fn idle_list_is_unrestricted() {
        let mut c = controller();
        c.set_visible_range(10, 25);
        assert_eq!(c.budget_for(20), RenderBudget::Unrestricted);
        c.on_scroll(ms(0));
        assert!(c.advance(ms(150)));
        assert_eq!(c.budget_for(20), RenderBudget::Unrestricted);
    }

    #[test]
    fn each_scroll_restarts_the_debounce() {
        let mut c = controller();
        assert!(c.on_scroll(ms(0)));
        assert!(!c.on_scroll(ms(100)));
        assert!(!c.advance(ms(200)));
        assert!(c.is_scrolling());
        assert_eq!(c.next_deadline(), Some(ms(250)));
        assert!(c.advance(ms(250)));
        assert!(!c.is_scrolling());
        assert_eq!(c.next_deadline(), None);
    }

    #[test]
    fn inverted_windows_are_ignored() {
        let mut c = controller();
        c.set_visible_range(4, 9);
        c.set_visible_range(9, 4);
        assert_eq!(c.window().start_index, 4);
        assert_eq!(c.window().end_index, 9);
    }

    #[test]
    fn allocation_counts_slots() {
        let mut c = ScrollBudgetController::new(&ScrollBudgetConfig {
            debounce_ms: 150,
            active_limit: 2,
        });
        c.set_visible_range(0, 3);
        c.on_scroll(ms(0));
        let allocation = c.allocate(["a", "b", "c", "d"].into_iter().zip(0..));
        assert_eq!(allocation.granted, 2);
        assert_eq!(allocation.restricted, 2);
        assert_eq!(allocation.budgets[1], ("b", RenderBudget::Granted { rank: 1 }));
        assert_eq!(allocation.budgets[3], ("d", RenderBudget::Restricted));
    }
}
