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

//! Cancellable, virtual-time timers.
//!
//! Every delayed reaction in the gallery (unload hysteresis, interaction
//! release, scroll debounce, cache sweep, load timeout) is a task in a
//! [`TimerQueue`]. Time is passed in explicitly as a `Duration` since the loop
//! started, which keeps every component deterministic under test.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Identity of a scheduled task, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle(u64);

/// A task whose deadline has been reached.
#[derive(Debug, Clone, PartialEq)]
pub struct DueTask<T> {
    /// The handle returned when the task was scheduled.
    pub handle: TaskHandle,
    /// The instant the task was due.
    pub deadline: Duration,
    /// The task payload.
    pub task: T,
}

/// An ordered set of pending tasks keyed by deadline.
///
/// Tasks with equal deadlines fire in scheduling order.
#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: BTreeMap<(Duration, u64), T>,
    deadlines: HashMap<u64, Duration>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }

    /// Schedules `task` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, task: T) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        let deadline = now.saturating_add(delay);
        self.entries.insert((deadline, id), task);
        self.deadlines.insert(id, deadline);
        TaskHandle(id)
    }

    /// Cancels a pending task. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.deadlines.remove(&handle.0) {
            Some(deadline) => self.entries.remove(&(deadline, handle.0)).is_some(),
            None => false,
        }
    }

    /// Removes and returns the earliest task due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<DueTask<T>> {
        let (&(deadline, id), _) = self.entries.iter().next()?;
        if deadline > now {
            return None;
        }
        let task = self.entries.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        Some(DueTask {
            handle: TaskHandle(id),
            deadline,
            task,
        })
    }

    /// The earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.entries.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Drops every pending task.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.deadlines.clear();
    }

    /// Number of pending tasks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
