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

//! A single-column list of equally sized items.

/// Vertical geometry of the gallery list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLayout {
    /// Number of items.
    pub count: usize,
    /// Height of one item's container.
    pub item_height: f32,
    /// Space between consecutive items.
    pub gap: f32,
    /// Height of the scrolling viewport.
    pub viewport_height: f32,
}

impl ListLayout {
    /// Creates a layout.
    pub fn new(count: usize, item_height: f32, gap: f32, viewport_height: f32) -> Self {
        Self {
            count,
            item_height,
            gap,
            viewport_height,
        }
    }

    /// 300px containers with 32px spacing in a 600px viewport.
    pub fn gallery(count: usize) -> Self {
        Self::new(count, 300.0, 32.0, 600.0)
    }

    /// Distance between the tops of consecutive items.
    pub fn stride(&self) -> f32 {
        self.item_height + self.gap
    }

    /// Top offset of `index`.
    pub fn top_of(&self, index: usize) -> f32 {
        index as f32 * self.stride()
    }

    /// Total scrollable height.
    pub fn content_height(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.count as f32 * self.stride() - self.gap
    }

    /// Largest meaningful scroll offset.
    pub fn max_scroll(&self) -> f32 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    /// Indices with at least one pixel inside the viewport at `scroll_top`,
    /// both ends inclusive.
    pub fn visible_range(&self, scroll_top: f32) -> Option<(usize, usize)> {
        let stride = self.stride();
        if self.count == 0 || stride <= 0.0 || self.viewport_height <= 0.0 {
            return None;
        }
        let top = scroll_top.clamp(0.0, self.max_scroll());
        let bottom = top + self.viewport_height;

        let mut start = (top / stride).floor() as usize;
        if top >= self.top_of(start) + self.item_height {
            start += 1;
        }
        let end = ((bottom / stride).ceil() as usize)
            .saturating_sub(1)
            .min(self.count - 1);
        (start <= end).then_some((start, end))
    }
}
