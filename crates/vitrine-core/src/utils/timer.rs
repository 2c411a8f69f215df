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

use std::time::{Duration, Instant};

/// Wall-clock stopwatch used to time decodes.
///
/// Gallery time is virtual; this is the one place real time is read, and only
/// to feed the decode-time histogram.
#[derive(Debug, Clone)]
pub struct Stopwatch {
    started_at: Option<Instant>,
}

impl Stopwatch {
    /// Starts a new stopwatch.
    #[inline]
    pub fn start() -> Self {
        Self {
            started_at: Some(Instant::now()),
        }
    }

    /// A stopwatch that was never started. All readings are `None`.
    #[inline]
    pub fn stopped() -> Self {
        Self { started_at: None }
    }

    /// Time since [`Stopwatch::start`].
    #[inline]
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|start| start.elapsed())
    }

    /// Elapsed milliseconds as a float, the unit of the decode histogram.
    #[inline]
    pub fn elapsed_ms_f64(&self) -> Option<f64> {
        self.elapsed().map(|d| d.as_secs_f64() * 1_000.0)
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::start()
    }
}
