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

//! # Vitrine Agents
//!
//! Stateful subsystems that own their state and drive the lanes:
//! - [`asset_agent`]: the asset loader. Consults the shared cache, dispatches
//!   fetch and decode jobs to an executor, and hands completions back to the loop.
//! - [`viewer_agent`]: one per mounted instance. Tracks visibility and
//!   interaction, runs the fallback state machine and builds render requests.

#![warn(missing_docs)]

pub mod asset_agent;
pub mod viewer_agent;

pub use asset_agent::{
    AssetAgent, InlineExecutor, LoadCompletion, LoadExecutor, LoadJob, LoadTicket,
    WorkerPoolExecutor,
};
pub use viewer_agent::{ViewerAgent, ViewerProps, ViewerSettings};
