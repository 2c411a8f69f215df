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

//! Acts as the **[A]gent** for the asset subsystem.
//!
//! The [`AssetAgent`] is the gallery's asset loader. A request is served from
//! the shared cache when possible. Otherwise a job fetching the bytes from the
//! [`AssetSource`](vitrine_core::asset::AssetSource) and decoding them with an
//! [`AssetLoaderLane`](vitrine_lanes::AssetLoaderLane) is handed to a
//! [`LoadExecutor`]. Completions come back on a channel and are applied on the
//! loop thread by [`AssetAgent::poll_completions`].

mod agent;
mod executor;
mod metrics;

pub use agent::{AssetAgent, LoadCompletion, LoadTicket};
pub use executor::{InlineExecutor, LoadExecutor, LoadJob, WorkerPoolExecutor};
