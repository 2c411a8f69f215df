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

//! Provides the foundational traits and primitive types for the asset system.
//!
//! This module defines the "common language" for all asset-related operations.
//! It contains the core contracts that other crates implement or use, but it
//! has no knowledge of how assets are fetched, decoded or cached.
//!
//! The key components are:
//! - The [`Asset`] trait: a marker for all types that can be treated as assets.
//! - [`AssetPath`]: the cache key and fetch location of an asset.
//! - [`AssetSource`]: the abstract byte fetcher the loader reads from.
//! - [`LoadError`]: the failure taxonomy reported by loads.

mod error;
mod handle;
mod path;
mod source;

pub use error::*;
pub use handle::*;
pub use path::*;
pub use source::*;

/// A marker trait for types that can be managed by the asset system.
///
/// The supertraits enforce the guarantees the loader relies on:
/// - `Send` + `Sync`: decoded assets cross from decode workers to the loop thread
///   and are shared between every instance displaying them.
/// - `'static`: cached assets live as long as the cache keeps them.
///
/// # Examples
///
/// ```
/// use vitrine_core::asset::Asset;
///
/// struct Thumbnail {
///     pixels: Vec<u8>,
/// }
///
/// impl Asset for Thumbnail {}
/// ```
pub trait Asset: Send + Sync + 'static {}
