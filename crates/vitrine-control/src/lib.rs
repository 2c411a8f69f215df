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

//! # Vitrine Control
//!
//! List-level control. The [`ScrollBudgetController`] watches scroll events and
//! the visible index window, and while the list scrolls it caps how many
//! instances may render at full detail.

#![warn(missing_docs)]

pub mod scroll;

pub use scroll::{BudgetAllocation, ScrollBudgetController};
