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

//! Gallery configuration.
//!
//! Every tunable of the cache, the visibility tracker, the quality scheduler and
//! the scroll budget lives here. Files may be written in RON or JSON; every field
//! is optional and falls back to its default. Durations are milliseconds.

use crate::control::ResolutionScaleRange;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while loading or validating a [`GalleryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config '{path}': {source}")]
    Io {
        /// The file that was read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The RON document is malformed.
    #[error("invalid RON config: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// The JSON document is malformed.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension is neither `.ron` nor `.json`.
    #[error("unsupported config format '{0}' (expected .ron or .json)")]
    UnsupportedFormat(String),
    /// A value is out of range.
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Shared decode cache settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of decoded scenes kept.
    pub max_entries: usize,
    /// Period of the background eviction sweep.
    pub sweep_interval_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 50,
            sweep_interval_ms: 60_000,
        }
    }
}

impl CacheConfig {
    /// The sweep period as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }
}

/// Dual-zone viewport observation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityConfig {
    /// Margin around the viewport that counts as the preload zone.
    pub preload_margin_px: f32,
    /// Delay between leaving the preload zone and releasing the renderer.
    pub unload_delay_ms: u64,
    /// Visible fraction required for strict visibility.
    pub strict_threshold: f32,
}

impl Default for VisibilityConfig {
    fn default() -> Self {
        Self {
            preload_margin_px: 300.0,
            unload_delay_ms: 1_000,
            strict_threshold: 0.1,
        }
    }
}

impl VisibilityConfig {
    /// The unload hysteresis as a `Duration`.
    pub fn unload_delay(&self) -> Duration {
        Duration::from_millis(self.unload_delay_ms)
    }
}

/// Pointer interaction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// How long full quality persists after pointer-up.
    pub release_delay_ms: u64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            release_delay_ms: 1_500,
        }
    }
}

impl InteractionConfig {
    /// The release delay as a `Duration`.
    pub fn release_delay(&self) -> Duration {
        Duration::from_millis(self.release_delay_ms)
    }
}

/// List-level scroll budget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollBudgetConfig {
    /// Quiet period after the last scroll event before scrolling is over.
    pub debounce_ms: u64,
    /// Number of visible instances allowed full detail while scrolling.
    pub active_limit: usize,
}

impl Default for ScrollBudgetConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            active_limit: 8,
        }
    }
}

impl ScrollBudgetConfig {
    /// The debounce window as a `Duration`.
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Quality profile settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Resolution range at full detail.
    pub full_resolution: ResolutionScaleRange,
    /// Resolution range whenever detail is lowered.
    pub reduced_resolution: ResolutionScaleRange,
    /// Whether dual-type instances blend both lighting profiles.
    pub blend_dual_types: bool,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            full_resolution: ResolutionScaleRange::FULL,
            reduced_resolution: ResolutionScaleRange::REDUCED,
            blend_dual_types: false,
        }
    }
}

/// Asset loader settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoaderConfig {
    /// Optional per-load timeout. `None` keeps a stalled load in `Loading` forever.
    pub load_timeout_ms: Option<u64>,
    /// Decode worker threads. `0` decodes inline on the loop thread.
    pub worker_threads: usize,
}

impl LoaderConfig {
    /// The load timeout as a `Duration`, if any.
    pub fn load_timeout(&self) -> Option<Duration> {
        self.load_timeout_ms.map(Duration::from_millis)
    }
}

/// The complete gallery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Prefix prepended to every model path (`{base}/glbs/...`).
    pub asset_base: String,
    /// Decode cache settings.
    pub cache: CacheConfig,
    /// Viewport zone settings.
    pub visibility: VisibilityConfig,
    /// Pointer interaction settings.
    pub interaction: InteractionConfig,
    /// Scroll budget settings.
    pub scroll_budget: ScrollBudgetConfig,
    /// Quality profile settings.
    pub quality: QualityConfig,
    /// Loader settings.
    pub loader: LoaderConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            asset_base: String::new(),
            cache: CacheConfig::default(),
            visibility: VisibilityConfig::default(),
            interaction: InteractionConfig::default(),
            scroll_budget: ScrollBudgetConfig::default(),
            quality: QualityConfig::default(),
            loader: LoaderConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Parses and validates a RON document.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a `.ron` or `.json` file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match extension.as_str() {
            "ron" => Self::from_ron_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        log::info!("Loaded gallery config from {}", path.display());
        Ok(config)
    }

    /// Rejects values the gallery cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid("cache.max_entries must be > 0".into()));
        }
        if self.cache.sweep_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "cache.sweep_interval_ms must be > 0".into(),
            ));
        }
        if self.scroll_budget.active_limit == 0 {
            return Err(ConfigError::Invalid(
                "scroll_budget.active_limit must be > 0".into(),
            ));
        }
        let threshold = self.visibility.strict_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "visibility.strict_threshold must be in (0, 1], got {threshold}"
            )));
        }
        if self.visibility.preload_margin_px < 0.0 {
            return Err(ConfigError::Invalid(
                "visibility.preload_margin_px must be >= 0".into(),
            ));
        }
        for (name, range) in [
            ("quality.full_resolution", self.quality.full_resolution),
            ("quality.reduced_resolution", self.quality.reduced_resolution),
        ] {
            if range.low <= 0.0 || range.low > range.high {
                return Err(ConfigError::Invalid(format!(
                    "{name} must satisfy 0 < low <= high"
                )));
            }
        }
        Ok(())
    }
}
