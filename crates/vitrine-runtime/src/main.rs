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

//! Mounts a gallery on a simulated viewport, scrolls it and reports what the
//! renderer was asked to do.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use vitrine_sdk::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gallery configuration (.ron or .json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding `glbs/*.glb`. Models are generated when omitted.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Number of species in the list
    #[arg(long, default_value_t = 60)]
    count: u32,

    /// How long the simulated scroll lasts, in milliseconds
    #[arg(long, default_value_t = 500)]
    scroll_ms: u64,

    /// Loop step, in milliseconds. The list moves one item per step while scrolling.
    #[arg(long, default_value_t = 50)]
    step_ms: u64,

    /// Height of one list item in pixels
    #[arg(long, default_value_t = 40.0)]
    item_height: f32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 600.0)]
    viewport: f32,

    /// Species ids whose generated model fails to load (repeatable)
    #[arg(long = "fail")]
    fail: Vec<u32>,
}

#[derive(Debug, Default)]
struct RunSummary {
    frames: u64,
    max_continuous_scrolling: usize,
    max_continuous_idle: usize,
    unavailable: usize,
}

fn build_source(cli: &Cli, base: &str) -> Arc<dyn AssetSource> {
    match &cli.assets {
        Some(dir) => {
            if !cli.fail.is_empty() {
                log::warn!("--fail only applies to generated models; ignoring it.");
            }
            log::info!("Reading models from {}", dir.display());
            Arc::new(FileSystemSource::new(dir))
        }
        None => {
            let source = cli.fail.iter().fold(SyntheticSceneSource::new(), |source, id| {
                source.with_failing(&AssetPath::for_species(base, *id, None))
            });
            Arc::new(source)
        }
    }
}

fn build_catalog(count: u32, base: &str) -> Catalog {
    let tags: Vec<&str> = LightingProfile::type_tags().collect();
    let records: Vec<SpeciesRecord> = (1..=count)
        .map(|id| SpeciesRecord {
            id,
            name: format!("species-{id:04}"),
            types: vec![tags[id as usize % tags.len()].to_string()],
        })
        .collect();
    Catalog::build(&records, &VariantTable::default(), base)
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => GalleryConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GalleryConfig::default(),
    };
    if cli.step_ms == 0 {
        anyhow::bail!("--step-ms must be greater than zero");
    }

    let base = config.asset_base.clone();
    let source = build_source(&cli, &base);
    let catalog = build_catalog(cli.count, &base);
    let layout = ListLayout::new(catalog.len(), cli.item_height, 0.0, cli.viewport);
    let settle_ms = config.scroll_budget.debounce_ms
        + config.visibility.unload_delay_ms
        + config.interaction.release_delay_ms;

    let mut gallery = Gallery::new(config, SimulatedViewport::new(cli.viewport), source, layout)
        .context("failed to start the gallery")?;
    gallery.mount_entries(catalog.entries());
    let mut renderer = HeadlessRenderer::new();
    let mut summary = RunSummary::default();
    let wall = Stopwatch::start();

    let step = Duration::from_millis(cli.step_ms);
    let end = Duration::from_millis(cli.scroll_ms + settle_ms);
    let mut now = Duration::ZERO;
    let mut scroll_top = 0.0;
    while now <= end {
        if now > Duration::ZERO && now <= Duration::from_millis(cli.scroll_ms) {
            scroll_top += layout.stride();
            gallery.scroll_viewport(now, scroll_top);
        }
        gallery.tick(now);
        let frame = gallery.frame(&mut renderer);
        summary.frames += 1;
        summary.unavailable = frame.unavailable;
        if gallery.scroll_window().is_scrolling {
            summary.max_continuous_scrolling = summary.max_continuous_scrolling.max(frame.continuous);
        } else {
            summary.max_continuous_idle = summary.max_continuous_idle.max(frame.continuous);
        }
        log::debug!(
            "t={:>5}ms window={:?} submitted={} continuous={} scenes={} released={}",
            now.as_millis(),
            gallery.scroll_window(),
            frame.submitted,
            frame.continuous,
            frame.scenes,
            frame.released
        );
        now += step;
    }

    // Worker threads may still be decoding after the simulated time ran out.
    let drain = Stopwatch::start();
    while gallery.loads_in_flight() > 0
        && drain.elapsed().is_some_and(|elapsed| elapsed < Duration::from_secs(10))
    {
        std::thread::sleep(Duration::from_millis(1));
        gallery.tick(now);
        gallery.frame(&mut renderer);
    }

    log::info!(
        "{} frames in {:.1}ms: max {} continuous while scrolling (budget {}), {} when idle, {} unavailable.",
        summary.frames,
        wall.elapsed_ms_f64().unwrap_or_default(),
        summary.max_continuous_scrolling,
        gallery.config().scroll_budget.active_limit,
        summary.max_continuous_idle,
        summary.unavailable
    );
    log::info!(
        "Cache holds {} of {} scenes; renderer saw {} submits and {} releases.",
        gallery.cache().len(),
        gallery.config().cache.max_entries,
        renderer.submits(),
        renderer.releases()
    );

    let metrics = serde_json::to_string_pretty(&gallery.metrics().to_json())
        .context("failed to serialize metrics")?;
    println!("{metrics}");

    gallery.shutdown(&mut renderer);
    Ok(())
}
