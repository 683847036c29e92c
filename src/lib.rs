pub mod carousel;
pub mod config;
pub mod deck;
pub mod error;
pub mod events;
pub mod gesture;
pub mod scan;
pub mod schedule;
pub mod simulate;
pub mod surface;
pub mod tasks {
    pub mod input;
    pub mod runtime;
    pub mod timers;
}

use anyhow::{Context, Result};
use tracing::debug;

use crate::config::Configuration;
use crate::deck::SlideDeck;

/// Collect the configured slides: inline entries first, then the images
/// found in `slide-dir`.
pub fn load_deck(cfg: &Configuration) -> Result<SlideDeck> {
    let mut slides = cfg.slides.clone();
    if let Some(dir) = cfg.slide_dir.as_deref() {
        let scanned = scan::scan_slides(dir)
            .with_context(|| format!("failed to scan slides in {}", dir.display()))?;
        debug!(count = scanned.len(), dir = %dir.display(), "scanned slide directory");
        slides.extend(scanned);
    }
    SlideDeck::from_vec(slides).context("no slides to show")
}
