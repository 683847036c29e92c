use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::deck::Slide;
use crate::gesture::DEFAULT_SWIPE_THRESHOLD_PX;
use crate::surface::Controls;

/// Deployment preset selecting the auto-play interval and feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Buttons, keyboard, touch and the fullscreen viewer; 7 s interval.
    #[default]
    Full,
    /// Prev/next buttons and the slide counter; 3 s interval.
    Minimal,
}

impl Variant {
    const NAMES: &'static [&'static str] = &["full", "minimal"];

    pub fn autoplay_interval(self) -> Duration {
        match self {
            Self::Full => Duration::from_millis(7_000),
            Self::Minimal => Duration::from_millis(3_000),
        }
    }

    pub fn features(self) -> Features {
        match self {
            Self::Full => Features {
                buttons: true,
                indicator: true,
                keyboard: true,
                touch: true,
                fullscreen: true,
            },
            Self::Minimal => Features {
                buttons: true,
                indicator: true,
                keyboard: false,
                touch: false,
                fullscreen: false,
            },
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Minimal => "minimal",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw {
            "full" => Ok(Self::Full),
            "minimal" => Ok(Self::Minimal),
            other => Err(anyhow::anyhow!(
                "unknown variant '{}', expected one of: {}",
                other,
                Self::NAMES.join(", ")
            )),
        }
    }
}

/// Resolved on/off switches for optional carousel features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    pub buttons: bool,
    pub indicator: bool,
    pub keyboard: bool,
    pub touch: bool,
    pub fullscreen: bool,
}

impl Features {
    pub fn controls(&self) -> Controls {
        Controls {
            prev_button: self.buttons,
            next_button: self.buttons,
            keyboard: self.keyboard,
            touch: self.touch,
            fullscreen_triggers: self.fullscreen,
            close_button: self.fullscreen,
        }
    }
}

/// Per-feature overrides on top of the variant preset.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FeatureOverrides {
    #[serde(default)]
    pub buttons: Option<bool>,
    #[serde(default)]
    pub indicator: Option<bool>,
    #[serde(default)]
    pub keyboard: Option<bool>,
    #[serde(default)]
    pub touch: Option<bool>,
    #[serde(default)]
    pub fullscreen: Option<bool>,
}

impl FeatureOverrides {
    fn apply(&self, base: Features) -> Features {
        Features {
            buttons: self.buttons.unwrap_or(base.buttons),
            indicator: self.indicator.unwrap_or(base.indicator),
            keyboard: self.keyboard.unwrap_or(base.keyboard),
            touch: self.touch.unwrap_or(base.touch),
            fullscreen: self.fullscreen.unwrap_or(base.fullscreen),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Configuration {
    #[serde(default)]
    pub variant: Variant,
    /// Slides listed inline, shown before any scanned from `slide-dir`.
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Directory whose images are appended to the slide list.
    #[serde(default)]
    pub slide_dir: Option<PathBuf>,
    /// Overrides the variant's auto-play interval.
    #[serde(default, with = "humantime_serde")]
    pub autoplay_interval: Option<Duration>,
    /// Horizontal travel a touch must exceed to count as a swipe.
    #[serde(default = "Configuration::default_swipe_threshold_px")]
    pub swipe_threshold_px: u32,
    /// Delay between showing the overlay and fading it in.
    #[serde(
        default = "Configuration::default_fade_in_delay",
        with = "humantime_serde"
    )]
    pub fade_in_delay: Duration,
    /// Fade-out duration; the overlay is hidden once it elapses.
    #[serde(default = "Configuration::default_fade_out", with = "humantime_serde")]
    pub fade_out: Duration,
    #[serde(default)]
    pub features: FeatureOverrides,
}

impl Configuration {
    const fn default_swipe_threshold_px() -> u32 {
        DEFAULT_SWIPE_THRESHOLD_PX
    }

    const fn default_fade_in_delay() -> Duration {
        Duration::from_millis(10)
    }

    const fn default_fade_out() -> Duration {
        Duration::from_millis(300)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let cfg: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(cfg)
    }

    pub fn validated(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.autoplay_interval().is_zero(),
            "autoplay-interval must be greater than zero"
        );
        ensure!(
            self.swipe_threshold_px > 0,
            "swipe-threshold-px must be greater than zero"
        );
        ensure!(
            !self.slides.is_empty() || self.slide_dir.is_some(),
            "configure at least one slide or a slide-dir"
        );
        for (idx, slide) in self.slides.iter().enumerate() {
            ensure!(
                !slide.name.trim().is_empty(),
                "slides[{}] must have a non-empty name",
                idx
            );
        }
        Ok(())
    }

    pub fn autoplay_interval(&self) -> Duration {
        self.autoplay_interval
            .unwrap_or_else(|| self.variant.autoplay_interval())
    }

    pub fn features(&self) -> Features {
        self.features.apply(self.variant.features())
    }

    pub fn settings(&self) -> CarouselSettings {
        CarouselSettings {
            autoplay_interval: self.autoplay_interval(),
            swipe_threshold_px: self.swipe_threshold_px,
            fade_in_delay: self.fade_in_delay,
            fade_out: self.fade_out,
        }
    }
}

/// Timing and gesture parameters consumed by the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselSettings {
    pub autoplay_interval: Duration,
    pub swipe_threshold_px: u32,
    pub fade_in_delay: Duration,
    pub fade_out: Duration,
}

impl Default for CarouselSettings {
    fn default() -> Self {
        Self {
            autoplay_interval: Variant::Full.autoplay_interval(),
            swipe_threshold_px: Configuration::default_swipe_threshold_px(),
            fade_in_delay: Configuration::default_fade_in_delay(),
            fade_out: Configuration::default_fade_out(),
        }
    }
}
