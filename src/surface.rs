//! The elements a carousel renders into and listens to.
//!
//! Only the viewport is mandatory. Every other capability is optional and is
//! fixed when the [`Surface`] is built; an absent capability switches its
//! feature off instead of failing.

use tracing::info;

use crate::config::Features;

/// Horizontal slide track.
pub trait Viewport: Send {
    /// Offset the track by `percent` of one slide width (always `<= 0`).
    fn translate(&mut self, percent: i64);
}

/// "3 / 5" style slide counter.
pub trait Indicator: Send {
    fn show(&mut self, current: usize, total: usize);
}

/// Fullscreen layer with an image and an opacity transition.
pub trait Overlay: Send {
    fn set_image(&mut self, source: &str);
    fn set_displayed(&mut self, displayed: bool);
    fn set_opacity(&mut self, opacity: f32);
}

/// Which input sources exist on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub prev_button: bool,
    pub next_button: bool,
    pub keyboard: bool,
    pub touch: bool,
    /// Per-slide "open fullscreen" triggers.
    pub fullscreen_triggers: bool,
    pub close_button: bool,
}

impl Controls {
    pub const NONE: Self = Self {
        prev_button: false,
        next_button: false,
        keyboard: false,
        touch: false,
        fullscreen_triggers: false,
        close_button: false,
    };

    pub const ALL: Self = Self {
        prev_button: true,
        next_button: true,
        keyboard: true,
        touch: true,
        fullscreen_triggers: true,
        close_button: true,
    };
}

impl Default for Controls {
    fn default() -> Self {
        Self::NONE
    }
}

pub struct Surface {
    pub(crate) viewport: Box<dyn Viewport>,
    pub(crate) indicator: Option<Box<dyn Indicator>>,
    pub(crate) overlay: Option<Box<dyn Overlay>>,
    pub(crate) controls: Controls,
}

impl Surface {
    pub fn new(viewport: impl Viewport + 'static) -> Self {
        Self {
            viewport: Box::new(viewport),
            indicator: None,
            overlay: None,
            controls: Controls::NONE,
        }
    }

    /// Bind `sink` as every capability the feature set switches on.
    pub fn for_features<T>(features: Features, sink: T) -> Self
    where
        T: Viewport + Indicator + Overlay + Clone + 'static,
    {
        let mut surface = Self::new(sink.clone()).with_controls(features.controls());
        if features.indicator {
            surface = surface.with_indicator(sink.clone());
        }
        if features.fullscreen {
            surface = surface.with_overlay(sink);
        }
        surface
    }

    #[must_use]
    pub fn with_indicator(mut self, indicator: impl Indicator + 'static) -> Self {
        self.indicator = Some(Box::new(indicator));
        self
    }

    #[must_use]
    pub fn with_overlay(mut self, overlay: impl Overlay + 'static) -> Self {
        self.overlay = Some(Box::new(overlay));
        self
    }

    #[must_use]
    pub fn with_controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("indicator", &self.indicator.is_some())
            .field("overlay", &self.overlay.is_some())
            .field("controls", &self.controls)
            .finish_non_exhaustive()
    }
}

/// Renders the carousel as log lines; used by the command-line frontend.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSurface;

impl Viewport for LogSurface {
    fn translate(&mut self, percent: i64) {
        info!(target: "slide_carousel::surface", translate = %format_args!("{percent}%"), "viewport");
    }
}

impl Indicator for LogSurface {
    fn show(&mut self, current: usize, total: usize) {
        info!(target: "slide_carousel::surface", "slide {current} / {total}");
    }
}

impl Overlay for LogSurface {
    fn set_image(&mut self, source: &str) {
        info!(target: "slide_carousel::surface", source, "fullscreen image");
    }

    fn set_displayed(&mut self, displayed: bool) {
        info!(target: "slide_carousel::surface", displayed, "fullscreen overlay");
    }

    fn set_opacity(&mut self, opacity: f32) {
        info!(target: "slide_carousel::surface", opacity, "fullscreen opacity");
    }
}
