//! The carousel controller.
//!
//! Holds the current slide index, owns the auto-play and fade timers and
//! switches between browsing and the fullscreen viewer. Everything it talks
//! to is injected: the [`Surface`] it renders into and the [`Scheduler`]
//! that delivers timer expiries back through [`Carousel::on_timer`].

use std::ops::ControlFlow;

use tracing::{debug, info, trace, warn};

use crate::config::CarouselSettings;
use crate::deck::{Slide, SlideDeck};
use crate::error::Error;
use crate::events::{Command, Direction, Input, Key, TimerFired, TimerHandle, TimerKind};
use crate::gesture::{Swipe, SwipeTracker};
use crate::schedule::Scheduler;
use crate::surface::Surface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    Fullscreen,
}

#[derive(Debug)]
pub struct Carousel<S> {
    deck: SlideDeck,
    surface: Surface,
    scheduler: S,
    settings: CarouselSettings,
    index: usize,
    mode: Mode,
    auto_play: Option<TimerHandle>,
    /// Pending fade-in or hide step of the overlay.
    fade: Option<TimerHandle>,
    /// Overlay is shown, including the fade-out before it is hidden.
    overlay_displayed: bool,
    swipe: SwipeTracker,
}

impl<S: Scheduler> Carousel<S> {
    pub fn new(
        deck: SlideDeck,
        surface: Surface,
        scheduler: S,
        settings: CarouselSettings,
    ) -> Self {
        Self {
            deck,
            surface,
            scheduler,
            swipe: SwipeTracker::new(settings.swipe_threshold_px),
            settings,
            index: 0,
            mode: Mode::Browsing,
            auto_play: None,
            fade: None,
            overlay_displayed: false,
        }
    }

    /// Show the first slide and start auto-play.
    pub fn init(&mut self) {
        self.index = 0;
        self.render();
        self.restart_auto_play();
        info!(
            slides = self.deck.len(),
            interval_ms = self.settings.autoplay_interval.as_millis() as u64,
            "carousel started"
        );
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_slide(&self) -> &Slide {
        // index is kept in [0, len) by SlideDeck::step
        &self.deck.as_slice()[self.index]
    }

    pub fn deck(&self) -> &SlideDeck {
        &self.deck
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn settings(&self) -> &CarouselSettings {
        &self.settings
    }

    pub fn is_overlay_displayed(&self) -> bool {
        self.overlay_displayed
    }

    pub fn is_auto_playing(&self) -> bool {
        self.auto_play.is_some()
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Move one slide in `direction`, wrapping at either end, and re-render.
    pub fn advance(&mut self, direction: Direction) {
        let from = self.index;
        self.index = self.deck.step(self.index, direction);
        debug!(from, to = self.index, ?direction, "advance");
        self.render();
    }

    /// Push the current position to the viewport and the indicator.
    pub fn render(&mut self) {
        let offset = -(self.index as i64) * 100;
        self.surface.viewport.translate(offset);
        if let Some(indicator) = self.surface.indicator.as_mut() {
            indicator.show(self.index + 1, self.deck.len());
        }
    }

    /// Replace any running auto-play timer with a fresh one.
    pub fn restart_auto_play(&mut self) {
        self.stop_auto_play();
        let handle = self
            .scheduler
            .repeat(TimerKind::AutoAdvance, self.settings.autoplay_interval);
        trace!(?handle, "auto-play scheduled");
        self.auto_play = Some(handle);
    }

    pub fn stop_auto_play(&mut self) {
        if let Some(handle) = self.auto_play.take() {
            self.scheduler.cancel(handle);
        }
    }

    /// Dispatch one input event. Inputs from controls that are not bound on
    /// the surface are dropped.
    pub fn handle(&mut self, input: Input) {
        let controls = self.surface.controls;
        match input {
            Input::NextButton if controls.next_button => self.navigate(Direction::Forward),
            Input::PrevButton if controls.prev_button => self.navigate(Direction::Backward),
            Input::Key(Key::ArrowRight) if controls.keyboard => self.navigate(Direction::Forward),
            Input::Key(Key::ArrowLeft) if controls.keyboard => self.navigate(Direction::Backward),
            Input::Key(Key::Escape) if self.surface.has_overlay() => self.close_fullscreen(),
            Input::TouchStart { x } if controls.touch => self.swipe.touch_start(x),
            Input::TouchEnd { x } if controls.touch => self.on_touch_end(x),
            Input::OpenFullscreen(index) if controls.fullscreen_triggers => {
                self.open_fullscreen(index);
            }
            Input::CloseButton if controls.close_button => self.close_fullscreen(),
            Input::OverlayClick { on_backdrop } if self.surface.has_overlay() => {
                if on_backdrop {
                    self.close_fullscreen();
                }
            }
            other => trace!(?other, "input ignored; control not bound"),
        }
    }

    /// Apply one line-protocol command. Breaks on `quit`.
    ///
    /// # Errors
    /// Returns [`Error::SlideOutOfRange`] when `open` names a slide outside the deck.
    pub fn apply(&mut self, command: Command) -> Result<ControlFlow<()>, Error> {
        match command {
            Command::Input(input) => self.handle(input),
            Command::Swipe { start, end } => {
                self.handle(Input::TouchStart { x: start });
                self.handle(Input::TouchEnd { x: end });
            }
            Command::Open(number) => {
                let index = self.deck.index_of_number(number)?;
                self.handle(Input::OpenFullscreen(index));
            }
            Command::Quit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    /// Show the image of the slide at `index` in the overlay and pause
    /// auto-play. Returns `false` when there is nothing to show.
    pub fn open_fullscreen(&mut self, index: usize) -> bool {
        if self.surface.overlay.is_none() {
            trace!("no overlay bound; fullscreen disabled");
            return false;
        }
        let Some(slide) = self.deck.get(index) else {
            warn!(index, len = self.deck.len(), "fullscreen trigger for unknown slide");
            return false;
        };
        let Some(image) = slide.image.clone() else {
            debug!(slide = %slide.name, "slide has no fullscreen image");
            return false;
        };

        self.cancel_fade();
        if let Some(overlay) = self.surface.overlay.as_mut() {
            overlay.set_image(&image);
            overlay.set_displayed(true);
        }
        self.overlay_displayed = true;
        self.fade = Some(
            self.scheduler
                .once(TimerKind::FadeIn, self.settings.fade_in_delay),
        );
        self.stop_auto_play();
        self.mode = Mode::Fullscreen;
        info!(%image, "fullscreen opened");
        true
    }

    /// Fade the overlay out and resume auto-play. No-op while the overlay is
    /// hidden; closing again during the fade-out re-arms the hide and the
    /// countdown.
    pub fn close_fullscreen(&mut self) {
        if !self.overlay_displayed {
            return;
        }
        self.cancel_fade();
        if let Some(overlay) = self.surface.overlay.as_mut() {
            overlay.set_opacity(0.0);
        }
        self.fade = Some(
            self.scheduler
                .once(TimerKind::HideOverlay, self.settings.fade_out),
        );
        self.mode = Mode::Browsing;
        self.restart_auto_play();
        info!("fullscreen closed");
    }

    /// Apply a timer expiry. Firings from timers that have since been
    /// cancelled or replaced are dropped.
    pub fn on_timer(&mut self, fired: TimerFired) {
        match fired.kind {
            TimerKind::AutoAdvance => {
                if self.auto_play != Some(fired.handle) {
                    trace!(handle = ?fired.handle, "stale auto-advance dropped");
                    return;
                }
                self.advance(Direction::Forward);
            }
            TimerKind::FadeIn | TimerKind::HideOverlay => {
                if self.fade != Some(fired.handle) {
                    trace!(
                        handle = ?fired.handle,
                        kind = %fired.kind,
                        "stale fade step dropped"
                    );
                    return;
                }
                self.fade = None;
                self.scheduler.cancel(fired.handle);
                if let Some(overlay) = self.surface.overlay.as_mut() {
                    match fired.kind {
                        TimerKind::FadeIn => overlay.set_opacity(1.0),
                        _ => overlay.set_displayed(false),
                    }
                }
                if fired.kind == TimerKind::HideOverlay {
                    self.overlay_displayed = false;
                }
            }
        }
    }

    /// Cancel every timer owned by the carousel.
    pub fn shutdown(&mut self) {
        self.stop_auto_play();
        self.cancel_fade();
        debug!("carousel timers cancelled");
    }

    fn navigate(&mut self, direction: Direction) {
        self.stop_auto_play();
        self.advance(direction);
        self.resume_auto_play();
    }

    fn on_touch_end(&mut self, x: i32) {
        let Some(swipe) = self.swipe.touch_end(x) else {
            trace!(x, "touch end without start");
            return;
        };
        self.stop_auto_play();
        if let Swipe::Navigate(direction) = swipe {
            self.advance(direction);
        }
        self.resume_auto_play();
    }

    fn resume_auto_play(&mut self) {
        // auto-play stays paused behind the fullscreen viewer
        if self.mode == Mode::Browsing {
            self.restart_auto_play();
        }
    }

    fn cancel_fade(&mut self) {
        if let Some(handle) = self.fade.take() {
            self.scheduler.cancel(handle);
        }
    }
}
