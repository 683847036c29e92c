//! Run a carousel on virtual time.
//!
//! Used by `--simulate` to print a timeline without waiting on real timers,
//! and by tests that need exact timing.

use std::ops::ControlFlow;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::carousel::Carousel;
use crate::events::{Command, Input};
use crate::schedule::VirtualScheduler;

/// A command scheduled at an offset from the start of the simulation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub at: Duration,
    pub command: Command,
}

/// Parse `<offset> <command...>` lines such as `3500ms next`.
///
/// Blank lines and lines starting with `#` are skipped. Steps are returned
/// in file order; offsets must not decrease.
pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>> {
    let mut steps: Vec<ScriptStep> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (offset, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow!("line {}: expected '<offset> <command>'", lineno + 1))?;
        let at = humantime::parse_duration(offset)
            .with_context(|| format!("line {}: bad offset '{}'", lineno + 1, offset))?;
        let command: Command = rest
            .parse()
            .with_context(|| format!("line {}: bad command", lineno + 1))?;
        if let Some(prev) = steps.last() {
            anyhow::ensure!(
                at >= prev.at,
                "line {}: offset {} is earlier than the previous step",
                lineno + 1,
                offset
            );
        }
        steps.push(ScriptStep { at, command });
    }
    Ok(steps)
}

#[derive(Debug)]
pub struct Simulation {
    carousel: Carousel<VirtualScheduler>,
}

impl Simulation {
    /// Wrap a carousel and start it at virtual time zero.
    pub fn start(mut carousel: Carousel<VirtualScheduler>) -> Self {
        carousel.init();
        Self { carousel }
    }

    pub fn now(&self) -> Duration {
        self.carousel.scheduler().now()
    }

    pub fn carousel(&self) -> &Carousel<VirtualScheduler> {
        &self.carousel
    }

    pub fn carousel_mut(&mut self) -> &mut Carousel<VirtualScheduler> {
        &mut self.carousel
    }

    /// Fire every timer due up to and including `until`, in order.
    pub fn run_until(&mut self, until: Duration) {
        while let Some(fired) = self.carousel.scheduler_mut().pop_due(until) {
            self.carousel.on_timer(fired);
        }
        self.carousel.scheduler_mut().set_now(until);
    }

    /// Advance the clock to `at` and deliver `input` there.
    pub fn input_at(&mut self, at: Duration, input: Input) {
        self.run_until(at);
        self.carousel.handle(input);
    }

    /// Play a script, then keep running until `horizon`. Steps past the
    /// horizon are dropped; `quit` ends the run early.
    pub fn play(&mut self, script: &[ScriptStep], horizon: Duration) {
        for step in script {
            if step.at > horizon {
                break;
            }
            self.run_until(step.at);
            match self.carousel.apply(step.command.clone()) {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(())) => {
                    info!(at_ms = step.at.as_millis() as u64, "script quit");
                    return;
                }
                Err(err) => warn!(at_ms = step.at.as_millis() as u64, "{err}"),
            }
        }
        self.run_until(horizon);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Key;

    #[test]
    fn script_lines_parse() {
        let steps = parse_script(
            "# warm up\n\n3500ms next\n4s swipe 300 100\n  5s   open 2\n",
        )
        .unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[0].at, Duration::from_millis(3_500));
        assert_eq!(steps[0].command, Command::Input(Input::NextButton));
        assert_eq!(steps[1].command, Command::Swipe { start: 300, end: 100 });
        assert_eq!(steps[2].command, Command::Open(2));
    }

    #[test]
    fn script_rejects_going_back_in_time() {
        let err = parse_script("2s right\n1s left\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn script_rejects_unknown_commands() {
        assert!(parse_script("1s jump").is_err());
        assert!(parse_script("soon next").is_err());
        assert!(parse_script("1s").is_err());
        let ok = parse_script("1s esc").unwrap();
        assert_eq!(ok[0].command, Command::Input(Input::Key(Key::Escape)));
    }
}
