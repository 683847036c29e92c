use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Direction of a single navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Keys the carousel reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    Escape,
}

/// Input delivered to the carousel by its controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    NextButton,
    PrevButton,
    Key(Key),
    TouchStart { x: i32 },
    TouchEnd { x: i32 },
    /// Fullscreen trigger attached to the slide at this 0-based index.
    OpenFullscreen(usize),
    CloseButton,
    /// Click on the overlay; `on_backdrop` is false when the click landed on the image.
    OverlayClick { on_backdrop: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    AutoAdvance,
    FadeIn,
    HideOverlay,
}

impl fmt::Display for TimerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AutoAdvance => "auto-advance",
            Self::FadeIn => "fade-in",
            Self::HideOverlay => "hide-overlay",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub u64);

/// Emitted by a scheduler each time a timer expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerFired {
    pub handle: TimerHandle,
    pub kind: TimerKind,
}

/// One line of the stdin control protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Input(Input),
    /// `swipe <start> <end>` expands to a touch start and end.
    Swipe { start: i32, end: i32 },
    /// `open <n>` with a 1-based slide number, resolved against the deck.
    Open(usize),
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    BadArguments {
        command: &'static str,
        expected: &'static str,
    },
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let head = words.next().ok_or(ParseCommandError::Empty)?;
        let args: Vec<&str> = words.collect();

        let no_args = |command: &'static str, cmd: Command| {
            if args.is_empty() {
                Ok(cmd)
            } else {
                Err(ParseCommandError::BadArguments {
                    command,
                    expected: "no arguments",
                })
            }
        };
        let coord = |command: &'static str| -> Result<i32, ParseCommandError> {
            match args.as_slice() {
                [x] => x.parse().map_err(|_| ParseCommandError::BadArguments {
                    command,
                    expected: "one integer coordinate",
                }),
                _ => Err(ParseCommandError::BadArguments {
                    command,
                    expected: "one integer coordinate",
                }),
            }
        };

        match head.to_ascii_lowercase().as_str() {
            "next" => no_args("next", Command::Input(Input::NextButton)),
            "prev" => no_args("prev", Command::Input(Input::PrevButton)),
            "left" => no_args("left", Command::Input(Input::Key(Key::ArrowLeft))),
            "right" => no_args("right", Command::Input(Input::Key(Key::ArrowRight))),
            "escape" | "esc" => no_args("escape", Command::Input(Input::Key(Key::Escape))),
            "close" => no_args("close", Command::Input(Input::CloseButton)),
            "backdrop" => no_args(
                "backdrop",
                Command::Input(Input::OverlayClick { on_backdrop: true }),
            ),
            "quit" | "exit" => no_args("quit", Command::Quit),
            "touch-start" => Ok(Command::Input(Input::TouchStart {
                x: coord("touch-start")?,
            })),
            "touch-end" => Ok(Command::Input(Input::TouchEnd {
                x: coord("touch-end")?,
            })),
            "swipe" => {
                let bad = || ParseCommandError::BadArguments {
                    command: "swipe",
                    expected: "start and end coordinates",
                };
                match args.as_slice() {
                    [start, end] => Ok(Command::Swipe {
                        start: start.parse().map_err(|_| bad())?,
                        end: end.parse().map_err(|_| bad())?,
                    }),
                    _ => Err(bad()),
                }
            }
            "open" => match args.as_slice() {
                [n] => n.parse().map(Command::Open).map_err(|_| {
                    ParseCommandError::BadArguments {
                        command: "open",
                        expected: "a slide number",
                    }
                }),
                _ => Err(ParseCommandError::BadArguments {
                    command: "open",
                    expected: "a slide number",
                }),
            },
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}
