use std::path::PathBuf;

use thiserror::Error;

/// Library error type for carousel construction.
#[derive(Debug, Error)]
pub enum Error {
    /// A carousel needs at least one slide.
    #[error("a slide deck needs at least one slide")]
    EmptyDeck,

    /// The configured slide directory is missing or not a directory.
    #[error("invalid slide directory: {}", .0.display())]
    BadDir(PathBuf),

    /// A 1-based slide number outside the deck.
    #[error("slide {number} is out of range (deck has {len} slides)")]
    SlideOutOfRange { number: usize, len: usize },

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}
