//! Immutable slide sequence with wrap-around index arithmetic.

use serde::Deserialize;

use crate::error::Error;
use crate::events::Direction;

/// One visual unit of the carousel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Slide {
    pub name: String,
    /// Full-resolution image shown by the fullscreen viewer.
    #[serde(default)]
    pub image: Option<String>,
}

impl Slide {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image: None,
        }
    }

    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A fixed, non-empty ring of slides.
#[derive(Debug, Clone)]
pub struct SlideDeck {
    slides: Vec<Slide>,
}

impl SlideDeck {
    /// Construct a deck from a list of slides.
    ///
    /// # Errors
    /// Returns [`Error::EmptyDeck`] if `slides` is empty.
    pub fn from_vec(slides: Vec<Slide>) -> Result<Self, Error> {
        if slides.is_empty() {
            return Err(Error::EmptyDeck);
        }
        Ok(Self { slides })
    }

    /// Number of slides; always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    /// Index reached by moving one step from `index`, wrapping at both ends.
    #[must_use]
    pub fn step(&self, index: usize, direction: Direction) -> usize {
        let len = self.slides.len();
        match direction {
            Direction::Forward => (index + 1) % len,
            Direction::Backward => (index + len - 1) % len,
        }
    }

    /// Resolve a 1-based slide number as typed by a user.
    ///
    /// # Errors
    /// Returns [`Error::SlideOutOfRange`] for `0` or numbers past the end.
    pub fn index_of_number(&self, number: usize) -> Result<usize, Error> {
        if number == 0 || number > self.slides.len() {
            return Err(Error::SlideOutOfRange {
                number,
                len: self.slides.len(),
            });
        }
        Ok(number - 1)
    }

    /// Borrow the slides (read-only).
    #[must_use]
    pub fn as_slice(&self) -> &[Slide] {
        &self.slides
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(n: usize) -> SlideDeck {
        SlideDeck::from_vec((0..n).map(|i| Slide::new(format!("s{i}"))).collect()).unwrap()
    }

    #[test]
    fn empty_deck_is_rejected() {
        assert!(matches!(SlideDeck::from_vec(Vec::new()), Err(Error::EmptyDeck)));
    }

    #[test]
    fn step_wraps_both_ways() {
        let d = deck(3);
        assert_eq!(d.step(2, Direction::Forward), 0);
        assert_eq!(d.step(0, Direction::Backward), 2);
        assert_eq!(d.step(1, Direction::Backward), 0);
    }

    #[test]
    fn single_slide_deck_stays_put() {
        let d = deck(1);
        assert_eq!(d.step(0, Direction::Forward), 0);
        assert_eq!(d.step(0, Direction::Backward), 0);
    }

    #[test]
    fn slide_numbers_are_one_based() {
        let d = deck(4);
        assert_eq!(d.index_of_number(1).unwrap(), 0);
        assert_eq!(d.index_of_number(4).unwrap(), 3);
        assert!(matches!(
            d.index_of_number(0),
            Err(Error::SlideOutOfRange { number: 0, len: 4 })
        ));
        assert!(d.index_of_number(5).is_err());
    }
}
