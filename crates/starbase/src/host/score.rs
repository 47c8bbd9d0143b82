//! # Score Board
//!
//! The high score kept across scenes.

/// High score before anyone has played.
pub const DEFAULT_HIGH_SCORE: i32 = 5000;

/// The session high score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreBoard {
    high: i32,
}

impl Default for ScoreBoard {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_SCORE,
        }
    }
}

impl ScoreBoard {
    /// Returns the high score.
    #[inline]
    #[must_use]
    pub const fn high_score(&self) -> i32 {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Host;

    #[test]
    fn test_default_high_score() {
        assert_eq!(ScoreBoard::default().high_score(), DEFAULT_HIGH_SCORE);
        assert_eq!(Host::new().score.high_score(), 5000);
    }
}
