//! # Host Context
//!
//! Everything an actor callback can touch outside the stage: input, the
//! canvas, system sounds, the high score and the frame counter. One `Host`
//! is passed to every update, draw and unload callback.

mod audio;
mod canvas;
mod input;
mod score;

pub use audio::{Audio, SystemSound};
pub use canvas::{
    Canvas, Color, DrawCommand, GLYPH_HEIGHT, GLYPH_WIDTH, SCREEN_HEIGHT, SCREEN_WIDTH,
};
pub use input::{Button, Buttons, Input, InputSample, REPEAT_DELAY, REPEAT_INTERVAL};
pub use score::{ScoreBoard, DEFAULT_HIGH_SCORE};

/// The host context.
#[derive(Clone, Debug, Default)]
pub struct Host {
    /// Button and crank state.
    pub input: Input,
    /// This frame's draw commands.
    pub canvas: Canvas,
    /// This frame's sounds.
    pub audio: Audio,
    /// Session high score.
    pub score: ScoreBoard,
    frame: u64,
}

impl Host {
    /// Creates a host at frame 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new frame with the given input.
    pub fn begin_frame(&mut self, sample: InputSample) {
        self.frame += 1;
        self.input.update(sample);
        self.audio.clear();
    }

    /// Returns the number of frames started.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}
