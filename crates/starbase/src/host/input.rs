//! # Input
//!
//! Button and crank state sampled once per frame.
//!
//! Three views of each button are derived from consecutive samples:
//! - **push**: held this frame
//! - **edge**: pressed this frame, not held last frame
//! - **repeat**: fires on the first held frame, again once the repeat delay
//!   has elapsed, and then periodically while the button stays held

use serde::{Deserialize, Serialize};

/// Frames a button must be held before it starts repeating.
pub const REPEAT_DELAY: u32 = 15;

/// Frames between repeats once repeating.
pub const REPEAT_INTERVAL: u32 = 1;

/// A physical button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    /// D-pad left.
    Left,
    /// D-pad right.
    Right,
    /// D-pad up.
    Up,
    /// D-pad down.
    Down,
    /// The B button.
    B,
    /// The A button.
    A,
}

impl Button {
    /// Every button, in bit order.
    pub const ALL: [Self; 6] = [
        Self::Left,
        Self::Right,
        Self::Up,
        Self::Down,
        Self::B,
        Self::A,
    ];

    #[inline]
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// A set of buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Buttons(u8);

impl Buttons {
    /// No buttons.
    pub const NONE: Self = Self(0);

    /// Returns this set with `button` added.
    #[inline]
    #[must_use]
    pub const fn with(self, button: Button) -> Self {
        Self(self.0 | button.bit())
    }

    /// Checks whether `button` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    /// Checks whether the set is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    const fn minus(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl FromIterator<Button> for Buttons {
    fn from_iter<I: IntoIterator<Item = Button>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, Self::with)
    }
}

/// Raw input for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSample {
    /// Buttons held this frame.
    pub buttons: Buttons,
    /// Crank angle in degrees, `0.0..360.0`.
    pub crank_angle: f32,
    /// Crank travel since the previous frame, in degrees.
    pub crank_change: f32,
}

impl InputSample {
    /// A frame with nothing held and the crank at rest.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            buttons: Buttons::NONE,
            crank_angle: 0.0,
            crank_change: 0.0,
        }
    }

    /// Returns this sample with `button` held.
    #[must_use]
    pub const fn press(mut self, button: Button) -> Self {
        self.buttons = self.buttons.with(button);
        self
    }

    /// Returns this sample with the crank at `angle` after moving `change`.
    #[must_use]
    pub const fn crank(mut self, angle: f32, change: f32) -> Self {
        self.crank_angle = angle;
        self.crank_change = change;
        self
    }
}

/// Per-frame input state.
#[derive(Clone, Debug, Default)]
pub struct Input {
    push: Buttons,
    edge: Buttons,
    repeat: Buttons,
    /// Frames each button has been held, capped by the repeat cycle.
    held_frames: [u32; 6],
    crank_angle: f32,
    crank_change: f32,
}

impl Input {
    /// Creates an input state with nothing held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances to the next frame.
    pub fn update(&mut self, sample: InputSample) {
        self.edge = sample.buttons.minus(self.push);
        self.push = sample.buttons;
        self.repeat = Buttons::NONE;

        for (button, held) in Button::ALL.into_iter().zip(self.held_frames.iter_mut()) {
            if !self.push.contains(button) {
                *held = 0;
                continue;
            }
            *held += 1;
            if *held > REPEAT_DELAY + REPEAT_INTERVAL {
                *held = REPEAT_DELAY;
            }
            if *held == 1 || *held == REPEAT_DELAY {
                self.repeat = self.repeat.with(button);
            }
        }

        self.crank_angle = sample.crank_angle;
        self.crank_change = sample.crank_change;
    }

    /// Checks whether `button` is held.
    #[inline]
    #[must_use]
    pub fn is_push(&self, button: Button) -> bool {
        self.push.contains(button)
    }

    /// Checks whether `button` was pressed this frame.
    #[inline]
    #[must_use]
    pub fn is_edge(&self, button: Button) -> bool {
        self.edge.contains(button)
    }

    /// Checks whether `button` fired a repeat this frame.
    #[inline]
    #[must_use]
    pub fn is_repeat(&self, button: Button) -> bool {
        self.repeat.contains(button)
    }

    /// Returns the crank angle in degrees.
    #[inline]
    #[must_use]
    pub fn crank_angle(&self) -> f32 {
        self.crank_angle
    }

    /// Returns the crank travel this frame in degrees.
    #[inline]
    #[must_use]
    pub fn crank_change(&self) -> f32 {
        self.crank_change
    }
}
