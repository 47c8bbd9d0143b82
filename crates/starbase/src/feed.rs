//! # Input Feed
//!
//! Where the game loop gets its per-frame input from.
//!
//! ```text
//! ┌──────────────┐  InputSender   ┌───────────────┐  next_sample  ┌──────────┐
//! │   producer   │───────────────>│ bounded queue │──────────────>│ GameLoop │
//! │ (any thread) │                └───────────────┘               └──────────┘
//! └──────────────┘
//! ```
//!
//! A [`ScriptedInput`] replays a fixed sequence, typically parsed from TOML:
//!
//! ```toml
//! [[step]]
//! frames = 30
//!
//! [[step]]
//! buttons = ["A"]
//!
//! [[step]]
//! frames = 3
//! crank = 10.0
//! ```

use std::collections::VecDeque;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::host::{Button, Buttons, InputSample};

/// Supplies one [`InputSample`] per frame.
pub trait InputSource {
    /// Returns the next frame's input, or `None` once the source is done.
    fn next_sample(&mut self) -> Option<InputSample>;
}

// =============================================================================
// Channel
// =============================================================================

/// Creates a bounded input channel.
///
/// # Panics
///
/// Panics if `capacity` is zero.
#[must_use]
pub fn input_channel(capacity: usize) -> (InputSender, InputReceiver) {
    assert!(capacity > 0, "Input channel capacity must be greater than zero");
    let (sender, receiver) = bounded(capacity);
    (InputSender { sender }, InputReceiver { receiver })
}

/// Handle for feeding input from another thread.
#[derive(Clone, Debug)]
pub struct InputSender {
    sender: Sender<InputSample>,
}

impl InputSender {
    /// Queues a sample (non-blocking).
    ///
    /// Returns `false` if the queue is full or the game loop is gone.
    #[inline]
    pub fn send(&self, sample: InputSample) -> bool {
        match self.sender.try_send(sample) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!("input queue full, sample dropped");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }

    /// Queues a sample, waiting for room.
    ///
    /// Returns `false` if the game loop is gone.
    #[inline]
    pub fn send_blocking(&self, sample: InputSample) -> bool {
        self.sender.send(sample).is_ok()
    }
}

/// Receiving end of an input channel.
///
/// As an [`InputSource`] it waits for every frame's sample and ends once
/// all senders are dropped and the queue is drained.
#[derive(Clone, Debug)]
pub struct InputReceiver {
    receiver: Receiver<InputSample>,
}

impl InputReceiver {
    /// Returns the number of queued samples.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

impl InputSource for InputReceiver {
    fn next_sample(&mut self) -> Option<InputSample> {
        self.receiver.recv().ok()
    }
}

// =============================================================================
// Script
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptStep {
    #[serde(default = "one_frame")]
    frames: u32,
    #[serde(default)]
    buttons: Vec<Button>,
    /// Crank travel per frame, in degrees.
    #[serde(default)]
    crank: f32,
}

const fn one_frame() -> u32 {
    1
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Script {
    #[serde(default, rename = "step")]
    steps: Vec<ScriptStep>,
}

/// A fixed input sequence.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    samples: VecDeque<InputSample>,
    crank_angle: f32,
}

impl ScriptedInput {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a script of `[[step]]` tables.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Config`] if the document does not parse.
    pub fn from_toml_str(text: &str) -> AppResult<Self> {
        let script: Script =
            toml::from_str(text).map_err(|e| AppError::Config(format!("input script: {e}")))?;
        let mut input = Self::new();
        for step in script.steps {
            let buttons = step.buttons.into_iter().collect();
            input.push(buttons, step.crank, step.frames);
        }
        Ok(input)
    }

    /// Appends `frames` frames with `buttons` held and the crank turning by
    /// `crank` degrees per frame.
    pub fn push(&mut self, buttons: Buttons, crank: f32, frames: u32) -> &mut Self {
        for _ in 0..frames {
            self.crank_angle = (self.crank_angle + crank).rem_euclid(360.0);
            self.samples.push_back(InputSample {
                buttons,
                crank_angle: self.crank_angle,
                crank_change: crank,
            });
        }
        self
    }

    /// Appends `frames` idle frames.
    pub fn idle(&mut self, frames: u32) -> &mut Self {
        self.push(Buttons::NONE, 0.0, frames)
    }

    /// Appends one frame with `button` held followed by one idle frame.
    pub fn tap(&mut self, button: Button) -> &mut Self {
        self.push(Buttons::NONE.with(button), 0.0, 1).idle(1)
    }

    /// A complete session, starting on the title screen: a modern mission,
    /// every sensor command, then quit back to the title.
    #[must_use]
    pub fn demo_session() -> Self {
        let mut script = Self::new();
        script.idle(2).tap(Button::B).idle(2).tap(Button::A).idle(2);
        // Classic game: NO. Difficult game: NO.
        for _ in 0..2 {
            script.tap(Button::B).idle(4).tap(Button::A);
        }
        for command in [2, 3, 4, 1, 0] {
            script
                .tap(Button::B)
                .idle(12)
                .push(Buttons::NONE, 10.0, command)
                .tap(Button::A);
        }
        script.tap(Button::B).idle(30);
        script
    }

    /// Returns the number of frames left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Checks whether the script is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl InputSource for ScriptedInput {
    fn next_sample(&mut self) -> Option<InputSample> {
        self.samples.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_delivers_in_order() {
        let (sender, mut receiver) = input_channel(4);
        assert!(sender.send(InputSample::idle()));
        assert!(sender.send(InputSample::idle().press(Button::A)));
        assert_eq!(receiver.pending_count(), 2);
        drop(sender);

        assert_eq!(receiver.next_sample(), Some(InputSample::idle()));
        let second = receiver.next_sample().unwrap();
        assert!(second.buttons.contains(Button::A));
        assert_eq!(receiver.next_sample(), None);
    }

    #[test]
    fn test_full_channel_drops() {
        let (sender, _receiver) = input_channel(1);
        assert!(sender.send(InputSample::idle()));
        assert!(!sender.send(InputSample::idle()));
    }

    #[test]
    fn test_script_from_toml() {
        let mut script = ScriptedInput::from_toml_str(
            r#"
            [[step]]
            frames = 2

            [[step]]
            buttons = ["A", "Left"]

            [[step]]
            frames = 2
            crank = 200.0
            "#,
        )
        .unwrap();
        assert_eq!(script.len(), 5);

        script.next_sample();
        script.next_sample();
        let pressed = script.next_sample().unwrap();
        assert!(pressed.buttons.contains(Button::A));
        assert!(pressed.buttons.contains(Button::Left));

        let first = script.next_sample().unwrap();
        let second = script.next_sample().unwrap();
        assert!((first.crank_angle - 200.0).abs() < 1e-3);
        assert!((second.crank_angle - 40.0).abs() < 1e-3);
        assert!((second.crank_change - 200.0).abs() < 1e-3);
        assert!(script.is_empty());
    }

    #[test]
    fn test_script_rejects_unknown_button() {
        assert!(ScriptedInput::from_toml_str("[[step]]\nbuttons = [\"Start\"]").is_err());
    }

    #[test]
    fn test_builder_helpers() {
        let mut script = ScriptedInput::new();
        script.idle(3).tap(Button::B);
        assert_eq!(script.len(), 5);
    }
}
