//! # Audio
//!
//! System sound effects. Playback is headless: each frame keeps a log of the
//! sounds requested during it.

/// Built-in system sounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SystemSound {
    /// Two-tone chime.
    Pipo,
    /// High blip, used for confirmations.
    Pi,
    /// Low blip, used for cursor moves and cancels.
    Po,
}

/// Per-frame sound log.
#[derive(Clone, Debug, Default)]
pub struct Audio {
    played: Vec<SystemSound>,
}

impl Audio {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Plays a system sound.
    pub fn play(&mut self, sound: SystemSound) {
        tracing::trace!(?sound, "system sound");
        self.played.push(sound);
    }

    /// Returns the sounds played this frame, oldest first.
    #[inline]
    #[must_use]
    pub fn played(&self) -> &[SystemSound] {
        &self.played
    }

    /// Counts how many times `sound` played this frame.
    #[must_use]
    pub fn count(&self, sound: SystemSound) -> usize {
        self.played.iter().filter(|s| **s == sound).count()
    }

    /// Starts a new frame.
    pub fn clear(&mut self) {
        self.played.clear();
    }
}
