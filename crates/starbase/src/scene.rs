//! # Scene Controller
//!
//! Exactly one scene is active at a time. Scene changes are deferred: a
//! request made during a frame is applied at the end of that frame, after
//! the stage has run its update and draw passes.
//!
//! ```text
//! update_begin ─► active.update() ─► SceneCommand
//! ... stage update / draw ...
//! update_end   ─► pending? ─► old.unload() ─► drop old ─► factory(key).load()
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::host::Host;
use crate::widgets::StarStage;

/// Identifies a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKey {
    /// Title screen.
    Title,
    /// A mission.
    Game,
}

/// What the active scene wants after its update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    /// Stay.
    None,
    /// Switch scenes at the end of this frame.
    SwitchTo(SceneKey),
    /// Stop the game loop.
    Quit,
}

/// A scene.
pub trait Scene {
    /// Returns the key this scene was created from.
    fn key(&self) -> SceneKey;

    /// Runs once when the scene becomes active.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene cannot set up its actors.
    fn load(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<()>;

    /// Runs once per frame before the stage update pass.
    ///
    /// # Errors
    ///
    /// Returns an error if an actor operation fails.
    fn update(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<SceneCommand>;

    /// Runs once when the scene is replaced. Typically unloads every actor.
    ///
    /// # Errors
    ///
    /// Returns the first unload callback error.
    fn unload(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<()>;
}

/// Builds a scene from its key.
pub type SceneFactory = Box<dyn FnMut(SceneKey) -> Box<dyn Scene>>;

/// Owns the active scene and applies deferred transitions.
pub struct SceneController {
    active: Option<Box<dyn Scene>>,
    pending: Option<SceneKey>,
    quit: bool,
    factory: SceneFactory,
}

impl SceneController {
    /// Creates a controller with `initial` pending.
    ///
    /// No scene is active until the first [`update_end`](Self::update_end).
    #[must_use]
    pub fn new(initial: SceneKey, factory: SceneFactory) -> Self {
        Self {
            active: None,
            pending: Some(initial),
            quit: false,
            factory,
        }
    }

    /// Requests a switch to `key` at the end of the current frame.
    ///
    /// A later request in the same frame wins.
    pub fn request(&mut self, key: SceneKey) {
        self.pending = Some(key);
    }

    /// Returns the key of the active scene.
    #[must_use]
    pub fn active_key(&self) -> Option<SceneKey> {
        self.active.as_ref().map(|scene| scene.key())
    }

    /// Returns the key of the pending transition.
    #[inline]
    #[must_use]
    pub fn pending_key(&self) -> Option<SceneKey> {
        self.pending
    }

    /// Checks whether a scene asked to stop.
    #[inline]
    #[must_use]
    pub fn is_quit_requested(&self) -> bool {
        self.quit
    }

    /// Runs the active scene's update.
    ///
    /// # Errors
    ///
    /// Returns the scene's error.
    pub fn update_begin(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<()> {
        let Some(scene) = self.active.as_mut() else {
            return Ok(());
        };
        match scene.update(stage, host)? {
            SceneCommand::None => {}
            SceneCommand::SwitchTo(key) => self.pending = Some(key),
            SceneCommand::Quit => {
                tracing::info!(scene = ?scene.key(), "quit requested");
                self.quit = true;
            }
        }
        Ok(())
    }

    /// Applies a pending transition.
    ///
    /// The old scene is unloaded and dropped before the new one is created,
    /// so the new scene starts on an empty stage. The new scene is installed
    /// even if the old scene's unload failed.
    ///
    /// # Errors
    ///
    /// Returns the old scene's unload error, or the new scene's load error.
    pub fn update_end(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<()> {
        let Some(key) = self.pending.take() else {
            return Ok(());
        };

        let unloaded = match self.active.take() {
            Some(mut old) => {
                tracing::info!(from = ?old.key(), to = ?key, "scene transition");
                old.unload(stage, host)
            }
            None => {
                tracing::info!(to = ?key, "initial scene");
                Ok(())
            }
        };

        let mut scene = (self.factory)(key);
        let loaded = scene.load(stage, host);
        self.active = Some(scene);

        unloaded.and(loaded)
    }
}

impl fmt::Debug for SceneController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneController")
            .field("active", &self.active_key())
            .field("pending", &self.pending)
            .field("quit", &self.quit)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Journal = Rc<RefCell<Vec<String>>>;

    struct Probe {
        key: SceneKey,
        journal: Journal,
        command: SceneCommand,
    }

    impl Scene for Probe {
        fn key(&self) -> SceneKey {
            self.key
        }

        fn load(&mut self, _: &mut StarStage, _: &mut Host) -> AppResult<()> {
            self.journal.borrow_mut().push(format!("load {:?}", self.key));
            Ok(())
        }

        fn update(&mut self, _: &mut StarStage, _: &mut Host) -> AppResult<SceneCommand> {
            self.journal.borrow_mut().push(format!("update {:?}", self.key));
            Ok(self.command)
        }

        fn unload(&mut self, _: &mut StarStage, _: &mut Host) -> AppResult<()> {
            self.journal.borrow_mut().push(format!("unload {:?}", self.key));
            Ok(())
        }
    }

    fn controller(journal: &Journal) -> SceneController {
        let journal = Rc::clone(journal);
        SceneController::new(
            SceneKey::Title,
            Box::new(move |key| {
                let command = match key {
                    SceneKey::Title => SceneCommand::SwitchTo(SceneKey::Game),
                    SceneKey::Game => SceneCommand::None,
                };
                Box::new(Probe {
                    key,
                    journal: Rc::clone(&journal),
                    command,
                })
            }),
        )
    }

    #[test]
    fn test_initial_scene_installs_at_first_end() {
        let journal = Journal::default();
        let mut scenes = controller(&journal);
        let mut stage = StarStage::with_capacity(4);
        let mut host = Host::new();

        assert_eq!(scenes.active_key(), None);
        scenes.update_begin(&mut stage, &mut host).unwrap();
        assert!(journal.borrow().is_empty());

        scenes.update_end(&mut stage, &mut host).unwrap();
        assert_eq!(scenes.active_key(), Some(SceneKey::Title));
        assert_eq!(*journal.borrow(), vec!["load Title"]);
    }

    #[test]
    fn test_switch_is_deferred_to_end() {
        let journal = Journal::default();
        let mut scenes = controller(&journal);
        let mut stage = StarStage::with_capacity(4);
        let mut host = Host::new();
        scenes.update_end(&mut stage, &mut host).unwrap();

        scenes.update_begin(&mut stage, &mut host).unwrap();
        assert_eq!(scenes.active_key(), Some(SceneKey::Title));
        assert_eq!(scenes.pending_key(), Some(SceneKey::Game));

        scenes.update_end(&mut stage, &mut host).unwrap();
        assert_eq!(scenes.active_key(), Some(SceneKey::Game));
        assert_eq!(
            *journal.borrow(),
            vec!["load Title", "update Title", "unload Title", "load Game"]
        );
    }

    #[test]
    fn test_end_without_request_is_noop() {
        let journal = Journal::default();
        let mut scenes = controller(&journal);
        let mut stage = StarStage::with_capacity(4);
        let mut host = Host::new();
        scenes.update_end(&mut stage, &mut host).unwrap();
        scenes.request(SceneKey::Game);
        scenes.update_end(&mut stage, &mut host).unwrap();

        scenes.update_begin(&mut stage, &mut host).unwrap();
        scenes.update_end(&mut stage, &mut host).unwrap();
        assert_eq!(scenes.active_key(), Some(SceneKey::Game));
        assert_eq!(journal.borrow().len(), 4);
    }
}
