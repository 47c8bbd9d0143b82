//! # Scenes
//!
//! The title screen and the mission, plus the factory the scene controller
//! builds them with.

pub mod galaxy;
mod game;
mod title;

pub use galaxy::Galaxy;
pub use game::GameScene;
pub use title::TitleScene;

use crate::config::{AppConfig, ConsoleConfig};
use crate::scene::{Scene, SceneFactory, SceneKey};

/// Creates the scene for `key`.
///
/// `seed` only matters for [`SceneKey::Game`].
#[must_use]
pub fn create(key: SceneKey, seed: u64, console: &ConsoleConfig) -> Box<dyn Scene> {
    match key {
        SceneKey::Title => Box::new(TitleScene::new(console.clone())),
        SceneKey::Game => Box::new(GameScene::new(seed, console.clone())),
    }
}

/// Returns a factory for the scene controller.
///
/// Every mission gets the next seed after `config.seed`, so a session
/// replays identically while consecutive missions differ.
#[must_use]
pub fn factory(config: &AppConfig) -> SceneFactory {
    let console = config.console.clone();
    let mut seed = config.seed;
    Box::new(move |key| {
        let scene = create(key, seed, &console);
        if key == SceneKey::Game {
            seed = seed.wrapping_add(1);
        }
        scene
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_builds_requested_scene() {
        let mut factory = factory(&AppConfig::default());
        assert_eq!(factory(SceneKey::Title).key(), SceneKey::Title);
        assert_eq!(factory(SceneKey::Game).key(), SceneKey::Game);
    }
}
