//! # Title Scene
//!
//! Shows the banner and the session high score, then waits for A.

use crate::config::ConsoleConfig;
use crate::error::AppResult;
use crate::host::{Button, Host, SystemSound};
use crate::scene::{Scene, SceneCommand, SceneKey};
use crate::widgets::{console, StarStage};

/// The title screen.
#[derive(Debug)]
pub struct TitleScene {
    console: ConsoleConfig,
}

impl TitleScene {
    /// Creates the scene.
    #[must_use]
    pub const fn new(console: ConsoleConfig) -> Self {
        Self { console }
    }
}

impl Scene for TitleScene {
    fn key(&self) -> SceneKey {
        SceneKey::Title
    }

    fn load(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<()> {
        console::load(stage, &self.console)?;
        let banner = format!(
            "\n      *** STAR TREK ***\n\n      HIGH SCORE {}\n\n      PRESS A\n",
            host.score.high_score()
        );
        console::print_text(stage, &banner)?;
        Ok(())
    }

    fn update(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<SceneCommand> {
        if console::is_printing(stage) || !host.input.is_edge(Button::A) {
            return Ok(SceneCommand::None);
        }
        host.audio.play(SystemSound::Pipo);
        Ok(SceneCommand::SwitchTo(SceneKey::Game))
    }

    fn unload(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<()> {
        stage.unload_all(host)?;
        Ok(())
    }
}
