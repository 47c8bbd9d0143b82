//! # Game Scene
//!
//! One mission, run as an explicit step machine. Every step issues console
//! work (text, a menu or a number prompt) and the next step only runs once
//! the console is idle again:
//!
//! ```text
//! AskClassic ─► ClassicMenu ─► ClassicAnswer ─► DifficultyMenu
//!   ─► DifficultyAnswer (briefing) ─► Prompt ─► CommandInput ─► Command
//!                                       ▲                          │
//!                                       └──────────────────────────┘
//! Command 0 ─► Farewell ─► Finished
//! ```

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::galaxy::{Galaxy, MISSION_STARDATES};
use crate::config::ConsoleConfig;
use crate::error::AppResult;
use crate::host::Host;
use crate::scene::{Scene, SceneCommand, SceneKey};
use crate::widgets::display::CHART_SIDE;
use crate::widgets::{console, display, report, MapView, StarStage};

/// Highest command number accepted by the prompt.
const COMMAND_MAX: i32 = 9;

/// Command numbers.
const COMMAND_QUIT: i32 = 0;
const COMMAND_REPORT: i32 = 1;
const COMMAND_SHORT_RANGE: i32 = 2;
const COMMAND_LONG_RANGE: i32 = 3;
const COMMAND_GALAXY_MAP: i32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    AskClassic,
    ClassicMenu,
    ClassicAnswer,
    DifficultyMenu,
    DifficultyAnswer,
    Prompt,
    CommandInput,
    Command,
    Farewell,
    Finished,
}

/// A mission.
#[derive(Debug)]
pub struct GameScene {
    step: Step,
    rng: ChaCha8Rng,
    console: ConsoleConfig,
    classic: bool,
    galaxy: Option<Galaxy>,
}

impl GameScene {
    /// Creates a mission whose galaxy is rolled from `seed`.
    #[must_use]
    pub fn new(seed: u64, console: ConsoleConfig) -> Self {
        Self {
            step: Step::AskClassic,
            rng: ChaCha8Rng::seed_from_u64(seed),
            console,
            classic: true,
            galaxy: None,
        }
    }

    /// Returns the running mission, once briefed.
    #[must_use]
    pub fn galaxy(&self) -> Option<&Galaxy> {
        self.galaxy.as_ref()
    }

    /// Checks whether the mission runs in classic (console only) mode.
    #[must_use]
    pub const fn is_classic(&self) -> bool {
        self.classic
    }

    fn advance(&mut self, stage: &mut StarStage) -> AppResult<Step> {
        let next = match self.step {
            Step::AskClassic => {
                console::print_text(stage, "DO YOU PLAY A CLASSIC GAME? ")?;
                Step::ClassicMenu
            }
            Step::ClassicMenu => {
                console::open_menu(stage, &["NO", "YES"])?;
                Step::ClassicAnswer
            }
            Step::ClassicAnswer => {
                self.classic = console::selected_menu(stage) != Some(0);
                if !self.classic {
                    display::load(stage)?;
                    report::load(stage)?;
                    console::set_classic(stage, false)?;
                }
                console::print_text(stage, "DO YOU WANT A DIFFICULT GAME? ")?;
                Step::DifficultyMenu
            }
            Step::DifficultyMenu => {
                console::open_menu(stage, &["NO", "YES"])?;
                Step::DifficultyAnswer
            }
            Step::DifficultyAnswer => {
                let difficult = console::selected_menu(stage) == Some(1);
                self.brief(stage, difficult)?;
                Step::Prompt
            }
            Step::Prompt => {
                console::print_text(stage, "CAPTAIN? ")?;
                Step::CommandInput
            }
            Step::CommandInput => {
                console::input_number(stage, 0, 0, COMMAND_MAX)?;
                Step::Command
            }
            Step::Command => match console::inputted_number(stage) {
                Some(COMMAND_QUIT) => {
                    console::print_text(stage, "GOOD BYE.\n")?;
                    Step::Farewell
                }
                Some(command) => {
                    self.execute(stage, command)?;
                    Step::Prompt
                }
                None => Step::Prompt,
            },
            Step::Farewell | Step::Finished => Step::Finished,
        };
        Ok(next)
    }

    fn brief(&mut self, stage: &mut StarStage, difficult: bool) -> AppResult<()> {
        let mut galaxy = Galaxy::generate(&mut self.rng, difficult);
        let docked = galaxy.enter_quadrant(&mut self.rng);

        let mut text = format!(
            "STARDATE 3200: YOUR MISSION IS TO DESTROY {} KLINGONS IN {} STARDATES. \
             THERE ARE {} STARBASES.\n",
            galaxy.klingons(),
            MISSION_STARDATES,
            galaxy.starbases()
        );
        text.push_str(&galaxy.position_line());
        text.push('\n');
        if docked {
            text.push_str("SULU: \"CAPTAIN, WE ARE DOCKED AT STARBASE.\"\n");
        }
        console::print_text(stage, &text)?;

        self.galaxy = Some(galaxy);
        Ok(())
    }

    fn execute(&mut self, stage: &mut StarStage, command: i32) -> AppResult<()> {
        let classic = self.classic;
        let Some(galaxy) = self.galaxy.as_mut() else {
            return Ok(());
        };
        tracing::debug!(command, classic, "captain's command");

        let mut text = String::new();
        match command {
            COMMAND_REPORT => {
                if classic {
                    text.push_str("STATUS REPORT:\n");
                    for line in &galaxy.status().lines()[1..] {
                        text.push_str(line);
                        text.push('\n');
                    }
                }
                text.push_str(&galaxy.position_line());
                text.push('\n');
            }
            COMMAND_SHORT_RANGE => {
                galaxy.scan_short_range();
                text.push_str(&galaxy.position_line());
                text.push('\n');
                if classic {
                    text.push_str(&short_range_text(galaxy));
                } else {
                    display::show(stage, MapView::Sector(galaxy.sector_chart()))?;
                }
            }
            COMMAND_LONG_RANGE => {
                let scan = galaxy.scan_long_range();
                text.push_str(&galaxy.position_line());
                text.push('\n');
                if classic {
                    for line in scan {
                        for value in line {
                            text.push_str(&format!("{:4}", value.unwrap_or(0)));
                        }
                        text.push('\n');
                    }
                } else {
                    display::show(stage, MapView::Galaxy(galaxy.galaxy_chart()))?;
                }
            }
            COMMAND_GALAXY_MAP => {
                text.push_str(&galaxy.position_line());
                if classic {
                    text.push_str(" OF GALAXY MAP\n");
                    text.push_str(&galaxy_map_text(galaxy));
                } else {
                    text.push('\n');
                    display::show(stage, MapView::Galaxy(galaxy.galaxy_chart()))?;
                }
            }
            _ => text.push_str("NOT AVAILABLE\n"),
        }
        console::print_text(stage, &text)?;
        Ok(())
    }
}

fn short_range_text(galaxy: &Galaxy) -> String {
    let chart = galaxy.sector_chart();
    let mut text = String::new();
    for row in 0..CHART_SIDE {
        text.push_str(&(row + 1).to_string());
        for column in 0..CHART_SIDE {
            text.push(' ');
            text.push_str(chart.get(row, column).glyph());
        }
        text.push('\n');
    }
    text.push(' ');
    for column in 1..=CHART_SIDE {
        text.push_str(&format!("{column:2}"));
    }
    text.push('\n');
    text
}

fn galaxy_map_text(galaxy: &Galaxy) -> String {
    let chart = galaxy.galaxy_chart();
    let mut text = String::new();
    for row in 0..CHART_SIDE {
        text.push_str(&format!("{}:", row + 1));
        for column in 0..CHART_SIDE {
            let summary = chart.summary(row, column).unwrap_or(0);
            text.push_str(&format!(" {summary:03}"));
        }
        text.push('\n');
    }
    text.push_str("  ");
    text.push_str(&"  ..".repeat(CHART_SIDE));
    text.push_str("\n  ");
    for column in 1..=CHART_SIDE {
        text.push_str(&format!("{column:4}"));
    }
    text.push('\n');
    text
}

impl Scene for GameScene {
    fn key(&self) -> SceneKey {
        SceneKey::Game
    }

    fn load(&mut self, stage: &mut StarStage, _: &mut Host) -> AppResult<()> {
        console::load(stage, &self.console)?;
        Ok(())
    }

    fn update(&mut self, stage: &mut StarStage, _: &mut Host) -> AppResult<SceneCommand> {
        if let Some(galaxy) = &self.galaxy {
            report::set_status(stage, galaxy.status())?;
        }
        if console::is_busy(stage) {
            return Ok(SceneCommand::None);
        }

        let previous = self.step;
        self.step = self.advance(stage)?;
        if previous == Step::Farewell {
            return Ok(SceneCommand::SwitchTo(SceneKey::Title));
        }
        Ok(SceneCommand::None)
    }

    fn unload(&mut self, stage: &mut StarStage, host: &mut Host) -> AppResult<()> {
        let unloaded = stage.unload_all(host)?;
        tracing::debug!(unloaded, "mission closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Button, InputSample};

    struct Rig {
        scene: GameScene,
        stage: StarStage,
        host: Host,
    }

    impl Rig {
        fn new(seed: u64) -> Self {
            let mut rig = Self {
                scene: GameScene::new(seed, ConsoleConfig::default()),
                stage: StarStage::with_capacity(8),
                host: Host::new(),
            };
            rig.scene.load(&mut rig.stage, &mut rig.host).unwrap();
            rig
        }

        fn frame(&mut self, sample: InputSample) -> SceneCommand {
            self.host.begin_frame(sample);
            let command = self.scene.update(&mut self.stage, &mut self.host).unwrap();
            self.stage.update(&mut self.host).unwrap();
            self.host.canvas.clear();
            self.stage.draw(&mut self.host).unwrap();
            command
        }

        /// Flushes text with B until the console waits for an answer.
        fn settle(&mut self) {
            for _ in 0..8 {
                self.frame(InputSample::idle().press(Button::B));
                self.frame(InputSample::idle());
            }
        }

        fn choose(&mut self, steps: f32) {
            self.settle();
            self.frame(InputSample::idle().crank(0.0, steps * 30.0));
            self.frame(InputSample::idle().press(Button::A));
        }

        fn command(&mut self, number: i32) -> SceneCommand {
            self.settle();
            #[allow(clippy::cast_precision_loss)]
            self.frame(InputSample::idle().crank(0.0, number as f32 * 10.0));
            self.frame(InputSample::idle().press(Button::A));
            let mut last = SceneCommand::None;
            for frame in 0..16 {
                let sample = if frame % 2 == 0 {
                    InputSample::idle().press(Button::B)
                } else {
                    InputSample::idle()
                };
                let command = self.frame(sample);
                if command != SceneCommand::None {
                    last = command;
                }
            }
            last
        }

        fn text(&self) -> String {
            console::transcript(&self.stage).join("\n")
        }
    }

    #[test]
    fn test_modern_mission_loads_panels() {
        let mut rig = Rig::new(1);
        rig.choose(0.0); // classic: NO
        rig.choose(0.0); // difficult: NO
        rig.settle();

        assert!(!rig.scene.is_classic());
        assert!(display::view(&rig.stage).is_some());
        let status = report::status(&rig.stage).unwrap();
        assert_eq!(status, rig.scene.galaxy().unwrap().status());
        assert!(rig.text().contains("YOUR MISSION IS TO DESTROY"));
        assert!(rig.text().ends_with("CAPTAIN? "));
    }

    #[test]
    fn test_classic_mission_is_console_only() {
        let mut rig = Rig::new(2);
        rig.choose(1.0); // classic: YES
        rig.choose(1.0); // difficult: YES
        rig.settle();

        assert!(rig.scene.is_classic());
        assert!(display::view(&rig.stage).is_none());
        assert!(report::status(&rig.stage).is_none());
        assert_eq!(rig.stage.live_count(), 1);
    }

    #[test]
    fn test_sensor_commands_drive_display() {
        let mut rig = Rig::new(3);
        rig.choose(0.0);
        rig.choose(0.0);

        rig.command(COMMAND_SHORT_RANGE);
        assert!(matches!(
            display::view(&rig.stage),
            Some(MapView::Sector(_))
        ));

        rig.command(COMMAND_LONG_RANGE);
        let Some(MapView::Galaxy(chart)) = display::view(&rig.stage).copied() else {
            panic!("galaxy chart expected");
        };
        let (qr, qc) = chart.current();
        assert!(chart.summary(qr, qc).is_some());
    }

    #[test]
    fn test_classic_report_prints_status() {
        let mut rig = Rig::new(4);
        rig.choose(1.0);
        rig.choose(0.0);
        rig.command(COMMAND_REPORT);
        assert!(rig.text().contains("STATUS REPORT:"));
        assert!(rig.text().contains("ENERGY    4000"));
    }

    #[test]
    fn test_unknown_command() {
        let mut rig = Rig::new(5);
        rig.choose(1.0);
        rig.choose(0.0);
        rig.command(7);
        assert!(rig.text().contains("NOT AVAILABLE"));
    }

    #[test]
    fn test_quit_returns_to_title() {
        let mut rig = Rig::new(6);
        rig.choose(1.0);
        rig.choose(0.0);
        let command = rig.command(COMMAND_QUIT);
        assert_eq!(command, SceneCommand::SwitchTo(SceneKey::Title));
        assert!(rig.text().contains("GOOD BYE."));

        rig.scene.unload(&mut rig.stage, &mut rig.host).unwrap();
        assert_eq!(rig.stage.live_count(), 0);
    }
}
