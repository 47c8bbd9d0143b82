//! # Mission Flow Tests
//!
//! Whole sessions driven through the game loop with scripted input:
//!
//! 1. **Scenes**: title to mission and back, actors torn down on switch
//! 2. **Modern mode**: display and report mirror the mission
//! 3. **Classic mode**: console only, sensor output printed
//! 4. **Demo**: the built-in session from title to title
//! 5. **Threads**: input fed through the channel from another thread
//!
//! Run with: cargo test --package starbase --test mission_flow

use starbase::feed::{input_channel, InputSource, ScriptedInput};
use starbase::host::{Button, Buttons, SystemSound};
use starbase::widgets::{console, display, report, MapView};
use starbase::{AppConfig, FrameConfig, GameLoop, SceneKey};

fn game_loop(initial_scene: SceneKey, seed: u64) -> GameLoop {
    GameLoop::new(AppConfig {
        frame: FrameConfig {
            pace: false,
            ..FrameConfig::default()
        },
        initial_scene,
        seed,
        ..AppConfig::default()
    })
    .unwrap()
}

/// Title screen, then A.
fn boot(script: &mut ScriptedInput) {
    script.idle(1).tap(Button::B).idle(2).tap(Button::A).idle(2);
}

/// Flushes the question and picks menu item `item`.
fn answer(script: &mut ScriptedInput, item: u32) {
    script
        .tap(Button::B)
        .idle(4)
        .push(Buttons::NONE, 30.0, item)
        .tap(Button::A);
}

/// Flushes pending text and waits for the command prompt.
fn settle(script: &mut ScriptedInput) {
    script.tap(Button::B).idle(12);
}

/// Dials `number` into the open prompt, confirms and flushes the output.
fn command(script: &mut ScriptedInput, number: u32) {
    script
        .push(Buttons::NONE, 10.0, number)
        .tap(Button::A)
        .tap(Button::B)
        .idle(12);
}

fn transcript(game_loop: &GameLoop) -> String {
    console::transcript(game_loop.stage()).join("\n")
}

#[test]
fn title_starts_a_mission() {
    let mut game_loop = game_loop(SceneKey::Title, 1);
    let mut script = ScriptedInput::new();
    script.idle(2);
    game_loop.run(&mut script).unwrap();

    assert_eq!(game_loop.scenes().active_key(), Some(SceneKey::Title));
    let mut script = ScriptedInput::new();
    script
        .tap(Button::B)
        .idle(2)
        .tap(Button::A)
        .tap(Button::B);
    game_loop.run(&mut script).unwrap();

    assert_eq!(game_loop.scenes().active_key(), Some(SceneKey::Game));
    assert!(transcript(&game_loop).contains("DO YOU PLAY A CLASSIC GAME?"));
}

#[test]
fn modern_mission_mirrors_state_on_panels() {
    let mut game_loop = game_loop(SceneKey::Title, 2);
    let mut script = ScriptedInput::new();
    boot(&mut script);
    answer(&mut script, 0); // classic: NO
    answer(&mut script, 0); // difficult: NO
    settle(&mut script);
    game_loop.run(&mut script).unwrap();

    let stage = game_loop.stage();
    assert_eq!(stage.live_count(), 3);
    assert!(transcript(&game_loop).ends_with("CAPTAIN? "));
    assert!(console::is_inputting_number(stage));
    assert_eq!(display::view(stage), Some(&MapView::NoMap));
    let status = report::status(stage).unwrap();
    assert_eq!(status.stardate, 3200);
    assert!(status.klingons >= 4);
    assert!(status.starbases >= 2);

    let canvas = &game_loop.host().canvas;
    assert!(canvas.shows("CONSOLE"));
    assert!(canvas.shows("NO MAP"));
    assert!(canvas.shows("STARDATE  3200"));

    let mut script = ScriptedInput::new();
    command(&mut script, 2);
    game_loop.run(&mut script).unwrap();
    assert!(matches!(
        display::view(game_loop.stage()),
        Some(MapView::Sector(_))
    ));
    assert!(game_loop.host().canvas.shows("SECTOR MAP"));

    let mut script = ScriptedInput::new();
    command(&mut script, 4);
    game_loop.run(&mut script).unwrap();
    assert!(game_loop.host().canvas.shows("GALAXY MAP"));
}

#[test]
fn classic_mission_prints_sensors() {
    let mut game_loop = game_loop(SceneKey::Title, 3);
    let mut script = ScriptedInput::new();
    boot(&mut script);
    answer(&mut script, 1); // classic: YES
    answer(&mut script, 1); // difficult: YES
    settle(&mut script);
    command(&mut script, 2);
    game_loop.run(&mut script).unwrap();

    assert_eq!(game_loop.stage().live_count(), 1);
    assert!(display::view(game_loop.stage()).is_none());
    let text = transcript(&game_loop);
    assert!(text.contains("ENTERPRISE IN Q-"));
    assert!(text.contains("  1 2 3 4 5 6 7 8"));
    assert!(text.lines().any(|line| line.starts_with('1') && line.contains('.')));
    assert!(!game_loop.host().canvas.shows("CONSOLE"));
}

#[test]
fn quitting_returns_to_title() {
    let mut game_loop = game_loop(SceneKey::Title, 4);
    let mut script = ScriptedInput::new();
    boot(&mut script);
    answer(&mut script, 0);
    answer(&mut script, 0);
    settle(&mut script);
    command(&mut script, 0);
    script.tap(Button::B);
    game_loop.run(&mut script).unwrap();

    assert_eq!(game_loop.scenes().active_key(), Some(SceneKey::Title));
    // Display and report went with the mission.
    assert_eq!(game_loop.stage().live_count(), 1);
    assert!(report::status(game_loop.stage()).is_none());
    assert!(transcript(&game_loop).contains("HIGH SCORE 5000"));
}

#[test]
fn same_seed_replays_same_mission() {
    let play = |seed| {
        let mut game_loop = game_loop(SceneKey::Title, seed);
        let mut script = ScriptedInput::new();
        boot(&mut script);
        answer(&mut script, 0);
        answer(&mut script, 0);
        settle(&mut script);
        game_loop.run(&mut script).unwrap();
        report::status(game_loop.stage()).unwrap()
    };
    assert_eq!(play(9), play(9));
}

#[test]
fn menu_moves_and_confirmations_sound() {
    let mut game_loop = game_loop(SceneKey::Game, 5);
    let mut script = ScriptedInput::new();
    script.idle(1).tap(Button::B).idle(2);
    script.push(Buttons::NONE, 30.0, 1);
    game_loop.run(&mut script).unwrap();
    assert_eq!(game_loop.host().audio.count(SystemSound::Po), 1);

    let mut script = ScriptedInput::new();
    script.push(Buttons::NONE.with(Button::A), 0.0, 1);
    game_loop.run(&mut script).unwrap();
    assert_eq!(game_loop.host().audio.count(SystemSound::Pi), 1);
}

#[test]
fn demo_session_plays_a_mission_from_the_title() {
    let mut game_loop = game_loop(SceneKey::Title, 8);
    let mut script = ScriptedInput::demo_session();
    let mut saw_galaxy_map = false;
    while let Some(sample) = script.next_sample() {
        game_loop.tick(sample).unwrap();
        saw_galaxy_map |= game_loop.host().canvas.shows("GALAXY MAP");
    }

    assert!(saw_galaxy_map);
    assert_eq!(game_loop.scenes().active_key(), Some(SceneKey::Title));
    assert_eq!(game_loop.stage().live_count(), 1);
}

#[test]
fn input_from_another_thread() {
    let mut game_loop = game_loop(SceneKey::Title, 6);
    let (sender, mut receiver) = input_channel(8);

    let producer = std::thread::spawn(move || {
        let mut script = ScriptedInput::new();
        boot(&mut script);
        while let Some(sample) = script.next_sample() {
            assert!(sender.send_blocking(sample));
        }
    });

    let frames = game_loop.run(&mut receiver).unwrap();
    producer.join().unwrap();

    assert_eq!(frames, 9);
    assert_eq!(game_loop.frame_count(), 9);
    assert_eq!(game_loop.scenes().active_key(), Some(SceneKey::Game));
    assert_eq!(game_loop.metrics().lock().frame, 9);
}
