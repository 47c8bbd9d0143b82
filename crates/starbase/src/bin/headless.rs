//! # STARBASE Headless Runner
//!
//! Runs the game without a screen, feeding input through the input channel
//! from a producer thread.
//!
//! ```bash
//! # Built-in demo session, paced at the configured frame rate
//! starbase-headless
//!
//! # Custom configuration and input script
//! RUST_LOG=debug starbase-headless starbase.toml session.toml
//! ```

use std::process::ExitCode;

use starbase::feed::{input_channel, InputSource, ScriptedInput};
use starbase::widgets::console;
use starbase::{AppConfig, AppError, AppResult, GameLoop, SceneKey};
use tracing_subscriber::EnvFilter;

/// Queue depth between the producer thread and the game loop.
const INPUT_QUEUE: usize = 64;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_script(path: &str) -> AppResult<ScriptedInput> {
    let text = std::fs::read_to_string(path).map_err(|e| AppError::Io {
        path: path.to_string(),
        reason: e.to_string(),
    })?;
    ScriptedInput::from_toml_str(&text)
}

fn run() -> AppResult<()> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => AppConfig::load(&path)?,
        // The demo session opens on the title screen.
        None => AppConfig {
            initial_scene: SceneKey::Title,
            ..AppConfig::default()
        },
    };
    let mut script = match args.next() {
        Some(path) => load_script(&path)?,
        None => ScriptedInput::demo_session(),
    };
    tracing::info!(frames = script.len(), "input script ready");

    let mut game_loop = GameLoop::new(config)?;
    let (sender, mut receiver) = input_channel(INPUT_QUEUE);

    let producer = std::thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            while let Some(sample) = script.next_sample() {
                if !sender.send_blocking(sample) {
                    break;
                }
            }
        })
        .map_err(|e| AppError::Io {
            path: "input thread".to_string(),
            reason: e.to_string(),
        })?;

    let result = game_loop.run(&mut receiver);
    drop(receiver);
    if producer.join().is_err() {
        tracing::warn!("input thread panicked");
    }
    let frames = result?;

    let stats = game_loop.stats();
    println!("═══════════════════════════════════════════════════════════════════");
    println!("  frames run:        {frames}");
    println!("  average frame:     {:.3} ms", stats.avg_frame_ms());
    println!("  over budget:       {:.1}%", stats.over_budget_ratio() * 100.0);
    println!("  live actors:       {}", game_loop.stage().live_count());
    println!("═══════════════════════════════════════════════════════════════════");
    for line in console::transcript(game_loop.stage()) {
        println!("  {line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "headless run failed");
            ExitCode::FAILURE
        }
    }
}
