//! # STARBASE
//!
//! A text-console space mission running on the `starbase_core` actor stage.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                               GameLoop                                  │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  ┌─────────────────┐     ┌─────────────────┐     ┌─────────────────┐    │
//! │  │ SceneController │────>│   StarStage     │────>│      Host       │    │
//! │  │                 │     │                 │     │                 │    │
//! │  │  • Title        │     │  • Console      │     │  • Input        │    │
//! │  │  • Game         │     │  • Display      │     │  • Canvas       │    │
//! │  │                 │     │  • Report       │     │  • Audio, Score │    │
//! │  └─────────────────┘     └─────────────────┘     └─────────────────┘    │
//! │           ▲                                                             │
//! │           │              ┌─────────────────┐                            │
//! │           └──────────────│   InputSource   │                            │
//! │                          └─────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML configuration
//! - `feed`: Input channel and scripted input
//! - `game_loop`: Frame orchestration and timing
//! - `host`: Input, canvas, audio and score
//! - `scene` / `scenes`: Scene switching, title and mission
//! - `widgets`: Console, display and report actors

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod feed;
pub mod game_loop;
pub mod host;
pub mod scene;
pub mod scenes;
pub mod widgets;

pub use starbase_core as core;

pub use config::{AppConfig, ConsoleConfig, FrameConfig};
pub use error::{AppError, AppResult};
pub use feed::{input_channel, InputReceiver, InputSender, InputSource, ScriptedInput};
pub use game_loop::{FrameStats, FrameStatsAccumulator, GameLoop, MetricsHandle};
pub use host::{Button, Host, InputSample};
pub use scene::{Scene, SceneCommand, SceneController, SceneKey};
pub use widgets::{StarStage, Widget};
