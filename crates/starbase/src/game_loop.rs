//! # Game Loop
//!
//! Frame orchestration:
//! ```text
//! Frame N:
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ 1. BEGIN FRAME                                                      │
//! │    └─ Host takes the input sample, frame counter advances           │
//! │                                                                     │
//! │ 2. SCENE UPDATE BEGIN                                               │
//! │    └─ Active scene runs its step, may request a transition          │
//! │                                                                     │
//! │ 3. STAGE UPDATE                                                     │
//! │    ├─ Draw table cleared                                            │
//! │    └─ Actors run by priority, re-registering draw callbacks         │
//! │                                                                     │
//! │ 4. STAGE DRAW                                                       │
//! │    ├─ Canvas cleared to the background                              │
//! │    └─ Registered draw callbacks run back to front                   │
//! │                                                                     │
//! │ 5. SCENE UPDATE END                                                 │
//! │    └─ Pending transition applied                                    │
//! │                                                                     │
//! │ 6. END FRAME                                                        │
//! │    └─ Stats published, wait for the frame budget                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::feed::InputSource;
use crate::host::{Host, InputSample};
use crate::scene::SceneController;
use crate::scenes;
use crate::widgets::StarStage;

/// Frame timing statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Scene update and stage update time in microseconds.
    pub update_us: u64,
    /// Stage draw time in microseconds.
    pub draw_us: u64,
    /// Total frame time in microseconds, pacing excluded.
    pub total_us: u64,
    /// Live actors at the end of the frame.
    pub live_actors: usize,
    /// Whether the frame exceeded its budget.
    pub late: bool,
}

/// Shared view of the most recent frame's statistics.
pub type MetricsHandle = Arc<Mutex<FrameStats>>;

fn micros(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX)
}

/// The main game loop orchestrator.
///
/// Owns the stage, the host context and the scene controller.
pub struct GameLoop {
    /// Actor stage shared by every scene.
    stage: StarStage,
    /// Host context passed to every callback.
    host: Host,
    /// Active scene and pending transition.
    scenes: SceneController,
    /// Configuration.
    config: AppConfig,
    /// Time allowed per frame.
    budget: Duration,
    /// Last frame's statistics, shared.
    metrics: MetricsHandle,
    /// Accumulated frame statistics.
    stats_accumulator: FrameStatsAccumulator,
}

impl GameLoop {
    /// Creates a game loop. The initial scene is installed at the end of the
    /// first frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        config.validate()?;
        let stage = StarStage::try_new(&config.stage)?;
        let scenes = SceneController::new(config.initial_scene, scenes::factory(&config));
        let budget = Duration::from_secs(1) / config.frame.target_fps;
        tracing::info!(
            capacity = config.stage.capacity,
            target_fps = config.frame.target_fps,
            initial_scene = ?config.initial_scene,
            "game loop ready"
        );

        Ok(Self {
            stage,
            host: Host::new(),
            scenes,
            config,
            budget,
            metrics: Arc::new(Mutex::new(FrameStats::default())),
            stats_accumulator: FrameStatsAccumulator::new(),
        })
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Returns the first scene or actor callback error. The frame is
    /// abandoned at that point.
    pub fn tick(&mut self, sample: InputSample) -> AppResult<FrameStats> {
        let start = Instant::now();

        self.host.begin_frame(sample);
        self.scenes.update_begin(&mut self.stage, &mut self.host)?;
        self.stage.update(&mut self.host)?;
        let updated = Instant::now();

        self.host.canvas.clear();
        self.stage.draw(&mut self.host)?;
        let drawn = Instant::now();

        self.scenes.update_end(&mut self.stage, &mut self.host)?;

        let total = start.elapsed();
        let stats = FrameStats {
            frame: self.host.frame(),
            update_us: micros(updated - start),
            draw_us: micros(drawn - updated),
            total_us: micros(total),
            live_actors: self.stage.live_count(),
            late: total > self.budget,
        };
        self.end_frame(stats);
        Ok(stats)
    }

    fn end_frame(&mut self, stats: FrameStats) {
        self.stats_accumulator.record(stats);
        *self.metrics.lock() = stats;

        if stats.late {
            tracing::warn!(
                frame = stats.frame,
                total_us = stats.total_us,
                budget_us = micros(self.budget),
                "frame exceeded budget"
            );
        }
    }

    /// Drives frames from `source` until it runs dry, `max_frames` is
    /// reached or a scene quits.
    ///
    /// # Returns
    ///
    /// The number of frames run by this call.
    ///
    /// # Errors
    ///
    /// Returns the first frame error.
    pub fn run(&mut self, source: &mut impl InputSource) -> AppResult<u64> {
        let mut frames = 0;
        loop {
            if self.is_finished() {
                break;
            }
            let Some(sample) = source.next_sample() else {
                tracing::debug!("input source exhausted");
                break;
            };

            let start = Instant::now();
            self.tick(sample)?;
            frames += 1;

            if self.config.frame.pace {
                let elapsed = start.elapsed();
                if elapsed < self.budget {
                    std::thread::sleep(self.budget - elapsed);
                }
            }
        }

        tracing::info!(
            frames,
            avg_frame_ms = self.stats_accumulator.avg_frame_ms(),
            late = self.stats_accumulator.frames_over_budget,
            "run finished"
        );
        Ok(frames)
    }

    /// Checks whether a scene quit or the frame limit was reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.scenes.is_quit_requested()
            || self
                .config
                .frame
                .max_frames
                .is_some_and(|max| self.host.frame() >= max)
    }

    /// Returns the current frame count.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.host.frame()
    }

    /// Returns the time allowed per frame.
    #[inline]
    #[must_use]
    pub fn frame_budget(&self) -> Duration {
        self.budget
    }

    /// Returns the actor stage.
    #[must_use]
    pub fn stage(&self) -> &StarStage {
        &self.stage
    }

    /// Returns the host context.
    #[must_use]
    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Returns the scene controller.
    #[must_use]
    pub fn scenes(&self) -> &SceneController {
        &self.scenes
    }

    /// Returns a handle to the latest frame's statistics.
    #[must_use]
    pub fn metrics(&self) -> MetricsHandle {
        Arc::clone(&self.metrics)
    }

    /// Returns the accumulated statistics.
    #[must_use]
    pub fn stats(&self) -> &FrameStatsAccumulator {
        &self.stats_accumulator
    }
}

impl std::fmt::Debug for GameLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLoop")
            .field("frame", &self.host.frame())
            .field("stage", &self.stage)
            .field("scenes", &self.scenes)
            .field("budget", &self.budget)
            .finish_non_exhaustive()
    }
}

/// Accumulator for frame statistics.
#[derive(Clone, Debug)]
pub struct FrameStatsAccumulator {
    /// Total frames recorded.
    pub frames_recorded: u64,
    /// Sum of total frame times.
    pub total_us_sum: u64,
    /// Sum of update times.
    pub update_us_sum: u64,
    /// Sum of draw times.
    pub draw_us_sum: u64,
    /// Min frame time.
    pub min_frame_us: u64,
    /// Max frame time.
    pub max_frame_us: u64,
    /// Frames that exceeded budget.
    pub frames_over_budget: u64,
}

impl FrameStatsAccumulator {
    /// Creates a new accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames_recorded: 0,
            total_us_sum: 0,
            update_us_sum: 0,
            draw_us_sum: 0,
            min_frame_us: u64::MAX,
            max_frame_us: 0,
            frames_over_budget: 0,
        }
    }

    /// Records a frame's statistics.
    pub fn record(&mut self, stats: FrameStats) {
        self.frames_recorded += 1;
        self.total_us_sum = self.total_us_sum.saturating_add(stats.total_us);
        self.update_us_sum = self.update_us_sum.saturating_add(stats.update_us);
        self.draw_us_sum = self.draw_us_sum.saturating_add(stats.draw_us);
        self.min_frame_us = self.min_frame_us.min(stats.total_us);
        self.max_frame_us = self.max_frame_us.max(stats.total_us);

        if stats.late {
            self.frames_over_budget += 1;
        }
    }

    /// Returns average frame time in milliseconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        (self.total_us_sum as f64 / self.frames_recorded as f64) / 1000.0
    }

    /// Returns the fraction of frames over budget.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn over_budget_ratio(&self) -> f64 {
        if self.frames_recorded == 0 {
            return 0.0;
        }
        self.frames_over_budget as f64 / self.frames_recorded as f64
    }
}

impl Default for FrameStatsAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameConfig;
    use crate::feed::ScriptedInput;
    use crate::host::Button;
    use crate::scene::SceneKey;

    fn config(initial_scene: SceneKey, max_frames: Option<u64>) -> AppConfig {
        AppConfig {
            frame: FrameConfig {
                max_frames,
                pace: false,
                ..FrameConfig::default()
            },
            initial_scene,
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_first_frame_installs_initial_scene() {
        let mut game_loop = GameLoop::new(config(SceneKey::Game, None)).unwrap();
        assert_eq!(game_loop.scenes().active_key(), None);

        let stats = game_loop.tick(InputSample::idle()).unwrap();
        assert_eq!(stats.frame, 1);
        assert_eq!(game_loop.scenes().active_key(), Some(SceneKey::Game));
        assert_eq!(game_loop.stage().live_count(), 1);
    }

    #[test]
    fn test_run_stops_at_max_frames() {
        let mut game_loop = GameLoop::new(config(SceneKey::Title, Some(10))).unwrap();
        let mut script = ScriptedInput::new();
        script.idle(100);

        assert_eq!(game_loop.run(&mut script).unwrap(), 10);
        assert_eq!(script.len(), 90);
        assert_eq!(game_loop.metrics().lock().frame, 10);
        assert_eq!(game_loop.stats().frames_recorded, 10);
    }

    #[test]
    fn test_run_ends_with_source() {
        let mut game_loop = GameLoop::new(config(SceneKey::Title, None)).unwrap();
        let mut script = ScriptedInput::new();
        script.idle(5);
        assert_eq!(game_loop.run(&mut script).unwrap(), 5);
        assert!(!game_loop.is_finished());
    }

    #[test]
    fn test_title_switches_to_game_on_a() {
        let mut game_loop = GameLoop::new(config(SceneKey::Title, None)).unwrap();
        let mut script = ScriptedInput::new();
        script.idle(1).tap(Button::B).idle(2).tap(Button::A).idle(1);
        game_loop.run(&mut script).unwrap();

        assert_eq!(game_loop.scenes().active_key(), Some(SceneKey::Game));
        // Title actors are gone; only the mission console is live.
        assert_eq!(game_loop.stage().live_count(), 1);
    }

    #[test]
    fn test_budget_follows_target_fps() {
        let game_loop = GameLoop::new(AppConfig::default()).unwrap();
        assert_eq!(game_loop.frame_budget(), Duration::from_secs(1) / 30);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.frame.target_fps = 0;
        assert!(GameLoop::new(config).is_err());
    }

    #[test]
    fn test_stats_accumulator() {
        let mut acc = FrameStatsAccumulator::new();
        for i in 0..100 {
            acc.record(FrameStats {
                frame: i + 1,
                update_us: 5000,
                draw_us: 2000,
                total_us: 10_000 + (i * 100),
                live_actors: 3,
                late: i % 10 == 0,
            });
        }

        assert_eq!(acc.frames_recorded, 100);
        assert_eq!(acc.min_frame_us, 10_000);
        assert!((acc.over_budget_ratio() - 0.1).abs() < 1e-9);
        assert!(acc.avg_frame_ms() > 10.0);
    }
}
