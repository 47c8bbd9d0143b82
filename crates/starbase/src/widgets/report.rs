//! # Report
//!
//! The 128×160 status panel in the top-right corner.

use starbase_core::{ActorId, ActorResult};

use super::{
    downcast, find, find_mut, StarStage, Widget, ORDER_REPORT, PRIORITY_REPORT, TAG_REPORT,
};
use crate::host::{Canvas, Color, Host, GLYPH_HEIGHT, SCREEN_WIDTH};

/// Panel width in pixels.
pub const REPORT_WIDTH: i32 = 128;
/// Panel height in pixels.
pub const REPORT_HEIGHT: i32 = 160;

/// Energy below which the ship runs yellow.
pub const LOW_ENERGY: i32 = 999;

/// Alert condition of the ship.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Next to a starbase.
    Docked,
    /// Klingons in the quadrant.
    Red,
    /// Energy running low.
    Yellow,
    /// All clear.
    #[default]
    Green,
}

impl Condition {
    /// Derives the condition. Docking wins over everything, then enemies,
    /// then low energy.
    #[must_use]
    pub const fn assess(docked: bool, klingons_here: u32, energy: i32) -> Self {
        if docked {
            Self::Docked
        } else if klingons_here > 0 {
            Self::Red
        } else if energy < LOW_ENERGY {
            Self::Yellow
        } else {
            Self::Green
        }
    }

    /// Returns the upper-case label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Docked => "DOCKED",
            Self::Red => "RED",
            Self::Yellow => "YELLOW",
            Self::Green => "GREEN",
        }
    }
}

/// Ship and mission status shown by the report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Status {
    /// Current stardate.
    pub stardate: i32,
    /// Stardates left in the mission.
    pub time_left: i32,
    /// Alert condition.
    pub condition: Condition,
    /// Ship energy.
    pub energy: i32,
    /// Photon torpedoes left.
    pub torpedoes: i32,
    /// Klingons left in the galaxy.
    pub klingons: u32,
    /// Starbases left in the galaxy.
    pub starbases: u32,
}

impl Status {
    /// Formats the panel lines, title first.
    #[must_use]
    pub fn lines(&self) -> [String; 8] {
        [
            "STATUS".to_string(),
            format!("STARDATE  {}", self.stardate),
            format!("TIMELEFT  {}", self.time_left),
            format!("CONDITION {}", self.condition.label()),
            format!("ENERGY    {}", self.energy),
            format!("TORPEDOES {}", self.torpedoes),
            format!("KLINGONS  {}", self.klingons),
            format!("STARBASES {}", self.starbases),
        ]
    }
}

/// Report state.
#[derive(Clone, Debug, Default)]
pub struct Report {
    status: Status,
}

impl Report {
    fn render(&self, canvas: &mut Canvas) {
        let left = SCREEN_WIDTH - REPORT_WIDTH;
        canvas.fill_rect(left, 0, REPORT_WIDTH, REPORT_HEIGHT, Color::Black);

        let mut y = 0;
        for line in self.status.lines() {
            canvas.draw_text(left, y, line, Color::White);
            y += GLYPH_HEIGHT;
        }
        let rule = GLYPH_HEIGHT - 1;
        canvas.draw_line(left, rule, SCREEN_WIDTH - 1, rule, Color::White);
    }
}

fn update(stage: &mut StarStage, _: &mut Host, id: ActorId) -> ActorResult<()> {
    stage.set_draw(id, draw, ORDER_REPORT)
}

fn draw(stage: &mut StarStage, host: &mut Host, id: ActorId) -> ActorResult<()> {
    downcast(stage, id, "report", Widget::as_report)?.render(&mut host.canvas);
    Ok(())
}

/// Loads the report actor with an all-zero status.
///
/// # Errors
///
/// Returns [`ActorError::PoolExhausted`](starbase_core::ActorError) if the
/// stage is full.
pub fn load(stage: &mut StarStage) -> ActorResult<ActorId> {
    let id = stage.load(Some(update), PRIORITY_REPORT, Widget::Report(Report::default()))?;
    stage.set_tag(id, TAG_REPORT)?;
    Ok(id)
}

/// Replaces the shown status. Does nothing if no report is loaded.
///
/// # Errors
///
/// Returns an error if the report tag holds another widget.
pub fn set_status(stage: &mut StarStage, status: Status) -> ActorResult<()> {
    if let Some(report) = find_mut(stage, TAG_REPORT, "report", Widget::as_report_mut)? {
        report.status = status;
    }
    Ok(())
}

/// Returns the shown status.
#[must_use]
pub fn status(stage: &StarStage) -> Option<Status> {
    find(stage, TAG_REPORT, Widget::as_report).map(|report| report.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{DrawCommand, InputSample};

    #[test]
    fn test_condition_precedence() {
        assert_eq!(Condition::assess(true, 3, 10), Condition::Docked);
        assert_eq!(Condition::assess(false, 1, 4000), Condition::Red);
        assert_eq!(Condition::assess(false, 0, 998), Condition::Yellow);
        assert_eq!(Condition::assess(false, 0, 999), Condition::Green);
    }

    #[test]
    fn test_report_draws_status_lines() {
        let mut stage = StarStage::with_capacity(2);
        let mut host = Host::new();
        load(&mut stage).unwrap();
        let status = Status {
            stardate: 3200,
            time_left: 30,
            condition: Condition::Red,
            energy: 4000,
            torpedoes: 10,
            klingons: 17,
            starbases: 3,
        };
        set_status(&mut stage, status).unwrap();
        assert_eq!(super::status(&stage), Some(status));

        host.begin_frame(InputSample::idle());
        stage.update(&mut host).unwrap();
        host.canvas.clear();
        stage.draw(&mut host).unwrap();

        assert!(host.canvas.shows("CONDITION RED"));
        assert!(host.canvas.commands().contains(&DrawCommand::Text {
            x: 272,
            y: 112,
            text: "STARBASES 3".to_string(),
            color: Color::White,
        }));
    }
}
