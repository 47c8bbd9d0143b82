//! # Widgets
//!
//! The actors that make up the game screen. Each widget kind is one variant
//! of the [`Widget`] payload and lives in its own priority, tag and draw
//! layer:
//!
//! | Widget  | Priority | Tag | Order | Area                   |
//! |---------|----------|-----|-------|------------------------|
//! | Console | 1        | 1   | 1     | full screen, scrolling |
//! | Display | 2        | 2   | 2     | 272×160 top left       |
//! | Report  | 3        | 3   | 3     | 128×160 top right      |
//!
//! Widgets are singletons addressed through their tag: scenes call the
//! module functions (`console::print_text`, `display::show`, ...) without
//! holding actor handles.

pub mod console;
pub mod display;
pub mod report;

use starbase_core::{ActorError, ActorId, ActorResult, Stage};

use crate::host::Host;

pub use console::Console;
pub use display::{Display, GalaxyChart, MapView, SectorCell, SectorChart};
pub use report::{Condition, Report, Status};

/// The stage type driven by the game.
pub type StarStage = Stage<Widget, Host>;

/// Update priority of the console.
pub const PRIORITY_CONSOLE: i32 = 1;
/// Update priority of the display.
pub const PRIORITY_DISPLAY: i32 = 2;
/// Update priority of the report.
pub const PRIORITY_REPORT: i32 = 3;

/// Tag of the console.
pub const TAG_CONSOLE: i32 = 1;
/// Tag of the display.
pub const TAG_DISPLAY: i32 = 2;
/// Tag of the report.
pub const TAG_REPORT: i32 = 3;

/// Draw order of the console.
pub const ORDER_CONSOLE: i32 = 1;
/// Draw order of the display.
pub const ORDER_DISPLAY: i32 = 2;
/// Draw order of the report.
pub const ORDER_REPORT: i32 = 3;

/// Payload of every actor on the game stage.
#[derive(Clone, Debug)]
pub enum Widget {
    /// Scrolling text terminal.
    Console(Console),
    /// Map panel.
    Display(Display),
    /// Status panel.
    Report(Report),
}

impl Widget {
    /// Returns the console payload.
    #[must_use]
    pub fn as_console(&self) -> Option<&Console> {
        match self {
            Self::Console(console) => Some(console),
            _ => None,
        }
    }

    /// Returns the console payload mutably.
    pub fn as_console_mut(&mut self) -> Option<&mut Console> {
        match self {
            Self::Console(console) => Some(console),
            _ => None,
        }
    }

    /// Returns the display payload.
    #[must_use]
    pub fn as_display(&self) -> Option<&Display> {
        match self {
            Self::Display(display) => Some(display),
            _ => None,
        }
    }

    /// Returns the display payload mutably.
    pub fn as_display_mut(&mut self) -> Option<&mut Display> {
        match self {
            Self::Display(display) => Some(display),
            _ => None,
        }
    }

    /// Returns the report payload.
    #[must_use]
    pub fn as_report(&self) -> Option<&Report> {
        match self {
            Self::Report(report) => Some(report),
            _ => None,
        }
    }

    /// Returns the report payload mutably.
    pub fn as_report_mut(&mut self) -> Option<&mut Report> {
        match self {
            Self::Report(report) => Some(report),
            _ => None,
        }
    }
}

/// Borrows the payload of `id` as a specific widget kind.
fn downcast<'s, T>(
    stage: &'s StarStage,
    id: ActorId,
    expected: &'static str,
    pick: fn(&Widget) -> Option<&T>,
) -> ActorResult<&'s T> {
    pick(stage.payload(id)?).ok_or(ActorError::PayloadMismatch { id, expected })
}

/// Mutably borrows the payload of `id` as a specific widget kind.
fn downcast_mut<'s, T>(
    stage: &'s mut StarStage,
    id: ActorId,
    expected: &'static str,
    pick: fn(&mut Widget) -> Option<&mut T>,
) -> ActorResult<&'s mut T> {
    pick(stage.payload_mut(id)?).ok_or(ActorError::PayloadMismatch { id, expected })
}

/// Finds the singleton in tag group `tag`.
///
/// Returns `Ok(None)` when the widget is not loaded.
fn find_mut<'s, T>(
    stage: &'s mut StarStage,
    tag: i32,
    expected: &'static str,
    pick: fn(&mut Widget) -> Option<&mut T>,
) -> ActorResult<Option<&'s mut T>> {
    match stage.find_with_tag(tag) {
        Some(id) => downcast_mut(stage, id, expected, pick).map(Some),
        None => Ok(None),
    }
}

/// Finds the singleton in tag group `tag` for reading.
fn find<T>(stage: &StarStage, tag: i32, pick: fn(&Widget) -> Option<&T>) -> Option<&T> {
    let id = stage.find_with_tag(tag)?;
    stage.payload(id).ok().and_then(pick)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widgets_fit_a_slot() {
        assert!(std::mem::size_of::<Widget>() <= starbase_core::SLOT_BYTES);
    }

    #[test]
    fn test_find_mut_borrows_tagged_widget() {
        let mut stage = StarStage::with_capacity(2);
        assert!(find_mut(&mut stage, TAG_REPORT, "report", Widget::as_report_mut)
            .unwrap()
            .is_none());

        let id = stage
            .load(None, 0, Widget::Report(Report::default()))
            .unwrap();
        stage.set_tag(id, TAG_REPORT).unwrap();
        assert!(find_mut(&mut stage, TAG_REPORT, "report", Widget::as_report_mut)
            .unwrap()
            .is_some());

        // Wrong widget kind under the tag.
        let err = find_mut(&mut stage, TAG_REPORT, "display", Widget::as_display_mut).unwrap_err();
        assert_eq!(
            err,
            ActorError::PayloadMismatch {
                id,
                expected: "display"
            }
        );
    }

    #[test]
    fn test_downcast_mismatch() {
        let mut stage = StarStage::with_capacity(2);
        let id = stage
            .load(None, 0, Widget::Report(Report::default()))
            .unwrap();
        let err = downcast(&stage, id, "console", Widget::as_console).unwrap_err();
        assert_eq!(
            err,
            ActorError::PayloadMismatch {
                id,
                expected: "console"
            }
        );
        assert!(stage.payload(id).unwrap().as_report().is_some());
    }
}
