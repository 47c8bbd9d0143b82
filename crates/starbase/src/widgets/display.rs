//! # Display
//!
//! The 272×160 map panel in the top-left corner. It shows one of three
//! views: nothing, the galaxy chart or the sector chart of the current
//! quadrant.

use starbase_core::{ActorId, ActorResult};

use super::{
    downcast, downcast_mut, find, find_mut, StarStage, Widget, ORDER_DISPLAY, PRIORITY_DISPLAY,
    TAG_DISPLAY,
};
use crate::host::{Canvas, Color, Host, GLYPH_HEIGHT, GLYPH_WIDTH};

/// Panel width in pixels.
pub const DISPLAY_WIDTH: i32 = 272;
/// Panel height in pixels.
pub const DISPLAY_HEIGHT: i32 = 160;

/// Quadrants or sectors per chart side.
pub const CHART_SIDE: usize = 8;

const CHART_CELLS: usize = CHART_SIDE * CHART_SIDE;

/// Length of the rule under the panel title.
const RULE_LENGTH: i32 = 33 * GLYPH_WIDTH - GLYPH_WIDTH / 2;

/// The 8×8 quadrant chart.
///
/// Each scanned quadrant holds the usual three-digit summary:
/// `klingons * 100 + starbases * 10 + stars`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GalaxyChart {
    quadrants: [Option<u16>; CHART_CELLS],
    current: (usize, usize),
}

impl GalaxyChart {
    /// Creates a chart with nothing scanned and the ship in `current`
    /// (`row`, `column`, zero based).
    #[must_use]
    pub fn new(current: (usize, usize)) -> Self {
        Self {
            quadrants: [None; CHART_CELLS],
            current,
        }
    }

    /// Records the scan result of a quadrant. Out of range is ignored.
    pub fn record(&mut self, row: usize, column: usize, summary: u16) {
        if row < CHART_SIDE && column < CHART_SIDE {
            self.quadrants[row * CHART_SIDE + column] = Some(summary);
        }
    }

    /// Returns the scan result of a quadrant.
    #[must_use]
    pub fn summary(&self, row: usize, column: usize) -> Option<u16> {
        if row < CHART_SIDE && column < CHART_SIDE {
            self.quadrants[row * CHART_SIDE + column]
        } else {
            None
        }
    }

    /// Returns the ship's quadrant.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> (usize, usize) {
        self.current
    }

    fn label(&self, row: usize, column: usize) -> String {
        match self.summary(row, column) {
            Some(summary) if summary > 0 => format!(" {summary:03}"),
            _ if (row, column) == self.current => " ???".to_string(),
            _ => " ...".to_string(),
        }
    }
}

/// Content of one sector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SectorCell {
    /// Empty space.
    #[default]
    Empty,
    /// A Klingon cruiser.
    Klingon,
    /// A starbase.
    Starbase,
    /// A star.
    Star,
    /// The ship.
    Enterprise,
}

impl SectorCell {
    /// Returns the map glyph.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Empty => ".",
            Self::Klingon => "K",
            Self::Starbase => "B",
            Self::Star => "*",
            Self::Enterprise => "E",
        }
    }
}

/// The 8×8 sector chart of one quadrant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SectorChart {
    cells: [SectorCell; CHART_CELLS],
}

impl Default for SectorChart {
    fn default() -> Self {
        Self::new()
    }
}

impl SectorChart {
    /// Creates an empty chart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [SectorCell::Empty; CHART_CELLS],
        }
    }

    /// Returns the content of a sector. Out of range reads as empty.
    #[must_use]
    pub fn get(&self, row: usize, column: usize) -> SectorCell {
        if row < CHART_SIDE && column < CHART_SIDE {
            self.cells[row * CHART_SIDE + column]
        } else {
            SectorCell::Empty
        }
    }

    /// Sets the content of a sector. Out of range is ignored.
    pub fn set(&mut self, row: usize, column: usize, cell: SectorCell) {
        if row < CHART_SIDE && column < CHART_SIDE {
            self.cells[row * CHART_SIDE + column] = cell;
        }
    }

    /// Counts the sectors holding `cell`.
    #[must_use]
    pub fn count(&self, cell: SectorCell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }
}

/// What the display shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MapView {
    /// Title only.
    #[default]
    NoMap,
    /// The quadrant chart.
    Galaxy(GalaxyChart),
    /// The current quadrant.
    Sector(SectorChart),
}

impl MapView {
    /// Returns the panel title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::NoMap => "NO MAP",
            Self::Galaxy(_) => "GALAXY MAP",
            Self::Sector(_) => "SECTOR MAP",
        }
    }
}

/// Display state.
#[derive(Clone, Debug, Default)]
pub struct Display {
    view: MapView,
}

impl Display {
    fn render(&self, canvas: &mut Canvas) {
        canvas.fill_rect(0, 0, DISPLAY_WIDTH, DISPLAY_HEIGHT, Color::Black);
        canvas.draw_text(0, 0, self.view.title(), Color::White);
        let rule = GLYPH_HEIGHT - 1;
        canvas.draw_line(0, rule, RULE_LENGTH, rule, Color::White);

        match &self.view {
            MapView::NoMap => {}
            MapView::Galaxy(chart) => render_galaxy(canvas, chart),
            MapView::Sector(chart) => render_sector(canvas, chart),
        }
    }
}

fn cell_offset(index: usize, step: i32) -> i32 {
    // Chart indices are below CHART_SIDE.
    i32::try_from(index).map_or(0, |index| index * step)
}

fn render_galaxy(canvas: &mut Canvas, chart: &GalaxyChart) {
    for row in 0..CHART_SIDE {
        for column in 0..CHART_SIDE {
            let x = cell_offset(column, 4 * GLYPH_WIDTH);
            let y = cell_offset(row + 1, GLYPH_HEIGHT);
            let color = if (row, column) == chart.current {
                canvas.fill_rect(x, y, 5 * GLYPH_WIDTH, GLYPH_HEIGHT, Color::White);
                Color::Black
            } else {
                Color::White
            };
            canvas.draw_text(x, y, chart.label(row, column), color);
        }
    }
}

fn render_sector(canvas: &mut Canvas, chart: &SectorChart) {
    for row in 0..CHART_SIDE {
        for column in 0..CHART_SIDE {
            let x = cell_offset(column * 2 + 9, GLYPH_WIDTH);
            let y = cell_offset(row + 1, GLYPH_HEIGHT);
            canvas.draw_text(x, y, chart.get(row, column).glyph(), Color::White);
        }
    }
}

fn update(stage: &mut StarStage, _: &mut Host, id: ActorId) -> ActorResult<()> {
    stage.set_draw(id, draw, ORDER_DISPLAY)
}

fn draw(stage: &mut StarStage, host: &mut Host, id: ActorId) -> ActorResult<()> {
    downcast(stage, id, "display", Widget::as_display)?.render(&mut host.canvas);
    Ok(())
}

fn unload(stage: &mut StarStage, _: &mut Host, id: ActorId) -> ActorResult<()> {
    downcast_mut(stage, id, "display", Widget::as_display_mut)?.view = MapView::NoMap;
    Ok(())
}

/// Loads the display actor showing [`MapView::NoMap`].
///
/// # Errors
///
/// Returns [`ActorError::PoolExhausted`](starbase_core::ActorError) if the
/// stage is full.
pub fn load(stage: &mut StarStage) -> ActorResult<ActorId> {
    let id = stage.load(
        Some(update),
        PRIORITY_DISPLAY,
        Widget::Display(Display::default()),
    )?;
    stage.set_unload(id, Some(unload))?;
    stage.set_tag(id, TAG_DISPLAY)?;
    Ok(id)
}

/// Switches the displayed view. Does nothing if no display is loaded.
///
/// # Errors
///
/// Returns an error if the display tag holds another widget.
pub fn show(stage: &mut StarStage, view: MapView) -> ActorResult<()> {
    match find_mut(stage, TAG_DISPLAY, "display", Widget::as_display_mut)? {
        Some(display) => display.view = view,
        None => tracing::debug!(title = view.title(), "no display loaded"),
    }
    Ok(())
}

/// Returns the displayed view.
#[must_use]
pub fn view(stage: &StarStage) -> Option<&MapView> {
    find(stage, TAG_DISPLAY, Widget::as_display).map(|display| &display.view)
}
