//! # Console
//!
//! A full-screen scrolling text terminal. The current line sits on the
//! bottom row; every line break scrolls the screen up by one row.
//!
//! The console runs one interaction at a time:
//! - **Typewriter**: queued text appears one character per frame. Holding
//!   B or Left flushes the rest of the queue at once.
//! - **Menu**: the crank steps the cursor with wrap-around, A or Right
//!   confirms.
//! - **Number**: the crank steps the value within `[min, max]` with
//!   wrap-around, A or Right confirms, B or Left cancels.
//! - **Angle**: the value follows the crank angle, A confirms.
//!
//! Confirmed answers are written onto the current line, followed by a line
//! break. Cursor moves play [`SystemSound::Po`], confirmations
//! [`SystemSound::Pi`].

use std::collections::VecDeque;

use starbase_core::{ActorId, ActorResult};

use super::{
    downcast, downcast_mut, find, find_mut, StarStage, Widget, ORDER_CONSOLE, PRIORITY_CONSOLE,
    TAG_CONSOLE,
};
use crate::config::ConsoleConfig;
use crate::host::{
    Audio, Button, Canvas, Color, Host, Input, SystemSound, GLYPH_HEIGHT, GLYPH_WIDTH,
    SCREEN_HEIGHT, SCREEN_WIDTH,
};

/// Visible text rows.
pub const CONSOLE_ROWS: usize = (SCREEN_HEIGHT / GLYPH_HEIGHT) as usize;

/// Row, counted from the bottom, of the caption shown outside classic mode.
const CAPTION_ROW: i32 = 5;

/// Width reserved for an angle readout ("999").
const ANGLE_WIDTH: i32 = 3 * GLYPH_WIDTH;

/// Largest crank travel per number step, in degrees.
const NUMBER_STEP_MAX: i32 = 10;

#[derive(Clone, Debug)]
struct Menu {
    items: Vec<String>,
    cursor: usize,
    crank: f32,
    width: i32,
}

#[derive(Clone, Copy, Debug)]
struct NumberInput {
    value: i32,
    min: i32,
    max: i32,
    crank: f32,
    step: f32,
    width: i32,
}

/// Console state.
#[derive(Clone, Debug)]
pub struct Console {
    /// Finished lines, oldest first.
    rows: VecDeque<String>,
    /// The line under the cursor.
    line: String,
    /// Characters still to be typed.
    pending: VecDeque<char>,
    menu: Option<Menu>,
    menu_done: Option<usize>,
    number: Option<NumberInput>,
    number_done: Option<i32>,
    angle: Option<f32>,
    angle_done: Option<i32>,
    menu_step: f32,
    classic: bool,
}

impl Console {
    /// Creates an empty console.
    #[must_use]
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            rows: VecDeque::with_capacity(CONSOLE_ROWS),
            line: String::new(),
            pending: VecDeque::new(),
            menu: None,
            menu_done: None,
            number: None,
            number_done: None,
            angle: None,
            angle_done: None,
            menu_step: config.menu_step_degrees,
            classic: true,
        }
    }

    /// Returns the visible text, top row first, ending with the current line.
    #[must_use]
    pub fn transcript(&self) -> Vec<&str> {
        self.rows
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.line.as_str()))
            .collect()
    }

    /// Checks whether any interaction is still running.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.pending.is_empty()
            || self.menu.is_some()
            || self.number.is_some()
            || self.angle.is_some()
    }

    fn new_line(&mut self) {
        let line = std::mem::take(&mut self.line);
        self.rows.push_back(line);
        while self.rows.len() >= CONSOLE_ROWS {
            self.rows.pop_front();
        }
    }

    fn put(&mut self, letter: char) {
        if letter == '\n' {
            self.new_line();
            return;
        }
        let width = Canvas::text_width(&self.line);
        if width + GLYPH_WIDTH > SCREEN_WIDTH {
            self.new_line();
        }
        self.line.push(letter);
    }

    fn commit(&mut self, answer: &str) {
        self.line.push_str(answer);
        self.new_line();
    }

    fn tick(&mut self, input: &Input, audio: &mut Audio) {
        self.type_pending(input);

        if self.menu.is_some() {
            self.tick_menu(input, audio);
        } else if self.number.is_some() {
            self.tick_number(input, audio);
        } else if self.angle.is_some() {
            self.tick_angle(input, audio);
        }
    }

    fn type_pending(&mut self, input: &Input) {
        let flush = input.is_push(Button::B) || input.is_push(Button::Left);
        while let Some(letter) = self.pending.pop_front() {
            self.put(letter);
            if !flush {
                break;
            }
        }
    }

    fn tick_menu(&mut self, input: &Input, audio: &mut Audio) {
        let step = self.menu_step;
        let Some(menu) = self.menu.as_mut() else {
            return;
        };

        let size = menu.items.len();
        let mut moved = false;
        menu.crank += input.crank_change();
        while menu.crank <= -step {
            menu.cursor = (menu.cursor + size - 1) % size;
            menu.crank += step;
            moved = true;
        }
        while menu.crank >= step {
            menu.cursor = (menu.cursor + 1) % size;
            menu.crank -= step;
            moved = true;
        }
        if moved {
            audio.play(SystemSound::Po);
        }

        if input.is_edge(Button::A) || input.is_edge(Button::Right) {
            let cursor = menu.cursor;
            let answer = menu.items[cursor].clone();
            self.menu = None;
            self.menu_done = Some(cursor);
            self.commit(&answer);
            audio.play(SystemSound::Pi);
        }
    }

    fn tick_number(&mut self, input: &Input, audio: &mut Audio) {
        let Some(number) = self.number.as_mut() else {
            return;
        };

        let mut moved = false;
        number.crank += input.crank_change();
        while number.crank <= -number.step {
            number.value = if number.value <= number.min {
                number.max
            } else {
                number.value - 1
            };
            number.crank += number.step;
            moved = true;
        }
        while number.crank >= number.step {
            number.value = if number.value >= number.max {
                number.min
            } else {
                number.value + 1
            };
            number.crank -= number.step;
            moved = true;
        }
        if moved {
            audio.play(SystemSound::Po);
        }

        if input.is_edge(Button::A) || input.is_edge(Button::Right) {
            let value = number.value;
            self.number = None;
            self.number_done = Some(value);
            self.commit(&value.to_string());
            audio.play(SystemSound::Pi);
        } else if input.is_edge(Button::B) || input.is_edge(Button::Left) {
            self.number = None;
            self.number_done = None;
            self.new_line();
            audio.play(SystemSound::Po);
        }
    }

    fn tick_angle(&mut self, input: &Input, audio: &mut Audio) {
        if input.is_edge(Button::A) {
            let angle = self.angle.take().map_or(0, angle_degrees);
            self.angle_done = Some(angle);
            self.commit(&angle.to_string());
            audio.play(SystemSound::Pi);
        } else {
            self.angle = Some(input.crank_angle());
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        canvas.fill_rect(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT, Color::Black);

        let bottom = SCREEN_HEIGHT - GLYPH_HEIGHT;
        let mut y = bottom;
        for row in self.rows.iter().rev() {
            y -= GLYPH_HEIGHT;
            if !row.is_empty() {
                canvas.draw_text(0, y, row.as_str(), Color::White);
            }
        }
        if !self.line.is_empty() {
            canvas.draw_text(0, bottom, self.line.as_str(), Color::White);
        }

        let x = Canvas::text_width(&self.line);
        if let Some(menu) = &self.menu {
            highlight(canvas, x, bottom, menu.width, &menu.items[menu.cursor]);
        } else if let Some(number) = &self.number {
            highlight(canvas, x, bottom, number.width, &number.value.to_string());
        } else if let Some(angle) = self.angle {
            highlight(canvas, x, bottom, ANGLE_WIDTH, &angle_degrees(angle).to_string());
        }

        if !self.classic {
            let y = SCREEN_HEIGHT - CAPTION_ROW * GLYPH_HEIGHT;
            canvas.fill_rect(0, y, SCREEN_WIDTH, GLYPH_HEIGHT, Color::Black);
            canvas.draw_text(0, y, "CONSOLE", Color::White);
            let rule = y + GLYPH_HEIGHT - 1;
            canvas.draw_line(0, rule, SCREEN_WIDTH - 1, rule, Color::White);
        }
    }

    fn release(&mut self) {
        self.rows.clear();
        self.line.clear();
        self.pending.clear();
        self.menu = None;
        self.number = None;
        self.angle = None;
    }
}

fn highlight(canvas: &mut Canvas, x: i32, y: i32, width: i32, text: &str) {
    canvas.fill_rect(x, y, width, GLYPH_HEIGHT, Color::White);
    canvas.draw_text(x, y, text, Color::Black);
}

#[allow(clippy::cast_possible_truncation)]
fn angle_degrees(angle: f32) -> i32 {
    angle as i32
}

/// Crank travel per number step for the range `[min, max]`.
fn number_step(min: i32, max: i32) -> f32 {
    let span = max.saturating_sub(min).max(1);
    #[allow(clippy::cast_precision_loss)]
    let step = (360 / span).clamp(1, NUMBER_STEP_MAX) as f32;
    step
}

/// Width of the widest value in `[.., max]`.
fn number_width(max: i32) -> i32 {
    let digits = match max {
        ..=9 => 1,
        10..=99 => 2,
        100..=999 => 3,
        _ => 4,
    };
    digits * GLYPH_WIDTH
}

// =============================================================================
// Actor callbacks
// =============================================================================

fn update(stage: &mut StarStage, host: &mut Host, id: ActorId) -> ActorResult<()> {
    let console = downcast_mut(stage, id, "console", Widget::as_console_mut)?;
    console.tick(&host.input, &mut host.audio);
    stage.set_draw(id, draw, ORDER_CONSOLE)
}

fn draw(stage: &mut StarStage, host: &mut Host, id: ActorId) -> ActorResult<()> {
    let console = downcast(stage, id, "console", Widget::as_console)?;
    console.render(&mut host.canvas);
    Ok(())
}

fn unload(stage: &mut StarStage, _: &mut Host, id: ActorId) -> ActorResult<()> {
    downcast_mut(stage, id, "console", Widget::as_console_mut)?.release();
    tracing::debug!(actor = %id, "console released");
    Ok(())
}

// =============================================================================
// Public API
// =============================================================================

/// Loads the console actor.
///
/// # Errors
///
/// Returns [`ActorError::PoolExhausted`](starbase_core::ActorError) if the
/// stage is full.
pub fn load(stage: &mut StarStage, config: &ConsoleConfig) -> ActorResult<ActorId> {
    let id = stage.load(
        Some(update),
        PRIORITY_CONSOLE,
        Widget::Console(Console::new(config)),
    )?;
    stage.set_unload(id, Some(unload))?;
    stage.set_tag(id, TAG_CONSOLE)?;
    Ok(id)
}

fn with_console(
    stage: &mut StarStage,
    apply: impl FnOnce(&mut Console),
) -> ActorResult<()> {
    match find_mut(stage, TAG_CONSOLE, "console", Widget::as_console_mut)? {
        Some(console) => apply(console),
        None => tracing::debug!("no console loaded"),
    }
    Ok(())
}

fn console(stage: &StarStage) -> Option<&Console> {
    find(stage, TAG_CONSOLE, Widget::as_console)
}

/// Queues `text` for the typewriter.
///
/// # Errors
///
/// Returns an error if the console tag holds another widget.
pub fn print_text(stage: &mut StarStage, text: &str) -> ActorResult<()> {
    with_console(stage, |console| console.pending.extend(text.chars()))
}

/// Checks whether queued text is still being typed.
#[must_use]
pub fn is_printing(stage: &StarStage) -> bool {
    console(stage).is_some_and(|console| !console.pending.is_empty())
}

/// Opens a menu with the cursor on the first item.
///
/// # Errors
///
/// Returns an error if the console tag holds another widget.
pub fn open_menu(stage: &mut StarStage, items: &[&str]) -> ActorResult<()> {
    with_console(stage, |console| {
        if items.is_empty() {
            tracing::warn!("ignoring empty menu");
            return;
        }
        let width = items.iter().map(|item| Canvas::text_width(item)).max().unwrap_or(0);
        console.menu = Some(Menu {
            items: items.iter().map(|item| (*item).to_string()).collect(),
            cursor: 0,
            crank: 0.0,
            width,
        });
        console.menu_done = None;
    })
}

/// Checks whether a menu is waiting for confirmation.
#[must_use]
pub fn is_menu_open(stage: &StarStage) -> bool {
    console(stage).is_some_and(|console| console.menu.is_some())
}

/// Returns the index of the last confirmed menu item.
#[must_use]
pub fn selected_menu(stage: &StarStage) -> Option<usize> {
    console(stage).and_then(|console| console.menu_done)
}

/// Starts number input at `number` within `[min, max]`.
///
/// The crank travel per step is `360 / (max - min)` degrees, clamped to
/// `1..=10`.
///
/// # Errors
///
/// Returns an error if the console tag holds another widget.
pub fn input_number(stage: &mut StarStage, number: i32, min: i32, max: i32) -> ActorResult<()> {
    with_console(stage, |console| {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        console.number = Some(NumberInput {
            value: number.clamp(min, max),
            min,
            max,
            crank: 0.0,
            step: number_step(min, max),
            width: number_width(max),
        });
        console.number_done = None;
    })
}

/// Checks whether number input is running.
#[must_use]
pub fn is_inputting_number(stage: &StarStage) -> bool {
    console(stage).is_some_and(|console| console.number.is_some())
}

/// Returns the last confirmed number. `None` if the input was cancelled.
#[must_use]
pub fn inputted_number(stage: &StarStage) -> Option<i32> {
    console(stage).and_then(|console| console.number_done)
}

/// Starts angle input at `crank_angle`.
///
/// # Errors
///
/// Returns an error if the console tag holds another widget.
pub fn input_angle(stage: &mut StarStage, crank_angle: f32) -> ActorResult<()> {
    with_console(stage, |console| {
        console.angle = Some(crank_angle);
        console.angle_done = None;
    })
}

/// Checks whether angle input is running.
#[must_use]
pub fn is_inputting_angle(stage: &StarStage) -> bool {
    console(stage).is_some_and(|console| console.angle.is_some())
}

/// Returns the last confirmed angle in whole degrees.
#[must_use]
pub fn inputted_angle(stage: &StarStage) -> Option<i32> {
    console(stage).and_then(|console| console.angle_done)
}

/// Switches the "CONSOLE" caption off (classic) or on.
///
/// # Errors
///
/// Returns an error if the console tag holds another widget.
pub fn set_classic(stage: &mut StarStage, classic: bool) -> ActorResult<()> {
    with_console(stage, |console| console.classic = classic)
}

/// Checks whether the console is typing or waiting for an answer.
#[must_use]
pub fn is_busy(stage: &StarStage) -> bool {
    console(stage).is_some_and(Console::is_busy)
}

/// Returns the visible text of the console, top row first.
#[must_use]
pub fn transcript(stage: &StarStage) -> Vec<String> {
    console(stage)
        .map(|console| console.transcript().into_iter().map(str::to_string).collect())
        .unwrap_or_default()
}
