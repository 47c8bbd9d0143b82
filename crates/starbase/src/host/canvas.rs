//! # Canvas
//!
//! A headless 400×240 one-bit surface. Draw calls are recorded in submission
//! order instead of being rasterised, so frames can be inspected and
//! compared.

/// Screen width in pixels.
pub const SCREEN_WIDTH: i32 = 400;
/// Screen height in pixels.
pub const SCREEN_HEIGHT: i32 = 240;
/// Glyph advance in pixels.
pub const GLYPH_WIDTH: i32 = 8;
/// Line height in pixels.
pub const GLYPH_HEIGHT: i32 = 16;

/// One-bit colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    /// Unlit pixel.
    Black,
    /// Lit pixel.
    White,
}

/// A recorded draw call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    /// Solid rectangle.
    Fill {
        /// Left edge.
        x: i32,
        /// Top edge.
        y: i32,
        /// Width in pixels.
        width: i32,
        /// Height in pixels.
        height: i32,
        /// Fill colour.
        color: Color,
    },
    /// A run of text with its top-left corner at `(x, y)`.
    Text {
        /// Left edge.
        x: i32,
        /// Top edge.
        y: i32,
        /// The text.
        text: String,
        /// Glyph colour.
        color: Color,
    },
    /// One-pixel line.
    Line {
        /// Start x.
        x0: i32,
        /// Start y.
        y0: i32,
        /// End x.
        x1: i32,
        /// End y.
        y1: i32,
        /// Line colour.
        color: Color,
    },
}

/// The frame's draw command list.
#[derive(Clone, Debug)]
pub struct Canvas {
    commands: Vec<DrawCommand>,
    background: Color,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Creates an empty canvas with a black background.
    #[must_use]
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
            background: Color::Black,
        }
    }

    /// Returns the width of `text` in pixels.
    #[must_use]
    pub fn text_width(text: &str) -> i32 {
        i32::try_from(text.chars().count()).map_or(i32::MAX, |n| n.saturating_mul(GLYPH_WIDTH))
    }

    /// Drops every command and fills the screen with the background.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Fill {
            x: 0,
            y: 0,
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            color: self.background,
        });
    }

    /// Records a filled rectangle.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.commands.push(DrawCommand::Fill {
            x,
            y,
            width,
            height,
            color,
        });
    }

    /// Records a run of text.
    pub fn draw_text(&mut self, x: i32, y: i32, text: impl Into<String>, color: Color) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.into(),
            color,
        });
    }

    /// Records a line.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        self.commands.push(DrawCommand::Line {
            x0,
            y0,
            x1,
            y1,
            color,
        });
    }

    /// Returns the commands recorded this frame.
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Iterates over the text runs recorded this frame.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Checks whether any text run this frame contains `needle`.
    #[must_use]
    pub fn shows(&self, needle: &str) -> bool {
        self.texts().any(|text| text.contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_leaves_background_fill() {
        let mut canvas = Canvas::new();
        canvas.draw_text(0, 0, "HELLO", Color::White);
        canvas.clear();
        assert_eq!(canvas.commands().len(), 1);
        assert!(matches!(
            canvas.commands()[0],
            DrawCommand::Fill {
                width: SCREEN_WIDTH,
                height: SCREEN_HEIGHT,
                color: Color::Black,
                ..
            }
        ));
    }

    #[test]
    fn test_commands_keep_submission_order() {
        let mut canvas = Canvas::new();
        canvas.fill_rect(0, 0, 8, 16, Color::White);
        canvas.draw_text(0, 0, "A", Color::Black);
        canvas.draw_line(0, 16, 399, 16, Color::White);
        assert!(matches!(canvas.commands()[0], DrawCommand::Fill { .. }));
        assert!(matches!(canvas.commands()[1], DrawCommand::Text { .. }));
        assert!(matches!(canvas.commands()[2], DrawCommand::Line { .. }));
    }

    #[test]
    fn test_text_width() {
        assert_eq!(Canvas::text_width(""), 0);
        assert_eq!(Canvas::text_width("999"), 24);
    }

    #[test]
    fn test_shows() {
        let mut canvas = Canvas::new();
        canvas.draw_text(0, 0, "STARDATE  3200", Color::White);
        assert!(canvas.shows("3200"));
        assert!(!canvas.shows("KLINGON"));
    }
}
