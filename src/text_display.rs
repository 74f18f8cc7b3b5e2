//! Character-cell view over an `embedded-graphics` draw target.
//!
//! Lets the status rows go to a graphic panel instead of the HD44780 module.
//! Each cell is one `FONT_6X10` glyph; writing clears the covered cells first.

use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    prelude::*,
    primitives::Rectangle,
    text::{Baseline, Text},
};

use crate::display::CharacterDisplay;

const CELL_WIDTH: u32 = 6;
const CELL_HEIGHT: u32 = 10;

pub struct TextDisplay<D: DrawTarget> {
    target: D,
    foreground: D::Color,
    background: D::Color,
    col: u8,
    row: u8,
}

impl<D: DrawTarget> TextDisplay<D> {
    pub fn new(target: D, foreground: D::Color, background: D::Color) -> Self {
        Self {
            target,
            foreground,
            background,
            col: 0,
            row: 0,
        }
    }

    fn cell_origin(&self) -> Point {
        Point::new(
            self.col as i32 * CELL_WIDTH as i32,
            self.row as i32 * CELL_HEIGHT as i32,
        )
    }

    pub fn target(&self) -> &D {
        &self.target
    }
}

impl<D: DrawTarget> CharacterDisplay for TextDisplay<D> {
    type Error = D::Error;

    async fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error> {
        self.col = col;
        self.row = row;
        Ok(())
    }

    async fn write_str(&mut self, text: &str) -> Result<(), Self::Error> {
        let origin = self.cell_origin();
        let cells = text.chars().count() as u32;
        let area = Rectangle::new(origin, Size::new(cells * CELL_WIDTH, CELL_HEIGHT));
        self.target.fill_solid(&area, self.background)?;

        let style = MonoTextStyle::new(&FONT_6X10, self.foreground);
        Text::with_baseline(text, origin, style, Baseline::Top).draw(&mut self.target)?;

        self.col = self.col.saturating_add(cells.min(u8::MAX as u32) as u8);
        Ok(())
    }
}
