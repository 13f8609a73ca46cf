pub mod oled;

use crate::collectors::SystemSnapshot;
use embedded_graphics::{
    mono_font::{
        ascii::{FONT_5X8, FONT_6X10},
        MonoFont, MonoTextStyle,
    },
    pixelcolor::BinaryColor,
    prelude::*,
    text::{Baseline, Text},
};
use thiserror::Error;

pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 32;

const LEFT_COLUMN: i32 = 0;
const RIGHT_COLUMN: i32 = 65;
const ROW_TOP: i32 = 0;
const ROW_MIDDLE: i32 = 11;
const ROW_BOTTOM: i32 = 22;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to open I2C bus {path}: {reason}")]
    Bus { path: String, reason: String },
    #[error("failed to initialise panel: {0}")]
    Init(String),
    #[error("failed to clear frame: {0}")]
    Clear(String),
    #[error("failed to draw '{text}': {reason}")]
    Draw { text: String, reason: String },
    #[error("failed to flush frame: {0}")]
    Flush(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontKind {
    Primary,
    Small,
}

impl FontKind {
    pub fn mono_font(self) -> &'static MonoFont<'static> {
        match self {
            FontKind::Primary => &FONT_6X10,
            FontKind::Small => &FONT_5X8,
        }
    }
}

/// A piece of text anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextItem {
    pub text: String,
    pub position: Point,
    pub font: FontKind,
}

impl TextItem {
    fn new(text: String, x: i32, y: i32, font: FontKind) -> Self {
        Self {
            text,
            position: Point::new(x, y),
            font,
        }
    }

    /// Draws in the single "on" colour of the monochrome panel.
    pub fn draw<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = MonoTextStyle::new(self.font.mono_font(), BinaryColor::On);
        Text::with_baseline(&self.text, self.position, style, Baseline::Top).draw(target)?;
        Ok(())
    }
}

/// Three rows, two columns; the bottom row is the IP in the small font.
pub fn layout(snapshot: &SystemSnapshot) -> [TextItem; 5] {
    [
        TextItem::new(
            format!("CPU:{:.0}%", snapshot.cpu_percent),
            LEFT_COLUMN,
            ROW_TOP,
            FontKind::Primary,
        ),
        TextItem::new(
            format!("RAM:{:.0}%", snapshot.ram_percent),
            RIGHT_COLUMN,
            ROW_TOP,
            FontKind::Primary,
        ),
        TextItem::new(
            format!("Temp:{}", snapshot.cpu_temp),
            LEFT_COLUMN,
            ROW_MIDDLE,
            FontKind::Primary,
        ),
        TextItem::new(
            format!("Up:{}", snapshot.uptime),
            RIGHT_COLUMN,
            ROW_MIDDLE,
            FontKind::Primary,
        ),
        TextItem::new(
            format!("IP:{}", snapshot.ip),
            LEFT_COLUMN,
            ROW_BOTTOM,
            FontKind::Small,
        ),
    ]
}

/// Something that can show one frame of text at a time.
pub trait Surface {
    /// Starts a fresh, blank off-screen frame.
    fn begin_frame(&mut self) -> Result<(), DisplayError>;
    fn draw_text(&mut self, item: &TextItem) -> Result<(), DisplayError>;
    /// Pushes the off-screen frame to the panel.
    fn commit(&mut self) -> Result<(), DisplayError>;
    /// Leaves the panel dark.
    fn blank(&mut self) -> Result<(), DisplayError>;
}

/// Scoped draw transaction. Dropping it without `commit` discards the frame
/// and the panel keeps showing the previous one.
pub struct Frame<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> Frame<'a, S> {
    pub fn begin(surface: &'a mut S) -> Result<Self, DisplayError> {
        surface.begin_frame()?;
        Ok(Self { surface })
    }

    pub fn text(&mut self, item: &TextItem) -> Result<(), DisplayError> {
        self.surface.draw_text(item)
    }

    pub fn commit(self) -> Result<(), DisplayError> {
        self.surface.commit()
    }
}

pub fn render<S: Surface + ?Sized>(
    surface: &mut S,
    snapshot: &SystemSnapshot,
) -> Result<(), DisplayError> {
    let mut frame = Frame::begin(surface)?;
    for item in layout(snapshot).iter() {
        frame.text(item)?;
    }
    frame.commit()
}
