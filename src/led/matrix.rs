use image::{Rgba, RgbaImage};

use crate::settings::BorderSettings;

/// Row-major lit/unlit grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitMatrix {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl BitMatrix {
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, false)
    }

    pub fn filled(width: u32, height: u32, lit: bool) -> Self {
        Self {
            width,
            height,
            bits: vec![lit; width as usize * height as usize],
        }
    }

    /// Build from text rows where any non-space, non-`.` character is lit.
    /// Short rows are padded unlit.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut out = Self::new(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                out.set(x as u32, y as u32, c != ' ' && c != '.');
            }
        }
        out
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Out-of-bounds reads are unlit.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.index(x, y).is_some_and(|i| self.bits[i])
    }

    /// Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, lit: bool) {
        if let Some(i) = self.index(x, y) {
            self.bits[i] = lit;
        }
    }

    pub fn lit_count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }
}

/// Logical pixel matrix fed to the LED renderer.
#[derive(Clone, Debug, PartialEq)]
pub enum PixelMatrix {
    Binary(BitMatrix),
    Color(RgbaImage),
}

impl PixelMatrix {
    pub fn width(&self) -> u32 {
        match self {
            Self::Binary(m) => m.width(),
            Self::Color(img) => img.width(),
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Self::Binary(m) => m.height(),
            Self::Color(img) => img.height(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// A color pixel is "on" unless fully transparent or pure black.
pub fn is_color_pixel_on(px: Rgba<u8>) -> bool {
    let [r, g, b, a] = px.0;
    a != 0 && (r | g | b) != 0
}

/// Integer rectangle in logical cells; may extend past the matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRect {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl CellRect {
    pub fn new(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle covering the whole matrix.
    pub fn of(matrix: &PixelMatrix) -> Self {
        Self::new(0, 0, matrix.width(), matrix.height())
    }

    /// Shrink by `padding` on every side.
    pub fn inset(self, padding: u32) -> Self {
        let p = i64::from(padding);
        Self {
            x: self.x + p,
            y: self.y + p,
            width: self.width.saturating_sub(padding.saturating_mul(2)),
            height: self.height.saturating_sub(padding.saturating_mul(2)),
        }
    }
}

fn paint(matrix: &mut PixelMatrix, x: i64, y: i64, color: Rgba<u8>) {
    if x < 0 || y < 0 || x >= i64::from(matrix.width()) || y >= i64::from(matrix.height()) {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    match matrix {
        PixelMatrix::Binary(m) => m.set(x, y, true),
        PixelMatrix::Color(img) => img.put_pixel(x, y, color),
    }
}

/// Paint `horizontalLines` rows at the top and bottom of `rect` and `verticalLines` columns at
/// its left and right, clipped to the matrix. Padding is the caller's job (see [`CellRect::inset`]).
pub fn draw_border(matrix: &mut PixelMatrix, rect: CellRect, border: &BorderSettings) {
    if !border.is_enabled || rect.width == 0 || rect.height == 0 {
        return;
    }
    let color = border.color.to_rgba(255);
    let (w, h) = (i64::from(rect.width), i64::from(rect.height));

    for i in 0..i64::from(border.horizontal_lines).min(h) {
        for dx in 0..w {
            paint(matrix, rect.x + dx, rect.y + i, color);
            paint(matrix, rect.x + dx, rect.y + h - 1 - i, color);
        }
    }
    for i in 0..i64::from(border.vertical_lines).min(w) {
        for dy in 0..h {
            paint(matrix, rect.x + i, rect.y + dy, color);
            paint(matrix, rect.x + w - 1 - i, rect.y + dy, color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/led/matrix.rs"]
mod tests;
