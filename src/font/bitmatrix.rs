//! Packed bit-matrix fonts.
//!
//! Each character is a list of integer rows; bit `n` set means the pixel `n` columns from the
//! glyph's highest used bit is lit. Every glyph is trimmed to its own `[minBit, maxBit]` extent
//! and all glyphs are drawn white into a synthesized atlas, 16 cells per row.

use std::collections::HashMap;
use std::path::Path;

use image::{Rgba, RgbaImage};
use serde::Deserialize;

use crate::font::glyph::{BitmapFont, Glyph};
use crate::font::source::{FontFormat, FontSource};
use crate::foundation::error::{LedSignError, LedSignResult};

pub const ATLAS_COLUMNS: u32 = 16;
pub const DEFAULT_LETTERSPACE: i32 = 1;
pub const MAX_LETTERSPACE: i32 = 10;

#[derive(Clone, Copy, Debug, Default)]
pub struct BitMatrixSource;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BitMatrixDef {
    #[serde(default, alias = "height")]
    line_height: Option<u32>,
    #[serde(default)]
    letterspace: Option<i32>,
    #[serde(default)]
    space_width: Option<u32>,
    chars: HashMap<String, Vec<u64>>,
}

/// Horizontal bit extent `(min, max)` of a glyph, `None` when no bit is set.
pub fn bit_extent(rows: &[u64]) -> Option<(u32, u32)> {
    let mask = rows.iter().fold(0u64, |acc, r| acc | r);
    if mask == 0 {
        return None;
    }
    Some((mask.trailing_zeros(), 63 - mask.leading_zeros()))
}

fn parse_char_key(key: &str) -> LedSignResult<u32> {
    let mut it = key.chars();
    match (it.next(), it.next()) {
        (Some(c), None) => Ok(c as u32),
        _ => key.trim().parse::<u32>().map_err(|_| {
            LedSignError::format(format!(
                "bit-matrix key '{key}' must be one character or a decimal codepoint"
            ))
        }),
    }
}

struct Parsed {
    codepoint: u32,
    rows: Vec<u64>,
    extent: Option<(u32, u32)>,
}

impl Parsed {
    fn width(&self) -> u32 {
        self.extent.map_or(0, |(lo, hi)| hi - lo + 1)
    }
}

impl FontSource for BitMatrixSource {
    fn format(&self) -> FontFormat {
        FontFormat::BitMatrix
    }

    fn parse(&self, name: &str, bytes: &[u8], _base_dir: &Path) -> LedSignResult<BitmapFont> {
        let def: BitMatrixDef = serde_json::from_slice(bytes)
            .map_err(|e| LedSignError::format(format!("bit-matrix font json: {e}")))?;
        synthesize(name, def)
    }
}

fn synthesize(name: &str, def: BitMatrixDef) -> LedSignResult<BitmapFont> {
    let mut chars = Vec::with_capacity(def.chars.len());
    for (key, rows) in def.chars {
        let codepoint = parse_char_key(&key)?;
        let extent = bit_extent(&rows);
        chars.push(Parsed {
            codepoint,
            rows,
            extent,
        });
    }
    // HashMap order is arbitrary; atlas placement must not be.
    chars.sort_by_key(|c| c.codepoint);

    let tallest = chars.iter().map(|c| c.rows.len() as u32).max().unwrap_or(0);
    let line_height = match def.line_height {
        Some(h) if h > 0 => h,
        _ => tallest,
    }
    .max(1);

    let letterspace = match def.letterspace {
        None => DEFAULT_LETTERSPACE,
        Some(v) if (0..=MAX_LETTERSPACE).contains(&v) => v,
        Some(v) => {
            tracing::warn!(font = name, letterspace = v, "invalid letterspace hint, using 1");
            DEFAULT_LETTERSPACE
        }
    };
    let space_width = def.space_width.unwrap_or((line_height / 3).max(1));

    let cell_w = chars.iter().map(Parsed::width).max().unwrap_or(0).max(1);
    let cell_h = line_height.max(tallest);
    let atlas_rows = (chars.len() as u32).div_ceil(ATLAS_COLUMNS).max(1);
    let atlas_cols = (chars.len() as u32).clamp(1, ATLAS_COLUMNS);
    let mut atlas = RgbaImage::new(cell_w * atlas_cols, cell_h * atlas_rows);

    let mut glyphs = Vec::with_capacity(chars.len());
    for (i, c) in chars.iter().enumerate() {
        let i = i as u32;
        let ox = (i % ATLAS_COLUMNS) * cell_w;
        let oy = (i / ATLAS_COLUMNS) * cell_h;
        let width = c.width();

        if let Some((_, hi)) = c.extent {
            for (ry, row) in c.rows.iter().enumerate() {
                for col in 0..width {
                    if row & (1u64 << (hi - col)) != 0 {
                        atlas.put_pixel(ox + col, oy + ry as u32, Rgba([255, 255, 255, 255]));
                    }
                }
            }
        }

        let x_advance = if c.extent.is_some() {
            width as i32 + letterspace
        } else {
            space_width as i32
        };
        glyphs.push(Glyph {
            id: c.codepoint,
            x: ox,
            y: oy,
            width,
            height: c.rows.len() as u32,
            x_offset: 0,
            y_offset: 0,
            x_advance,
        });
    }

    Ok(BitmapFont::new(
        name,
        line_height,
        line_height,
        atlas,
        glyphs,
        std::iter::empty(),
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/font/bitmatrix.rs"]
mod tests;
