use std::collections::HashMap;

use image::RgbaImage;

/// Codepoint slot used for a font's own "missing glyph" placeholder.
pub const MISSING_GLYPH_ID: u32 = 0;
/// Fixed placeholder character tried after the font's missing glyph.
pub const PLACEHOLDER_CODEPOINT: u32 = '?' as u32;
pub const SPACE_CODEPOINT: u32 = ' ' as u32;

/// Metrics of one character plus its rectangle in the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub id: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub x_offset: i32,
    pub y_offset: i32,
    pub x_advance: i32,
}

/// A loaded bitmap font: glyph table, kerning table and the atlas that owns the glyph pixels.
#[derive(Clone, Debug)]
pub struct BitmapFont {
    name: String,
    line_height: u32,
    baseline: u32,
    atlas: RgbaImage,
    glyphs: HashMap<u32, Glyph>,
    kernings: HashMap<(u32, u32), i32>,
}

impl BitmapFont {
    pub fn new(
        name: impl Into<String>,
        line_height: u32,
        baseline: u32,
        atlas: RgbaImage,
        glyphs: impl IntoIterator<Item = Glyph>,
        kernings: impl IntoIterator<Item = ((u32, u32), i32)>,
    ) -> Self {
        Self {
            name: name.into(),
            line_height: line_height.max(1),
            baseline,
            atlas,
            glyphs: glyphs.into_iter().map(|g| (g.id, g)).collect(),
            kernings: kernings.into_iter().filter(|(_, v)| *v != 0).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn line_height(&self) -> u32 {
        self.line_height
    }

    pub fn baseline(&self) -> u32 {
        self.baseline
    }

    pub fn atlas(&self) -> &RgbaImage {
        &self.atlas
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn glyph(&self, codepoint: u32) -> Option<&Glyph> {
        self.glyphs.get(&codepoint)
    }

    /// Exact-pair kerning; undefined pairs are 0.
    pub fn kerning(&self, first: u32, second: u32) -> i32 {
        self.kernings.get(&(first, second)).copied().unwrap_or(0)
    }

    /// Glyph for `ch`, falling back to the missing glyph, `?`, then space.
    pub fn resolve_glyph(&self, ch: char) -> Option<&Glyph> {
        [
            ch as u32,
            MISSING_GLYPH_ID,
            PLACEHOLDER_CODEPOINT,
            SPACE_CODEPOINT,
        ]
        .into_iter()
        .find_map(|cp| self.glyphs.get(&cp))
    }
}
