//! Text layout and rasterization over a [`BitmapFont`].
//!
//! The layout walks characters left to right with a single running cursor. Kerning is looked up
//! against the previous character, glyphs resolve through the font's fallback chain, and the
//! cursor advances by `xAdvance + letterSpacing`. The trailing `letterSpacing` is not part of the
//! text width because spacing only sits between glyphs.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::font::glyph::{BitmapFont, Glyph};
use crate::foundation::core::Rgb8;
use crate::foundation::math::{blend_over_straight, mul_div255_u8};

/// Upper bound on the width of a rendered text strip; wider layouts are cut off on the right.
pub const MAX_TEXT_WIDTH: u32 = 1 << 16;

/// A contiguous run of text drawn in one color.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub text: String,
    pub color: Rgb8,
}

impl TextSegment {
    pub fn new(text: impl Into<String>, color: Rgb8) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Placement<'a> {
    glyph: &'a Glyph,
    x: i64,
    color: Rgb8,
}

#[derive(Debug, Default)]
struct Layout<'a> {
    placements: Vec<Placement<'a>>,
    width: i64,
}

impl BitmapFont {
    /// Width in pixels that [`BitmapFont::render_text`] would produce, before the 1px minimum
    /// and the [`MAX_TEXT_WIDTH`] cap.
    pub fn text_width(&self, text: &str, letter_spacing: i32) -> i64 {
        self.layout(
            std::iter::once((text, Rgb8::WHITE)),
            letter_spacing,
        )
        .width
    }

    /// Render `text` into a tightly packed strip `textWidth x lineHeight`.
    ///
    /// Empty text (or text whose glyphs all resolve to nothing) yields a transparent
    /// `1 x lineHeight` bitmap.
    pub fn render_text(&self, text: &str, color: Rgb8, letter_spacing: i32) -> RgbaImage {
        let layout = self.layout(std::iter::once((text, color)), letter_spacing);
        self.rasterize(&layout)
    }

    /// Render several colored runs sharing one cursor, so kerning spans color changes.
    pub fn render_segments(&self, segments: &[TextSegment], letter_spacing: i32) -> RgbaImage {
        let layout = self.layout(
            segments.iter().map(|s| (s.text.as_str(), s.color)),
            letter_spacing,
        );
        self.rasterize(&layout)
    }

    fn layout<'a, 's>(
        &'a self,
        runs: impl Iterator<Item = (&'s str, Rgb8)>,
        letter_spacing: i32,
    ) -> Layout<'a> {
        let mut out = Layout::default();
        let mut cursor: i64 = 0;
        let mut prev: Option<char> = None;

        for (text, color) in runs {
            for ch in text.chars() {
                if let Some(p) = prev {
                    cursor += i64::from(self.kerning(p as u32, ch as u32));
                }
                prev = Some(ch);

                let Some(glyph) = self.resolve_glyph(ch) else {
                    continue;
                };
                out.placements.push(Placement {
                    glyph,
                    x: cursor + i64::from(glyph.x_offset),
                    color,
                });
                cursor += i64::from(glyph.x_advance) + i64::from(letter_spacing);
            }
        }

        out.width = if out.placements.is_empty() {
            0
        } else {
            cursor - i64::from(letter_spacing)
        };
        out
    }

    fn rasterize(&self, layout: &Layout<'_>) -> RgbaImage {
        let width = u32::try_from(layout.width.max(1))
            .unwrap_or(u32::MAX)
            .min(MAX_TEXT_WIDTH);
        if i64::from(width) < layout.width {
            tracing::warn!(width = layout.width, "text strip truncated to {MAX_TEXT_WIDTH}px");
        }
        let height = self.line_height();
        let mut out = RgbaImage::new(width, height);
        for p in &layout.placements {
            draw_glyph(
                &mut out,
                self.atlas(),
                p.glyph,
                p.x,
                i64::from(p.glyph.y_offset),
                p.color,
            );
        }
        out
    }
}

/// Copy the glyph's atlas rectangle into `dst` at `(dx, dy)`, tinted by `color` and clipped.
fn draw_glyph(dst: &mut RgbaImage, atlas: &RgbaImage, g: &Glyph, dx: i64, dy: i64, color: Rgb8) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (aw, ah) = (atlas.width(), atlas.height());

    for gy in 0..g.height {
        let sy = g.y + gy;
        let ty = dy + i64::from(gy);
        if sy >= ah || ty < 0 || ty >= dh {
            continue;
        }
        for gx in 0..g.width {
            let sx = g.x + gx;
            let tx = dx + i64::from(gx);
            if sx >= aw || tx < 0 || tx >= dw {
                continue;
            }
            let src = tint(*atlas.get_pixel(sx, sy), color);
            if src[3] == 0 {
                continue;
            }
            let d = dst.get_pixel_mut(tx as u32, ty as u32);
            *d = blend_over_straight(*d, src);
        }
    }
}

/// Per-channel linear scale by `color / 255`, keeping the atlas alpha mask.
pub(crate) fn tint(px: Rgba<u8>, color: Rgb8) -> Rgba<u8> {
    if color.is_white() {
        return px;
    }
    let [r, g, b, a] = px.0;
    Rgba([
        mul_div255_u8(u16::from(r), u16::from(color.r)),
        mul_div255_u8(u16::from(g), u16::from(color.g)),
        mul_div255_u8(u16::from(b), u16::from(color.b)),
        a,
    ])
}

#[cfg(test)]
#[path = "../../tests/unit/font/layout.rs"]
mod tests;
