use chrono::NaiveDateTime;
use image::RgbaImage;

use crate::content::item::{Alignment, ContentItem};
use crate::font::registry::FontRegistry;
use crate::foundation::error::{LedSignError, LedSignResult};
use crate::led::matrix::PixelMatrix;
use crate::settings::{DisplaySettings, clamp_letter_spacing};

/// Horizontal offset of a `content`-wide strip inside `panel` cells. May be negative when the
/// strip is wider than the panel; the overflow is clipped.
pub fn aligned_x(alignment: Alignment, panel: u32, content: u32) -> i64 {
    let (p, c) = (i64::from(panel), i64::from(content));
    match alignment {
        Alignment::Left => 0,
        Alignment::Center => (p - c).div_euclid(2),
        Alignment::Right => p - c,
    }
}

/// Render `item` into a panel-sized color matrix.
#[tracing::instrument(skip_all, fields(font = %item.font))]
pub fn compose(
    item: &ContentItem,
    registry: &FontRegistry,
    settings: &DisplaySettings,
    now: NaiveDateTime,
) -> LedSignResult<PixelMatrix> {
    let font = registry
        .get(&item.font)
        .ok_or_else(|| LedSignError::validation(format!("unknown font '{}'", item.font)))?;
    let segments = item.resolve_segments(now)?;
    let strip = font.render_segments(&segments, clamp_letter_spacing(settings.letter_spacing));

    let (w, h) = (settings.matrix_width(), settings.matrix_height());
    let mut out = RgbaImage::new(w, h);
    let ox = aligned_x(item.alignment, w, strip.width());
    let oy = (i64::from(h) - i64::from(strip.height())).div_euclid(2);
    image::imageops::overlay(&mut out, &strip, ox, oy);
    tracing::debug!(strip_w = strip.width(), ox, oy, "composed content");
    Ok(PixelMatrix::Color(out))
}

#[cfg(test)]
#[path = "../../tests/unit/content/compose.rs"]
mod tests;
