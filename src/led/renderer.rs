use image::{Rgba, RgbaImage};
use kurbo::{Circle, Point, Rect, Shape as _};

use crate::foundation::core::Rgb8;
use crate::foundation::error::LedSignResult;
use crate::foundation::math::mul_div255_u8;
use crate::led::aging::{aging_rng, apply_aging};
use crate::led::glow::GlowFilter;
use crate::led::matrix::{PixelMatrix, is_color_pixel_on};
use crate::settings::{ColorType, DisplaySettings, LedShape, apply_brightness};

/// Output bitmaps larger than this many pixels are refused and replaced by the placeholder.
pub const MAX_OUTPUT_PIXELS: u64 = 64 * 1024 * 1024;

/// Size of one rendered LED inside its cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedGeometry {
    pub pixel_size: u32,
    pub led_diameter: f64,
    pub shape: LedShape,
}

impl LedGeometry {
    pub fn for_settings(settings: &DisplaySettings) -> Self {
        Self {
            pixel_size: settings.pixel_size,
            led_diameter: f64::from(settings.pixel_size) * settings.led_ratio(),
            shape: settings.shape,
        }
    }

    pub fn led_radius(&self) -> f64 {
        self.led_diameter / 2.0
    }

    /// Which output pixels of a `pixel_size` cell are covered by the LED, sampled at pixel centers.
    pub fn cell_mask(&self) -> Vec<bool> {
        let ps = self.pixel_size;
        let center = Point::new(f64::from(ps) / 2.0, f64::from(ps) / 2.0);
        let circle = Circle::new(center, self.led_radius());
        let square = Rect::from_center_size(center, (self.led_diameter, self.led_diameter));

        let mut mask = Vec::with_capacity((ps * ps) as usize);
        for y in 0..ps {
            for x in 0..ps {
                let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                mask.push(match self.shape {
                    LedShape::Round => circle.contains(p),
                    LedShape::Square => square.contains(p),
                });
            }
        }
        mask
    }
}

/// Minimal valid bitmap returned for degenerate input.
pub fn placeholder_bitmap() -> RgbaImage {
    RgbaImage::new(1, 1)
}

/// Converts logical pixel matrices into physical-look LED panel bitmaps.
///
/// Rendering itself is stateless; the renderer only owns the glow kernel cache.
#[derive(Clone, Debug, Default)]
pub struct LedRenderer {
    glow: GlowFilter,
}

impl LedRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glow_filter(&self) -> &GlowFilter {
        &self.glow
    }

    /// Render `matrix` as `width * pixelSize` x `height * pixelSize` LED dots.
    ///
    /// Aging (when `agingPercent > 0`) is applied to a copy of the matrix, never to the input.
    #[tracing::instrument(skip_all, fields(w = matrix.width(), h = matrix.height()))]
    pub fn render(&self, matrix: &PixelMatrix, settings: &DisplaySettings) -> RgbaImage {
        let settings = settings.sanitized();
        let geom = LedGeometry::for_settings(&settings);
        let (mw, mh) = (matrix.width(), matrix.height());
        let out_w = u64::from(mw) * u64::from(geom.pixel_size);
        let out_h = u64::from(mh) * u64::from(geom.pixel_size);
        if out_w == 0 || out_h == 0 {
            return placeholder_bitmap();
        }
        let within_cap = out_w <= u64::from(u32::MAX)
            && out_h <= u64::from(u32::MAX)
            && out_w
                .checked_mul(out_h)
                .is_some_and(|px| px <= MAX_OUTPUT_PIXELS);
        if !within_cap {
            tracing::warn!(out_w, out_h, "LED bitmap too large, returning placeholder");
            return placeholder_bitmap();
        }

        let aged;
        let matrix = if settings.aging_percent > 0.0 {
            let mut copy = matrix.clone();
            let mut rng = aging_rng(settings.aging_seed);
            let n = apply_aging(&mut copy, settings.aging_percent, &mut rng);
            tracing::debug!(affected = n, "applied aging");
            aged = copy;
            &aged
        } else {
            matrix
        };

        let bg = settings.background_color().to_rgba(255);
        let mut out = RgbaImage::from_pixel(out_w as u32, out_h as u32, bg);
        let mask = geom.cell_mask();
        let ps = geom.pixel_size;

        for cy in 0..mh {
            for cx in 0..mw {
                let color = cell_color(matrix, cx, cy, &settings).to_rgba(255);
                let (ox, oy) = (cx * ps, cy * ps);
                for (i, covered) in mask.iter().enumerate() {
                    if *covered {
                        let i = i as u32;
                        out.put_pixel(ox + i % ps, oy + i / ps, color);
                    }
                }
            }
        }
        out
    }

    /// Bloom post-process; the kernel is rebuilt only when the brightness-derived radius changes.
    pub fn apply_glow(&mut self, bitmap: &RgbaImage, brightness: u8) -> LedSignResult<RgbaImage> {
        self.glow.apply(bitmap, brightness)
    }
}

fn cell_color(matrix: &PixelMatrix, x: u32, y: u32, s: &DisplaySettings) -> Rgb8 {
    match matrix {
        PixelMatrix::Binary(m) => {
            if m.get(x, y) != s.invert_colors {
                s.lit_color()
            } else {
                s.off_color()
            }
        }
        PixelMatrix::Color(img) => {
            let px = *img.get_pixel(x, y);
            let on = is_color_pixel_on(px);
            match (on, s.invert_colors) {
                (true, false) => apply_brightness(color_pixel_hue(px, s), s.brightness),
                (false, true) => s.lit_color(),
                _ => s.off_color(),
            }
        }
    }
}

/// Panels that can mix primaries show the pixel's own color; single-hue panels show the
/// pixel's intensity in their fixed hue.
fn color_pixel_hue(px: Rgba<u8>, s: &DisplaySettings) -> Rgb8 {
    let [r, g, b, _] = px.0;
    match s.color_type {
        ColorType::FullRgb | ColorType::MixedPrimary => Rgb8::new(r, g, b),
        ColorType::Amber | ColorType::Red | ColorType::Green => {
            let level = u16::from(r.max(g).max(b));
            let base = s.color_type.base_color(s.custom_color);
            Rgb8::new(
                mul_div255_u8(u16::from(base.r), level),
                mul_div255_u8(u16::from(base.g), level),
                mul_div255_u8(u16::from(base.b), level),
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/led/renderer.rs"]
mod tests;
