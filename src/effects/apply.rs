use image::{Rgba, RgbaImage};
use kurbo::Point;

use crate::effects::transitions::EffectFrame;
use crate::foundation::math::mul_div255_u8;

/// Apply an effect frame to a bitmap of the same size.
///
/// Pixels are sampled through the inverse transform at pixel centers; anything mapped from outside
/// the source is transparent. Alpha is scaled by `opacity / 255`.
pub fn apply_effect_frame(src: &RgbaImage, frame: EffectFrame) -> RgbaImage {
    let (w, h) = src.dimensions();
    if frame == EffectFrame::VISIBLE || w == 0 || h == 0 {
        return src.clone();
    }
    if frame.opacity == 0 {
        return RgbaImage::new(w, h);
    }

    let inv = frame.transform.to_affine().inverse();
    let mut out = RgbaImage::new(w, h);
    for (x, y, d) in out.enumerate_pixels_mut() {
        let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        let (sx, sy) = (p.x.floor(), p.y.floor());
        if sx < 0.0 || sy < 0.0 || sx >= f64::from(w) || sy >= f64::from(h) {
            continue;
        }
        let s = src.get_pixel(sx as u32, sy as u32);
        *d = Rgba([
            s[0],
            s[1],
            s[2],
            mul_div255_u8(u16::from(s[3]), u16::from(frame.opacity)),
        ]);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/effects/apply.rs"]
mod tests;
