pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y).min(255) as u8
}

/// Scale `c` by `percent` (0..=100), rounding to nearest.
pub(crate) fn scale_percent_u8(c: u8, percent: u8) -> u8 {
    ((u32::from(c) * u32::from(percent.min(100)) + 50) / 100) as u8
}

/// Straight-alpha source-over for a single pixel.
pub(crate) fn blend_over_straight(dst: image::Rgba<u8>, src: image::Rgba<u8>) -> image::Rgba<u8> {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    let da = u32::from(dst[3]);
    if sa == 255 || da == 0 {
        return src;
    }

    // out_a = sa + da * (1 - sa), all in 0..=255 units.
    let inv = 255 - sa;
    let out_a = sa * 255 + da * inv;
    if out_a == 0 {
        return image::Rgba([0, 0, 0, 0]);
    }
    let mut out = [0u8; 4];
    for c in 0..3 {
        let v = u32::from(src[c]) * sa * 255 + u32::from(dst[c]) * da * inv;
        out[c] = ((v + out_a / 2) / out_a).min(255) as u8;
    }
    out[3] = ((out_a + 127) / 255).min(255) as u8;
    image::Rgba(out)
}

/// Map `NaN`/`-inf` to 0, `+inf` to 1, everything else clamped to `[0, 1]`.
pub(crate) fn sanitize_unit(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
