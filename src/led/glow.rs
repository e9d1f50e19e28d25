//! Light-bloom post-process: separable Gaussian blur screened under the sharp panel.

use image::RgbaImage;

use crate::foundation::error::{LedSignError, LedSignResult};
use crate::foundation::math::mul_div255_u8;

/// Blur radius for a given brightness: `2 + brightness / 100 * 8`.
pub fn glow_radius(brightness: u8) -> u32 {
    let b = f64::from(brightness.min(100));
    (2.0 + b / 100.0 * 8.0).round() as u32
}

/// Cached Gaussian kernel; rebuilt only when the requested radius changes.
#[derive(Clone, Debug, Default)]
pub struct GlowFilter {
    radius: u32,
    kernel: Vec<u32>,
    rebuilds: u64,
}

impl GlowFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the kernel has been (re)built.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    fn kernel_for(&mut self, radius: u32) -> LedSignResult<&[u32]> {
        if self.kernel.is_empty() || self.radius != radius {
            let sigma = (radius as f32 / 2.0).max(1.0);
            self.kernel = gaussian_kernel_q16(radius, sigma)?;
            self.radius = radius;
            self.rebuilds += 1;
            tracing::debug!(radius, "rebuilt glow kernel");
        }
        Ok(&self.kernel)
    }

    /// Blur `src` with the brightness-derived radius and screen the blur under it.
    ///
    /// Only the color channels are blurred; the rendered panel is opaque, so alpha is kept as is.
    pub fn apply(&mut self, src: &RgbaImage, brightness: u8) -> LedSignResult<RgbaImage> {
        let (w, h) = src.dimensions();
        if w == 0 || h == 0 {
            return Ok(RgbaImage::new(1, 1));
        }
        let kernel = self.kernel_for(glow_radius(brightness))?;
        let blurred = convolve_rgb(&convolve_rgb(src, kernel, Axis::X), kernel, Axis::Y);

        let mut out = src.clone();
        for (d, b) in out.pixels_mut().zip(blurred.pixels()) {
            for c in 0..3 {
                d[c] = screen(d[c], b[c]);
            }
        }
        Ok(out)
    }
}

fn screen(a: u8, b: u8) -> u8 {
    let prod = mul_div255_u8(u16::from(a), u16::from(b));
    (u16::from(a) + u16::from(b) - u16::from(prod)).min(255) as u8
}

const Q16_ONE: u32 = 1 << 16;

/// Symmetric `2 * radius + 1` tap Gaussian in Q16 whose taps sum to exactly [`Q16_ONE`].
fn gaussian_kernel_q16(radius: u32, sigma: f32) -> LedSignResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![Q16_ONE]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(LedSignError::render("glow sigma must be positive and finite"));
    }

    let two_sigma_sq = 2.0 * f64::from(sigma).powi(2);
    // One side of the bell, distance 0..=radius.
    let half: Vec<f64> = (0..=radius)
        .map(|d| (-f64::from(d).powi(2) / two_sigma_sq).exp())
        .collect();
    let total = half[0] + 2.0 * half[1..].iter().sum::<f64>();

    let side: Vec<u32> = half[1..]
        .iter()
        .map(|w| ((w / total) * f64::from(Q16_ONE)).round() as u32)
        .collect();
    let center = Q16_ONE.saturating_sub(2 * side.iter().sum::<u32>());

    Ok(side
        .iter()
        .rev()
        .copied()
        .chain(std::iter::once(center))
        .chain(side.iter().copied())
        .collect())
}

#[derive(Clone, Copy, Debug)]
enum Axis {
    X,
    Y,
}

/// One separable pass over the RGB channels with edge clamping.
fn convolve_rgb(src: &RgbaImage, taps: &[u32], axis: Axis) -> RgbaImage {
    let (w, h) = src.dimensions();
    let radius = (taps.len() / 2) as i64;
    let (w_max, h_max) = (i64::from(w) - 1, i64::from(h) - 1);

    RgbaImage::from_fn(w, h, |x, y| {
        let mut acc = [0u64; 3];
        for (i, &tap) in taps.iter().enumerate() {
            let off = i as i64 - radius;
            let (sx, sy) = match axis {
                Axis::X => ((i64::from(x) + off).clamp(0, w_max), i64::from(y)),
                Axis::Y => (i64::from(x), (i64::from(y) + off).clamp(0, h_max)),
            };
            let p = src.get_pixel(sx as u32, sy as u32);
            for (a, &c) in acc.iter_mut().zip(&p.0[..3]) {
                *a += u64::from(tap) * u64::from(c);
            }
        }
        let [r, g, b] = acc.map(|a| ((a + u64::from(Q16_ONE / 2)) >> 16).min(255) as u8);
        image::Rgba([r, g, b, src.get_pixel(x, y)[3]])
    })
}

#[cfg(test)]
#[path = "../../tests/unit/led/glow.rs"]
mod tests;
