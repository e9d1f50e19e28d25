//! Simulated LED wear: dead pixels on binary panels, dead or dimmed pixels on color panels.

use image::{Rgba, RgbaImage};

use crate::led::matrix::{BitMatrix, PixelMatrix, is_color_pixel_on};
use crate::settings::clamp_aging_percent;

/// Dimmed LEDs keep this fraction range of their original brightness.
pub const DIM_RANGE: (f64, f64) = (0.3, 0.5);

/// Build the generator for one aging pass.
pub fn aging_rng(seed: Option<u64>) -> fastrand::Rng {
    match seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    }
}

/// `floor(total * percent / 100)` with `percent` clamped to `[0, 5]`.
pub fn dead_pixel_quota(total: usize, percent: f64) -> usize {
    let percent = clamp_aging_percent(percent);
    ((total as f64) * percent / 100.0).floor() as usize
}

/// Age a matrix in place. Returns how many pixels were affected.
pub fn apply_aging(matrix: &mut PixelMatrix, percent: f64, rng: &mut fastrand::Rng) -> usize {
    match matrix {
        PixelMatrix::Binary(m) => age_binary(m, percent, rng),
        PixelMatrix::Color(img) => age_color(img, percent, rng),
    }
}

/// Turn lit pixels off at uniformly random coordinates until the quota is met.
/// Picks that land on an unlit pixel are retried.
pub fn age_binary(m: &mut BitMatrix, percent: f64, rng: &mut fastrand::Rng) -> usize {
    let total = m.width() as usize * m.height() as usize;
    let target = dead_pixel_quota(total, percent).min(m.lit_count());
    let mut killed = 0;
    while killed < target {
        let x = rng.u32(0..m.width());
        let y = rng.u32(0..m.height());
        if m.get(x, y) {
            m.set(x, y, false);
            killed += 1;
        }
    }
    killed
}

/// Each chosen lit pixel is extinguished or dimmed to 30-50% with equal odds.
pub fn age_color(img: &mut RgbaImage, percent: f64, rng: &mut fastrand::Rng) -> usize {
    let (w, h) = img.dimensions();
    let total = w as usize * h as usize;
    let lit = img.pixels().filter(|p| is_color_pixel_on(**p)).count();
    let target = dead_pixel_quota(total, percent).min(lit);

    let mut touched = vec![false; total];
    let mut affected = 0;
    while affected < target {
        let x = rng.u32(0..w);
        let y = rng.u32(0..h);
        let idx = y as usize * w as usize + x as usize;
        let px = *img.get_pixel(x, y);
        if touched[idx] || !is_color_pixel_on(px) {
            continue;
        }
        touched[idx] = true;
        affected += 1;

        if rng.bool() {
            img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
        } else {
            let f = DIM_RANGE.0 + rng.f64() * (DIM_RANGE.1 - DIM_RANGE.0);
            let dim = |c: u8| (f64::from(c) * f).round().clamp(0.0, 255.0) as u8;
            img.put_pixel(x, y, Rgba([dim(px[0]), dim(px[1]), dim(px[2]), px[3]]));
        }
    }
    affected
}

#[cfg(test)]
#[path = "../../tests/unit/led/aging.rs"]
mod tests;
