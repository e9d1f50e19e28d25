//! Pure progress -> (transform, opacity) mapping for entry and exit effects.

use kurbo::Size;

use crate::effects::config::{Direction, EffectConfig, EffectType};
use crate::foundation::core::Transform2D;
use crate::foundation::math::sanitize_unit;

/// Geometry and opacity for one frame of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectFrame {
    pub transform: Transform2D,
    pub opacity: u8,
}

impl EffectFrame {
    pub const VISIBLE: Self = Self {
        transform: Transform2D::IDENTITY,
        opacity: 255,
    };
}

/// `NaN`/`-inf` -> 0, `+inf` -> 1, otherwise clamped to `[0, 1]`.
pub fn sanitize_progress(progress: f64) -> f64 {
    sanitize_unit(progress)
}

/// Entry-effect frame at `progress` for content of size `bounds`.
pub fn entry_frame(
    effect_type: EffectType,
    direction: Direction,
    progress: f64,
    bounds: Size,
) -> EffectFrame {
    let p = sanitize_progress(progress);
    match effect_type {
        EffectType::Immediate | EffectType::None => EffectFrame::VISIBLE,
        EffectType::SlideIn => {
            let remaining = 1.0 - p;
            let (x, y) = match direction {
                Direction::Left => (-bounds.width * remaining, 0.0),
                Direction::Right => (bounds.width * remaining, 0.0),
                Direction::Up => (0.0, -bounds.height * remaining),
                Direction::Down => (0.0, bounds.height * remaining),
            };
            EffectFrame {
                transform: Transform2D::translation(x, y),
                opacity: 255,
            }
        }
        EffectType::FadeIn => EffectFrame {
            transform: Transform2D::IDENTITY,
            opacity: (255.0 * p).round().clamp(0.0, 255.0) as u8,
        },
    }
}

/// Exit effects run the entry mapping backwards: fully visible at 0, entry-start look at 1.
pub fn exit_frame(
    effect_type: EffectType,
    direction: Direction,
    progress: f64,
    bounds: Size,
) -> EffectFrame {
    entry_frame(
        effect_type,
        direction,
        1.0 - sanitize_progress(progress),
        bounds,
    )
}

impl EffectConfig {
    pub fn entry_frame(&self, progress: f64, bounds: Size) -> EffectFrame {
        entry_frame(self.effect_type, self.direction, progress, bounds)
    }

    pub fn exit_frame(&self, progress: f64, bounds: Size) -> EffectFrame {
        exit_frame(self.effect_type, self.direction, progress, bounds)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transitions.rs"]
mod tests;
