use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgb8;
use crate::foundation::error::{LedSignError, LedSignResult};

/// LED color family of the physical panel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorType {
    /// Single-hue amber modules.
    #[default]
    Amber,
    /// Single-hue red modules.
    Red,
    /// Single-hue green modules.
    Green,
    /// One red, one green and one blue die per pixel, driven together as white.
    MixedPrimary,
    /// Full RGB modules; lit color is the user-selected [`DisplaySettings::custom_color`].
    FullRgb,
}

impl ColorType {
    pub const AMBER: Rgb8 = Rgb8::new(255, 176, 0);
    pub const RED: Rgb8 = Rgb8::new(255, 0, 0);
    pub const GREEN: Rgb8 = Rgb8::new(0, 255, 0);

    /// Unscaled color of a lit LED.
    pub fn base_color(self, custom: Rgb8) -> Rgb8 {
        match self {
            Self::Amber => Self::AMBER,
            Self::Red => Self::RED,
            Self::Green => Self::GREEN,
            Self::MixedPrimary => Rgb8::WHITE,
            Self::FullRgb => custom,
        }
    }
}

/// Standard center-to-center LED spacings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pitch {
    #[serde(rename = "P2.5")]
    P2_5,
    P3,
    P4,
    P5,
    P6,
    P8,
    #[default]
    P10,
    P16,
    /// Diameter ratio taken from [`DisplaySettings::custom_pitch_ratio`].
    Custom,
}

impl Pitch {
    pub const ALL: [Self; 9] = [
        Self::P2_5,
        Self::P3,
        Self::P4,
        Self::P5,
        Self::P6,
        Self::P8,
        Self::P10,
        Self::P16,
        Self::Custom,
    ];

    /// Logical cells per panel cell; P10 is the 1x baseline.
    pub fn resolution_multiplier(self) -> u32 {
        match self {
            Self::P2_5 => 4,
            Self::P3 | Self::P4 => 3,
            Self::P5 | Self::P6 => 2,
            Self::P8 | Self::P10 | Self::P16 | Self::Custom => 1,
        }
    }

    /// LED diameter as a fraction of the render cell. Denser pitches get relatively larger dots.
    /// Returns `None` for [`Pitch::Custom`].
    pub fn led_ratio(self) -> Option<f64> {
        Some(match self {
            Self::P2_5 => 0.90,
            Self::P3 => 0.85,
            Self::P4 => 0.80,
            Self::P5 => 0.75,
            Self::P6 => 0.70,
            Self::P8 => 0.65,
            Self::P10 => 0.60,
            Self::P16 => 0.50,
            Self::Custom => return None,
        })
    }

    pub fn millimeters(self) -> Option<f64> {
        Some(match self {
            Self::P2_5 => 2.5,
            Self::P3 => 3.0,
            Self::P4 => 4.0,
            Self::P5 => 5.0,
            Self::P6 => 6.0,
            Self::P8 => 8.0,
            Self::P10 => 10.0,
            Self::P16 => 16.0,
            Self::Custom => return None,
        })
    }
}

/// Shape of a single LED dot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedShape {
    Square,
    #[default]
    Round,
}

/// Physical-panel configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DisplaySettings {
    /// Logical cell count before the pitch multiplier.
    pub panel_width: u32,
    pub panel_height: u32,
    pub color_type: ColorType,
    pub custom_color: Rgb8,
    /// 0..=100
    #[serde(deserialize_with = "deserialize_percent")]
    pub brightness: u8,
    /// 0..=100
    #[serde(deserialize_with = "deserialize_percent")]
    pub background_darkness: u8,
    /// Render cell size in output pixels.
    pub pixel_size: u32,
    pub pitch: Pitch,
    /// Used only when `pitch` is [`Pitch::Custom`]; 0.3..=0.95.
    pub custom_pitch_ratio: f64,
    pub shape: LedShape,
    pub invert_colors: bool,
    /// 0..=5
    pub aging_percent: f64,
    /// Fixed seed for the aging simulation; `None` draws from an unseeded generator.
    pub aging_seed: Option<u64>,
    pub letter_spacing: i32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            panel_width: 96,
            panel_height: 16,
            color_type: ColorType::Amber,
            custom_color: Rgb8::WHITE,
            brightness: 100,
            background_darkness: 50,
            pixel_size: 4,
            pitch: Pitch::P10,
            custom_pitch_ratio: 0.6,
            shape: LedShape::Round,
            invert_colors: false,
            aging_percent: 0.0,
            aging_seed: None,
            letter_spacing: 1,
        }
    }
}

pub const MIN_PITCH_RATIO: f64 = 0.3;
pub const MAX_PITCH_RATIO: f64 = 0.95;
pub const MAX_AGING_PERCENT: f64 = 5.0;

pub(crate) fn clamp_pitch_ratio(v: f64) -> f64 {
    if v.is_nan() {
        return MIN_PITCH_RATIO;
    }
    v.clamp(MIN_PITCH_RATIO, MAX_PITCH_RATIO)
}

/// Accept any JSON number for a percentage and saturate it into `0..=100`.
fn deserialize_percent<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    let clamped = if raw.is_nan() { 0.0 } else { raw.round().clamp(0.0, 100.0) };
    if clamped != raw {
        tracing::warn!(value = raw, clamped, "percentage clamped into 0..=100");
    }
    Ok(clamped as u8)
}

pub const MAX_LETTER_SPACING: i32 = 64;

/// Letter spacing is kept within `-MAX_LETTER_SPACING..=MAX_LETTER_SPACING`.
pub(crate) fn clamp_letter_spacing(v: i32) -> i32 {
    v.clamp(-MAX_LETTER_SPACING, MAX_LETTER_SPACING)
}

pub(crate) fn clamp_aging_percent(v: f64) -> f64 {
    if v.is_nan() {
        return 0.0;
    }
    v.clamp(0.0, MAX_AGING_PERCENT)
}

impl DisplaySettings {
    /// Load settings from a JSON file and clamp them into range.
    pub fn from_path(path: impl AsRef<Path>) -> LedSignResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LedSignError::file_not_found(path));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read display settings '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> LedSignResult<Self> {
        let raw: Self = serde_json::from_str(text)
            .map_err(|e| LedSignError::format(format!("display settings: {e}")))?;
        Ok(raw.sanitized())
    }

    /// Copy with every bounded field clamped into its documented range.
    pub fn sanitized(&self) -> Self {
        let mut out = self.clone();
        if out.brightness > 100 {
            tracing::warn!(brightness = out.brightness, "brightness clamped to 100");
            out.brightness = 100;
        }
        if out.background_darkness > 100 {
            tracing::warn!(
                background_darkness = out.background_darkness,
                "background darkness clamped to 100"
            );
            out.background_darkness = 100;
        }
        let aging = clamp_aging_percent(out.aging_percent);
        if aging != out.aging_percent {
            tracing::warn!(aging_percent = out.aging_percent, "aging percent clamped");
            out.aging_percent = aging;
        }
        let ratio = clamp_pitch_ratio(out.custom_pitch_ratio);
        if ratio != out.custom_pitch_ratio {
            tracing::warn!(
                custom_pitch_ratio = out.custom_pitch_ratio,
                "custom pitch ratio clamped"
            );
            out.custom_pitch_ratio = ratio;
        }
        let spacing = clamp_letter_spacing(out.letter_spacing);
        if spacing != out.letter_spacing {
            tracing::warn!(letter_spacing = out.letter_spacing, "letter spacing clamped");
            out.letter_spacing = spacing;
        }
        out
    }

    pub fn matrix_width(&self) -> u32 {
        self.panel_width
            .saturating_mul(self.pitch.resolution_multiplier())
    }

    pub fn matrix_height(&self) -> u32 {
        self.panel_height
            .saturating_mul(self.pitch.resolution_multiplier())
    }

    /// LED diameter ratio; custom pitches use the clamped [`Self::custom_pitch_ratio`].
    pub fn led_ratio(&self) -> f64 {
        self.pitch
            .led_ratio()
            .unwrap_or_else(|| clamp_pitch_ratio(self.custom_pitch_ratio))
    }

    /// Configured lit color scaled by brightness.
    pub fn lit_color(&self) -> Rgb8 {
        apply_brightness(
            self.color_type.base_color(self.custom_color),
            self.brightness,
        )
    }

    /// Panel background gray: `backgroundDarkness * 10 / 100`.
    pub fn background_color(&self) -> Rgb8 {
        Rgb8::gray(background_intensity(self.background_darkness))
    }

    /// Color of an unlit LED: background intensity plus a fixed offset.
    pub fn off_color(&self) -> Rgb8 {
        Rgb8::gray(background_intensity(self.background_darkness).saturating_add(OFF_LED_OFFSET))
    }
}

/// Gray offset that keeps unlit LEDs distinguishable from the panel background.
pub const OFF_LED_OFFSET: u8 = 20;

fn background_intensity(darkness: u8) -> u8 {
    (u32::from(darkness.min(100)) * 10 / 100) as u8
}

/// Linear per-channel brightness scale; `<= 0` yields black and `>= 100` is a no-op.
pub fn apply_brightness(c: Rgb8, brightness: u8) -> Rgb8 {
    use crate::foundation::math::scale_percent_u8;

    if brightness == 0 {
        return Rgb8::BLACK;
    }
    if brightness >= 100 {
        return c;
    }
    Rgb8::new(
        scale_percent_u8(c.r, brightness),
        scale_percent_u8(c.g, brightness),
        scale_percent_u8(c.b, brightness),
    )
}

/// Border painted around a content rectangle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BorderSettings {
    pub is_enabled: bool,
    pub horizontal_lines: u32,
    pub vertical_lines: u32,
    /// Logical offset applied by the caller before drawing.
    pub padding: u32,
    pub color: Rgb8,
}

impl Default for BorderSettings {
    fn default() -> Self {
        Self {
            is_enabled: false,
            horizontal_lines: 1,
            vertical_lines: 1,
            padding: 0,
            color: ColorType::AMBER,
        }
    }
}

/// Preview zoom in percent, clamped to `[50, 400]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct ZoomLevel(u32);

impl ZoomLevel {
    pub const MIN: u32 = 50;
    pub const MAX: u32 = 400;

    pub fn new(percent: u32) -> Self {
        Self(percent.clamp(Self::MIN, Self::MAX))
    }

    pub fn percent(self) -> u32 {
        self.0
    }

    pub fn factor(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Scaled size of a `len`-pixel edge, never below 1.
    pub fn scale_len(self, len: u32) -> u32 {
        ((u64::from(len) * u64::from(self.0) + 50) / 100).max(1) as u32
    }
}

impl Default for ZoomLevel {
    fn default() -> Self {
        Self(100)
    }
}

impl From<u32> for ZoomLevel {
    fn from(v: u32) -> Self {
        Self::new(v)
    }
}

impl From<ZoomLevel> for u32 {
    fn from(v: ZoomLevel) -> Self {
        v.0
    }
}

#[cfg(test)]
#[path = "../tests/unit/settings/settings.rs"]
mod tests;
