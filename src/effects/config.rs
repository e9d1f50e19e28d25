use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectType {
    #[default]
    Immediate,
    SlideIn,
    FadeIn,
    None,
}

impl EffectType {
    /// Effects that complete in a single frame.
    pub fn is_instant(self) -> bool {
        matches!(self, Self::Immediate | Self::None)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Left,
    Right,
    Up,
    Down,
}

/// Entry or exit transition attached to a content item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectConfig {
    pub effect_type: EffectType,
    pub speed_ms: u64,
    pub direction: Direction,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            effect_type: EffectType::Immediate,
            speed_ms: 500,
            direction: Direction::Left,
        }
    }
}

impl EffectConfig {
    pub fn new(effect_type: EffectType, speed_ms: u64, direction: Direction) -> Self {
        Self {
            effect_type,
            speed_ms,
            direction,
        }
    }

    /// Playback duration; never shorter than 1 ms.
    pub fn duration_ms(&self) -> u64 {
        self.speed_ms.max(1)
    }
}
