use std::fmt::Write as _;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::effects::config::EffectConfig;
use crate::font::layout::TextSegment;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{LedSignError, LedSignResult};

pub const DEFAULT_CLOCK_FORMAT: &str = "%H:%M";
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";
pub const DEFAULT_COUNTDOWN_FORMAT: &str = "{hh}:{mm}:{ss}";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// What a content item shows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentKind {
    Text {
        text: String,
    },
    RichText {
        segments: Vec<TextSegment>,
    },
    /// `chrono` strftime format, default [`DEFAULT_CLOCK_FORMAT`].
    Clock {
        #[serde(default)]
        format: Option<String>,
    },
    /// `chrono` strftime format, default [`DEFAULT_DATE_FORMAT`].
    Date {
        #[serde(default)]
        format: Option<String>,
    },
    /// Remaining time until `target`, see [`format_countdown`].
    Countdown {
        target: NaiveDateTime,
        #[serde(default)]
        format: Option<String>,
    },
}

/// One entry of a sign program: content plus its own entry and exit transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    #[serde(flatten)]
    pub kind: ContentKind,
    #[serde(default = "default_item_color")]
    pub color: Rgb8,
    #[serde(default)]
    pub alignment: Alignment,
    pub font: String,
    #[serde(default)]
    pub entry: EffectConfig,
    #[serde(default)]
    pub exit: EffectConfig,
}

fn default_item_color() -> Rgb8 {
    Rgb8::WHITE
}

impl ContentItem {
    pub fn new(kind: ContentKind, font: impl Into<String>) -> Self {
        Self {
            kind,
            color: Rgb8::WHITE,
            alignment: Alignment::default(),
            font: font.into(),
            entry: EffectConfig::default(),
            exit: EffectConfig::default(),
        }
    }

    pub fn text(text: impl Into<String>, font: impl Into<String>) -> Self {
        Self::new(ContentKind::Text { text: text.into() }, font)
    }

    pub fn with_color(mut self, color: Rgb8) -> Self {
        self.color = color;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_effects(mut self, entry: EffectConfig, exit: EffectConfig) -> Self {
        self.entry = entry;
        self.exit = exit;
        self
    }

    /// Display text at wall time `now`. Rich text is flattened to its plain characters.
    pub fn resolve_text(&self, now: NaiveDateTime) -> LedSignResult<String> {
        match &self.kind {
            ContentKind::Text { text } => Ok(text.clone()),
            ContentKind::RichText { segments } => {
                Ok(segments.iter().map(|s| s.text.as_str()).collect())
            }
            ContentKind::Clock { format } => {
                strftime(now, format.as_deref().unwrap_or(DEFAULT_CLOCK_FORMAT))
            }
            ContentKind::Date { format } => {
                strftime(now, format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT))
            }
            ContentKind::Countdown { target, format } => {
                let remaining = (*target - now).max(chrono::TimeDelta::zero());
                Ok(format_countdown(
                    remaining,
                    format.as_deref().unwrap_or(DEFAULT_COUNTDOWN_FORMAT),
                ))
            }
        }
    }

    /// Colored runs to draw. Only rich text carries per-segment colors.
    pub fn resolve_segments(&self, now: NaiveDateTime) -> LedSignResult<Vec<TextSegment>> {
        match &self.kind {
            ContentKind::RichText { segments } => Ok(segments.clone()),
            _ => Ok(vec![TextSegment::new(self.resolve_text(now)?, self.color)]),
        }
    }
}

fn strftime(now: NaiveDateTime, format: &str) -> LedSignResult<String> {
    let mut out = String::new();
    write!(out, "{}", now.format(format))
        .map_err(|_| LedSignError::validation(format!("invalid date/time format '{format}'")))?;
    Ok(out)
}

/// Expand countdown tokens: `{d}` days, `{h}`/`{hh}` hours, `{m}`/`{mm}` minutes and
/// `{s}`/`{ss}` seconds, doubled letters zero-padded to two digits.
///
/// Without a `{d}` token the hours are the total remaining hours, so nothing is lost.
pub fn format_countdown(remaining: chrono::TimeDelta, format: &str) -> String {
    let total = remaining.num_seconds().max(0);
    let (days, rem) = (total / 86_400, total % 86_400);
    let hours = if format.contains("{d}") {
        rem / 3600
    } else {
        total / 3600
    };
    let minutes = (rem % 3600) / 60;
    let seconds = rem % 60;

    format
        .replace("{d}", &days.to_string())
        .replace("{hh}", &format!("{hours:02}"))
        .replace("{h}", &hours.to_string())
        .replace("{mm}", &format!("{minutes:02}"))
        .replace("{m}", &minutes.to_string())
        .replace("{ss}", &format!("{seconds:02}"))
        .replace("{s}", &seconds.to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/content/item.rs"]
mod tests;
