//! ledsign renders pixel-accurate previews of LED destination-sign panels.
//!
//! The pipeline for one preview frame:
//!
//! - **Compose**: a [`ContentItem`] (text, clock, date, countdown) is rasterized with a
//!   [`BitmapFont`] and placed into a logical [`PixelMatrix`] the size of the panel.
//! - **Simulate**: [`LedRenderer`] turns each logical cell into a round or square LED dot, emulating
//!   pitch, color family, brightness, inversion and aging.
//! - **Post-process**: optional glow, then the entry/exit [`EffectFrame`] and preview zoom.
//!
//! [`SignPreview`] runs the whole chain; [`FrameScheduler`] drives it at a fixed tick rate on a
//! background thread and delivers [`FrameEvent`]s over a channel.
#![forbid(unsafe_code)]

mod foundation;

pub mod animation;
pub mod content;
pub mod effects;
pub mod font;
pub mod led;
pub mod preview;
pub mod settings;

pub use crate::foundation::core::{Affine, Point, Rect, Rgb8, Transform2D, Vec2};
pub use crate::foundation::error::{LedSignError, LedSignResult};

pub use crate::animation::cancel::CancelToken;
pub use crate::animation::scheduler::{
    AnimationTick, FrameEvent, FrameScheduler, RenderCallback, SchedulerConfig, SchedulerState,
};
pub use crate::content::compose::compose;
pub use crate::content::item::{Alignment, ContentItem, ContentKind};
pub use crate::effects::apply::apply_effect_frame;
pub use crate::effects::config::{Direction, EffectConfig, EffectType};
pub use crate::effects::playback::{
    EffectPlayback, PlaybackOutcome, play_effect, spawn_effect_playback,
};
pub use crate::effects::transitions::{EffectFrame, entry_frame, exit_frame, sanitize_progress};
pub use crate::font::glyph::{BitmapFont, Glyph};
pub use crate::font::layout::TextSegment;
pub use crate::font::registry::FontRegistry;
pub use crate::font::source::{FontFormat, FontSource, load_font_file};
pub use crate::led::matrix::{BitMatrix, CellRect, PixelMatrix};
pub use crate::led::renderer::{LedRenderer, placeholder_bitmap};
pub use crate::preview::{SignPreview, TransitionPhase};
pub use crate::settings::{
    BorderSettings, ColorType, DisplaySettings, LedShape, Pitch, ZoomLevel,
};
