//! End-to-end preview pipeline: content -> logical matrix -> LED bitmap -> glow -> effect -> zoom.

use chrono::NaiveDateTime;
use image::RgbaImage;
use image::imageops::FilterType;
use kurbo::Size;

use crate::animation::scheduler::{AnimationTick, RenderCallback};
use crate::content::compose::compose;
use crate::content::item::ContentItem;
use crate::effects::apply::apply_effect_frame;
use crate::effects::transitions::EffectFrame;
use crate::font::registry::FontRegistry;
use crate::foundation::error::LedSignResult;
use crate::led::matrix::{CellRect, draw_border};
use crate::led::renderer::LedRenderer;
use crate::settings::{BorderSettings, DisplaySettings, ZoomLevel};

/// Which of an item's transitions is in effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransitionPhase {
    Entry(f64),
    Visible,
    Exit(f64),
}

impl TransitionPhase {
    fn frame(self, item: &ContentItem, bounds: Size) -> EffectFrame {
        match self {
            Self::Entry(p) => item.entry.entry_frame(p, bounds),
            Self::Visible => EffectFrame::VISIBLE,
            Self::Exit(p) => item.exit.exit_frame(p, bounds),
        }
    }
}

#[derive(Debug)]
pub struct SignPreview {
    registry: FontRegistry,
    settings: DisplaySettings,
    border: BorderSettings,
    renderer: LedRenderer,
    zoom: ZoomLevel,
    glow: bool,
}

impl SignPreview {
    pub fn new(registry: FontRegistry, settings: DisplaySettings) -> Self {
        Self {
            registry,
            settings: settings.sanitized(),
            border: BorderSettings::default(),
            renderer: LedRenderer::new(),
            zoom: ZoomLevel::default(),
            glow: false,
        }
    }

    pub fn registry(&self) -> &FontRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: DisplaySettings) {
        self.settings = settings.sanitized();
    }

    pub fn set_border(&mut self, border: BorderSettings) {
        self.border = border;
    }

    pub fn zoom(&self) -> ZoomLevel {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: ZoomLevel) {
        self.zoom = zoom;
    }

    pub fn glow_enabled(&self) -> bool {
        self.glow
    }

    pub fn set_glow(&mut self, enabled: bool) {
        self.glow = enabled;
    }

    pub fn renderer(&self) -> &LedRenderer {
        &self.renderer
    }

    /// Produce the final preview bitmap of `item` at wall time `now`.
    #[tracing::instrument(skip(self, item, now))]
    pub fn render_item(
        &mut self,
        item: &ContentItem,
        phase: TransitionPhase,
        now: NaiveDateTime,
    ) -> LedSignResult<RgbaImage> {
        let mut matrix = compose(item, &self.registry, &self.settings, now)?;
        if self.border.is_enabled {
            let rect = CellRect::of(&matrix).inset(self.border.padding);
            draw_border(&mut matrix, rect, &self.border);
        }

        let mut bitmap = self.renderer.render(&matrix, &self.settings);
        if self.glow {
            bitmap = self.renderer.apply_glow(&bitmap, self.settings.brightness)?;
        }

        let bounds = Size::new(f64::from(bitmap.width()), f64::from(bitmap.height()));
        let bitmap = apply_effect_frame(&bitmap, phase.frame(item, bounds));
        Ok(self.zoomed(bitmap))
    }

    fn zoomed(&self, bitmap: RgbaImage) -> RgbaImage {
        if self.zoom == ZoomLevel::default() {
            return bitmap;
        }
        let w = self.zoom.scale_len(bitmap.width());
        let h = self.zoom.scale_len(bitmap.height());
        image::imageops::resize(&bitmap, w, h, FilterType::Nearest)
    }

    /// Scheduler callback that plays `item`'s entry effect from the first tick, then holds it
    /// visible. The clock for clock/date/countdown content is `clock()`.
    pub fn into_render_callback(
        mut self,
        item: ContentItem,
        mut clock: impl FnMut() -> NaiveDateTime + Send + 'static,
    ) -> RenderCallback {
        Box::new(move |tick: &AnimationTick| {
            let phase = entry_phase(&item, tick);
            self.render_item(&item, phase, clock()).map(Some)
        })
    }
}

fn entry_phase(item: &ContentItem, tick: &AnimationTick) -> TransitionPhase {
    if item.entry.effect_type.is_instant() {
        return TransitionPhase::Visible;
    }
    let elapsed_ms = tick.total_time.as_secs_f64() * 1000.0;
    let p = elapsed_ms / item.entry.duration_ms() as f64;
    if p >= 1.0 {
        TransitionPhase::Visible
    } else {
        TransitionPhase::Entry(p)
    }
}

#[cfg(test)]
#[path = "../tests/unit/preview.rs"]
mod tests;
