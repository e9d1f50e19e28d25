//! Timed playback of a single entry or exit effect.
//!
//! [`play_effect`] drives progress from elapsed wall time and calls the render closure once per
//! frame. [`spawn_effect_playback`] runs the same loop on its own short-lived thread.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::animation::cancel::CancelToken;
use crate::effects::config::EffectConfig;
use crate::foundation::error::{LedSignError, LedSignResult};

/// Sleep between playback frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The last frame was rendered at progress 1.
    Completed,
    /// Cancellation stopped the loop; no final frame was produced.
    Cancelled,
}

/// Run one effect to completion on the calling thread.
///
/// Instant effects render once at progress `1.0` and return. Animated effects render at
/// `min(1, elapsed / duration)` every [`FRAME_INTERVAL`] until progress reaches 1.
pub fn play_effect(
    config: &EffectConfig,
    cancel: &CancelToken,
    mut render: impl FnMut(f64),
) -> PlaybackOutcome {
    if cancel.is_cancelled() {
        return PlaybackOutcome::Cancelled;
    }
    if config.effect_type.is_instant() {
        render(1.0);
        return PlaybackOutcome::Completed;
    }

    let duration_ms = config.duration_ms() as f64;
    let started = Instant::now();
    loop {
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let progress = (elapsed_ms / duration_ms).min(1.0);
        render(progress);
        if progress >= 1.0 {
            return PlaybackOutcome::Completed;
        }
        if cancel.sleep(FRAME_INTERVAL) {
            tracing::debug!(progress, "effect playback cancelled");
            return PlaybackOutcome::Cancelled;
        }
    }
}

/// Handle to an effect running on a background thread.
#[derive(Debug)]
pub struct EffectPlayback {
    cancel: CancelToken,
    handle: JoinHandle<PlaybackOutcome>,
}

impl EffectPlayback {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the playback thread and report how it ended.
    pub fn join(self) -> LedSignResult<PlaybackOutcome> {
        self.handle
            .join()
            .map_err(|_| LedSignError::render("effect playback thread panicked"))
    }
}

pub fn spawn_effect_playback(
    config: EffectConfig,
    render: impl FnMut(f64) + Send + 'static,
) -> LedSignResult<EffectPlayback> {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    let handle = std::thread::Builder::new()
        .name("ledsign-effect".to_owned())
        .spawn(move || play_effect(&config, &token, render))
        .map_err(|e| LedSignError::Other(anyhow::Error::new(e).context("spawn effect thread")))?;
    Ok(EffectPlayback { cancel, handle })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/playback.rs"]
mod tests;
