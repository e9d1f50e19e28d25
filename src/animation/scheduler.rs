//! Global frame scheduler.
//!
//! One background thread produces [`AnimationTick`]s at a fixed rate. Per tick the registered render
//! callback runs on that thread; its frame is delivered as a [`FrameEvent`] over an `mpsc` channel
//! whose receiver lives on the consumer's (UI) side. State changes travel the same channel.

use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use image::RgbaImage;

use crate::animation::cancel::CancelToken;
use crate::foundation::error::{LedSignError, LedSignResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SchedulerState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Per-iteration timing. `delta_time` is clamped to [`SchedulerConfig::max_delta`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationTick {
    pub delta_time: Duration,
    pub total_time: Duration,
    pub frame_number: u64,
}

#[derive(Clone, Debug)]
pub enum FrameEvent {
    Frame {
        frame: Arc<RgbaImage>,
        frame_number: u64,
        render_time_ms: f64,
    },
    StateChanged(SchedulerState),
}

/// Renders one frame for a tick. `Ok(None)` means "nothing to show this tick".
pub type RenderCallback =
    Box<dyn FnMut(&AnimationTick) -> LedSignResult<Option<RgbaImage>> + Send + 'static>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchedulerConfig {
    pub frame_interval: Duration,
    pub max_delta: Duration,
    pub pause_poll: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_micros(16_667),
            max_delta: Duration::from_millis(100),
            pause_poll: Duration::from_millis(50),
        }
    }
}

#[derive(Default)]
struct Shared {
    state: SchedulerState,
    callback: Option<RenderCallback>,
    // Bumped whenever the callback slot is replaced, so a tick never restores a stale callback.
    callback_generation: u64,
    total_time: Duration,
    frame_number: u64,
}

struct Worker {
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

/// Start/stop/pause/resume control over the background tick loop.
pub struct FrameScheduler {
    config: SchedulerConfig,
    shared: Arc<Mutex<Shared>>,
    events: mpsc::Sender<FrameEvent>,
    worker: Option<Worker>,
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl FrameScheduler {
    /// Create a stopped scheduler and the receiving end of its event stream.
    pub fn new(config: SchedulerConfig) -> (Self, mpsc::Receiver<FrameEvent>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                config,
                shared: Arc::new(Mutex::new(Shared::default())),
                events: tx,
                worker: None,
            },
            rx,
        )
    }

    pub fn state(&self) -> SchedulerState {
        lock(&self.shared).state
    }

    pub fn total_time(&self) -> Duration {
        lock(&self.shared).total_time
    }

    pub fn frame_number(&self) -> u64 {
        lock(&self.shared).frame_number
    }

    pub fn set_render_callback(
        &self,
        callback: impl FnMut(&AnimationTick) -> LedSignResult<Option<RgbaImage>> + Send + 'static,
    ) {
        let mut s = lock(&self.shared);
        s.callback = Some(Box::new(callback));
        s.callback_generation += 1;
    }

    pub fn clear_render_callback(&self) {
        let mut s = lock(&self.shared);
        s.callback = None;
        s.callback_generation += 1;
    }

    /// Reset counters and begin ticking. A running scheduler is stopped first.
    pub fn start(&mut self) -> LedSignResult<()> {
        if self.worker.is_some() || self.state() != SchedulerState::Stopped {
            self.stop();
        }
        {
            let mut s = lock(&self.shared);
            s.total_time = Duration::ZERO;
            s.frame_number = 0;
            s.state = SchedulerState::Playing;
        }

        self.notify(SchedulerState::Playing);

        let cancel = CancelToken::new();
        let ctx = LoopCtx {
            config: self.config,
            shared: self.shared.clone(),
            events: self.events.clone(),
            cancel: cancel.clone(),
        };
        let handle = std::thread::Builder::new()
            .name("ledsign-frame-scheduler".to_owned())
            .spawn(move || ctx.run())
            .map_err(|e| {
                lock(&self.shared).state = SchedulerState::Stopped;
                self.notify(SchedulerState::Stopped);
                LedSignError::Other(anyhow::Error::new(e).context("spawn frame scheduler thread"))
            })?;
        self.worker = Some(Worker { cancel, handle });
        tracing::debug!("frame scheduler started");
        Ok(())
    }

    /// Cancel the loop, wait for it, and reset counters. Safe to call repeatedly, and from inside
    /// the render callback (the loop is then only signalled, not joined).
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.cancel();
            if worker.handle.thread().id() == std::thread::current().id() {
                tracing::debug!("stop requested from scheduler thread; not joining");
            } else if worker.handle.join().is_err() {
                tracing::warn!("frame scheduler thread panicked");
            }
        }
        let prev = {
            let mut s = lock(&self.shared);
            let prev = s.state;
            s.state = SchedulerState::Stopped;
            s.total_time = Duration::ZERO;
            s.frame_number = 0;
            prev
        };
        if prev != SchedulerState::Stopped {
            tracing::debug!("frame scheduler stopped");
            self.notify(SchedulerState::Stopped);
        }
    }

    /// Suspend tick production without resetting counters.
    pub fn pause(&self) {
        if self.transition(SchedulerState::Playing, SchedulerState::Paused) {
            self.notify(SchedulerState::Paused);
        }
    }

    pub fn resume(&self) {
        if self.transition(SchedulerState::Paused, SchedulerState::Playing) {
            self.notify(SchedulerState::Playing);
        }
    }

    fn transition(&self, from: SchedulerState, to: SchedulerState) -> bool {
        let mut s = lock(&self.shared);
        if s.state != from {
            return false;
        }
        s.state = to;
        tracing::debug!(?from, ?to, "frame scheduler state change");
        true
    }

    fn notify(&self, state: SchedulerState) {
        // A dropped receiver only means nobody is watching.
        let _ = self.events.send(FrameEvent::StateChanged(state));
    }
}

impl Drop for FrameScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

struct LoopCtx {
    config: SchedulerConfig,
    shared: Arc<Mutex<Shared>>,
    events: mpsc::Sender<FrameEvent>,
    cancel: CancelToken,
}

impl LoopCtx {
    fn run(self) {
        let mut last = Instant::now();
        loop {
            if self.cancel.is_cancelled() {
                break;
            }
            let iteration_start = Instant::now();

            let tick = {
                let mut s = lock(&self.shared);
                if s.state != SchedulerState::Playing {
                    drop(s);
                    if self.cancel.sleep(self.config.pause_poll) {
                        break;
                    }
                    // Paused time is not simulated time.
                    last = Instant::now();
                    continue;
                }
                let delta = iteration_start
                    .saturating_duration_since(last)
                    .min(self.config.max_delta);
                last = iteration_start;
                s.total_time += delta;
                s.frame_number += 1;
                AnimationTick {
                    delta_time: delta,
                    total_time: s.total_time,
                    frame_number: s.frame_number,
                }
            };

            if let Some((frame, render_time_ms)) = self.render(&tick) {
                let _ = self.events.send(FrameEvent::Frame {
                    frame: Arc::new(frame),
                    frame_number: tick.frame_number,
                    render_time_ms,
                });
            }

            let wait = self
                .config
                .frame_interval
                .saturating_sub(iteration_start.elapsed());
            if self.cancel.sleep(wait) {
                break;
            }
        }
    }

    /// Run the callback outside the lock; errors and panics are logged and swallowed.
    fn render(&self, tick: &AnimationTick) -> Option<(RgbaImage, f64)> {
        let (mut callback, generation) = {
            let mut s = lock(&self.shared);
            (s.callback.take()?, s.callback_generation)
        };

        let started = Instant::now();
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| callback(tick)));
        let render_time_ms = started.elapsed().as_secs_f64() * 1000.0;

        {
            let mut s = lock(&self.shared);
            if s.callback.is_none() && s.callback_generation == generation {
                s.callback = Some(callback);
            }
        }

        match result {
            Ok(Ok(frame)) => frame.map(|f| (f, render_time_ms)),
            Ok(Err(err)) => {
                tracing::warn!(frame = tick.frame_number, error = %err, "render callback failed");
                None
            }
            Err(_) => {
                tracing::warn!(frame = tick.frame_number, "render callback panicked");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/scheduler.rs"]
mod tests;
