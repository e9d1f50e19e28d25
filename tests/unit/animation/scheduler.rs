use super::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

fn fast_config() -> SchedulerConfig {
    SchedulerConfig {
        frame_interval: Duration::from_millis(2),
        max_delta: Duration::from_millis(100),
        pause_poll: Duration::from_millis(5),
    }
}

fn next_frame(rx: &mpsc::Receiver<FrameEvent>) -> u64 {
    loop {
        match rx.recv_timeout(Duration::from_secs(5)) {
            Ok(FrameEvent::Frame { frame_number, .. }) => return frame_number,
            Ok(FrameEvent::StateChanged(_)) => continue,
            Err(e) => panic!("no frame arrived: {e}"),
        }
    }
}

#[test]
fn new_scheduler_is_stopped_with_zero_counters() {
    let (sched, _rx) = FrameScheduler::new(SchedulerConfig::default());
    assert_eq!(sched.state(), SchedulerState::Stopped);
    assert_eq!(sched.frame_number(), 0);
    assert_eq!(sched.total_time(), Duration::ZERO);
}

#[test]
fn start_delivers_frames_in_order() {
    let (mut sched, rx) = FrameScheduler::new(fast_config());
    sched.set_render_callback(|tick| Ok(Some(RgbaImage::new(2, 1 + (tick.frame_number % 2) as u32))));
    sched.start().unwrap();
    assert_eq!(sched.state(), SchedulerState::Playing);

    let a = next_frame(&rx);
    let b = next_frame(&rx);
    assert!(a >= 1);
    assert!(b > a);
    sched.stop();
}

#[test]
fn pause_and_resume_keep_counters_stop_resets_them() {
    let (mut sched, rx) = FrameScheduler::new(fast_config());
    sched.set_render_callback(|_| Ok(Some(RgbaImage::new(1, 1))));
    sched.start().unwrap();
    next_frame(&rx);
    next_frame(&rx);

    sched.pause();
    assert_eq!(sched.state(), SchedulerState::Paused);
    std::thread::sleep(Duration::from_millis(30));
    let frozen = sched.frame_number();
    let frozen_time = sched.total_time();
    assert!(frozen >= 2);
    std::thread::sleep(Duration::from_millis(30));
    assert_eq!(sched.frame_number(), frozen);
    assert_eq!(sched.total_time(), frozen_time);

    while rx.try_recv().is_ok() {}
    sched.resume();
    assert_eq!(sched.state(), SchedulerState::Playing);
    let after = next_frame(&rx);
    assert!(after > frozen);

    sched.stop();
    assert_eq!(sched.state(), SchedulerState::Stopped);
    assert_eq!(sched.frame_number(), 0);
    assert_eq!(sched.total_time(), Duration::ZERO);

    sched.stop();
    assert_eq!(sched.state(), SchedulerState::Stopped);
}

#[test]
fn pause_and_resume_are_noops_in_wrong_state() {
    let (sched, _rx) = FrameScheduler::new(fast_config());
    sched.pause();
    assert_eq!(sched.state(), SchedulerState::Stopped);
    sched.resume();
    assert_eq!(sched.state(), SchedulerState::Stopped);
}

#[test]
fn failing_or_panicking_callback_does_not_kill_loop() {
    let (mut sched, rx) = FrameScheduler::new(fast_config());
    let calls = Arc::new(AtomicU64::new(0));
    let seen = calls.clone();
    sched.set_render_callback(move |tick| {
        seen.fetch_add(1, Ordering::SeqCst);
        match tick.frame_number % 3 {
            1 => Err(LedSignError::render("boom")),
            2 => panic!("callback panic"),
            _ => Ok(Some(RgbaImage::new(1, 1))),
        }
    });
    sched.start().unwrap();

    let n = next_frame(&rx);
    assert_eq!(n % 3, 0);
    assert!(calls.load(Ordering::SeqCst) >= 3);
    assert_eq!(sched.state(), SchedulerState::Playing);
    sched.stop();
}

#[test]
fn state_changes_are_published() {
    let (mut sched, rx) = FrameScheduler::new(fast_config());
    sched.start().unwrap();
    sched.pause();
    sched.resume();
    sched.stop();

    let states: Vec<SchedulerState> = rx
        .try_iter()
        .filter_map(|e| match e {
            FrameEvent::StateChanged(s) => Some(s),
            FrameEvent::Frame { .. } => None,
        })
        .collect();
    assert_eq!(
        states,
        vec![
            SchedulerState::Playing,
            SchedulerState::Paused,
            SchedulerState::Playing,
            SchedulerState::Stopped,
        ]
    );
}

#[test]
fn ticks_clamp_delta_and_accumulate_total_time() {
    let (mut sched, rx) = FrameScheduler::new(SchedulerConfig {
        max_delta: Duration::from_millis(1),
        ..fast_config()
    });
    let ticks = Arc::new(Mutex::new(Vec::new()));
    let sink = ticks.clone();
    sched.set_render_callback(move |tick| {
        sink.lock().unwrap().push(*tick);
        Ok(Some(RgbaImage::new(1, 1)))
    });
    sched.start().unwrap();
    next_frame(&rx);
    next_frame(&rx);
    next_frame(&rx);
    sched.stop();

    let ticks = ticks.lock().unwrap();
    assert!(ticks.len() >= 3);
    let mut total = Duration::ZERO;
    for t in ticks.iter() {
        assert!(t.delta_time <= Duration::from_millis(1));
        total += t.delta_time;
        assert_eq!(t.total_time, total);
    }
}

#[test]
fn restart_resets_frame_numbers() {
    let (mut sched, rx) = FrameScheduler::new(fast_config());
    sched.set_render_callback(|_| Ok(Some(RgbaImage::new(1, 1))));
    sched.start().unwrap();
    next_frame(&rx);
    next_frame(&rx);
    next_frame(&rx);

    sched.start().unwrap();
    // Drain anything produced by the first run.
    let first_after_restart = loop {
        match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            FrameEvent::StateChanged(SchedulerState::Playing) => break next_frame(&rx),
            _ => continue,
        }
    };
    assert_eq!(first_after_restart, 1);
    sched.stop();
}
