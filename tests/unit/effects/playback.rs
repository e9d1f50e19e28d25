use super::*;
use crate::effects::config::{Direction, EffectType};
use std::sync::{Arc, Mutex};

#[test]
fn instant_effects_render_once_at_full_progress() {
    for t in [EffectType::Immediate, EffectType::None] {
        let mut seen = Vec::new();
        let cfg = EffectConfig::new(t, 10_000, Direction::Left);
        let outcome = play_effect(&cfg, &CancelToken::new(), |p| seen.push(p));
        assert_eq!(outcome, PlaybackOutcome::Completed);
        assert_eq!(seen, vec![1.0]);
    }
}

#[test]
fn animated_effect_progress_is_monotonic_and_ends_at_one() {
    let mut seen = Vec::new();
    let cfg = EffectConfig::new(EffectType::FadeIn, 60, Direction::Left);
    let started = Instant::now();
    let outcome = play_effect(&cfg, &CancelToken::new(), |p| seen.push(p));
    assert_eq!(outcome, PlaybackOutcome::Completed);
    assert!(started.elapsed() >= Duration::from_millis(60));
    assert!(seen.len() >= 2);
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    assert!(seen.iter().all(|p| (0.0..=1.0).contains(p)));
    assert_eq!(seen.last().copied(), Some(1.0));
}

#[test]
fn zero_speed_still_terminates() {
    let mut seen = Vec::new();
    let cfg = EffectConfig::new(EffectType::SlideIn, 0, Direction::Up);
    let outcome = play_effect(&cfg, &CancelToken::new(), |p| seen.push(p));
    assert_eq!(outcome, PlaybackOutcome::Completed);
    assert_eq!(seen.last().copied(), Some(1.0));
}

#[test]
fn pre_cancelled_token_renders_nothing() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let mut calls = 0;
    let cfg = EffectConfig::new(EffectType::Immediate, 500, Direction::Left);
    assert_eq!(play_effect(&cfg, &cancel, |_| calls += 1), PlaybackOutcome::Cancelled);
    assert_eq!(calls, 0);
}

#[test]
fn cancel_stops_background_playback_without_final_frame() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let cfg = EffectConfig::new(EffectType::SlideIn, 60_000, Direction::Right);
    let playback = spawn_effect_playback(cfg, move |p| sink.lock().unwrap().push(p)).unwrap();

    std::thread::sleep(Duration::from_millis(40));
    playback.cancel();
    assert_eq!(playback.join().unwrap(), PlaybackOutcome::Cancelled);

    let seen = seen.lock().unwrap();
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|p| *p < 1.0));
}

#[test]
fn background_playback_completes() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let cfg = EffectConfig::new(EffectType::FadeIn, 30, Direction::Left);
    let playback = spawn_effect_playback(cfg, move |p| sink.lock().unwrap().push(p)).unwrap();
    assert_eq!(playback.join().unwrap(), PlaybackOutcome::Completed);
    assert_eq!(seen.lock().unwrap().last().copied(), Some(1.0));
}
