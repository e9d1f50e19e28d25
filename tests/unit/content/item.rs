use super::*;
use chrono::{NaiveDate, TimeDelta};

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 9)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[test]
fn clock_and_date_use_defaults_and_custom_formats() {
    let now = at(7, 5, 9);
    let clock = ContentItem::new(ContentKind::Clock { format: None }, "f");
    assert_eq!(clock.resolve_text(now).unwrap(), "07:05");

    let clock = ContentItem::new(
        ContentKind::Clock {
            format: Some("%H:%M:%S".to_owned()),
        },
        "f",
    );
    assert_eq!(clock.resolve_text(now).unwrap(), "07:05:09");

    let date = ContentItem::new(ContentKind::Date { format: None }, "f");
    assert_eq!(date.resolve_text(now).unwrap(), "09.03.2026");
}

#[test]
fn invalid_strftime_is_validation_error() {
    let item = ContentItem::new(
        ContentKind::Clock {
            format: Some("%Q".to_owned()),
        },
        "f",
    );
    assert!(matches!(
        item.resolve_text(at(0, 0, 0)),
        Err(LedSignError::Validation(_))
    ));
}

#[test]
fn countdown_formats_remaining_and_clamps_at_zero() {
    let target = at(12, 0, 0);
    let item = ContentItem::new(
        ContentKind::Countdown {
            target,
            format: None,
        },
        "f",
    );
    assert_eq!(item.resolve_text(at(10, 58, 30)).unwrap(), "01:01:30");
    assert_eq!(item.resolve_text(at(12, 0, 1)).unwrap(), "00:00:00");
}

#[test]
fn countdown_tokens() {
    let d = TimeDelta::seconds(2 * 86_400 + 3 * 3600 + 4 * 60 + 5);
    assert_eq!(format_countdown(d, "{d}d {h}h {mm}:{ss}"), "2d 3h 04:05");
    assert_eq!(format_countdown(d, "{h}:{m}:{s}"), "51:4:5");
    assert_eq!(format_countdown(TimeDelta::seconds(-10), "{hh}:{mm}"), "00:00");
}

#[test]
fn rich_text_flattens_and_keeps_segment_colors() {
    let item = ContentItem::new(
        ContentKind::RichText {
            segments: vec![
                TextSegment::new("12 ", Rgb8::new(255, 0, 0)),
                TextSegment::new("Hbf", Rgb8::WHITE),
            ],
        },
        "f",
    );
    assert_eq!(item.resolve_text(at(0, 0, 0)).unwrap(), "12 Hbf");
    let segs = item.resolve_segments(at(0, 0, 0)).unwrap();
    assert_eq!(segs.len(), 2);
    assert_eq!(segs[0].color, Rgb8::new(255, 0, 0));

    let plain = ContentItem::text("Depot", "f").with_color(Rgb8::new(1, 2, 3));
    assert_eq!(
        plain.resolve_segments(at(0, 0, 0)).unwrap(),
        vec![TextSegment::new("Depot", Rgb8::new(1, 2, 3))]
    );
}

#[test]
fn item_json_fills_defaults() {
    let json = r#"{"kind":"text","text":"Ring","font":"small","alignment":"left",
        "entry":{"effectType":"slide_in","speedMs":300,"direction":"up"}}"#;
    let item: ContentItem = serde_json::from_str(json).unwrap();
    assert_eq!(item.kind, ContentKind::Text { text: "Ring".to_owned() });
    assert_eq!(item.alignment, Alignment::Left);
    assert_eq!(item.color, Rgb8::WHITE);
    assert_eq!(item.entry.speed_ms, 300);
    assert_eq!(item.exit, EffectConfig::default());
}
