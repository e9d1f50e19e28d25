use super::*;
use crate::font::glyph::MISSING_GLYPH_ID;

fn glyph(id: char, x: u32, width: u32, advance: i32) -> Glyph {
    Glyph {
        id: id as u32,
        x,
        y: 0,
        width,
        height: 4,
        x_offset: 0,
        y_offset: 0,
        x_advance: advance,
    }
}

fn test_font(extra: Vec<Glyph>) -> BitmapFont {
    let atlas = RgbaImage::from_pixel(16, 4, Rgba([255, 255, 255, 255]));
    let mut glyphs = vec![
        glyph('A', 0, 3, 4),
        glyph('V', 4, 3, 4),
        glyph(' ', 8, 0, 2),
    ];
    glyphs.extend(extra);
    BitmapFont::new(
        "test",
        4,
        4,
        atlas,
        glyphs,
        [((('A' as u32), ('V' as u32)), -1)],
    )
}

#[test]
fn width_is_advances_plus_kerning_minus_trailing_spacing() {
    let font = test_font(vec![]);
    // A(4) + kern(-1) + V(4) + 2 * spacing(2) - spacing(2)
    assert_eq!(font.text_width("AV", 2), 4 + 4 - 1 + 2);
    assert_eq!(font.text_width("VA", 2), 4 + 4 + 2);
    assert_eq!(font.text_width("A", 2), 4);
    assert_eq!(font.render_text("AV", Rgb8::WHITE, 2).width(), 9);
}

#[test]
fn empty_text_is_one_by_line_height_and_transparent() {
    let font = test_font(vec![]);
    let img = font.render_text("", Rgb8::WHITE, 1);
    assert_eq!(img.dimensions(), (1, 4));
    assert!(img.pixels().all(|p| p[3] == 0));
}

#[test]
fn fallback_chain_order() {
    let font = test_font(vec![]);
    // No missing glyph, no '?': falls through to space.
    assert_eq!(font.resolve_glyph('Z').map(|g| g.id), Some(' ' as u32));

    let font = test_font(vec![glyph('?', 12, 2, 3)]);
    assert_eq!(font.resolve_glyph('Z').map(|g| g.id), Some('?' as u32));

    let mut missing = glyph('\0', 12, 1, 2);
    missing.id = MISSING_GLYPH_ID;
    let font = test_font(vec![glyph('?', 12, 2, 3), missing]);
    assert_eq!(font.resolve_glyph('Z').map(|g| g.id), Some(MISSING_GLYPH_ID));
    assert_eq!(font.resolve_glyph('A').map(|g| g.id), Some('A' as u32));
}

#[test]
fn unresolvable_characters_are_skipped() {
    let atlas = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
    let font = BitmapFont::new("bare", 4, 4, atlas, [glyph('A', 0, 3, 4)], []);
    assert_eq!(font.text_width("A#A", 1), 4 + 1 + 4);
    assert_eq!(font.text_width("###", 1), 0);
    assert_eq!(font.render_text("###", Rgb8::WHITE, 1).dimensions(), (1, 4));
}

#[test]
fn glyph_pixels_land_at_cursor() {
    let font = test_font(vec![]);
    let img = font.render_text("A A", Rgb8::WHITE, 0);
    // A: 0..3, space advances 2 after A's 4 -> second A at x=6.
    assert_eq!(img.width(), 4 + 2 + 4);
    assert_eq!(img.get_pixel(0, 0)[3], 255);
    assert_eq!(img.get_pixel(3, 0)[3], 0);
    assert_eq!(img.get_pixel(6, 3)[3], 255);
    assert_eq!(img.get_pixel(9, 0)[3], 0);
}

#[test]
fn non_white_color_scales_channels_and_keeps_alpha() {
    let px = Rgba([200, 100, 255, 77]);
    assert_eq!(tint(px, Rgb8::WHITE), px);
    assert_eq!(tint(px, Rgb8::new(255, 0, 128)), Rgba([200, 0, 128, 77]));

    let font = test_font(vec![]);
    let img = font.render_text("A", Rgb8::new(255, 176, 0), 0);
    assert_eq!(*img.get_pixel(1, 1), Rgba([255, 176, 0, 255]));
}

#[test]
fn segments_share_cursor_and_kerning() {
    let font = test_font(vec![]);
    let red = Rgb8::new(255, 0, 0);
    let green = Rgb8::new(0, 255, 0);
    let segs = [TextSegment::new("A", red), TextSegment::new("V", green)];
    let img = font.render_segments(&segs, 1);
    assert_eq!(i64::from(img.width()), font.text_width("AV", 1));
    // V starts at 4 - 1 + 1 = 4.
    assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(*img.get_pixel(4, 0), Rgba([0, 255, 0, 255]));
    assert_eq!(img.get_pixel(3, 0)[3], 0);
}

#[test]
fn extreme_letter_spacing_is_capped_to_max_text_width() {
    let font = test_font(vec![]);
    assert_eq!(font.text_width("AV", i32::MAX), 4 - 1 + 4 + i64::from(i32::MAX));

    let img = font.render_text("AV", Rgb8::WHITE, i32::MAX);
    assert_eq!(img.dimensions(), (MAX_TEXT_WIDTH, 4));
    assert_eq!(img.get_pixel(0, 0)[3], 255);

    let img = font.render_text("AVAV", Rgb8::WHITE, i32::MIN);
    assert_eq!(img.dimensions(), (1, 4));
}
