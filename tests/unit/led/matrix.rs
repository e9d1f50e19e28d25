use super::*;
use crate::foundation::core::Rgb8;

fn border(h: u32, v: u32) -> BorderSettings {
    BorderSettings {
        is_enabled: true,
        horizontal_lines: h,
        vertical_lines: v,
        padding: 0,
        color: Rgb8::new(255, 0, 0),
    }
}

fn rows(m: &PixelMatrix) -> Vec<String> {
    let PixelMatrix::Binary(b) = m else {
        panic!("expected binary matrix");
    };
    (0..b.height())
        .map(|y| {
            (0..b.width())
                .map(|x| if b.get(x, y) { '#' } else { '.' })
                .collect()
        })
        .collect()
}

#[test]
fn from_rows_and_counts() {
    let m = BitMatrix::from_rows(&["#.#", " #"]);
    assert_eq!((m.width(), m.height()), (3, 2));
    assert_eq!(m.lit_count(), 3);
    assert!(!m.get(2, 1));
    assert!(!m.get(99, 99));
}

#[test]
fn border_paints_edges_of_rect() {
    let mut m = PixelMatrix::Binary(BitMatrix::new(6, 5));
    let rect = CellRect::of(&m);
    draw_border(&mut m, rect, &border(1, 1));
    assert_eq!(
        rows(&m),
        vec!["######", "#....#", "#....#", "#....#", "######"]
    );
}

#[test]
fn border_line_counts_are_independent() {
    let mut m = PixelMatrix::Binary(BitMatrix::new(6, 6));
    let rect = CellRect::of(&m);
    draw_border(&mut m, rect, &border(2, 0));
    assert_eq!(
        rows(&m),
        vec!["######", "######", "......", "......", "######", "######"]
    );
}

#[test]
fn border_is_clipped_and_padding_is_caller_applied() {
    let mut m = PixelMatrix::Binary(BitMatrix::new(5, 4));
    draw_border(&mut m, CellRect::new(-1, 1, 4, 10), &border(1, 1));
    assert_eq!(rows(&m), vec![".....", "###..", "..#..", "..#.."]);

    let mut m = PixelMatrix::Binary(BitMatrix::new(5, 5));
    let rect = CellRect::of(&m).inset(1);
    draw_border(&mut m, rect, &border(1, 1));
    assert_eq!(rows(&m), vec![".....", ".###.", ".#.#.", ".###.", "....."]);
}

#[test]
fn disabled_border_is_noop_and_color_border_uses_color() {
    let mut m = PixelMatrix::Color(RgbaImage::new(3, 3));
    let mut b = border(1, 1);
    b.is_enabled = false;
    let rect = CellRect::of(&m);
    draw_border(&mut m, rect, &b);
    let PixelMatrix::Color(img) = &m else { unreachable!() };
    assert!(img.pixels().all(|p| p[3] == 0));

    let rect = CellRect::of(&m);
    draw_border(&mut m, rect, &border(1, 1));
    let PixelMatrix::Color(img) = &m else { unreachable!() };
    assert_eq!(*img.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    assert_eq!(img.get_pixel(1, 1)[3], 0);
}

#[test]
fn color_pixel_on_rules() {
    assert!(!is_color_pixel_on(Rgba([255, 255, 255, 0])));
    assert!(!is_color_pixel_on(Rgba([0, 0, 0, 255])));
    assert!(is_color_pixel_on(Rgba([0, 1, 0, 1])));
}
