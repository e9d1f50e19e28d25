use super::*;

#[test]
fn radius_scales_with_brightness() {
    assert_eq!(glow_radius(0), 2);
    assert_eq!(glow_radius(50), 6);
    assert_eq!(glow_radius(100), 10);
    assert_eq!(glow_radius(200), 10);
}

#[test]
fn kernel_sums_to_one_in_q16() {
    for r in [1u32, 2, 6, 10] {
        let k = gaussian_kernel_q16(r, r as f32 / 2.0).unwrap();
        assert_eq!(k.len(), (2 * r + 1) as usize);
        assert_eq!(k.iter().sum::<u32>(), 65536);
    }
    assert!(gaussian_kernel_q16(2, 0.0).is_err());
}

#[test]
fn constant_image_is_unchanged() {
    let img = RgbaImage::from_pixel(6, 4, image::Rgba([10, 20, 30, 255]));
    let mut f = GlowFilter::new();
    let out = f.apply(&img, 100).unwrap();
    // screen(10, 10) = 10 + 10 - 0 = 20 for a uniformly lit image.
    assert_eq!(out.get_pixel(0, 0)[0], 20);
    assert!(out.pixels().all(|p| p == out.get_pixel(0, 0)));
}

#[test]
fn glow_spreads_light_into_dark_neighbours() {
    let mut img = RgbaImage::from_pixel(9, 9, image::Rgba([0, 0, 0, 255]));
    img.put_pixel(4, 4, image::Rgba([255, 255, 255, 255]));
    let mut f = GlowFilter::new();
    let out = f.apply(&img, 0).unwrap();
    assert_eq!(out.get_pixel(4, 4)[0], 255);
    assert!(out.get_pixel(5, 4)[0] > 0);
    assert_eq!(out.get_pixel(0, 0)[0], 0);
}

#[test]
fn kernel_is_cached_until_radius_changes() {
    let img = RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 255]));
    let mut f = GlowFilter::new();
    f.apply(&img, 100).unwrap();
    f.apply(&img, 100).unwrap();
    f.apply(&img, 99).unwrap(); // still radius 10
    assert_eq!(f.rebuilds(), 1);
    f.apply(&img, 50).unwrap();
    assert_eq!(f.rebuilds(), 2);
    assert_eq!(f.radius(), 6);
}

#[test]
fn empty_input_yields_placeholder() {
    let mut f = GlowFilter::new();
    let out = f.apply(&RgbaImage::new(0, 0), 100).unwrap();
    assert_eq!(out.dimensions(), (1, 1));
    assert_eq!(f.rebuilds(), 0);
}

#[test]
fn alpha_channel_is_not_blurred() {
    let mut img = RgbaImage::from_pixel(5, 1, image::Rgba([0, 0, 0, 255]));
    img.put_pixel(2, 0, image::Rgba([200, 200, 200, 0]));
    let out = GlowFilter::new().apply(&img, 100).unwrap();
    assert_eq!(out.get_pixel(2, 0)[3], 0);
    assert_eq!(out.get_pixel(1, 0)[3], 255);
    assert!(out.get_pixel(1, 0)[0] > 0);
}
