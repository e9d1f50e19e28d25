use super::*;
use crate::foundation::core::Transform2D;

fn ramp() -> RgbaImage {
    RgbaImage::from_fn(4, 2, |x, _| Rgba([x as u8 * 10, 0, 0, 255]))
}

#[test]
fn visible_frame_is_passthrough() {
    let img = ramp();
    assert_eq!(apply_effect_frame(&img, EffectFrame::VISIBLE), img);
}

#[test]
fn translation_shifts_and_clears_uncovered() {
    let img = ramp();
    let out = apply_effect_frame(
        &img,
        EffectFrame {
            transform: Transform2D::translation(2.0, 0.0),
            opacity: 255,
        },
    );
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(out.get_pixel(1, 1)[3], 0);
    assert_eq!(*out.get_pixel(2, 0), Rgba([0, 0, 0, 255]));
    assert_eq!(*out.get_pixel(3, 1), Rgba([10, 0, 0, 255]));
}

#[test]
fn full_offset_hides_everything() {
    let img = ramp();
    let out = apply_effect_frame(
        &img,
        EffectFrame {
            transform: Transform2D::translation(-4.0, 0.0),
            opacity: 255,
        },
    );
    assert!(out.pixels().all(|p| p[3] == 0));
}

#[test]
fn opacity_scales_alpha_only() {
    let img = ramp();
    let out = apply_effect_frame(
        &img,
        EffectFrame {
            transform: Transform2D::IDENTITY,
            opacity: 128,
        },
    );
    assert_eq!(*out.get_pixel(3, 0), Rgba([30, 0, 0, 128]));
    let zero = apply_effect_frame(
        &img,
        EffectFrame {
            transform: Transform2D::IDENTITY,
            opacity: 0,
        },
    );
    assert!(zero.pixels().all(|p| p[3] == 0));
}
