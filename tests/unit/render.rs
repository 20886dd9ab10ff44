use super::*;
use crate::encode::{ModuleMatrix, encode};
use crate::model::{EccLevel, SymbolRequest};

fn matrix() -> ModuleMatrix {
    encode(&SymbolRequest {
        content: "https://example.com".to_string(),
        ecc: EccLevel::M,
        fixed_version: None,
        border_modules: 4,
    })
    .unwrap()
}

#[test]
fn native_side_includes_quiet_zone() {
    let m = matrix();
    let style = StyleConfig::default();
    let img = render_modules(&m, &style).unwrap();
    let expected = (m.size() + 2 * style.border_modules) * style.box_size_px;
    assert_eq!(img.width, expected);
    assert_eq!(img.height, expected);
}

#[test]
fn square_raster_is_two_tone_and_opaque() {
    let m = matrix();
    let style = StyleConfig::default();
    let img = render_modules(&m, &style).unwrap();
    let fill = style.fill.to_premul_rgba8();
    let back = style.back.to_premul_rgba8();
    for y in 0..img.height {
        for x in 0..img.width {
            let px = img.pixel(x, y);
            assert!(px == fill || px == back, "unexpected pixel {px:?} at ({x},{y})");
            assert_eq!(px[3], 255);
        }
    }
    // Quiet-zone corner is background; the finder corner module is foreground.
    assert_eq!(img.pixel(0, 0), back);
    let b = style.border_modules * style.box_size_px;
    assert_eq!(img.pixel(b, b), fill);
}

#[test]
fn circle_modules_leave_cell_corners_unfilled() {
    let m = matrix();
    let style = StyleConfig {
        module_style: ModuleStyle::Circle,
        ..StyleConfig::default()
    };
    let img = render_modules(&m, &style).unwrap();
    let back = style.back.to_premul_rgba8();
    let fill = style.fill.to_premul_rgba8();
    // Finder corner module (0,0) is dark: its cell corner stays background
    // under circle styling while its center is foreground.
    let b = style.border_modules * style.box_size_px;
    assert_eq!(img.pixel(b, b), back);
    let mid = b + style.box_size_px / 2;
    assert_eq!(img.pixel(mid, mid), fill);
}

#[test]
fn canvas_size_resamples_to_square() {
    let m = matrix();
    let style = StyleConfig {
        canvas_size_px: Some(300),
        ..StyleConfig::default()
    };
    let img = render_modules(&m, &style).unwrap();
    assert_eq!((img.width, img.height), (300, 300));
}

#[test]
fn oversized_raster_is_rejected() {
    let m = matrix();
    let style = StyleConfig {
        box_size_px: 100_000,
        ..StyleConfig::default()
    };
    assert!(matches!(
        render_modules(&m, &style),
        Err(QrStyleError::Validation(_))
    ));
}
