use super::*;

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn logo_layer(side: u32, size_percent: u32, round: bool) -> OverlayLayer {
    OverlayLayer::Logo(LogoOverlaySpec {
        image: SymbolImage::new_filled(side, side, RED),
        size_percent,
        round,
        crop: None,
    })
}

#[test]
fn non_square_base_is_rejected() {
    let mut base = SymbolImage::new_filled(10, 20, WHITE);
    let err = compose_overlays(&mut base, &[], &StyleConfig::default(), EccLevel::M, 21);
    assert!(matches!(err, Err(QrStyleError::Validation(_))));
}

#[test]
fn logo_is_centered_and_scaled() {
    let mut base = SymbolImage::new_filled(100, 100, WHITE);
    let layers = [logo_layer(10, 20, false)];
    compose_overlays(&mut base, &layers, &StyleConfig::default(), EccLevel::H, 21).unwrap();

    // 20% of a 100px canvas is a 20px logo at offset 40.
    assert_eq!(base.pixel(50, 50), RED);
    assert_eq!(base.pixel(40, 40), RED);
    assert_eq!(base.pixel(59, 59), RED);
    assert_eq!(base.pixel(39, 50), WHITE);
    assert_eq!(base.pixel(60, 50), WHITE);
    assert_eq!(base.pixel(0, 0), WHITE);
}

#[test]
fn round_logo_keeps_base_visible_at_its_corners() {
    let mut base = SymbolImage::new_filled(100, 100, WHITE);
    let layers = [logo_layer(10, 20, true)];
    compose_overlays(&mut base, &layers, &StyleConfig::default(), EccLevel::H, 21).unwrap();

    // Center of the masked disc is logo color; the square corners of the
    // placement region fall outside the inscribed circle.
    assert_eq!(base.pixel(50, 50), RED);
    assert_eq!(base.pixel(40, 40), WHITE);
    assert_eq!(base.pixel(59, 59), WHITE);
}

#[test]
fn invalid_logo_size_aborts_composition() {
    let mut base = SymbolImage::new_filled(100, 100, WHITE);
    let layers = [logo_layer(10, 90, false)];
    assert!(matches!(
        compose_overlays(&mut base, &layers, &StyleConfig::default(), EccLevel::H, 21),
        Err(QrStyleError::Validation(_))
    ));
}

#[test]
fn circle_mask_zeroes_corners_and_keeps_center() {
    let mut img = SymbolImage::new_filled(16, 16, RED);
    apply_circle_mask(&mut img);
    assert_eq!(img.pixel(0, 0)[3], 0);
    assert_eq!(img.pixel(15, 0)[3], 0);
    assert_eq!(img.pixel(0, 15)[3], 0);
    assert_eq!(img.pixel(15, 15)[3], 0);
    assert_eq!(img.pixel(8, 8), RED);
}

#[test]
fn alpha_bbox_is_tight() {
    let mut img = SymbolImage::new_filled(8, 8, [0, 0, 0, 0]);
    let i = ((3usize * 8) + 2) * 4;
    img.data[i + 3] = 255;
    let bbox = alpha_bbox(&img).unwrap();
    assert_eq!(
        bbox,
        AlphaBbox {
            x: 2,
            y: 3,
            width: 1,
            height: 1
        }
    );
}

#[test]
fn alpha_bbox_of_clear_image_is_none() {
    let img = SymbolImage::new_filled(8, 8, [0, 0, 0, 0]);
    assert!(alpha_bbox(&img).is_none());
}

#[test]
fn caption_svg_escapes_markup() {
    let svg = caption_svg(100, "a<b&c", "My \"Font\"", 12, Rgb::BLACK);
    assert!(svg.contains("a&lt;b&amp;c"));
    assert!(svg.contains("My &quot;Font&quot;"));
    assert!(svg.contains(r##"fill="#000000""##));
    assert!(svg.contains(r#"text-anchor="middle""#));
}
