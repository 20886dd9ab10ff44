use qrstyle::{
    EccLevel, LogoOverlaySpec, ModuleStyle, OverlayLayer, RenderCache, RenderRequest, Rgb,
    StyleConfig, SymbolImage, TextOverlaySpec, caption_font_db, render_styled,
};

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];
const RED: [u8; 4] = [255, 0, 0, 255];

fn base_request() -> RenderRequest {
    RenderRequest {
        content: "https://example.com".to_string(),
        style: StyleConfig::default(),
        ecc: Some(EccLevel::M),
        // Version 3 pins the grid at 29x29 modules.
        fixed_version: Some(3),
        overlays: Vec::new(),
    }
}

fn logo_spec(size_percent: u32, round: bool) -> LogoOverlaySpec {
    LogoOverlaySpec {
        image: SymbolImage::new_filled(12, 12, RED),
        size_percent,
        round,
        crop: None,
    }
}

#[test]
fn renders_are_byte_identical() {
    let req = base_request();
    let a = render_styled(&req).unwrap();
    let b = render_styled(&req).unwrap();
    assert_eq!(a, b);

    let mut cache = RenderCache::new();
    let c = cache.render(&req).unwrap();
    let d = cache.render(&req).unwrap();
    assert_eq!(cache.len(), 1);
    assert_eq!(a, c);
    assert_eq!(c, d);
}

#[test]
fn geometry_follows_version_border_and_box_size() {
    let img = render_styled(&base_request()).unwrap();
    // (29 modules + 2 * 4 quiet) * 10 px.
    assert_eq!((img.width, img.height), (370, 370));

    for y in 0..img.height {
        for x in 0..img.width {
            let px = img.pixel(x, y);
            assert!(px == BLACK || px == WHITE, "unexpected pixel {px:?}");
        }
    }
    // The quiet zone is uniformly background.
    for i in 0..img.width {
        assert_eq!(img.pixel(i, 0), WHITE);
        assert_eq!(img.pixel(0, i), WHITE);
        assert_eq!(img.pixel(i, 39), WHITE);
    }
    // Finder corner module.
    assert_eq!(img.pixel(40, 40), BLACK);
}

#[test]
fn wider_border_grows_the_quiet_zone() {
    let mut req = base_request();
    req.style.border_modules = 8;
    let img = render_styled(&req).unwrap();
    assert_eq!(img.width, (29 + 16) * 10);
}

#[test]
fn canvas_size_overrides_native_geometry() {
    let mut req = base_request();
    req.style.canvas_size_px = Some(300);
    let img = render_styled(&req).unwrap();
    assert_eq!((img.width, img.height), (300, 300));
}

#[test]
fn module_styles_change_pixels_but_not_geometry() {
    let square = render_styled(&base_request()).unwrap();
    let mut req = base_request();
    req.style.module_style = ModuleStyle::Circle;
    let circle = render_styled(&req).unwrap();
    assert_eq!((square.width, square.height), (circle.width, circle.height));
    assert_ne!(square.data, circle.data);
}

#[test]
fn blank_content_is_rejected() {
    for content in ["", "   ", "\n\t"] {
        let mut req = base_request();
        req.content = content.to_string();
        assert!(render_styled(&req).is_err());
    }
}

#[test]
fn round_logo_is_an_opaque_centered_disc() {
    let mut req = base_request();
    req.ecc = Some(EccLevel::H);
    req.overlays = vec![OverlayLayer::Logo(logo_spec(20, true))];
    let img = render_styled(&req).unwrap();

    // 20% of the 370px canvas is a 74px disc centered at 185.
    let c = img.width / 2;
    assert_eq!(img.pixel(c, c), RED);
    assert_eq!(img.pixel(c - 30, c), RED);
    assert_eq!(img.pixel(c + 30, c), RED);
    // The placement region's square corner is outside the disc, so the
    // underlying symbol shows through as one of the two base colors.
    let corner = img.pixel(c - 36, c - 36);
    assert!(corner == BLACK || corner == WHITE);
    // Everything stays fully opaque.
    for y in 0..img.height {
        for x in 0..img.width {
            assert_eq!(img.pixel(x, y)[3], 255);
        }
    }
}

#[test]
fn square_logo_covers_its_full_region() {
    let mut req = base_request();
    req.ecc = Some(EccLevel::H);
    req.overlays = vec![OverlayLayer::Logo(logo_spec(20, false))];
    let img = render_styled(&req).unwrap();

    let c = img.width / 2;
    for d in [0u32, 20, 36] {
        assert_eq!(img.pixel(c - d, c - d), RED);
        assert_eq!(img.pixel(c + d - 1, c + d - 1), RED);
    }
}

#[test]
fn caption_background_pads_the_text_box() {
    if caption_font_db(None).db.faces().next().is_none() {
        // No fonts available in this environment; glyph output would be empty.
        return;
    }

    let pad = 6u32;
    let mut req = base_request();
    req.ecc = Some(EccLevel::H);
    req.overlays = vec![OverlayLayer::Caption(TextOverlaySpec {
        text: "SCAN".to_string(),
        size_percent: 10,
        color: Rgb::from_hex("#ff0000").unwrap(),
        background_padding: pad,
        show_background: true,
        font_path: None,
    })];
    let img = render_styled(&req).unwrap();

    // Glyph pixels are the only ones where red exceeds green: both symbol
    // colors and the background plate are grayscale, and any nonzero glyph
    // alpha over the plate leaves r > g. The box of such pixels is therefore
    // the compositor's measured text box.
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    for y in 0..img.height {
        for x in 0..img.width {
            let px = img.pixel(x, y);
            if px[0] != px[1] {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
            }
        }
    }
    assert!(min_x <= max_x, "no caption glyphs rendered");

    // The plate extends `pad` past the text box on every side, so the ring of
    // that width around the box holds nothing but background.
    for y in (min_y - pad)..=(max_y + pad) {
        for x in (min_x - pad)..=(max_x + pad) {
            let in_text_box = (min_x..=max_x).contains(&x) && (min_y..=max_y).contains(&y);
            if !in_text_box {
                assert_eq!(
                    img.pixel(x, y),
                    WHITE,
                    "ring pixel at ({x},{y}) is not background"
                );
            }
        }
    }
}

#[test]
fn caption_layer_marks_the_center() {
    if caption_font_db(None).db.faces().next().is_none() {
        // No fonts available in this environment; glyph output would be empty.
        return;
    }

    let mut req = base_request();
    req.ecc = Some(EccLevel::H);
    req.overlays = vec![OverlayLayer::Caption(TextOverlaySpec {
        text: "SCAN ME".to_string(),
        size_percent: 10,
        color: Rgb::from_hex("#ff0000").unwrap(),
        background_padding: 4,
        show_background: true,
        font_path: None,
    })];
    let bare = render_styled(&base_request()).unwrap();
    let with_caption = render_styled(&req).unwrap();

    assert_eq!(bare.width, with_caption.width);
    assert_ne!(bare.data, with_caption.data);
    // The background rect spans the horizontal center line.
    let c = with_caption.width / 2;
    let mut saw_caption_paint = false;
    for x in 0..with_caption.width {
        let px = with_caption.pixel(x, c);
        if px == RED || px != bare.pixel(x, c) {
            saw_caption_paint = true;
            break;
        }
    }
    assert!(saw_caption_paint);
}
