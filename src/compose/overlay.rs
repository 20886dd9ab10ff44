use anyhow::Context as _;

use crate::compose::blend::{blit_over, fill_rect, mul_div255};
use crate::compose::fonts::{caption_font_db, make_font_resolver};
use crate::foundation::color::Rgb;
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::model::{
    EccLevel, LogoOverlaySpec, OverlayLayer, StyleConfig, SymbolImage, TextOverlaySpec,
};

/// Apply decoration layers to the rendered base image, in list order;
/// later layers win visually where regions overlap.
///
/// After all layers are placed the covered module area is checked against the
/// ECC recovery budget; exceeding it is reported as a warning, never a
/// failure (the symbol is still produced, it just may not scan).
#[tracing::instrument(skip_all, fields(layers = layers.len()))]
pub fn compose_overlays(
    base: &mut SymbolImage,
    layers: &[OverlayLayer],
    style: &StyleConfig,
    ecc: EccLevel,
    matrix_size: u32,
) -> QrStyleResult<()> {
    if base.width != base.height {
        return Err(QrStyleError::validation("base symbol image must be square"));
    }

    let mut covered_px = 0.0f64;
    for layer in layers {
        covered_px += match layer {
            OverlayLayer::Logo(spec) => place_logo(base, spec)?,
            OverlayLayer::Caption(spec) => place_caption(base, spec, style)?,
        };
    }

    warn_if_over_budget(covered_px, base.width, matrix_size, style.border_modules, ecc);
    Ok(())
}

/// Crop, resize, optionally round-mask and center-blend the logo.
/// Returns the covered pixel area.
fn place_logo(base: &mut SymbolImage, spec: &LogoOverlaySpec) -> QrStyleResult<f64> {
    spec.validate()?;
    let canvas = base.width;

    let logo = match spec.crop {
        Some(rect) => spec.image.cropped(rect)?,
        None => spec.image.clone(),
    };
    // Force-square: aspect ratio of the source is intentionally ignored.
    let side = (f64::from(canvas) * f64::from(spec.size_percent) / 100.0)
        .round()
        .max(1.0) as u32;
    let mut logo = logo.resized(side, side)?;
    if spec.round {
        apply_circle_mask(&mut logo);
    }

    let off = (i64::from(canvas) - i64::from(side)) / 2;
    blit_over(base, &logo, off, off);

    let area = f64::from(side) * f64::from(side);
    Ok(if spec.round {
        area * std::f64::consts::FRAC_PI_4
    } else {
        area
    })
}

/// Rasterize the caption through an SVG text tree, measure its tight alpha
/// bounding box, paint the optional background rect and center-blend the
/// glyph layer. Returns the covered pixel area.
fn place_caption(
    base: &mut SymbolImage,
    spec: &TextOverlaySpec,
    style: &StyleConfig,
) -> QrStyleResult<f64> {
    spec.validate()?;
    let canvas = base.width;
    let font_px = (f64::from(canvas) * f64::from(spec.size_percent) / 100.0)
        .round()
        .max(1.0) as u32;

    let fonts = caption_font_db(spec.font_path.as_deref());
    let family = fonts.family.as_deref().unwrap_or("sans-serif");
    let svg = caption_svg(canvas, &spec.text, family, font_px, spec.color);

    let opts = usvg::Options {
        fontdb: fonts.db.clone(),
        font_resolver: make_font_resolver(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse caption svg")?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas, canvas)
        .ok_or_else(|| QrStyleError::validation("failed to allocate caption pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::identity(),
        &mut pixmap.as_mut(),
    );
    let layer = SymbolImage::from_premul_bytes(canvas, canvas, pixmap.data().to_vec())?;

    let Some(bbox) = alpha_bbox(&layer) else {
        tracing::warn!("caption produced no visible glyphs; skipping caption layer");
        return Ok(0.0);
    };

    // Centered top-left of the measured text box.
    let tx = (i64::from(canvas) - i64::from(bbox.width)) / 2;
    let ty = (i64::from(canvas) - i64::from(bbox.height)) / 2;

    if spec.show_background {
        let pad = i64::from(spec.background_padding);
        fill_rect(
            base,
            tx - pad,
            ty - pad,
            tx + i64::from(bbox.width) + pad,
            ty + i64::from(bbox.height) + pad,
            style.back.to_premul_rgba8(),
        );
    }

    blit_over(base, &layer, tx - i64::from(bbox.x), ty - i64::from(bbox.y));

    let pad = f64::from(spec.background_padding);
    let (w, h) = (f64::from(bbox.width), f64::from(bbox.height));
    Ok(if spec.show_background {
        (w + 2.0 * pad) * (h + 2.0 * pad)
    } else {
        w * h
    })
}

/// Multiply the alpha channel by an antialiased inscribed-circle coverage
/// mask; anything outside the circle (corners included) ends fully
/// transparent regardless of prior alpha.
pub(crate) fn apply_circle_mask(img: &mut SymbolImage) {
    let cx = f64::from(img.width) / 2.0;
    let cy = f64::from(img.height) / 2.0;
    let r = f64::from(img.width.min(img.height)) / 2.0;

    for y in 0..img.height {
        for x in 0..img.width {
            let dx = f64::from(x) + 0.5 - cx;
            let dy = f64::from(y) + 0.5 - cy;
            // One-pixel antialiased edge.
            let coverage = (r - (dx * dx + dy * dy).sqrt() + 0.5).clamp(0.0, 1.0);
            if coverage >= 1.0 {
                continue;
            }
            let m = (coverage * 255.0).round() as u16;
            let i = ((y as usize) * (img.width as usize) + (x as usize)) * 4;
            for c in 0..4 {
                img.data[i + c] = mul_div255(u16::from(img.data[i + c]), m);
            }
        }
    }
}

/// Tight bounding box of pixels with non-zero alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AlphaBbox {
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

pub(crate) fn alpha_bbox(img: &SymbolImage) -> Option<AlphaBbox> {
    let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
    let (mut max_x, mut max_y) = (0u32, 0u32);
    let mut seen = false;

    for y in 0..img.height {
        for x in 0..img.width {
            let i = ((y as usize) * (img.width as usize) + (x as usize)) * 4;
            if img.data[i + 3] == 0 {
                continue;
            }
            seen = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
    }

    seen.then(|| AlphaBbox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

fn caption_svg(canvas: u32, text: &str, family: &str, font_px: u32, color: Rgb) -> String {
    let center = f64::from(canvas) / 2.0;
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{w}">"#,
            r#"<text x="{cx}" y="{cy}" text-anchor="middle" "#,
            r#"font-family="{family}" font-size="{size}" fill="{fill}">{text}</text>"#,
            "</svg>"
        ),
        w = canvas,
        cx = center,
        cy = center,
        family = xml_escape(family),
        size = font_px,
        fill = color,
        text = xml_escape(text),
    )
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn warn_if_over_budget(covered_px: f64, canvas: u32, matrix_size: u32, border: u32, ecc: EccLevel) {
    let total_modules = f64::from(matrix_size + 2 * border);
    if total_modules <= 0.0 || covered_px <= 0.0 {
        return;
    }
    // Covered area is measured against the functional module region, i.e. the
    // canvas minus the quiet zone.
    let functional_side = f64::from(canvas) * f64::from(matrix_size) / total_modules;
    let functional_area = functional_side * functional_side;
    if functional_area <= 0.0 {
        return;
    }

    let fraction = covered_px / functional_area;
    let budget = ecc.recovery_rate();
    if fraction > budget {
        tracing::warn!(
            covered_pct = format!("{:.1}", fraction * 100.0),
            budget_pct = format!("{:.1}", budget * 100.0),
            ecc = ?ecc,
            "decoration area exceeds the ECC recovery budget; symbol may not scan"
        );
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/overlay.rs"]
mod tests;
