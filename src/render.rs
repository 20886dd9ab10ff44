use vello_cpu::kurbo::{BezPath, Ellipse, Rect, RoundedRect, Shape};

use crate::encode::ModuleMatrix;
use crate::foundation::color::Rgb;
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::model::{ModuleStyle, StyleConfig, SymbolImage};

// Corner radius of a Rounded module relative to the cell side.
const ROUNDED_RADIUS_RATIO: f64 = 0.25;

// Flattening tolerance when converting curves to path elements.
const CURVE_TOLERANCE: f64 = 0.1;

/// Rasterize the module matrix into the base symbol image.
///
/// The native raster is `(n + 2*border) * box_size_px` pixels per side; the
/// quiet zone is always flat-filled with the background color regardless of
/// module style. If `canvas_size_px` is set and differs from the native side
/// the image is Lanczos3-resampled to that square size.
#[tracing::instrument(skip(matrix, style), fields(n = matrix.size()))]
pub fn render_modules(matrix: &ModuleMatrix, style: &StyleConfig) -> QrStyleResult<SymbolImage> {
    style.validate()?;

    let n = matrix.size();
    let native = n
        .checked_add(style.border_modules.checked_mul(2).ok_or_else(overflow)?)
        .and_then(|m| m.checked_mul(style.box_size_px))
        .ok_or_else(overflow)?;
    let side: u16 = native.try_into().map_err(|_| {
        QrStyleError::validation(format!(
            "native raster side {native} exceeds the u16 surface limit"
        ))
    })?;

    let mut ctx = vello_cpu::RenderContext::new(side, side);
    ctx.set_paint(paint(style.back));
    ctx.fill_rect(&Rect::new(0.0, 0.0, f64::from(native), f64::from(native)));

    ctx.set_paint(paint(style.fill));
    let cell = f64::from(style.box_size_px);
    for y in 0..n {
        for x in 0..n {
            if !matrix.get(i64::from(x), i64::from(y)) {
                continue;
            }
            let x0 = f64::from(x + style.border_modules) * cell;
            let y0 = f64::from(y + style.border_modules) * cell;
            match style.module_style {
                ModuleStyle::Square => {
                    ctx.fill_rect(&Rect::new(x0, y0, x0 + cell, y0 + cell));
                }
                ModuleStyle::Circle => {
                    let r = cell / 2.0;
                    let e = Ellipse::new((x0 + r, y0 + r), (r, r), 0.0);
                    ctx.fill_path(&to_path(e.path_elements(CURVE_TOLERANCE)));
                }
                ModuleStyle::Rounded => {
                    let rr = RoundedRect::new(
                        x0,
                        y0,
                        x0 + cell,
                        y0 + cell,
                        cell * ROUNDED_RADIUS_RATIO,
                    );
                    ctx.fill_path(&to_path(rr.path_elements(CURVE_TOLERANCE)));
                }
            }
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(side, side);
    ctx.render_to_pixmap(&mut pixmap);

    let base = SymbolImage::from_premul_bytes(native, native, pixmap.data_as_u8_slice().to_vec())?;
    match style.canvas_size_px {
        Some(canvas) if canvas != native => base.resized(canvas, canvas),
        _ => Ok(base),
    }
}

fn overflow() -> QrStyleError {
    QrStyleError::validation("native raster size overflows u32")
}

fn paint(c: Rgb) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn to_path(elements: impl Iterator<Item = vello_cpu::kurbo::PathEl>) -> BezPath {
    let mut p = BezPath::new();
    for el in elements {
        p.push(el);
    }
    p
}

#[cfg(test)]
#[path = "../tests/unit/render.rs"]
mod tests;
