use std::collections::HashMap;

use crate::foundation::error::QrStyleResult;
use crate::foundation::math::Fnv1a64;
use crate::model::{EccLevel, ModuleStyle, OverlayLayer, SymbolImage};
use crate::pipeline::{RenderRequest, render_styled};

/// Stable 64-bit fingerprint of a full render request, logo bytes included.
///
/// Identical requests always fingerprint identically, which is what makes the
/// memo cache safe: the pipeline itself is deterministic, so equal inputs
/// mean byte-identical output.
pub fn fingerprint_request(req: &RenderRequest) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(req.content.as_bytes());
    h.write_u8(0);

    match req.ecc {
        None => h.write_u8(0),
        Some(level) => {
            h.write_u8(1);
            h.write_u8(ecc_tag(level));
        }
    }
    match req.fixed_version {
        None => h.write_u8(0),
        Some(v) => {
            h.write_u8(1);
            h.write_bytes(&v.to_le_bytes());
        }
    }

    let s = &req.style;
    h.write_bytes(&[s.fill.r, s.fill.g, s.fill.b, s.back.r, s.back.g, s.back.b]);
    h.write_u8(match s.module_style {
        ModuleStyle::Square => b's',
        ModuleStyle::Circle => b'c',
        ModuleStyle::Rounded => b'r',
    });
    h.write_u32(s.box_size_px);
    match s.canvas_size_px {
        None => h.write_u8(0),
        Some(c) => {
            h.write_u8(1);
            h.write_u32(c);
        }
    }
    h.write_u32(s.border_modules);

    for layer in &req.overlays {
        match layer {
            OverlayLayer::Logo(spec) => {
                h.write_u8(b'L');
                h.write_u32(spec.image.width);
                h.write_u32(spec.image.height);
                h.write_bytes(&spec.image.data);
                h.write_u32(spec.size_percent);
                h.write_u8(u8::from(spec.round));
                match spec.crop {
                    None => h.write_u8(0),
                    Some(c) => {
                        h.write_u8(1);
                        h.write_u32(c.x);
                        h.write_u32(c.y);
                        h.write_u32(c.width);
                        h.write_u32(c.height);
                    }
                }
            }
            OverlayLayer::Caption(spec) => {
                h.write_u8(b'T');
                h.write_bytes(spec.text.as_bytes());
                h.write_u8(0);
                h.write_u32(spec.size_percent);
                h.write_bytes(&[spec.color.r, spec.color.g, spec.color.b]);
                h.write_u32(spec.background_padding);
                h.write_u8(u8::from(spec.show_background));
                match &spec.font_path {
                    None => h.write_u8(0),
                    Some(p) => {
                        h.write_u8(1);
                        h.write_bytes(p.to_string_lossy().as_bytes());
                    }
                }
            }
        }
    }

    h.finish()
}

fn ecc_tag(level: EccLevel) -> u8 {
    match level {
        EccLevel::L => b'l',
        EccLevel::M => b'm',
        EccLevel::Q => b'q',
        EccLevel::H => b'h',
    }
}

/// Memoizing wrapper around [`render_styled`].
///
/// Every identical request is otherwise fully recomputed; the cache trades
/// memory for that cost while keeping outputs byte-identical to a fresh
/// render.
#[derive(Default)]
pub struct RenderCache {
    rendered: HashMap<u64, SymbolImage>,
}

impl RenderCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render through the cache.
    pub fn render(&mut self, req: &RenderRequest) -> QrStyleResult<SymbolImage> {
        let key = fingerprint_request(req);
        if let Some(img) = self.rendered.get(&key) {
            return Ok(img.clone());
        }
        let img = render_styled(req)?;
        self.rendered.insert(key, img.clone());
        Ok(img)
    }

    /// Number of cached renders.
    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }
}
