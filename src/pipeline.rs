//! One-call render pipeline: plan, encode, render, compose.

use crate::compose::overlay::compose_overlays;
use crate::encode::encode;
use crate::foundation::error::QrStyleResult;
use crate::model::{EccLevel, OverlayLayer, StyleConfig, SymbolImage};
use crate::plan::plan;
use crate::render::render_modules;

/// Everything one render consumes. Cheap to clone, serde round-trippable,
/// and never mutated by the pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RenderRequest {
    /// Content to encode.
    pub content: String,
    /// Visual styling.
    pub style: StyleConfig,
    /// Explicit ECC level; `None` resolves automatically (H with overlays,
    /// M otherwise).
    #[serde(default)]
    pub ecc: Option<EccLevel>,
    /// Optional fixed grid version (1..=40).
    #[serde(default)]
    pub fixed_version: Option<i16>,
    /// Decoration layers, applied in order. Use [`RenderRequest::with_decoration`]
    /// for the default logo-under-caption ordering.
    #[serde(default)]
    pub overlays: Vec<OverlayLayer>,
}

impl RenderRequest {
    /// Bare symbol request with default styling.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            style: StyleConfig::default(),
            ecc: None,
            fixed_version: None,
            overlays: Vec::new(),
        }
    }

    /// Attach decoration in the default order: logo first, caption second,
    /// so the caption visually wins if the two overlap.
    pub fn with_decoration(
        mut self,
        logo: Option<crate::model::LogoOverlaySpec>,
        caption: Option<crate::model::TextOverlaySpec>,
    ) -> Self {
        self.overlays.clear();
        if let Some(spec) = logo {
            self.overlays.push(OverlayLayer::Logo(spec));
        }
        if let Some(spec) = caption {
            self.overlays.push(OverlayLayer::Caption(spec));
        }
        self
    }

    /// Validate styling and every overlay spec up front.
    pub fn validate(&self) -> QrStyleResult<()> {
        self.style.validate()?;
        for layer in &self.overlays {
            layer.validate()?;
        }
        Ok(())
    }
}

/// Run one full pipeline pass for the request.
///
/// Pure and synchronous: identical requests produce byte-identical images,
/// and nothing is shared between calls.
#[tracing::instrument(
    skip(req),
    fields(content_len = req.content.len(), layers = req.overlays.len())
)]
pub fn render_styled(req: &RenderRequest) -> QrStyleResult<SymbolImage> {
    req.validate()?;

    let symbol_req = plan(
        &req.content,
        &req.style,
        req.ecc,
        req.fixed_version,
        &req.overlays,
    )?;
    let matrix = encode(&symbol_req)?;
    let mut image = render_modules(&matrix, &req.style)?;
    compose_overlays(
        &mut image,
        &req.overlays,
        &req.style,
        symbol_req.ecc,
        matrix.size(),
    )?;
    Ok(image)
}
