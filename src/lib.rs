//! qrstyle renders a scannable QR symbol from arbitrary text and composes
//! optional decoration (logo image, center caption) onto it.
//!
//! # Pipeline overview
//!
//! 1. **Plan**: user input -> [`SymbolRequest`] (content trimmed, ECC resolved)
//! 2. **Encode**: [`SymbolRequest`] -> [`ModuleMatrix`] (the `qrcode` crate, trusted black box)
//! 3. **Render**: [`ModuleMatrix`] + [`StyleConfig`] -> base [`SymbolImage`]
//! 4. **Compose**: overlay layers (logo, caption) blended onto the base, in order
//! 5. **Serialize**: [`assets::encode_png`] turns the raster into lossless PNG bytes
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic-by-default**: one request always renders to byte-identical output.
//! - **No IO in the pipeline**: logo decoding and PNG encoding live at the
//!   [`assets`] boundary; only the encoder call and font load touch the outside.
//! - **Premultiplied RGBA8** end-to-end: every raster buffer is premultiplied.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod compose;
mod encode;
mod fingerprint;
mod foundation;
mod model;
mod plan;
mod render;

/// Asset I/O shim: decode uploaded rasters, encode final PNG bytes.
pub mod assets;
/// One-call render pipeline.
pub mod pipeline;

pub use compose::fonts::{CaptionFonts, caption_font_db, load_font};
pub use compose::overlay::compose_overlays;
pub use encode::{ModuleMatrix, encode};
pub use fingerprint::{RenderCache, fingerprint_request};
pub use foundation::color::Rgb;
pub use foundation::error::{QrStyleError, QrStyleResult};
pub use model::{
    CropRect, EccLevel, LogoOverlaySpec, ModuleStyle, OverlayLayer, StyleConfig, SymbolImage,
    SymbolRequest, TextOverlaySpec,
};
pub use pipeline::{RenderRequest, render_styled};
pub use plan::plan;
pub use render::render_modules;
