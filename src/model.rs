use std::path::PathBuf;
use std::str::FromStr;

use crate::foundation::color::Rgb;
use crate::foundation::error::{QrStyleError, QrStyleResult};

/// Error-correction redundancy tier of the symbol.
///
/// Higher tiers trade data capacity for tolerance to damaged or occluded
/// modules, which is what makes decorated symbols scannable at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EccLevel {
    /// ~7% recovery.
    L,
    /// ~15% recovery.
    M,
    /// ~25% recovery.
    Q,
    /// ~30% recovery.
    H,
}

impl EccLevel {
    /// Nominal fraction of module area this tier can recover.
    pub fn recovery_rate(self) -> f64 {
        match self {
            EccLevel::L => 0.07,
            EccLevel::M => 0.15,
            EccLevel::Q => 0.25,
            EccLevel::H => 0.30,
        }
    }
}

impl FromStr for EccLevel {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" => Ok(EccLevel::L),
            "m" => Ok(EccLevel::M),
            "q" => Ok(EccLevel::Q),
            "h" => Ok(EccLevel::H),
            other => Err(QrStyleError::validation(format!(
                "ecc level must be one of l/m/q/h, got '{other}'"
            ))),
        }
    }
}

/// Shape painted for each "on" module.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ModuleStyle {
    /// Full cell fill.
    #[default]
    Square,
    /// Inscribed ellipse.
    Circle,
    /// Inscribed rounded rectangle.
    Rounded,
}

impl FromStr for ModuleStyle {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(ModuleStyle::Square),
            "circle" => Ok(ModuleStyle::Circle),
            "rounded" => Ok(ModuleStyle::Rounded),
            other => Err(QrStyleError::validation(format!(
                "module style must be square/circle/rounded, got '{other}'"
            ))),
        }
    }
}

/// Planned encoder parameters for one render; produced only by [`crate::plan`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SymbolRequest {
    /// Trimmed content to encode.
    pub content: String,
    /// Resolved error-correction level.
    pub ecc: EccLevel,
    /// Optional fixed grid version (1..=40); `None` lets the encoder choose.
    pub fixed_version: Option<i16>,
    /// Quiet-zone width in modules, copied from [`StyleConfig`].
    pub border_modules: u32,
}

/// Visual styling of the rendered symbol.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StyleConfig {
    /// Foreground ("on" module) color.
    pub fill: Rgb,
    /// Background and quiet-zone color.
    pub back: Rgb,
    /// Per-module drawing shape.
    #[serde(default)]
    pub module_style: ModuleStyle,
    /// Native pixels per module; must be > 0.
    pub box_size_px: u32,
    /// Optional post-scale square canvas side; `None` keeps native size.
    #[serde(default)]
    pub canvas_size_px: Option<u32>,
    /// Quiet-zone width in modules.
    pub border_modules: u32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            fill: Rgb::BLACK,
            back: Rgb::WHITE,
            module_style: ModuleStyle::Square,
            box_size_px: 10,
            canvas_size_px: None,
            border_modules: 4,
        }
    }
}

impl StyleConfig {
    /// Validate styling fields.
    ///
    /// Low fill/back contrast is a scannability precondition, not a structural
    /// one: it is reported as a warning, never an error.
    pub fn validate(&self) -> QrStyleResult<()> {
        if self.box_size_px == 0 {
            return Err(QrStyleError::validation("box_size_px must be > 0"));
        }
        if self.canvas_size_px == Some(0) {
            return Err(QrStyleError::validation("canvas_size_px must be > 0"));
        }
        let contrast = (self.fill.luminance() - self.back.luminance()).abs();
        if contrast < 0.3 {
            tracing::warn!(
                fill = %self.fill,
                back = %self.back,
                contrast,
                "low fill/back luminance contrast; symbol may not scan"
            );
        }
        Ok(())
    }
}

/// Rectangle applied to the logo bitmap before resizing, in source pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CropRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Center logo decoration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LogoOverlaySpec {
    /// Decoded logo bitmap (premultiplied RGBA8).
    pub image: SymbolImage,
    /// Logo side as percent of canvas width, in `[10, 40]`.
    pub size_percent: u32,
    /// Mask the logo to an inscribed circle.
    #[serde(default)]
    pub round: bool,
    /// Optional crop applied before resizing.
    #[serde(default)]
    pub crop: Option<CropRect>,
}

impl LogoOverlaySpec {
    /// Check field ranges; a bad crop or size blocks the render.
    pub fn validate(&self) -> QrStyleResult<()> {
        if !(10..=40).contains(&self.size_percent) {
            return Err(QrStyleError::validation(format!(
                "logo size_percent must be in [10, 40], got {}",
                self.size_percent
            )));
        }
        if self.image.width == 0 || self.image.height == 0 {
            return Err(QrStyleError::validation("logo image must be non-empty"));
        }
        if let Some(c) = self.crop {
            if c.width == 0 || c.height == 0 {
                return Err(QrStyleError::validation("crop rect must be non-empty"));
            }
            if c.x >= self.image.width || c.y >= self.image.height {
                return Err(QrStyleError::validation(
                    "crop rect origin outside logo bounds",
                ));
            }
        }
        Ok(())
    }
}

/// Center caption decoration.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TextOverlaySpec {
    /// Caption text.
    pub text: String,
    /// Font size as percent of canvas width, in `[5, 50]`.
    pub size_percent: u32,
    /// Caption color.
    pub color: Rgb,
    /// Padding around the text bounding box for the background rect.
    #[serde(default)]
    pub background_padding: u32,
    /// Whether to paint an opaque background rect beneath the caption.
    #[serde(default)]
    pub show_background: bool,
    /// Optional font file; a miss recovers to the system sans-serif.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl TextOverlaySpec {
    /// Check field ranges; empty text or an out-of-range size blocks the render.
    pub fn validate(&self) -> QrStyleResult<()> {
        if self.text.trim().is_empty() {
            return Err(QrStyleError::validation("caption text must be non-empty"));
        }
        if !(5..=50).contains(&self.size_percent) {
            return Err(QrStyleError::validation(format!(
                "caption size_percent must be in [5, 50], got {}",
                self.size_percent
            )));
        }
        Ok(())
    }
}

/// One decoration layer; layers are applied in list order, later layers win
/// visually on overlap. Default order is logo first, caption second.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OverlayLayer {
    /// Center logo.
    Logo(LogoOverlaySpec),
    /// Center caption.
    Caption(TextOverlaySpec),
}

impl OverlayLayer {
    /// Validate the contained spec.
    pub fn validate(&self) -> QrStyleResult<()> {
        match self {
            OverlayLayer::Logo(spec) => spec.validate(),
            OverlayLayer::Caption(spec) => spec.validate(),
        }
    }
}

/// A raster image owned by the pipeline.
///
/// `data` is premultiplied RGBA8, row-major, tightly packed. The composited
/// symbol is fully opaque, so premultiplied equals straight alpha at the
/// serialization boundary.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SymbolImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, row-major.
    pub data: Vec<u8>,
}

impl SymbolImage {
    /// Build from premultiplied RGBA8 bytes; the length must match.
    pub fn from_premul_bytes(width: u32, height: u32, data: Vec<u8>) -> QrStyleResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if data.len() != expected {
            return Err(QrStyleError::validation(format!(
                "image byte length {} does not match {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Uniformly filled image.
    pub fn new_filled(width: u32, height: u32, px: [u8; 4]) -> Self {
        let n = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(n * 4);
        for _ in 0..n {
            data.extend_from_slice(&px);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Pixel at `(x, y)`; callers must stay in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Copy of the sub-rectangle, clamped to bounds.
    pub fn cropped(&self, rect: CropRect) -> QrStyleResult<SymbolImage> {
        if rect.x >= self.width || rect.y >= self.height {
            return Err(QrStyleError::validation("crop rect origin outside image"));
        }
        let w = rect.width.min(self.width - rect.x);
        let h = rect.height.min(self.height - rect.y);
        if w == 0 || h == 0 {
            return Err(QrStyleError::validation("crop rect must be non-empty"));
        }
        let mut data = Vec::with_capacity((w as usize) * (h as usize) * 4);
        for row in rect.y..rect.y + h {
            let start = ((row as usize) * (self.width as usize) + (rect.x as usize)) * 4;
            data.extend_from_slice(&self.data[start..start + (w as usize) * 4]);
        }
        SymbolImage::from_premul_bytes(w, h, data)
    }

    /// Resample to the target size with a Lanczos3 filter.
    pub fn resized(&self, width: u32, height: u32) -> QrStyleResult<SymbolImage> {
        if width == 0 || height == 0 {
            return Err(QrStyleError::validation("resize target must be non-empty"));
        }
        if width == self.width && height == self.height {
            return Ok(self.clone());
        }
        let buf = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| QrStyleError::validation("image buffer length mismatch"))?;
        let out =
            image::imageops::resize(&buf, width, height, image::imageops::FilterType::Lanczos3);
        SymbolImage::from_premul_bytes(width, height, out.into_raw())
    }
}
