use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context as _;
use clap::Parser;

use qrstyle::{
    CropRect, EccLevel, LogoOverlaySpec, ModuleStyle, Rgb, StyleConfig, TextOverlaySpec, assets,
    pipeline::RenderRequest, render_styled,
};

#[derive(Parser, Debug)]
#[command(name = "qrstyle", version, about = "Render a styled QR symbol to a PNG")]
struct Cli {
    /// Content to encode (URL or text).
    #[arg(long, required_unless_present = "request")]
    content: Option<String>,

    /// Full render request as a JSON file; overrides all styling flags.
    #[arg(long, conflicts_with = "content")]
    request: Option<PathBuf>,

    /// Output PNG path; defaults to the suggested download name.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Error-correction level (l/m/q/h); omitted means auto.
    #[arg(long)]
    ecc: Option<String>,

    /// Fixed grid version (1..=40); omitted lets the encoder choose.
    #[arg(long = "qr-version")]
    fixed_version: Option<i16>,

    /// Foreground color, hex RGB.
    #[arg(long, default_value = "#000000")]
    fill: String,

    /// Background color, hex RGB.
    #[arg(long, default_value = "#ffffff")]
    back: String,

    /// Module drawing style (square/circle/rounded).
    #[arg(long, default_value = "square")]
    style: String,

    /// Native pixels per module.
    #[arg(long, default_value_t = 10)]
    box_size: u32,

    /// Quiet-zone width in modules.
    #[arg(long, default_value_t = 4)]
    border: u32,

    /// Post-scale square canvas side in pixels.
    #[arg(long)]
    canvas: Option<u32>,

    /// Logo image file to place in the center.
    #[arg(long)]
    logo: Option<PathBuf>,

    /// Logo side as percent of canvas width (10..=40).
    #[arg(long, default_value_t = 20)]
    logo_size: u32,

    /// Mask the logo to a circle.
    #[arg(long, default_value_t = false)]
    logo_round: bool,

    /// Crop rect applied to the logo before resizing, as `x,y,w,h`.
    #[arg(long)]
    logo_crop: Option<String>,

    /// Center caption text.
    #[arg(long)]
    caption: Option<String>,

    /// Caption font size as percent of canvas width (5..=50).
    #[arg(long, default_value_t = 10)]
    caption_size: u32,

    /// Caption color, hex RGB.
    #[arg(long, default_value = "#000000")]
    caption_color: String,

    /// Padding around the caption for its background rect.
    #[arg(long, default_value_t = 4)]
    caption_padding: u32,

    /// Paint an opaque background rect beneath the caption.
    #[arg(long, default_value_t = false)]
    caption_background: bool,

    /// Font file for the caption; a miss falls back to sans-serif.
    #[arg(long)]
    caption_font: Option<PathBuf>,

    /// Apply the caption before the logo (logo visually wins on overlap).
    #[arg(long, default_value_t = false)]
    caption_first: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let req = match &cli.request {
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read request '{}'", path.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parse request '{}'", path.display()))?
        }
        None => request_from_flags(&cli)?,
    };

    let image = render_styled(&req)?;
    let png = assets::encode_png(&image)?;

    let out = cli
        .out
        .unwrap_or_else(|| PathBuf::from(assets::suggested_filename()));
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
    }
    std::fs::write(&out, png).with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn request_from_flags(cli: &Cli) -> anyhow::Result<RenderRequest> {
    let content = cli
        .content
        .clone()
        .unwrap_or_default();

    let style = StyleConfig {
        fill: Rgb::from_str(&cli.fill)?,
        back: Rgb::from_str(&cli.back)?,
        module_style: ModuleStyle::from_str(&cli.style)?,
        box_size_px: cli.box_size,
        canvas_size_px: cli.canvas,
        border_modules: cli.border,
    };

    let logo = match &cli.logo {
        None => None,
        Some(path) => {
            let bytes = std::fs::read(path)
                .with_context(|| format!("read logo '{}'", path.display()))?;
            Some(LogoOverlaySpec {
                image: assets::decode_logo(&bytes)?,
                size_percent: cli.logo_size,
                round: cli.logo_round,
                crop: cli.logo_crop.as_deref().map(parse_crop).transpose()?,
            })
        }
    };

    let caption = cli.caption.as_ref().map(|text| {
        Ok::<_, anyhow::Error>(TextOverlaySpec {
            text: text.clone(),
            size_percent: cli.caption_size,
            color: Rgb::from_str(&cli.caption_color)?,
            background_padding: cli.caption_padding,
            show_background: cli.caption_background,
            font_path: cli.caption_font.clone(),
        })
    });
    let caption = caption.transpose()?;

    let ecc = cli.ecc.as_deref().map(EccLevel::from_str).transpose()?;

    let mut req = RenderRequest {
        content,
        style,
        ecc,
        fixed_version: cli.fixed_version,
        overlays: Vec::new(),
    }
    .with_decoration(logo, caption);
    if cli.caption_first {
        req.overlays.reverse();
    }
    Ok(req)
}

fn parse_crop(s: &str) -> anyhow::Result<CropRect> {
    let parts: Vec<u32> = s
        .split(',')
        .map(|p| p.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .with_context(|| format!("parse crop rect '{s}' (expected x,y,w,h)"))?;
    let [x, y, width, height] = parts[..] else {
        anyhow::bail!("crop rect '{s}' must have exactly four components");
    };
    Ok(CropRect {
        x,
        y,
        width,
        height,
    })
}
