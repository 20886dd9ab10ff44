//! Asset I/O shim at the pipeline boundary.
//!
//! Decoding an uploaded logo and serializing the final raster both live here;
//! the renderer and compositor never perform file or network IO themselves.
//! A failed logo decode blocks the render: the caller asked for a logo, so a
//! symbol without one would be a wrong answer.

use std::io::Cursor;

use anyhow::Context as _;

use crate::foundation::color::premultiply_rgba8_in_place;
use crate::foundation::error::{QrStyleError, QrStyleResult};
use crate::model::SymbolImage;

/// Decode uploaded image bytes into a premultiplied RGBA8 bitmap.
pub fn decode_logo(bytes: &[u8]) -> QrStyleResult<SymbolImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| QrStyleError::asset_decode(format!("decode logo image: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);
    SymbolImage::from_premul_bytes(width, height, data)
}

/// Encode the composed raster as lossless PNG bytes.
///
/// Composited output is fully opaque, so the premultiplied buffer can be
/// emitted as-is.
pub fn encode_png(img: &SymbolImage) -> QrStyleResult<Vec<u8>> {
    let buf = image::RgbaImage::from_raw(img.width, img.height, img.data.clone())
        .ok_or_else(|| QrStyleError::validation("image buffer length mismatch"))?;

    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(buf)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(out)
}

/// Suggested download filename for the serialized symbol.
pub fn suggested_filename() -> &'static str {
    "qrcode.png"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_logo_premultiplies() {
        let img = image::RgbaImage::from_raw(1, 1, vec![100, 50, 200, 128]).unwrap();
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let decoded = decode_logo(&png).unwrap();
        assert_eq!((decoded.width, decoded.height), (1, 1));
        assert_eq!(
            decoded.data,
            vec![
                ((100u16 * 128 + 127) / 255) as u8,
                ((50u16 * 128 + 127) / 255) as u8,
                ((200u16 * 128 + 127) / 255) as u8,
                128
            ]
        );
    }

    #[test]
    fn decode_logo_rejects_garbage() {
        assert!(matches!(
            decode_logo(b"not an image"),
            Err(QrStyleError::AssetDecode(_))
        ));
    }

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let img = SymbolImage::new_filled(3, 2, [1, 2, 3, 255]);
        let png = encode_png(&img).unwrap();
        let back = decode_logo(&png).unwrap();
        assert_eq!(back, img);
    }
}
