use crate::model::SymbolImage;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Porter-Duff source-over on premultiplied pixels.
pub fn over(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }

    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

/// Source-over blend `src` onto `dst` at offset `(ox, oy)`, clipping to the
/// destination bounds.
pub fn blit_over(dst: &mut SymbolImage, src: &SymbolImage, ox: i64, oy: i64) {
    for sy in 0..src.height {
        let dy = oy + i64::from(sy);
        if dy < 0 || dy >= i64::from(dst.height) {
            continue;
        }
        for sx in 0..src.width {
            let dx = ox + i64::from(sx);
            if dx < 0 || dx >= i64::from(dst.width) {
                continue;
            }
            let si = ((sy as usize) * (src.width as usize) + (sx as usize)) * 4;
            let di = ((dy as usize) * (dst.width as usize) + (dx as usize)) * 4;
            let s = [
                src.data[si],
                src.data[si + 1],
                src.data[si + 2],
                src.data[si + 3],
            ];
            let d = [
                dst.data[di],
                dst.data[di + 1],
                dst.data[di + 2],
                dst.data[di + 3],
            ];
            dst.data[di..di + 4].copy_from_slice(&over(d, s));
        }
    }
}

/// Overwrite a rectangle with an opaque pixel, clipping to bounds.
pub fn fill_rect(dst: &mut SymbolImage, x0: i64, y0: i64, x1: i64, y1: i64, px: PremulRgba8) {
    let x0 = x0.clamp(0, i64::from(dst.width));
    let y0 = y0.clamp(0, i64::from(dst.height));
    let x1 = x1.clamp(0, i64::from(dst.width));
    let y1 = y1.clamp(0, i64::from(dst.height));
    for y in y0..y1 {
        for x in x0..x1 {
            let i = ((y as usize) * (dst.width as usize) + (x as usize)) * 4;
            dst.data[i..i + 4].copy_from_slice(&px);
        }
    }
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
