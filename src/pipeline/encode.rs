//! Image encoding: `RasterSurface` → JPEG bytes.
//!
//! JPEG has no alpha channel, so surfaces are flattened onto white first.
//! pdfium renders transparent regions (no page background) as zero alpha;
//! dropping alpha directly would turn them black.

use super::renderer::RasterSurface;
use crate::error::RenderError;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Rgb, RgbImage};
use tracing::debug;

/// Encode a rendered page as JPEG at `compression_level` (`0.0..=1.0`).
pub fn encode_jpeg(surface: &RasterSurface, compression_level: f32) -> Result<Vec<u8>, RenderError> {
    if !(0.0..=1.0).contains(&compression_level) {
        return Err(RenderError::EncodeFailed(format!(
            "compression level {compression_level} outside 0.0..=1.0"
        )));
    }
    if surface.width() == 0 || surface.height() == 0 {
        return Err(RenderError::EncodeFailed("surface is empty".into()));
    }

    let quality = quality_percent(compression_level);
    let rgb = flatten_on_white(surface.image());

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode_image(&rgb)
        .map_err(|e| RenderError::EncodeFailed(e.to_string()))?;

    debug!(
        "Encoded {}x{} surface → {} bytes JPEG (q={})",
        rgb.width(),
        rgb.height(),
        buf.len(),
        quality
    );
    Ok(buf)
}

/// Map a `0.0..=1.0` compression level onto the encoder's 1–100 scale.
pub(crate) fn quality_percent(compression_level: f32) -> u8 {
    (compression_level * 100.0).round().clamp(1.0, 100.0) as u8
}

fn flatten_on_white(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u16;
        let blend = |c: u8| ((c as u16 * a + 255 * (255 - a)) / 255) as u8;
        Rgb([blend(r), blend(g), blend(b)])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn surface(px: Rgba<u8>) -> RasterSurface {
        RasterSurface::new(DynamicImage::ImageRgba8(RgbaImage::from_pixel(16, 16, px)))
    }

    #[test]
    fn encode_small_image() {
        let bytes = encode_jpeg(&surface(Rgba([255, 0, 0, 255])), 0.85).expect("encode should succeed");
        // JPEG SOI marker
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let decoded = image::load_from_memory(&bytes).expect("valid jpeg");
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }

    #[test]
    fn transparent_becomes_white() {
        let bytes = encode_jpeg(&surface(Rgba([0, 0, 0, 0])), 0.95).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        let [r, g, b] = decoded.get_pixel(8, 8).0;
        assert!(r > 240 && g > 240 && b > 240, "got {r},{g},{b}");
    }

    #[test]
    fn lower_level_is_not_larger() {
        let img = RgbaImage::from_fn(64, 64, |x, y| Rgba([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8, 255]));
        let s = RasterSurface::new(DynamicImage::ImageRgba8(img));
        let high = encode_jpeg(&s, 0.95).unwrap();
        let low = encode_jpeg(&s, 0.75).unwrap();
        assert!(low.len() <= high.len());
    }

    #[test]
    fn rejects_out_of_range_level() {
        let err = encode_jpeg(&surface(Rgba([0, 0, 0, 255])), 1.5).unwrap_err();
        assert!(matches!(err, RenderError::EncodeFailed(_)));
    }

    #[test]
    fn rejects_empty_surface() {
        let s = RasterSurface::new(DynamicImage::ImageRgb8(RgbImage::new(0, 0)));
        assert!(encode_jpeg(&s, 0.8).is_err());
    }
}
