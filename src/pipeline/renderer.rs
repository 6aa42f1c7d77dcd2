//! The page-renderer boundary.
//!
//! The pipeline never talks to a PDF engine directly. It drives a
//! [`PageRenderer`], which turns a page number and scale factor into a
//! [`RasterSurface`] and a surface into encoded bytes. The pdfium-backed
//! implementation lives in [`super::render`]; tests substitute stubs.

use crate::error::RenderError;
use image::DynamicImage;

/// An in-memory pixel buffer holding one rendered page.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: DynamicImage,
}

impl RasterSurface {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }
}

impl From<DynamicImage> for RasterSurface {
    fn from(image: DynamicImage) -> Self {
        Self::new(image)
    }
}

/// Renders pages of one opened document.
///
/// Implementations are assumed single-flight: the pipeline never calls two
/// methods concurrently on the same renderer.
pub trait PageRenderer {
    /// Number of pages in the document.
    fn page_count(&self) -> usize;

    /// Rasterise the 1-based page `page_num` at `scale_factor` times its
    /// natural size.
    fn render_page(&self, page_num: usize, scale_factor: f32) -> Result<RasterSurface, RenderError>;

    /// Encode a surface as JPEG at `compression_level` (`0.0..=1.0`).
    fn encode(&self, surface: &RasterSurface, compression_level: f32) -> Result<Vec<u8>, RenderError> {
        super::encode::encode_jpeg(surface, compression_level)
    }
}

impl<R: PageRenderer + ?Sized> PageRenderer for &R {
    fn page_count(&self) -> usize {
        (**self).page_count()
    }

    fn render_page(&self, page_num: usize, scale_factor: f32) -> Result<RasterSurface, RenderError> {
        (**self).render_page(page_num, scale_factor)
    }

    fn encode(&self, surface: &RasterSurface, compression_level: f32) -> Result<Vec<u8>, RenderError> {
        (**self).encode(surface, compression_level)
    }
}
