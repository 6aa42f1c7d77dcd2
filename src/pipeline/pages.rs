//! The per-page conversion loop.
//!
//! Pages are rendered, encoded and wrapped strictly one after another in
//! ascending order: pdfium cannot render two pages of one document at once,
//! and monotonic order is what progress reporting and file naming rely on.
//!
//! The loop is fail-fast. The first page that fails aborts the run with
//! [`Pdf2JpgError::ConversionFailed`]; pages converted before it are dropped,
//! which revokes their preview URLs. Cancellation is checked before each
//! render and ends the run with [`Pdf2JpgError::Cancelled`].

use super::renderer::PageRenderer;
use crate::config::ConversionConfig;
use crate::error::Pdf2JpgError;
use crate::output::{ConvertedPage, ConvertedPages};
use crate::progress::ConversionProgressCallback;
use crate::selection::PageSet;
use tracing::{debug, info, warn};

/// Convert the pages chosen by `config.pages` using `renderer`.
///
/// Returns the converted pages in ascending page order. An empty selection
/// yields an empty sequence, not an error.
pub fn convert_pages<R: PageRenderer + ?Sized>(
    renderer: &R,
    config: &ConversionConfig,
) -> Result<ConvertedPages, Pdf2JpgError> {
    let pages = config.pages.resolve(renderer.page_count());
    convert_page_set(renderer, &pages, config)
}

/// Convert exactly the pages in `pages`.
pub fn convert_page_set<R: PageRenderer + ?Sized>(
    renderer: &R,
    pages: &PageSet,
    config: &ConversionConfig,
) -> Result<ConvertedPages, Pdf2JpgError> {
    let params = config.quality.render_parameters();
    let total = pages.len();
    let progress = config.progress_callback.as_deref();

    if pages.is_empty() {
        info!("No pages selected; nothing to convert");
    } else {
        info!(
            "Converting {} page(s) [{}] at {} quality",
            total, pages, config.quality
        );
    }

    if let Some(cb) = progress {
        cb.on_conversion_start(total);
    }

    let mut converted = ConvertedPages::with_capacity(total);

    for page_num in pages.iter() {
        if config.cancel.is_cancelled() {
            warn!("Conversion cancelled before page {}", page_num);
            return Err(Pdf2JpgError::Cancelled {
                completed: converted.len(),
            });
        }

        if let Some(cb) = progress {
            cb.on_page_start(page_num, total);
        }

        let jpeg = renderer
            .render_page(page_num, params.scale_factor)
            .and_then(|surface| renderer.encode(&surface, params.compression_level));

        let jpeg = match jpeg {
            Ok(bytes) => bytes,
            Err(source) => {
                warn!("Page {} failed: {}", page_num, source);
                report_error(progress, page_num, total, &source.to_string());
                return Err(Pdf2JpgError::ConversionFailed {
                    page: page_num,
                    source,
                });
            }
        };

        let size = jpeg.len();
        converted.push(ConvertedPage::new(page_num, jpeg, &config.previews));
        debug!("Page {} → {} bytes", page_num, size);

        if let Some(cb) = progress {
            cb.on_page_complete(converted.len(), total, page_num, size);
        }
    }

    if let Some(cb) = progress {
        cb.on_conversion_complete(total, converted.len());
    }

    Ok(converted)
}

fn report_error(
    progress: Option<&dyn ConversionProgressCallback>,
    page_num: usize,
    total: usize,
    error: &str,
) {
    if let Some(cb) = progress {
        cb.on_page_error(page_num, total, error);
    }
}
