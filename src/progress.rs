//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline processes each page.
//!
//! Pages are converted one at a time in ascending order, so events arrive in
//! page order and `on_page_complete` sees a strictly increasing `current`.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2jpg::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::Arc;
//!
//! struct PrintProgress;
//!
//! impl ConversionProgressCallback for PrintProgress {
//!     fn on_page_complete(&self, current: usize, total: usize, page_num: usize, bytes: usize) {
//!         eprintln!("{current}/{total}: page {page_num} ({bytes} bytes)");
//!     }
//! }
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(Arc::new(PrintProgress))
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;
use tracing::{info, warn};

/// Called by the conversion pipeline as it processes each page.
///
/// Callbacks run on the rendering thread between pages; a slow callback
/// delays the next page. All methods default to no-ops.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any page is rendered.
    ///
    /// # Arguments
    /// * `total_pages`: number of pages that will be processed
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called just before a page is rendered.
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page has been rendered and encoded.
    ///
    /// # Arguments
    /// * `current`    : 1-based count of pages completed so far
    /// * `total_pages`: number of pages in this run
    /// * `page_num`   : 1-based page number in the document
    /// * `jpeg_bytes` : size of the encoded image
    fn on_page_complete(&self, current: usize, total_pages: usize, page_num: usize, jpeg_bytes: usize) {
        let _ = (current, total_pages, page_num, jpeg_bytes);
    }

    /// Called when a page fails. The run aborts right after this call.
    fn on_page_error(&self, page_num: usize, total_pages: usize, error: &str) {
        let _ = (page_num, total_pages, error);
    }

    /// Called once after every page converted successfully.
    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        let _ = (total_pages, success_count);
    }
}

/// Ignores every event.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Turns progress events into `tracing` records under the
/// `pdf2jpg::progress` target. Useful when no terminal bar is drawn.
#[derive(Debug, Default)]
pub struct TracingProgressCallback;

impl ConversionProgressCallback for TracingProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        info!(target: "pdf2jpg::progress", total_pages, "conversion started");
    }

    fn on_page_complete(&self, current: usize, total_pages: usize, page_num: usize, jpeg_bytes: usize) {
        info!(
            target: "pdf2jpg::progress",
            page = page_num,
            jpeg_bytes,
            "{current}/{total_pages} pages converted"
        );
    }

    fn on_page_error(&self, page_num: usize, _total_pages: usize, error: &str) {
        warn!(target: "pdf2jpg::progress", page = page_num, "page failed: {error}");
    }

    fn on_conversion_complete(&self, total_pages: usize, success_count: usize) {
        info!(target: "pdf2jpg::progress", total_pages, success_count, "conversion finished");
    }
}

/// What [`crate::config::ConversionConfig`] stores.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
