//! Pipeline stages for PDF-to-JPEG conversion.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ pages
//! (path/bytes) (pdfium)  (JPEG)   (ordered, fail-fast loop)
//! ```
//!
//! 1. [`input`]   : validate the user-supplied path or buffer as a PDF
//! 2. [`renderer`]: the [`renderer::PageRenderer`] boundary the loop drives
//! 3. [`render`]  : pdfium implementation of that boundary (blocking)
//! 4. [`encode`]  : JPEG-encode a rendered surface at a compression level
//! 5. [`pages`]   : render → encode → progress, one page at a time

pub mod encode;
pub mod input;
pub mod pages;
pub mod render;
pub mod renderer;
