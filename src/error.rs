//! Error types for the edgequake-pdf2jpg library.
//!
//! Three error types map onto three stages of a run:
//!
//! * [`RenderError`]: a single page could not be rendered or encoded. It is
//!   produced by a [`crate::pipeline::renderer::PageRenderer`] and never
//!   escapes the pipeline on its own: the pipeline wraps it into
//!   [`Pdf2JpgError::ConversionFailed`] together with the offending page.
//!
//! * [`DeliveryError`]: writing a file or packaging the archive failed.
//!   Delivery is a terminal user action, so nothing is retried.
//!
//! * [`Pdf2JpgError`]: **Fatal**: returned by every top-level entry point.
//!   A run either yields every selected page or fails; there is no partial
//!   success.
//!
//! Malformed page-selection tokens are deliberately *not* errors: they are
//! dropped by [`crate::selection::parse_selection`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2jpg library.
#[derive(Debug, Error)]
pub enum Pdf2JpgError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// A page failed to render or encode; the whole run was aborted.
    #[error("Conversion failed on page {page}: {source}")]
    ConversionFailed {
        page: usize,
        #[source]
        source: RenderError,
    },

    /// The run was cancelled before every page was converted.
    #[error("Conversion cancelled after {completed} page(s)")]
    Cancelled { completed: usize },

    // ── Delivery errors ───────────────────────────────────────────────────
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium for your platform, or set PDFIUM_LIB_PATH to the directory\n\
containing an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2JpgError {
    /// The page that aborted the run, if this is a page-level failure.
    pub fn failed_page(&self) -> Option<usize> {
        match self {
            Pdf2JpgError::ConversionFailed { page, .. } => Some(*page),
            _ => None,
        }
    }
}

/// A failure of the page renderer for one page.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    /// The document has no page at this index.
    #[error("page {page} does not exist (document has {total} pages)")]
    PageNotFound { page: usize, total: usize },

    /// The engine could not rasterise the page.
    #[error("rasterisation failed: {0}")]
    RenderFailed(String),

    /// The raster surface could not be encoded.
    #[error("image encoding failed: {0}")]
    EncodeFailed(String),
}

/// A failure while handing artifacts to the user.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Could not create or write an output file.
    #[error("Failed to write '{path}': {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The archive packager rejected the entries.
    #[error("Failed to build archive: {0}")]
    ArchiveFailed(String),
}
