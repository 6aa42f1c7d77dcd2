//! # edgequake-pdf2jpg
//!
//! Convert selected pages of a PDF into JPEG images, delivered one file per
//! page or bundled as a single zip archive.
//!
//! ## Pipeline Overview
//!
//! ```text
//! "1-3, 5"          QualityTier
//!     │                  │
//!     ├─ 1. Select   parse the page expression into an ordered PageSet
//!     ├─ 2. Render   rasterise each page via pdfium (spawn_blocking)
//!     ├─ 3. Encode   JPEG at the tier's compression level
//!     ├─ 4. Collect  ConvertedPage per page, progress after each one
//!     └─ 5. Deliver  {name}_page_{n}.jpg files or one {name}.zip
//! ```
//!
//! Pages are processed one at a time in ascending order, and the first page
//! that fails aborts the whole run: a result never silently misses a page.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2jpg::{convert_to_dir, ConversionConfig, PageSelection, QualityTier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .quality(QualityTier::High)
//!         .pages(PageSelection::Expression("1-3, 5".into()))
//!         .as_archive(true)
//!         .build()?;
//!     let (stats, files) = convert_to_dir("report.pdf", "out/", &config).await?;
//!     eprintln!("{} pages → {:?}", stats.converted_pages, files);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2jpg` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-pdf2jpg = { version = "0.1", default-features = false }
//! ```
//!
//! ## Quality Tiers
//!
//! | Tier | Scale | JPEG quality | Typical A4 page |
//! |------|-------|--------------|-----------------|
//! | `high`   | 2.0× | 95 | 1190 × 1684 px |
//! | `medium` | 1.5× | 85 | 893 × 1263 px |
//! | `low`    | 1.0× | 75 | 595 × 842 px |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cancel;
pub mod config;
pub mod convert;
pub mod delivery;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod preview;
pub mod progress;
pub mod quality;
pub mod selection;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cancel::CancelFlag;
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_from_bytes, convert_sync, convert_to_dir, inspect};
pub use delivery::{
    archive_file_name, deliver_all, deliver_one, page_file_name, ArchivePackager, DeliveryMode,
    DirectorySink, DownloadSink, ZipPackager,
};
pub use error::{DeliveryError, Pdf2JpgError, RenderError};
pub use output::{ConversionOutput, ConversionStats, ConvertedPage, ConvertedPages, DocumentMetadata};
pub use pipeline::pages::{convert_page_set, convert_pages};
pub use pipeline::renderer::{PageRenderer, RasterSurface};
pub use preview::{PreviewHandle, PreviewRegistry};
pub use progress::{
    ConversionProgressCallback, NoopProgressCallback, ProgressCallback, TracingProgressCallback,
};
pub use quality::{QualityTier, RenderParameters};
pub use selection::{parse_selection, PageSelection, PageSet};
