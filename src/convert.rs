//! Top-level conversion entry points.
//!
//! Rendering is blocking pdfium work, so each entry point moves the whole
//! open → render → encode run onto `tokio::task::spawn_blocking`. One run
//! owns its document handle from open to close; two runs never share one.

use crate::config::ConversionConfig;
use crate::delivery::{self, DeliveryMode, DirectorySink, ZipPackager};
use crate::error::Pdf2JpgError;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::input::{self, PdfSource};
use crate::pipeline::pages::convert_pages;
use crate::pipeline::render::{self, PdfiumRenderer};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Convert a PDF file to JPEG pages held in memory.
///
/// # Errors
/// - input errors (file not found, not a PDF, wrong password)
/// - [`Pdf2JpgError::ConversionFailed`] naming the first page that failed
/// - [`Pdf2JpgError::Cancelled`] if `config.cancel` was set mid-run
pub async fn convert(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2JpgError> {
    let source = input::resolve_local(input_path)?;
    run(source, config).await
}

/// Convert PDF bytes held in memory.
///
/// `file_name` is only used to derive download names and error messages.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2jpg::{convert_from_bytes, ConversionConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes: Vec<u8> = std::fs::read("document.pdf")?;
/// let output = convert_from_bytes("document.pdf", bytes, &ConversionConfig::default()).await?;
/// for page in output.pages.iter() {
///     println!("{} ({} bytes)", page.file_name(&output.base_name), page.jpeg().len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn convert_from_bytes(
    file_name: impl Into<String>,
    bytes: Vec<u8>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2JpgError> {
    let source = input::from_bytes(file_name, bytes)?;
    run(source, config).await
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2JpgError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2JpgError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(input_path, config))
}

/// Convert a PDF and deliver the pages into `output_dir`.
///
/// Writes `{base}_page_{n}.jpg` per page, or a single `{base}.zip` when
/// `config.as_archive` is set. Returns the run's stats and the written
/// file names.
pub async fn convert_to_dir(
    input_path: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<(ConversionStats, Vec<String>), Pdf2JpgError> {
    let mut output = convert(input_path, config).await?;
    // Nothing is displayed on this path; free the preview URLs right away.
    output.pages.release_previews();

    let mode = if config.as_archive {
        DeliveryMode::Archive
    } else {
        DeliveryMode::Individual {
            pace: config.download_pace(),
        }
    };
    let sink = DirectorySink::new(output_dir.as_ref());
    let files =
        delivery::deliver_all(&output.pages, &output.base_name, mode, &sink, &ZipPackager).await?;

    Ok((output.stats, files))
}

/// Extract PDF metadata without converting content.
pub async fn inspect(
    input_path: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2JpgError> {
    let source = input::resolve_local(input_path)?;
    let password = password.map(str::to_string);
    tokio::task::spawn_blocking(move || {
        render::extract_metadata_blocking(&source, password.as_deref())
    })
    .await
    .map_err(|e| Pdf2JpgError::Internal(format!("Metadata task panicked: {}", e)))?
}

// ── Internal helpers ─────────────────────────────────────────────────────

async fn run(source: PdfSource, config: &ConversionConfig) -> Result<ConversionOutput, Pdf2JpgError> {
    let config = config.clone();
    tokio::task::spawn_blocking(move || run_blocking(&source, &config))
        .await
        .map_err(|e| Pdf2JpgError::Internal(format!("Render task panicked: {}", e)))?
}

fn run_blocking(source: &PdfSource, config: &ConversionConfig) -> Result<ConversionOutput, Pdf2JpgError> {
    let total_start = Instant::now();
    let base_name = source.base_name();
    info!("Starting conversion: {}", source.display_path().display());

    let pdfium = render::bind_pdfium()?;
    let document = render::open_document(&pdfium, source, config.password.as_deref())?;
    let renderer = PdfiumRenderer::new(document);
    let metadata = renderer.metadata();

    let pages = convert_pages(&renderer, config)?;

    let stats = ConversionStats {
        quality: config.quality,
        total_pages: metadata.page_count,
        converted_pages: pages.len(),
        total_jpeg_bytes: pages.total_bytes(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {}/{} pages, {} bytes, {}ms",
        stats.converted_pages, stats.total_pages, stats.total_jpeg_bytes, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        base_name,
        pages,
        metadata,
        stats,
    })
}
