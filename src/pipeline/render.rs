//! PDF rasterisation via pdfium.
//!
//! `pdfium-render` wraps the pdfium C++ library, which is not safe to drive
//! from async contexts. Everything here is blocking; the async entry points
//! in [`crate::convert`] run it inside `tokio::task::spawn_blocking`.
//!
//! Binding the library is a one-time step per run ([`bind_pdfium`]); the
//! bound [`Pdfium`] is passed into [`open_document`] rather than held as
//! global state.

use super::input::PdfSource;
use super::renderer::{PageRenderer, RasterSurface};
use crate::error::{Pdf2JpgError, RenderError};
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bind to the pdfium shared library.
///
/// Resolution order: `PDFIUM_LIB_PATH` (a library file or the directory
/// holding it), then the working directory, then the system library path.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2JpgError> {
    let bindings = match std::env::var_os("PDFIUM_LIB_PATH") {
        Some(path) => {
            let path = PathBuf::from(path);
            let lib = if path.is_dir() {
                Pdfium::pdfium_platform_library_name_at_path(&path)
            } else {
                path
            };
            debug!("Binding pdfium from {}", lib.display());
            Pdfium::bind_to_library(&lib)
        }
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    };

    bindings
        .map(Pdfium::new)
        .map_err(|e| Pdf2JpgError::PdfiumBindingFailed(format!("{e:?}")))
}

/// Open a document, mapping pdfium load failures onto our error kinds.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    source: &PdfSource,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2JpgError> {
    let loaded = match source {
        PdfSource::File(path) => pdfium.load_pdf_from_file(path, password),
        PdfSource::Bytes { data, .. } => pdfium.load_pdf_from_byte_vec(data.clone(), password),
    };

    loaded.map_err(|e| load_error(&source.display_path(), password, e))
}

fn load_error(path: &Path, password: Option<&str>, e: PdfiumError) -> Pdf2JpgError {
    let err_str = format!("{:?}", e);
    if err_str.contains("Password") || err_str.contains("password") {
        if password.is_some() {
            Pdf2JpgError::WrongPassword {
                path: path.to_path_buf(),
            }
        } else {
            Pdf2JpgError::PasswordRequired {
                path: path.to_path_buf(),
            }
        }
    } else {
        Pdf2JpgError::CorruptPdf {
            path: path.to_path_buf(),
            detail: err_str,
        }
    }
}

/// [`PageRenderer`] over an opened pdfium document.
pub struct PdfiumRenderer<'a> {
    document: PdfDocument<'a>,
    page_count: usize,
}

impl<'a> PdfiumRenderer<'a> {
    pub fn new(document: PdfDocument<'a>) -> Self {
        let page_count = document.pages().len() as usize;
        info!("PDF loaded: {} pages", page_count);
        Self {
            document,
            page_count,
        }
    }

    /// Read the document information dictionary.
    pub fn metadata(&self) -> DocumentMetadata {
        let metadata = self.document.metadata();

        let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
            metadata.get(tag).and_then(|t| {
                let v = t.value().to_string();
                if v.is_empty() {
                    None
                } else {
                    Some(v)
                }
            })
        };

        DocumentMetadata {
            title: get_meta(PdfDocumentMetadataTagType::Title),
            author: get_meta(PdfDocumentMetadataTagType::Author),
            subject: get_meta(PdfDocumentMetadataTagType::Subject),
            creator: get_meta(PdfDocumentMetadataTagType::Creator),
            producer: get_meta(PdfDocumentMetadataTagType::Producer),
            creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
            modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
            page_count: self.page_count,
            pdf_version: format!("{:?}", self.document.version()),
        }
    }
}

impl PageRenderer for PdfiumRenderer<'_> {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn render_page(&self, page_num: usize, scale_factor: f32) -> Result<RasterSurface, RenderError> {
        if page_num == 0 || page_num > self.page_count {
            return Err(RenderError::PageNotFound {
                page: page_num,
                total: self.page_count,
            });
        }

        let page = self
            .document
            .pages()
            .get((page_num - 1) as u16)
            .map_err(|e| RenderError::RenderFailed(format!("{:?}", e)))?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale_factor);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| RenderError::RenderFailed(format!("{:?}", e)))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px (scale {})",
            page_num,
            image.width(),
            image.height(),
            scale_factor
        );

        Ok(RasterSurface::new(image))
    }
}

/// Blocking metadata extraction, without rendering any page.
pub fn extract_metadata_blocking(
    source: &PdfSource,
    password: Option<&str>,
) -> Result<DocumentMetadata, Pdf2JpgError> {
    let pdfium = bind_pdfium()?;
    let document = open_document(&pdfium, source, password)?;
    let metadata = PdfiumRenderer::new(document).metadata();
    Ok(metadata)
}
