//! Input resolution: turn what the caller handed us into a [`PdfSource`].
//!
//! Local paths are checked up front (existence, read permission, `%PDF`
//! magic) so callers get a meaningful error instead of a pdfium failure.
//! In-memory buffers get the same magic check.

use crate::error::Pdf2JpgError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// A document ready to be opened by the rendering engine.
#[derive(Debug, Clone)]
pub enum PdfSource {
    /// A validated local file.
    File(PathBuf),
    /// PDF bytes held in memory, with the file name they came from.
    Bytes { name: String, data: Vec<u8> },
}

impl PdfSource {
    /// The path used in error messages.
    pub fn display_path(&self) -> PathBuf {
        match self {
            PdfSource::File(path) => path.clone(),
            PdfSource::Bytes { name, .. } => PathBuf::from(name),
        }
    }

    /// Source file name with its extension stripped: `report.pdf` → `report`.
    pub fn base_name(&self) -> String {
        match self {
            PdfSource::File(path) => base_name(&path.to_string_lossy()),
            PdfSource::Bytes { name, .. } => base_name(name),
        }
    }
}

/// Strip directories and the final extension from a file name.
///
/// Falls back to `"document"` when nothing is left.
pub fn base_name(file_name: &str) -> String {
    let stem = Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem.is_empty() {
        "document".to_string()
    } else {
        stem
    }
}

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_local(path: impl AsRef<Path>) -> Result<PdfSource, Pdf2JpgError> {
    let path = path.as_ref().to_path_buf();

    if !path.exists() {
        return Err(Pdf2JpgError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != PDF_MAGIC {
                return Err(Pdf2JpgError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2JpgError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(Pdf2JpgError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(PdfSource::File(path))
}

/// Wrap an in-memory PDF, checking its magic bytes.
pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<PdfSource, Pdf2JpgError> {
    let name = name.into();
    if data.len() >= 4 && &data[..4] != PDF_MAGIC {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&data[..4]);
        return Err(Pdf2JpgError::NotAPdf {
            path: PathBuf::from(name),
            magic,
        });
    }
    debug!("Resolved in-memory PDF '{}' ({} bytes)", name, data.len());
    Ok(PdfSource::Bytes { name, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn base_name_strips_extension_and_dirs() {
        assert_eq!(base_name("report.pdf"), "report");
        assert_eq!(base_name("/tmp/in/Q3 results.PDF"), "Q3 results");
        assert_eq!(base_name("archive.v2.pdf"), "archive.v2");
        assert_eq!(base_name("noext"), "noext");
        assert_eq!(base_name(""), "document");
    }

    #[test]
    fn missing_file() {
        let err = resolve_local("/definitely/not/here.pdf").unwrap_err();
        assert!(matches!(err, Pdf2JpgError::FileNotFound { .. }));
    }

    #[test]
    fn rejects_non_pdf() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"PK\x03\x04rest").unwrap();
        let err = resolve_local(tmp.path()).unwrap_err();
        match err {
            Pdf2JpgError::NotAPdf { magic, .. } => assert_eq!(&magic, b"PK\x03\x04"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn accepts_pdf_magic() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.7\n").unwrap();
        let source = resolve_local(tmp.path()).unwrap();
        assert!(matches!(source, PdfSource::File(_)));
        assert!(!source.base_name().ends_with(".pdf"));
    }

    #[test]
    fn bytes_source() {
        let source = from_bytes("slides.pdf", b"%PDF-1.4".to_vec()).unwrap();
        assert_eq!(source.base_name(), "slides");
        assert!(from_bytes("x.pdf", b"<html>".to_vec()).is_err());
    }
}
