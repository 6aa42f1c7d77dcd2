//! Handing converted pages to the user.
//!
//! Two collaborators do the actual work and are injected so they can be
//! swapped or stubbed:
//!
//! * a [`DownloadSink`] saves one named blob (the CLI writes into a
//!   directory via [`DirectorySink`]);
//! * an [`ArchivePackager`] turns named blobs into one archive
//!   ([`ZipPackager`]).
//!
//! File names are part of the user-facing contract:
//! `{base}_page_{n}.jpg` for single pages and `{base}.zip` for archives.
//! Nothing here retries; the first failure is returned to the caller.

use crate::error::DeliveryError;
use crate::output::{ConvertedPage, ConvertedPages};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Download name for a single page: `report_page_3.jpg`.
pub fn page_file_name(base_name: &str, page_num: usize) -> String {
    format!("{base_name}_page_{page_num}.jpg")
}

/// Download name for an archive of all pages: `report.zip`.
pub fn archive_file_name(base_name: &str) -> String {
    format!("{base_name}.zip")
}

/// Accepts a finished file and saves it for the user.
pub trait DownloadSink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), DeliveryError>;
}

/// Packages named entries into a single archive.
pub trait ArchivePackager {
    fn pack(&self, entries: &[(String, &[u8])]) -> Result<Vec<u8>, DeliveryError>;
}

/// Writes each download into a directory.
///
/// Writes are atomic: the bytes go to a temp file in the same directory,
/// which is then renamed over the target, so a failed write never leaves a
/// truncated image behind.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, file_name: &str, bytes: &[u8]) -> Result<(), DeliveryError> {
        let path = self.dir.join(file_name);
        let write_failed = |source| DeliveryError::WriteFailed {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(write_failed)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir).map_err(write_failed)?;
        tmp.write_all(bytes).map_err(write_failed)?;
        tmp.persist(&path).map_err(|e| write_failed(e.error))?;

        debug!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Zip packager. Entries are stored, not deflated: JPEG data is already
/// compressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipPackager;

impl ArchivePackager for ZipPackager {
    fn pack(&self, entries: &[(String, &[u8])]) -> Result<Vec<u8>, DeliveryError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Stored);

        for (name, bytes) in entries {
            zip.start_file(name.as_str(), options)
                .map_err(archive_failed)?;
            zip.write_all(bytes).map_err(archive_failed)?;
        }

        let cursor = zip.finish().map_err(archive_failed)?;
        Ok(cursor.into_inner())
    }
}

fn archive_failed(e: impl std::fmt::Display) -> DeliveryError {
    DeliveryError::ArchiveFailed(e.to_string())
}

/// Save one page as `{base_name}_page_{n}.jpg`. Returns the file name.
pub fn deliver_one<S: DownloadSink + ?Sized>(
    page: &ConvertedPage,
    base_name: &str,
    sink: &S,
) -> Result<String, DeliveryError> {
    let name = page.file_name(base_name);
    sink.save(&name, page.jpeg())?;
    Ok(name)
}

/// How [`deliver_all`] hands pages over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// One download per page, started `pace` apart.
    Individual { pace: Duration },
    /// One `{base_name}.zip` holding every page.
    Archive,
}

/// Deliver every page, in ascending page order.
///
/// Returns the names of the files handed to the sink.
pub async fn deliver_all<S, P>(
    pages: &ConvertedPages,
    base_name: &str,
    mode: DeliveryMode,
    sink: &S,
    packager: &P,
) -> Result<Vec<String>, DeliveryError>
where
    S: DownloadSink + ?Sized,
    P: ArchivePackager + ?Sized,
{
    match mode {
        DeliveryMode::Individual { pace } => {
            let mut names = Vec::with_capacity(pages.len());
            for (i, page) in pages.iter().enumerate() {
                if i > 0 && !pace.is_zero() {
                    tokio::time::sleep(pace).await;
                }
                names.push(deliver_one(page, base_name, sink)?);
            }
            info!("Delivered {} page image(s)", names.len());
            Ok(names)
        }
        DeliveryMode::Archive => {
            let entries: Vec<(String, &[u8])> = pages
                .iter()
                .map(|p| (p.file_name(base_name), p.jpeg()))
                .collect();
            let archive = packager.pack(&entries)?;
            let name = archive_file_name(base_name);
            sink.save(&name, &archive)?;
            info!(
                "Delivered {} ({} pages, {} bytes)",
                name,
                entries.len(),
                archive.len()
            );
            Ok(vec![name])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preview::PreviewRegistry;
    use std::io::Read;

    fn page(n: usize, registry: &PreviewRegistry) -> ConvertedPage {
        ConvertedPage::new(n, vec![n as u8; 8], registry)
    }

    #[test]
    fn naming_convention() {
        assert_eq!(page_file_name("report", 3), "report_page_3.jpg");
        assert_eq!(page_file_name("my file", 12), "my file_page_12.jpg");
        assert_eq!(archive_file_name("report"), "report.zip");
    }

    #[test]
    fn directory_sink_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path().join("out"));
        sink.save("a.jpg", b"abc").unwrap();
        assert_eq!(std::fs::read(dir.path().join("out/a.jpg")).unwrap(), b"abc");
        // Overwrite in place.
        sink.save("a.jpg", b"xyz").unwrap();
        assert_eq!(std::fs::read(dir.path().join("out/a.jpg")).unwrap(), b"xyz");
    }

    #[test]
    fn directory_sink_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let sink = DirectorySink::new(&blocker);
        let err = sink.save("a.jpg", b"abc").unwrap_err();
        assert!(matches!(err, DeliveryError::WriteFailed { .. }));
        assert!(err.to_string().contains("a.jpg"));
    }

    #[test]
    fn zip_packager_stores_entries_in_order() {
        let entries = vec![
            ("doc_page_1.jpg".to_string(), &b"one"[..]),
            ("doc_page_2.jpg".to_string(), &b"two"[..]),
        ];
        let bytes = ZipPackager.pack(&entries).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);
        let mut first = archive.by_index(0).unwrap();
        assert_eq!(first.name(), "doc_page_1.jpg");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        let mut content = Vec::new();
        first.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"one");
    }

    #[test]
    fn deliver_one_uses_page_name() {
        let registry = PreviewRegistry::new();
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());
        let name = deliver_one(&page(4, &registry), "slides", &sink).unwrap();
        assert_eq!(name, "slides_page_4.jpg");
        assert!(dir.path().join("slides_page_4.jpg").exists());
    }

    #[tokio::test]
    async fn deliver_all_individual_to_directory() {
        let registry = PreviewRegistry::new();
        let mut pages = ConvertedPages::default();
        pages.push(page(1, &registry));
        pages.push(page(3, &registry));
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        let names = deliver_all(
            &pages,
            "r",
            DeliveryMode::Individual { pace: Duration::from_millis(1) },
            &sink,
            &ZipPackager,
        )
        .await
        .unwrap();

        assert_eq!(names, vec!["r_page_1.jpg", "r_page_3.jpg"]);
        assert_eq!(std::fs::read(dir.path().join("r_page_3.jpg")).unwrap(), vec![3u8; 8]);
    }

    #[tokio::test]
    async fn deliver_all_archive_to_directory() {
        let registry = PreviewRegistry::new();
        let mut pages = ConvertedPages::default();
        pages.push(page(2, &registry));
        let dir = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(dir.path());

        let names = deliver_all(&pages, "r", DeliveryMode::Archive, &sink, &ZipPackager)
            .await
            .unwrap();
        assert_eq!(names, vec!["r.zip"]);

        let file = std::fs::File::open(dir.path().join("r.zip")).unwrap();
        let mut archive = zip::ZipArchive::new(file).unwrap();
        assert_eq!(archive.by_index(0).unwrap().name(), "r_page_2.jpg");
    }
}
