//! Result types of a conversion run.

use crate::delivery;
use crate::preview::{PreviewHandle, PreviewRegistry};
use crate::quality::QualityTier;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One converted page: JPEG bytes, page number, and its preview URL.
///
/// Read-only once created. The preview URL is revoked when the page is
/// dropped, or earlier via [`ConvertedPage::release_preview`].
#[derive(Debug)]
pub struct ConvertedPage {
    page_num: usize,
    jpeg: Arc<[u8]>,
    preview: Option<PreviewHandle>,
}

impl ConvertedPage {
    /// Wrap encoded bytes and register their preview in `previews`.
    pub fn new(page_num: usize, jpeg: Vec<u8>, previews: &PreviewRegistry) -> Self {
        let jpeg: Arc<[u8]> = Arc::from(jpeg);
        let preview = previews.register(Arc::clone(&jpeg));
        Self {
            page_num,
            jpeg,
            preview: Some(preview),
        }
    }

    /// 1-based page number in the source document.
    pub fn page_num(&self) -> usize {
        self.page_num
    }

    pub fn jpeg(&self) -> &[u8] {
        &self.jpeg
    }

    /// The preview URL, or `None` once released.
    pub fn preview_url(&self) -> Option<String> {
        self.preview.as_ref().map(PreviewHandle::url)
    }

    /// Revoke the preview URL now. Later calls do nothing.
    pub fn release_preview(&mut self) {
        if let Some(handle) = self.preview.take() {
            handle.revoke();
        }
    }

    /// Download name for this page, e.g. `report_page_3.jpg`.
    pub fn file_name(&self, base_name: &str) -> String {
        delivery::page_file_name(base_name, self.page_num)
    }
}

/// The pages of one run, in ascending page order.
#[derive(Debug, Default)]
pub struct ConvertedPages(Vec<ConvertedPage>);

impl ConvertedPages {
    pub(crate) fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    pub(crate) fn push(&mut self, page: ConvertedPage) {
        debug_assert!(self.0.last().is_none_or(|last| last.page_num < page.page_num));
        self.0.push(page);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConvertedPage> {
        self.0.iter()
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        self.0.iter().map(ConvertedPage::page_num).collect()
    }

    /// Revoke every preview URL without dropping the pages.
    pub fn release_previews(&mut self) {
        self.0.iter_mut().for_each(ConvertedPage::release_preview);
    }

    pub fn total_bytes(&self) -> usize {
        self.0.iter().map(|p| p.jpeg.len()).sum()
    }

    pub fn into_vec(self) -> Vec<ConvertedPage> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ConvertedPages {
    type Item = &'a ConvertedPage;
    type IntoIter = std::slice::Iter<'a, ConvertedPage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Document metadata extracted from the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Timing and size figures for one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    pub quality: QualityTier,
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages selected and converted.
    pub converted_pages: usize,
    pub total_jpeg_bytes: usize,
    pub total_duration_ms: u64,
}

/// Everything a successful run produces.
#[derive(Debug)]
pub struct ConversionOutput {
    /// Source file name with its extension stripped; prefixes download names.
    pub base_name: String,
    pub pages: ConvertedPages,
    pub metadata: DocumentMetadata,
    pub stats: ConversionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_registers_and_releases_preview() {
        let registry = PreviewRegistry::new();
        let mut page = ConvertedPage::new(2, vec![1, 2, 3], &registry);
        let url = page.preview_url().unwrap();
        assert_eq!(registry.resolve(&url).as_deref(), Some(&[1u8, 2, 3][..]));

        page.release_preview();
        assert!(page.preview_url().is_none());
        assert_eq!(registry.live_count(), 0);

        // Second release is a no-op.
        page.release_preview();
        assert_eq!(page.jpeg(), &[1, 2, 3]);
    }

    #[test]
    fn dropping_sequence_revokes_all() {
        let registry = PreviewRegistry::new();
        let mut pages = ConvertedPages::with_capacity(3);
        for n in [1, 4, 9] {
            pages.push(ConvertedPage::new(n, vec![0; n], &registry));
        }
        assert_eq!(pages.page_numbers(), vec![1, 4, 9]);
        assert_eq!(pages.total_bytes(), 14);
        assert_eq!(registry.live_count(), 3);
        drop(pages);
        assert_eq!(registry.live_count(), 0);
    }

    #[test]
    fn release_previews_keeps_bytes() {
        let registry = PreviewRegistry::new();
        let mut pages = ConvertedPages::default();
        pages.push(ConvertedPage::new(1, vec![7], &registry));
        pages.release_previews();
        assert_eq!(registry.live_count(), 0);
        assert_eq!(pages.iter().next().map(ConvertedPage::jpeg), Some(&[7u8][..]));
    }

    #[test]
    fn file_name_uses_page_number() {
        let registry = PreviewRegistry::new();
        let page = ConvertedPage::new(12, vec![], &registry);
        assert_eq!(page.file_name("scan"), "scan_page_12.jpg");
    }
}
