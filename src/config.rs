//! Configuration types for PDF-to-JPEG conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The builder lets callers set only
//! what they care about and rely on documented defaults for the rest.

use crate::cancel::CancelFlag;
use crate::error::Pdf2JpgError;
use crate::preview::PreviewRegistry;
use crate::progress::ProgressCallback;
use crate::quality::QualityTier;
use crate::selection::PageSelection;
use std::fmt;
use std::time::Duration;

/// Upper bound for the pause between individual downloads.
const MAX_DOWNLOAD_PACE_MS: u64 = 10_000;

/// Configuration for a PDF-to-JPEG conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2jpg::{ConversionConfig, PageSelection, QualityTier};
///
/// let config = ConversionConfig::builder()
///     .quality(QualityTier::High)
///     .pages(PageSelection::Expression("1-3, 5".into()))
///     .as_archive(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Output quality. Default: [`QualityTier::Medium`].
    pub quality: QualityTier,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Deliver one zip archive instead of one file per page. Default: false.
    pub as_archive: bool,

    /// Pause between consecutive individual downloads, in milliseconds. Default: 300.
    ///
    /// Only applies when `as_archive` is false.
    pub download_pace_ms: u64,

    /// Optional per-page progress callback.
    pub progress_callback: Option<ProgressCallback>,

    /// Checked before each page; set it to stop the run.
    pub cancel: CancelFlag,

    /// Table that converted pages register their preview URLs in.
    pub previews: PreviewRegistry,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            quality: QualityTier::default(),
            pages: PageSelection::default(),
            password: None,
            as_archive: false,
            download_pace_ms: 300,
            progress_callback: None,
            cancel: CancelFlag::default(),
            previews: PreviewRegistry::default(),
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("quality", &self.quality)
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("as_archive", &self.as_archive)
            .field("download_pace_ms", &self.download_pace_ms)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    pub fn download_pace(&self) -> Duration {
        Duration::from_millis(self.download_pace_ms)
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn quality(mut self, tier: QualityTier) -> Self {
        self.config.quality = tier;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn as_archive(mut self, v: bool) -> Self {
        self.config.as_archive = v;
        self
    }

    pub fn download_pace_ms(mut self, ms: u64) -> Self {
        self.config.download_pace_ms = ms;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    pub fn cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.config.cancel = flag;
        self
    }

    pub fn previews(mut self, registry: PreviewRegistry) -> Self {
        self.config.previews = registry;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2JpgError> {
        let c = &self.config;
        if c.download_pace_ms > MAX_DOWNLOAD_PACE_MS {
            return Err(Pdf2JpgError::InvalidConfig(format!(
                "Download pace must be at most {MAX_DOWNLOAD_PACE_MS}ms, got {}",
                c.download_pace_ms
            )));
        }
        if let PageSelection::Expression(expr) = &c.pages {
            if expr.trim().is_empty() {
                return Err(Pdf2JpgError::InvalidConfig(
                    "Page selection expression is empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}
