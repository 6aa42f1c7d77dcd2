//! Display surrogates for converted pages.
//!
//! A converted page can be shown on screen through a lightweight
//! `preview://` URL that resolves to its JPEG bytes. The URL stays resolvable
//! until its [`PreviewHandle`] is released, which happens exactly once:
//! either explicitly via [`PreviewHandle::revoke`] or when the handle is
//! dropped together with its page.
//!
//! The [`PreviewRegistry`] is the table those URLs resolve against. It is
//! created once and injected through [`crate::ConversionConfig`]; cloning it
//! shares the same table.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;

const URL_PREFIX: &str = "preview://page/";

#[derive(Default)]
struct RegistryInner {
    next_id: AtomicU64,
    entries: Mutex<HashMap<u64, Arc<[u8]>>>,
}

/// Table of live preview URLs.
#[derive(Clone, Default)]
pub struct PreviewRegistry {
    inner: Arc<RegistryInner>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `bytes` and return the handle owning the new URL.
    pub fn register(&self, bytes: Arc<[u8]>) -> PreviewHandle {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.entries().insert(id, bytes);
        PreviewHandle {
            id,
            registry: self.clone(),
            revoked: false,
        }
    }

    /// Look up the bytes behind a preview URL, if it is still live.
    pub fn resolve(&self, url: &str) -> Option<Arc<[u8]>> {
        let id = url.strip_prefix(URL_PREFIX)?.parse::<u64>().ok()?;
        self.entries().get(&id).cloned()
    }

    /// Number of URLs not yet revoked.
    pub fn live_count(&self) -> usize {
        self.entries().len()
    }

    fn remove(&self, id: u64) -> bool {
        self.entries().remove(&id).is_some()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<u64, Arc<[u8]>>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PreviewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewRegistry")
            .field("live", &self.live_count())
            .finish()
    }
}

/// Owner of one preview URL. Revokes it when dropped.
pub struct PreviewHandle {
    id: u64,
    registry: PreviewRegistry,
    revoked: bool,
}

impl PreviewHandle {
    pub fn url(&self) -> String {
        format!("{URL_PREFIX}{}", self.id)
    }

    /// Release the URL now instead of waiting for drop.
    pub fn revoke(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.revoked {
            self.revoked = true;
            if self.registry.remove(self.id) {
                debug!("Revoked preview {}", self.id);
            }
        }
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreviewHandle").field("url", &self.url()).finish()
    }
}
