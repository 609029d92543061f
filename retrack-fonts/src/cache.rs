//! Per-run deduplicating font loader.
//!
//! The cache map records "this font has been requested". It is created empty
//! at the start of a run and dropped with it. Execution is single-threaded
//! and cooperative, so the lock is only ever held between suspension points.

use std::collections::{BTreeSet, HashMap};

use futures::future::join_all;
use parking_lot::Mutex;

use crate::descriptor::FontDescriptor;
use crate::loader::{FontLoadError, FontLoader};

/// Result of a prewarm pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrewarmOutcome {
    /// Loads issued (one per distinct, not yet requested font)
    pub requested: usize,
    /// Fonts whose load failed; they stay unregistered
    pub failed: Vec<FontDescriptor>,
}

pub struct FontCache<'a, L: FontLoader> {
    loader: &'a L,
    entries: Mutex<HashMap<String, FontDescriptor>>,
}

impl<'a, L: FontLoader> FontCache<'a, L> {
    pub fn new(loader: &'a L) -> Self {
        Self {
            loader,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register `font` and report whether it was new.
    fn register(&self, font: &FontDescriptor) -> bool {
        let mut entries = self.entries.lock();
        let key = font.cache_key();
        if entries.contains_key(&key) {
            return false;
        }
        entries.insert(key, font.clone());
        true
    }

    fn forget(&self, font: &FontDescriptor) {
        self.entries.lock().remove(&font.cache_key());
    }

    /// Load every distinct font concurrently, best effort.
    ///
    /// Failures are logged and the font is forgotten, so a later
    /// [`FontCache::ensure_loaded`] issues a fresh load (and propagates its
    /// failure).
    pub async fn warm<I>(&self, fonts: I) -> PrewarmOutcome
    where
        I: IntoIterator<Item = FontDescriptor>,
    {
        let distinct: BTreeSet<FontDescriptor> = fonts.into_iter().collect();
        let pending: Vec<FontDescriptor> = distinct
            .into_iter()
            .filter(|font| self.register(font))
            .collect();

        log::debug!("Prewarming {} fonts", pending.len());

        let results = join_all(pending.iter().map(|font| async move {
            let result = self.loader.load_font(font).await;
            (font, result)
        }))
        .await;

        let mut outcome = PrewarmOutcome {
            requested: pending.len(),
            failed: Vec::new(),
        };
        for (font, result) in results {
            if let Err(e) = result {
                log::error!("Error loading font during prewarm: {}", e);
                self.forget(font);
                outcome.failed.push(font.clone());
            }
        }
        outcome
    }

    /// Load `font` on its first request; later requests return immediately.
    ///
    /// A second caller does not wait for the first caller's load to finish.
    /// It only sees that the font is registered, so it can proceed before the
    /// font is actually usable. Under cooperative scheduling the first caller
    /// is the one applying the font, so this race is tolerated.
    pub async fn ensure_loaded(&self, font: &FontDescriptor) -> Result<(), FontLoadError> {
        if !self.register(font) {
            return Ok(());
        }

        log::debug!("Loading font {}", font);
        if let Err(e) = self.loader.load_font(font).await {
            self.forget(font);
            return Err(e);
        }
        Ok(())
    }

    pub fn contains(&self, font: &FontDescriptor) -> bool {
        self.entries.lock().contains_key(&font.cache_key())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
