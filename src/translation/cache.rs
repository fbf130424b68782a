/*!
 * Translation caching functionality.
 *
 * This module provides a persistent two-level cache (language, then
 * normalized source text) to avoid redundant translator calls across runs.
 * Entries remember when they were last used so stale ones can be pruned.
 *
 * On disk the cache is a JSON object:
 * `{ "<lang>": { "<normalized text>": { "v": "<value>", "t": "<RFC 3339>" } } }`
 */

use chrono::{DateTime, Duration, Utc};
use log::{debug, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;

use crate::errors::CacheError;

/// One cached translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Translated text
    #[serde(rename = "v")]
    pub value: String,

    /// Last time the entry was stored or read
    #[serde(rename = "t")]
    pub last_used: DateTime<Utc>,

    /// The value is a pass-through after a failed translation
    #[serde(rename = "f", default, skip_serializing_if = "is_false")]
    pub failed: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

type CacheData = HashMap<String, HashMap<String, CacheEntry>>;

/// Cache key form of a source text
///
/// Surrounding whitespace is trimmed, one layer of matching enclosing quotes
/// is removed and the result is lower-cased.
pub fn normalize_text(text: &str) -> String {
    let trimmed = text.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            trimmed
                .strip_prefix(*q)
                .and_then(|rest| rest.strip_suffix(*q))
        })
        .unwrap_or(trimmed);
    unquoted.to_lowercase()
}

/// Cache key form of a language code
pub fn normalize_language(lang: &str) -> String {
    lang.trim().to_lowercase()
}

/// Translation cache for storing and retrieving translations
pub struct TranslationCache {
    /// Internal cache storage, every access goes through this lock
    entries: Arc<Mutex<CacheData>>,

    /// Serializes writers of the cache file
    save_lock: Arc<Mutex<()>>,

    /// Backing file, `None` for a memory-only cache
    path: Option<PathBuf>,

    /// Whether every store is followed by a save
    save_after_write: bool,
}

impl TranslationCache {
    /// Create an empty cache that is never written to disk
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            save_lock: Arc::new(Mutex::new(())),
            path: None,
            save_after_write: false,
        }
    }

    /// Load the cache from a file
    ///
    /// A missing, unreadable or corrupt file yields an empty cache bound to
    /// the same path, so the next save replaces it.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let data = match std::fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<CacheData>(&bytes) {
                Ok(data) => data,
                Err(e) => {
                    warn!("Ignoring corrupt cache file {}: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache file at {}, starting empty", path.display());
                HashMap::new()
            }
            Err(e) => {
                warn!("Failed to read cache file {}: {}", path.display(), e);
                HashMap::new()
            }
        };

        // Older files may use mixed-case language keys
        let mut normalized: CacheData = HashMap::with_capacity(data.len());
        for (lang, entries) in data {
            normalized
                .entry(normalize_language(&lang))
                .or_default()
                .extend(entries);
        }

        let cache = Self {
            entries: Arc::new(Mutex::new(normalized)),
            save_lock: Arc::new(Mutex::new(())),
            path: Some(path.to_path_buf()),
            save_after_write: false,
        };
        debug!("Loaded {} cached translations from {}", cache.len(), path.display());
        cache
    }

    /// Persist after every store instead of only on explicit saves
    pub fn with_save_after_write(mut self, enabled: bool) -> Self {
        self.save_after_write = enabled;
        self
    }

    /// Backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get a translation from the cache, refreshing its last-used time
    pub fn lookup(&self, lang: &str, text: &str) -> Option<String> {
        let key = normalize_text(text);
        let mut entries = self.entries.lock();

        match entries
            .get_mut(&normalize_language(lang))
            .and_then(|by_text| by_text.get_mut(&key))
        {
            Some(entry) => {
                entry.last_used = Utc::now();
                debug!("Cache hit for '{}' ({})", truncate_text(text, 30), lang);
                Some(entry.value.clone())
            }
            None => {
                debug!("Cache miss for '{}' ({})", truncate_text(text, 30), lang);
                None
            }
        }
    }

    /// Store a translation in the cache
    pub fn store(&self, lang: &str, text: &str, value: &str) {
        self.insert(lang, text, value, Utc::now(), false);
    }

    /// Store the pass-through value of a failed translation
    ///
    /// Such entries answer lookups like any other but are never written to
    /// disk, so a later run tries again.
    pub fn store_failed(&self, lang: &str, text: &str, value: &str) {
        self.insert(lang, text, value, Utc::now(), true);
    }

    /// Store a translation with an explicit last-used time
    pub fn store_with_timestamp(&self, lang: &str, text: &str, value: &str, last_used: DateTime<Utc>) {
        self.insert(lang, text, value, last_used, false);
    }

    fn insert(&self, lang: &str, text: &str, value: &str, last_used: DateTime<Utc>, failed: bool) {
        {
            let mut entries = self.entries.lock();
            entries.entry(normalize_language(lang)).or_default().insert(
                normalize_text(text),
                CacheEntry {
                    value: value.to_string(),
                    last_used,
                    failed,
                },
            );
        }

        debug!("Cached translation for '{}' ({})", truncate_text(text, 30), lang);

        if self.save_after_write {
            if let Err(e) = self.save() {
                warn!("Failed to save translation cache: {}", e);
            }
        }
    }

    /// Get a copy of the full entry
    pub fn entry(&self, lang: &str, text: &str) -> Option<CacheEntry> {
        self.entries
            .lock()
            .get(&normalize_language(lang))
            .and_then(|by_text| by_text.get(&normalize_text(text)))
            .cloned()
    }

    /// Remove entries not used within the retention window
    ///
    /// # Returns
    /// * `usize` - The number of entries removed
    pub fn prune(&self, retention: Duration) -> usize {
        match Utc::now().checked_sub_signed(retention) {
            Some(limit) => self.prune_before(limit),
            // A window reaching past the earliest representable instant keeps everything
            None => 0,
        }
    }

    /// Remove entries not used within `days` days
    pub fn prune_days(&self, days: i64) -> usize {
        Duration::try_days(days).map_or(0, |retention| self.prune(retention))
    }

    /// Remove entries last used before the given instant
    pub fn prune_before(&self, limit: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let mut removed = 0;

        for by_text in entries.values_mut() {
            let before = by_text.len();
            by_text.retain(|_, entry| entry.last_used >= limit);
            removed += before - by_text.len();
        }
        entries.retain(|_, by_text| !by_text.is_empty());

        debug!("Pruned {} cache entries last used before {}", removed, limit);
        removed
    }

    /// Write the cache to its file
    ///
    /// The file is replaced atomically: the JSON goes to a temporary file in
    /// the same directory which is then renamed over the old one. Entries
    /// marked as failed are left out.
    pub fn save(&self) -> Result<(), CacheError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _writer = self.save_lock.lock();

        let json = {
            let entries = self.entries.lock();
            let persistent: HashMap<&String, HashMap<&String, &CacheEntry>> = entries
                .iter()
                .map(|(lang, by_text)| {
                    let kept: HashMap<&String, &CacheEntry> =
                        by_text.iter().filter(|(_, e)| !e.failed).collect();
                    (lang, kept)
                })
                .filter(|(_, kept)| !kept.is_empty())
                .collect();
            serde_json::to_vec_pretty(&persistent)?
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;

        let mut file = NamedTempFile::new_in(&dir)?;
        file.write_all(&json)?;
        file.as_file().sync_all()?;
        file.persist(path)?;

        debug!("Saved translation cache to {}", path.display());
        Ok(())
    }

    /// Get the number of entries in the cache
    pub fn len(&self) -> usize {
        self.entries.lock().values().map(|by_text| by_text.len()).sum()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            save_lock: self.save_lock.clone(),
            path: self.path.clone(),
            save_after_write: self.save_after_write,
        }
    }
}

/// Truncate text to a maximum number of characters with ellipsis
fn truncate_text(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
