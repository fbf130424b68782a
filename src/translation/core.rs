/*!
 * Core translation service implementation.
 *
 * This module contains the main TranslationService struct, which resolves one
 * text unit into one language: cache lookup, protected and retried
 * invocation of the external translator, then cache store.
 */

use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::CacheError;
use crate::providers::Translator;

use super::cache::{TranslationCache, normalize_language, normalize_text};
use super::invoker::{RetryPolicy, TranslationInvoker};
use super::stats::{StatsSnapshot, TranslationStats};

/// Translation options for customizing the translation process
#[derive(Debug, Clone)]
pub struct TranslationOptions {
    /// Engine identifier passed to the translator
    pub engine: String,

    /// Source language hint
    pub source_language: String,

    /// Skip cache lookups and translate again
    pub force: bool,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            engine: "google".to_string(),
            source_language: "auto".to_string(),
            force: false,
        }
    }
}

impl From<&Config> for TranslationOptions {
    fn from(config: &Config) -> Self {
        Self {
            engine: config.engine.clone(),
            source_language: config.source_language.clone(),
            force: config.force,
        }
    }
}

type InFlightKey = (String, String);
type InFlightResult = Shared<BoxFuture<'static, String>>;

/// Outcome of claiming a cache key
enum Claim {
    /// Another caller stored the value meanwhile
    Cached(String),
    /// An identical request is running, await it
    Follow(InFlightResult),
    /// This caller runs the request
    Lead(InFlightResult),
}

struct ServiceInner {
    cache: TranslationCache,
    invoker: TranslationInvoker,
    options: TranslationOptions,
    in_flight: Mutex<HashMap<InFlightKey, InFlightResult>>,
}

impl ServiceInner {
    /// Invoke the translator and record the result
    ///
    /// Pass-through results are stored too, marked as failed.
    async fn resolve(&self, text: &str, lang: &str) -> String {
        let outcome = self
            .invoker
            .translate(text, lang, &self.options.source_language, &self.options.engine)
            .await;

        if outcome.is_translated() {
            self.cache.store(lang, text, &outcome.text);
        } else {
            self.cache.store_failed(lang, text, &outcome.text);
        }

        outcome.text
    }
}

/// Cache-aware translation of single text units
///
/// Cheap to clone; clones share the cache, statistics and in-flight table.
#[derive(Clone)]
pub struct TranslationService {
    inner: Arc<ServiceInner>,
}

impl std::fmt::Debug for TranslationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationService")
            .field("options", &self.inner.options)
            .field("online", &self.inner.invoker.is_online())
            .field("cached", &self.inner.cache.len())
            .finish()
    }
}

impl TranslationService {
    /// Create a service from its parts
    pub fn new(cache: TranslationCache, invoker: TranslationInvoker, options: TranslationOptions) -> Self {
        Self {
            inner: Arc::new(ServiceInner {
                cache,
                invoker,
                options,
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Create a service from the application configuration
    pub fn from_config(config: &Config, translator: Arc<dyn Translator>, cache: TranslationCache, online: bool) -> Self {
        let invoker = TranslationInvoker::new(
            translator,
            RetryPolicy::from(&config.retry),
            online,
            Arc::new(TranslationStats::new()),
        );
        Self::new(cache, invoker, TranslationOptions::from(config))
    }

    /// The cache used by this service
    pub fn cache(&self) -> &TranslationCache {
        &self.inner.cache
    }

    /// Current statistics
    pub fn stats(&self) -> StatsSnapshot {
        self.inner.invoker.stats().snapshot()
    }

    /// Translation options
    pub fn options(&self) -> &TranslationOptions {
        &self.inner.options
    }

    /// Whether the translator is reachable for this run
    pub fn is_online(&self) -> bool {
        self.inner.invoker.is_online()
    }

    /// Translate one text unit into one language
    ///
    /// Never fails: when translation is impossible the unit comes back as
    /// given. Blank units are returned without touching the cache. Leading
    /// and trailing whitespace of the unit is kept around the result.
    pub async fn translate_unit(&self, text: &str, lang: &str) -> String {
        let core = text.trim();
        if core.is_empty() {
            return text.to_string();
        }

        let start = text.len() - text.trim_start().len();
        let end = start + core.len();
        let (leading, trailing) = (&text[..start], &text[end..]);

        let translated = self.resolve_core(core, lang).await;
        format!("{}{}{}", leading, translated, trailing)
    }

    async fn resolve_core(&self, text: &str, lang: &str) -> String {
        let stats = self.inner.invoker.stats();
        let force = self.inner.options.force;

        if !force {
            if let Some(value) = self.inner.cache.lookup(lang, text) {
                stats.record_cache_hit();
                return value;
            }
        }

        match self.claim(text, lang, force) {
            Claim::Cached(value) => {
                stats.record_cache_hit();
                value
            }
            Claim::Follow(result) => {
                debug!("Waiting for identical in-flight translation ({})", lang);
                stats.record_deduplicated();
                result.await
            }
            Claim::Lead(result) => result.await,
        }
    }

    /// Join an in-flight request for the key or register a new one
    fn claim(&self, text: &str, lang: &str, force: bool) -> Claim {
        let key = (normalize_language(lang), normalize_text(text));
        let mut in_flight = self.inner.in_flight.lock();

        if let Some(existing) = in_flight.get(&key) {
            return Claim::Follow(existing.clone());
        }

        // A leader stores before leaving the table, so a miss here is real
        if !force {
            if let Some(value) = self.inner.cache.lookup(lang, text) {
                return Claim::Cached(value);
            }
        }

        let inner = Arc::clone(&self.inner);
        let (text, lang, owned_key) = (text.to_string(), lang.to_string(), key.clone());
        let request = async move {
            let value = inner.resolve(&text, &lang).await;
            inner.in_flight.lock().remove(&owned_key);
            value
        }
        .boxed()
        .shared();

        in_flight.insert(key, request.clone());
        Claim::Lead(request)
    }

    /// Remove cache entries unused for more than `retention_days`
    pub fn prune_stale(&self, retention_days: i64) -> usize {
        self.inner.cache.prune_days(retention_days)
    }

    /// Persist the cache
    pub fn save_cache(&self) -> Result<(), CacheError> {
        self.inner.cache.save()
    }
}
