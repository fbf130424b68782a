/*!
 * Retrying wrapper around one call to the external translator.
 *
 * The invoker protects the text, tries the translator a bounded number of
 * times with a growing delay, and restores the protected substrings on
 * success. It never fails: when every attempt fails, or the process is
 * offline, the original text comes back unchanged.
 */

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::RetryConfig;
use crate::errors::ProviderError;
use crate::providers::{TranslationRequest, Translator};

use super::protect::SubstringProtector;
use super::stats::TranslationStats;

/// Attempt limit, backoff and per-attempt timeout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before attempt `n + 1` is `base_delay * n`
    pub base_delay: Duration,
    /// Time budget of a single attempt
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.backoff_ms),
            attempt_timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl RetryPolicy {
    /// Delay after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    /// The translator produced a result
    Translated,
    /// Every attempt failed; the original text was returned
    Failed,
    /// The process is offline; nothing was attempted
    Offline,
}

/// Result of one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationOutcome {
    /// Translated text, or the original text on pass-through
    pub text: String,
    /// How the invocation ended
    pub status: InvocationStatus,
    /// Attempts made
    pub attempts: u32,
    /// Attempts that failed
    pub failed_attempts: u32,
}

impl InvocationOutcome {
    fn pass_through(text: &str, status: InvocationStatus, attempts: u32) -> Self {
        Self {
            text: text.to_string(),
            status,
            attempts,
            failed_attempts: if status == InvocationStatus::Failed { attempts } else { 0 },
        }
    }

    /// True when the translator produced the text
    pub fn is_translated(&self) -> bool {
        self.status == InvocationStatus::Translated
    }
}

/// Calls the external translator with protection and bounded retries
#[derive(Debug, Clone)]
pub struct TranslationInvoker {
    translator: Arc<dyn Translator>,
    protector: SubstringProtector,
    policy: RetryPolicy,
    online: bool,
    stats: Arc<TranslationStats>,
}

impl TranslationInvoker {
    /// Create a new invoker
    ///
    /// `online` is the reachability signal computed once for the run.
    pub fn new(translator: Arc<dyn Translator>, policy: RetryPolicy, online: bool, stats: Arc<TranslationStats>) -> Self {
        Self {
            translator,
            protector: SubstringProtector::default(),
            policy,
            online,
            stats,
        }
    }

    /// Replace the substring protector
    pub fn with_protector(mut self, protector: SubstringProtector) -> Self {
        self.protector = protector;
        self
    }

    /// Whether the run is online
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Shared statistics
    pub fn stats(&self) -> &Arc<TranslationStats> {
        &self.stats
    }

    /// Translate one text unit
    ///
    /// Does not read or write the cache.
    pub async fn translate(&self, text: &str, lang: &str, source_language: &str, engine: &str) -> InvocationOutcome {
        if !self.online {
            return InvocationOutcome::pass_through(text, InvocationStatus::Offline, 0);
        }

        let (protected, placeholders) = self.protector.protect(text);
        let request = TranslationRequest::new(&protected, lang, source_language, engine);

        let mut failed_attempts = 0;
        for attempt in 1..=self.policy.max_attempts {
            match self.attempt(&request).await {
                Ok(translated) => {
                    self.stats.record_net_call();
                    return InvocationOutcome {
                        text: self.protector.restore(&translated, &placeholders),
                        status: InvocationStatus::Translated,
                        attempts: attempt,
                        failed_attempts,
                    };
                }
                Err(e) => {
                    failed_attempts += 1;
                    self.stats.record_failed_attempt();
                    debug!("Attempt {}/{} for {} failed: {}", attempt, self.policy.max_attempts, lang, e);

                    // The delay keeps the caller's concurrency slot
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.delay_after(attempt)).await;
                    }
                }
            }
        }

        warn!(
            "Giving up on {} after {} attempts, keeping original text",
            lang, self.policy.max_attempts
        );
        self.stats.record_failed_call();
        InvocationOutcome::pass_through(text, InvocationStatus::Failed, failed_attempts)
    }

    async fn attempt(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.policy.attempt_timeout, self.translator.translate(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.policy.attempt_timeout.as_secs())),
        }
    }
}
