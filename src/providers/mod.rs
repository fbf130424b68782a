/*!
 * Provider implementations for the external translation capability.
 *
 * This module contains the clients the translation service can delegate to:
 * - `translate_shell`: the translate-shell command line tool
 * - `mock`: an instrumented in-process translator for tests and benchmarks
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One request to translate a single text unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    /// Text to translate, already protected
    pub text: String,

    /// Target language code (locale form, e.g. `pt_BR`)
    pub target_language: String,

    /// Source language hint, "auto" for detection
    pub source_language: String,

    /// Engine identifier understood by the provider
    pub engine: String,
}

impl TranslationRequest {
    /// Create a new request
    pub fn new(text: &str, target_language: &str, source_language: &str, engine: &str) -> Self {
        Self {
            text: text.to_string(),
            target_language: target_language.to_string(),
            source_language: source_language.to_string(),
            engine: engine.to_string(),
        }
    }
}

/// Common trait for all translators
///
/// One call is one attempt: implementations do not retry, the invoker does.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate the request text
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or the reason the attempt failed
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError>;

    /// Check that the translator can be used at all
    async fn check_available(&self) -> Result<(), ProviderError>;
}

pub mod mock;
pub mod translate_shell;

pub use self::mock::{MockBehavior, MockTranslator};
pub use self::translate_shell::ShellTranslator;
