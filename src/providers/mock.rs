/*!
 * Mock translator implementation for testing.
 *
 * This module provides a mock translator that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds with a tagged translation
 * - `MockTranslator::fail_times(n)` - Fails the first `n` calls, then succeeds
 * - `MockTranslator::failing()` - Always fails with an error
 *
 * Every mock records how many calls it received and the highest number of
 * calls that were in flight at the same time.
 */

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{TranslationRequest, Translator};

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Fails the first `n` calls, then succeeds
    FailTimes(usize),
    /// Always fails with an error
    Failing,
    /// Succeeds with blank output
    Empty,
}

/// Mock translator for testing translation behavior
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Simulated latency per call
    latency: Option<Duration>,
    /// Total calls received
    call_count: Arc<AtomicUsize>,
    /// Calls currently running
    in_flight: Arc<AtomicUsize>,
    /// Highest observed value of `in_flight`
    max_in_flight: Arc<AtomicUsize>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&TranslationRequest) -> String>,
}

/// Decrements the in-flight counter even if the call future is dropped
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            latency: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_in_flight: Arc::new(AtomicUsize::new(0)),
            custom_response: None,
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that fails `n` times before succeeding
    pub fn fail_times(n: usize) -> Self {
        Self::new(MockBehavior::FailTimes(n))
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Add simulated latency to every call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&TranslationRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Default translation: the text tagged with its target language
    pub fn tagged(request: &TranslationRequest) -> String {
        format!("[{}] {}", request.target_language, request.text)
    }

    /// Number of calls received so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneous calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Clone for MockTranslator {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            latency: self.latency,
            call_count: Arc::clone(&self.call_count),
            in_flight: Arc::clone(&self.in_flight),
            max_in_flight: Arc::clone(&self.max_in_flight),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String, ProviderError> {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlightGuard(&self.in_flight);
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let fail = match self.behavior {
            MockBehavior::Working | MockBehavior::Empty => false,
            MockBehavior::FailTimes(n) => count < n,
            MockBehavior::Failing => true,
        };

        if fail {
            return Err(ProviderError::CommandFailed {
                status: 1,
                stderr: format!("simulated failure #{}", count + 1),
            });
        }

        if self.behavior == MockBehavior::Empty {
            return Err(ProviderError::EmptyResponse);
        }

        let generator = self.custom_response.unwrap_or(Self::tagged);
        Ok(generator(request))
    }

    async fn check_available(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::Unavailable("mock is failing".to_string())),
            _ => Ok(()),
        }
    }
}
