/*!
 * Concurrent translation of many units into many languages.
 *
 * One worker task is spawned per target language; inside a language the
 * units are fanned out as well. A single semaphore shared by every language
 * caps how many units are being resolved at once, so the number of
 * simultaneous translator calls never exceeds the configured job count.
 */

use futures::stream::{self, StreamExt};
use log::{error, info};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use super::core::TranslationService;
use super::stats::StatsSnapshot;

/// Lifecycle of a scheduler run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No run started yet
    Idle,
    /// Launching language workers
    Dispatching,
    /// Waiting for every worker to finish
    Draining,
    /// Results aggregated
    Done,
}

/// Receives progress notifications from the workers
///
/// Called concurrently from several workers.
pub trait ProgressReporter: Send + Sync {
    /// `done` of `total` units of a language are resolved
    fn unit_done(&self, lang: &str, done: usize, total: usize);

    /// A whole language is resolved
    fn language_done(&self, lang: &str, languages_done: usize, total_languages: usize);
}

/// Reporter that ignores every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn unit_done(&self, _lang: &str, _done: usize, _total: usize) {}

    fn language_done(&self, _lang: &str, _languages_done: usize, _total_languages: usize) {}
}

/// Translations of every unit into one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageResult {
    /// Target language
    pub language: String,
    /// One translation per unit, in unit order
    pub translations: Vec<String>,
}

/// Aggregated result of a run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Per-language results, in the order languages were requested
    pub results: Vec<LanguageResult>,
    /// Counter increase caused by this run
    pub stats: StatsSnapshot,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunReport {
    /// Translations for one language
    pub fn translations_for(&self, lang: &str) -> Option<&[String]> {
        self.results
            .iter()
            .find(|r| r.language == lang)
            .map(|r| r.translations.as_slice())
    }
}

/// Fans units and languages out over a bounded pool of workers
pub struct JobScheduler {
    service: TranslationService,
    jobs: usize,
    state: Arc<Mutex<SchedulerState>>,
}

impl JobScheduler {
    /// Create a scheduler allowing `jobs` simultaneous translations
    pub fn new(service: TranslationService, jobs: usize) -> Self {
        Self {
            service,
            jobs: jobs.max(1),
            state: Arc::new(Mutex::new(SchedulerState::Idle)),
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> SchedulerState {
        *self.state.lock()
    }

    /// Configured concurrency limit
    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// The service workers resolve units with
    pub fn service(&self) -> &TranslationService {
        &self.service
    }

    fn set_state(&self, state: SchedulerState) {
        *self.state.lock() = state;
    }

    /// Translate every unit into every language
    ///
    /// Always yields a result for every (language, unit) pair; failures
    /// degrade to the original text.
    pub async fn run(&self, units: &[String], languages: &[String], progress: Arc<dyn ProgressReporter>) -> RunReport {
        let start = Instant::now();
        let before = self.service.stats();

        self.set_state(SchedulerState::Dispatching);

        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let shared_units = Arc::new(units.to_vec());
        let languages_done = Arc::new(AtomicUsize::new(0));
        let total_languages = languages.len();

        let mut workers = Vec::with_capacity(languages.len());
        for lang in languages {
            let service = self.service.clone();
            let semaphore = Arc::clone(&semaphore);
            let units = Arc::clone(&shared_units);
            let languages_done = Arc::clone(&languages_done);
            let progress = Arc::clone(&progress);
            let lang = lang.clone();
            let jobs = self.jobs;

            workers.push(tokio::spawn(async move {
                let translations =
                    translate_language(&service, &semaphore, &units, &lang, jobs, progress.as_ref()).await;
                let done = languages_done.fetch_add(1, Ordering::SeqCst) + 1;
                progress.language_done(&lang, done, total_languages);
                LanguageResult {
                    language: lang,
                    translations,
                }
            }));
        }

        self.set_state(SchedulerState::Draining);

        let mut results = Vec::with_capacity(workers.len());
        for (lang, worker) in languages.iter().zip(workers) {
            match worker.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("Worker for {} stopped unexpectedly: {}", lang, e);
                    results.push(LanguageResult {
                        language: lang.clone(),
                        translations: units.to_vec(),
                    });
                }
            }
        }

        let stats = self.service.stats().since(&before);
        let elapsed = start.elapsed();
        self.set_state(SchedulerState::Done);

        info!(
            "Translated {} units into {} languages in {:.2?} ({})",
            units.len(),
            languages.len(),
            elapsed,
            stats
        );

        RunReport {
            results,
            stats,
            elapsed,
        }
    }
}

/// Resolve every unit of one language, keeping unit order in the result
async fn translate_language(
    service: &TranslationService,
    semaphore: &Semaphore,
    units: &[String],
    lang: &str,
    jobs: usize,
    progress: &dyn ProgressReporter,
) -> Vec<String> {
    let total = units.len();
    let done = AtomicUsize::new(0);

    // Indexes rather than borrowed items keep the stream future `Send` for `tokio::spawn`
    let mut resolved: Vec<(usize, String)> = stream::iter(0..total)
        .map(|index| {
            let done = &done;
            async move {
                // The semaphore is never closed, so acquire only fails after a bug
                let permit = semaphore.acquire().await.ok();
                let translated = service.translate_unit(&units[index], lang).await;
                drop(permit);

                let current = done.fetch_add(1, Ordering::SeqCst) + 1;
                progress.unit_done(lang, current, total);
                (index, translated)
            }
        })
        .buffer_unordered(jobs)
        .collect()
        .await;

    resolved.sort_by_key(|(index, _)| *index);
    resolved.into_iter().map(|(_, text)| text).collect()
}
