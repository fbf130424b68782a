use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::formats::DocumentFormat;
use crate::language_utils;
use crate::network;
use crate::providers::{ShellTranslator, Translator};
use crate::translation::{JobScheduler, NoProgress, ProgressReporter, StatsSnapshot, TranslationCache, TranslationService};

// @module: Application controller for document translation

/// Main application controller
///
/// Owns the configuration and the translator, and drives whole runs: one
/// connectivity probe, one cache load and one cache save per run.
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: External translation capability
    translator: Arc<dyn Translator>,
    // @field: Connectivity forced by the caller instead of probed
    online_override: Option<bool>,
    // @field: Draw progress bars on the terminal
    show_progress: bool,
}

/// Outcome of a whole run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Documents processed
    pub documents: usize,
    /// Files written, one per document and language
    pub written: Vec<PathBuf>,
    /// Counters for the whole run
    pub stats: StatsSnapshot,
    pub elapsed: Duration,
}

impl Controller {
    // @method: Create a controller using the configured shell translator
    pub fn with_config(config: Config) -> Result<Self> {
        let translator = Arc::new(ShellTranslator::new(&config.translator.command));
        Self::with_translator(config, translator)
    }

    // @method: Create a controller with an explicit translator
    pub fn with_translator(config: Config, translator: Arc<dyn Translator>) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        Ok(Self {
            config,
            translator,
            online_override: None,
            show_progress: true,
        })
    }

    /// Skip the connectivity probe and use the given state
    pub fn with_online(mut self, online: bool) -> Self {
        self.online_override = Some(online);
        self
    }

    /// Enable or disable terminal progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate every document found in `inputs` into all target languages
    pub async fn run(&self, inputs: &[PathBuf], output_root: &Path) -> Result<RunSummary> {
        let start = Instant::now();

        let documents = FileManager::collect_documents(inputs)?;
        if documents.is_empty() {
            return Err(AppError::File(format!("No supported documents found in {:?}", inputs)).into());
        }

        let languages = self.config.resolved_target_languages();
        for lang in languages.iter().filter(|l| !language_utils::is_supported(l)) {
            warn!("Language '{}' is not in the supported list, passing it to the engine as is", lang);
        }

        let online = self.probe_connectivity().await;
        if online {
            if let Err(e) = self.translator.check_available().await {
                return Err(AppError::from(e).into());
            }
        } else {
            warn!("No network connection, untranslated text will be kept");
        }

        let cache = TranslationCache::load(self.config.cache.resolved_path())
            .with_save_after_write(self.config.cache.save_after_write);
        let service = TranslationService::from_config(&self.config, Arc::clone(&self.translator), cache, online);

        let pruned = service.prune_stale(self.config.cache.retention_days);
        if pruned > 0 {
            info!(
                "Removed {} cache entries unused for more than {} days",
                pruned, self.config.cache.retention_days
            );
        }

        let scheduler = JobScheduler::new(service.clone(), self.config.jobs);
        let mut written = Vec::new();

        for (index, (path, format)) in documents.iter().enumerate() {
            info!(
                "[{}/{}] {} {} -> {} languages",
                index + 1,
                documents.len(),
                format.label(),
                path.display(),
                languages.len()
            );

            match self.translate_document(&scheduler, path, *format, &languages, output_root).await {
                Ok(files) => written.extend(files),
                Err(e) => error!("Failed to translate {}: {:#}", path.display(), e),
            }
        }

        if let Err(e) = service.save_cache() {
            error!("Failed to save translation cache: {}", e);
        }

        let summary = RunSummary {
            documents: documents.len(),
            written,
            stats: service.stats(),
            elapsed: start.elapsed(),
        };

        info!(
            "Finished {} documents in {}: {}",
            summary.documents,
            Self::format_duration(summary.elapsed),
            summary.stats
        );

        Ok(summary)
    }

    /// Translate one document and write one file per language
    async fn translate_document(
        &self,
        scheduler: &JobScheduler,
        path: &Path,
        format: DocumentFormat,
        languages: &[String],
        output_root: &Path,
    ) -> Result<Vec<PathBuf>> {
        let content = FileManager::read_to_string(path)?;
        let document = format
            .parse(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let progress: Arc<dyn ProgressReporter> = if self.show_progress {
            Arc::new(BarProgress::new(languages.len()))
        } else {
            Arc::new(NoProgress)
        };

        let report = scheduler.run(document.units(), languages, progress).await;

        let mut written = Vec::with_capacity(report.results.len());
        for result in &report.results {
            let output_path = FileManager::generate_output_path(path, output_root, format, &result.language);
            let rendered = document.render(&result.language, &result.translations);
            FileManager::write_to_file(&output_path, &rendered)?;
            written.push(output_path);
        }

        info!(
            "{}: {} units in {} ({})",
            path.display(),
            document.units().len(),
            Self::format_duration(report.elapsed),
            report.stats
        );

        Ok(written)
    }

    async fn probe_connectivity(&self) -> bool {
        match self.online_override {
            Some(online) => online,
            None => {
                network::is_online(&self.config.connectivity.probe_address, self.config.connectivity.timeout()).await
            }
        }
    }

    /// Remove cache entries unused for `days` (or the configured retention)
    /// and save the cache
    pub fn clean_cache(&self, days: Option<i64>) -> Result<usize> {
        let days = days.unwrap_or(self.config.cache.retention_days);
        if days <= 0 {
            anyhow::bail!("Retention must be a positive number of days, got {}", days);
        }

        let cache = TranslationCache::load(self.config.cache.resolved_path());
        let before = cache.len();
        let removed = cache.prune_days(days);
        cache.save().context("Failed to save translation cache")?;

        info!("Removed {} of {} cache entries older than {} days", removed, before, days);
        Ok(removed)
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/// Terminal progress: one bar per language plus an overall bar
struct BarProgress {
    multi: MultiProgress,
    overall: ProgressBar,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl BarProgress {
    fn new(total_languages: usize) -> Self {
        let multi = MultiProgress::new();
        let overall = multi.add(ProgressBar::new(total_languages as u64));
        overall.set_style(Self::style("languages"));

        Self {
            multi,
            overall,
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn style(unit: &str) -> ProgressStyle {
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} {{prefix:>8}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
                unit
            ))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} {prefix} [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░")
    }

    fn bar_for(&self, lang: &str, total: usize) -> ProgressBar {
        self.bars
            .lock()
            .entry(lang.to_string())
            .or_insert_with(|| {
                let bar = self.multi.insert_before(&self.overall, ProgressBar::new(total as u64));
                bar.set_style(Self::style("units"));
                bar.set_prefix(lang.to_string());
                bar
            })
            .clone()
    }
}

impl ProgressReporter for BarProgress {
    fn unit_done(&self, lang: &str, done: usize, total: usize) {
        self.bar_for(lang, total).set_position(done as u64);
    }

    fn language_done(&self, lang: &str, languages_done: usize, _total_languages: usize) {
        if let Some(bar) = self.bars.lock().remove(lang) {
            bar.finish_and_clear();
        }
        self.overall.set_position(languages_done as u64);
        self.overall.set_message(language_utils::get_language_name(lang));
        if self.overall.length() == Some(languages_done as u64) {
            self.overall.finish_and_clear();
        }
    }
}
