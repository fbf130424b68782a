/*!
 * Integration tests for the concurrent job scheduler
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use polytrans::providers::MockTranslator;
use polytrans::translation::{JobScheduler, NoProgress, ProgressReporter, SchedulerState, TranslationCache};

use crate::common;

fn languages(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

#[derive(Default)]
struct CountingProgress {
    units: AtomicUsize,
    languages: AtomicUsize,
}

impl ProgressReporter for CountingProgress {
    fn unit_done(&self, _lang: &str, done: usize, total: usize) {
        assert!(done <= total);
        self.units.fetch_add(1, Ordering::SeqCst);
    }

    fn language_done(&self, _lang: &str, languages_done: usize, total_languages: usize) {
        assert!(languages_done <= total_languages);
        self.languages.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_run_with_many_units_should_respect_job_limit() {
    common::init_logging();
    let mock = MockTranslator::working().with_latency(Duration::from_millis(5));
    let scheduler = JobScheduler::new(common::mock_service(&mock, true), 4);

    let units = common::numbered_units(50);
    let langs = languages(&["pt_BR", "en", "es", "it", "de", "fr", "ru", "zh_CN", "ja", "ko"]);
    let progress = Arc::new(CountingProgress::default());

    let report = scheduler.run(&units, &langs, progress.clone()).await;

    assert!(mock.max_in_flight() <= 4, "max in flight was {}", mock.max_in_flight());
    assert!(mock.max_in_flight() >= 2);
    assert_eq!(mock.call_count(), 500);
    assert_eq!(report.stats.net_calls, 500);
    assert_eq!(progress.units.load(Ordering::SeqCst), 500);
    assert_eq!(progress.languages.load(Ordering::SeqCst), 10);

    for (result, lang) in report.results.iter().zip(&langs) {
        assert_eq!(&result.language, lang);
        assert_eq!(result.translations.len(), 50);
        assert_eq!(result.translations[7], format!("[{}] Sentence number 7", lang));
    }
}

#[tokio::test]
async fn test_second_run_should_be_served_from_cache() {
    let mock = MockTranslator::working();
    let scheduler = JobScheduler::new(common::mock_service(&mock, true), 3);

    let units = common::numbered_units(20);
    let langs = languages(&["es", "fr", "de"]);

    let first = scheduler.run(&units, &langs, Arc::new(NoProgress)).await;
    let second = scheduler.run(&units, &langs, Arc::new(NoProgress)).await;

    assert_eq!(first.results, second.results);
    assert_eq!(first.stats.net_calls, 60);
    assert_eq!(second.stats.net_calls, 0);
    assert_eq!(second.stats.cache_hits, 60);
    assert_eq!(mock.call_count(), 60);
    assert_eq!(format!("{}", second.stats), "Cache: 60 (100.00%) | Net: 0 (0.00%) | Total: 60");
}

#[tokio::test]
async fn test_run_offline_should_return_units_unchanged() {
    let mock = MockTranslator::working();
    let scheduler = JobScheduler::new(common::mock_service(&mock, false), 4);

    let units = vec!["  Hello ".to_string(), "".to_string(), "Link https://example.com".to_string()];
    let report = scheduler.run(&units, &languages(&["es", "ja"]), Arc::new(NoProgress)).await;

    for result in &report.results {
        assert_eq!(result.translations, units);
    }
    assert_eq!(mock.call_count(), 0);
    assert_eq!(scheduler.state(), SchedulerState::Done);
}

#[tokio::test]
async fn test_equivalent_units_should_trigger_one_call() {
    let mock = MockTranslator::working().with_latency(Duration::from_millis(20));
    let scheduler = JobScheduler::new(common::mock_service(&mock, true), 8);

    let units = vec!["Same".to_string(), "same".to_string(), " \"Same\" ".to_string(), "Other".to_string()];
    let report = scheduler.run(&units, &languages(&["it"]), Arc::new(NoProgress)).await;

    assert_eq!(mock.call_count(), 2);
    let translations = report.translations_for("it").unwrap();
    assert_eq!(translations[0], translations[1]);
    assert_eq!(translations[0].to_lowercase(), "[it] same");
    assert_eq!(translations[3], "[it] Other");
}

#[tokio::test]
async fn test_flaky_translator_should_still_translate_everything() {
    let mock = MockTranslator::fail_times(2);
    let scheduler = JobScheduler::new(common::mock_service(&mock, true), 1);

    let units = common::numbered_units(5);
    let report = scheduler.run(&units, &languages(&["ko"]), Arc::new(NoProgress)).await;

    assert!(report.translations_for("ko").unwrap().iter().all(|t| t.starts_with("[ko] ")));
    assert_eq!(report.stats.failed_calls, 0);
    assert_eq!(report.stats.failed_attempts, 2);
}

#[tokio::test]
async fn test_failed_results_should_not_reach_the_cache_file() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("cache.json");

    let mock = MockTranslator::failing();
    let service = common::service_with_cache(&mock, TranslationCache::load(&path), true);
    let scheduler = JobScheduler::new(service.clone(), 2);

    let report = scheduler.run(&common::numbered_units(3), &languages(&["fr"]), Arc::new(NoProgress)).await;
    assert_eq!(report.stats.failed_calls, 3);

    service.save_cache()?;
    assert!(TranslationCache::load(&path).is_empty());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_retrying_failures_should_respect_job_limit() {
    common::init_logging();
    let mock = MockTranslator::failing().with_latency(Duration::from_millis(3));
    let scheduler = JobScheduler::new(common::mock_service(&mock, true), 3);

    let units = common::numbered_units(6);
    let langs = languages(&["es", "fr", "de", "it", "ja"]);
    let report = scheduler.run(&units, &langs, Arc::new(NoProgress)).await;

    assert!(mock.max_in_flight() <= 3, "max in flight was {}", mock.max_in_flight());
    assert_eq!(mock.call_count(), 6 * 5 * 3);
    assert_eq!(report.stats.failed_calls, 30);
    assert_eq!(report.stats.failed_attempts, 90);
    for result in &report.results {
        assert_eq!(result.translations, units);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_flaky_translator_across_languages_should_respect_job_limit() {
    let mock = MockTranslator::fail_times(8).with_latency(Duration::from_millis(3));
    let scheduler = JobScheduler::new(common::mock_service(&mock, true), 2);

    let units = common::numbered_units(10);
    let langs = languages(&["pt_BR", "ru", "ko"]);
    let report = scheduler.run(&units, &langs, Arc::new(NoProgress)).await;

    assert!(mock.max_in_flight() <= 2, "max in flight was {}", mock.max_in_flight());
    assert_eq!(report.stats.failed_attempts, 8);
    assert_eq!(report.stats.net_calls + report.stats.failed_calls, 30);
    assert_eq!(mock.call_count(), 8 + report.stats.net_calls);
}
