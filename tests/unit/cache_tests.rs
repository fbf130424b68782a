/*!
 * Tests for the persistent translation cache
 */

use chrono::{Duration, Utc};
use std::fs;

use polytrans::translation::TranslationCache;
use polytrans::translation::cache::normalize_text;

use crate::common;

#[test]
fn test_lookup_with_equivalent_text_should_hit() {
    let cache = TranslationCache::in_memory();
    cache.store("es", "Hello", "Hola");

    for variant in ["Hello", "  hello ", "\"Hello\"", "'HELLO'"] {
        assert_eq!(cache.lookup("es", variant), Some("Hola".to_string()), "variant {:?}", variant);
    }
    assert_eq!(cache.lookup("ES", "hello"), Some("Hola".to_string()));
    assert_eq!(cache.lookup("fr", "Hello"), None);
}

#[test]
fn test_normalize_text_should_strip_only_matching_quotes() {
    assert_eq!(normalize_text("\"quoted\""), "quoted");
    assert_eq!(normalize_text("\"mixed'"), "\"mixed'");
    assert_eq!(normalize_text("\"\"twice\"\""), "\"twice\"");
}

#[test]
fn test_prune_should_remove_only_stale_entries() {
    let cache = TranslationCache::in_memory();
    cache.store_with_timestamp("de", "old", "alt", Utc::now() - Duration::days(31));
    cache.store_with_timestamp("de", "recent", "neu", Utc::now() - Duration::days(1));

    let removed = cache.prune(Duration::days(30));

    assert_eq!(removed, 1);
    assert_eq!(cache.lookup("de", "old"), None);
    assert_eq!(cache.lookup("de", "recent"), Some("neu".to_string()));
}

#[test]
fn test_lookup_should_refresh_last_used() {
    let cache = TranslationCache::in_memory();
    cache.store_with_timestamp("it", "ciao", "ciao", Utc::now() - Duration::days(29));

    assert!(cache.lookup("it", "ciao").is_some());
    assert_eq!(cache.prune(Duration::days(1)), 0);
}

#[test]
fn test_save_then_load_should_keep_entries() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("nested").join("cache.json");

    let cache = TranslationCache::load(&path);
    cache.store("pt_BR", "Good morning", "Bom dia");
    cache.store_failed("pt_BR", "Unreachable", "Unreachable");
    cache.save()?;

    let reloaded = TranslationCache::load(&path);
    assert_eq!(reloaded.lookup("pt_br", "good morning"), Some("Bom dia".to_string()));
    assert_eq!(reloaded.lookup("pt_BR", "Unreachable"), None);
    assert_eq!(reloaded.len(), 1);

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(raw["pt_br"]["good morning"]["v"], "Bom dia");
    assert!(raw["pt_br"]["good morning"]["t"].is_string());
    Ok(())
}

#[test]
fn test_load_with_corrupt_file_should_start_empty() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = common::create_test_file(dir.path(), "cache.json", "{ this is not json")?;

    let cache = TranslationCache::load(&path);
    assert!(cache.is_empty());

    cache.store("fr", "Yes", "Oui");
    cache.save()?;
    assert_eq!(TranslationCache::load(&path).lookup("fr", "yes"), Some("Oui".to_string()));
    Ok(())
}

#[test]
fn test_save_after_write_should_persist_each_store() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let path = dir.path().join("cache.json");

    let cache = TranslationCache::load(&path).with_save_after_write(true);
    cache.store("ja", "Thanks", "ありがとう");

    assert_eq!(TranslationCache::load(&path).lookup("ja", "thanks"), Some("ありがとう".to_string()));
    Ok(())
}

#[test]
fn test_concurrent_stores_should_all_be_kept() {
    let cache = TranslationCache::in_memory();
    std::thread::scope(|scope| {
        for worker in 0..8 {
            let cache = cache.clone();
            scope.spawn(move || {
                for i in 0..50 {
                    cache.store("ko", &format!("text {} {}", worker, i), "value");
                }
            });
        }
    });
    assert_eq!(cache.len(), 400);
}
