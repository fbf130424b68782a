/*!
 * End-to-end document translation through the controller
 */

use std::fs;
use std::sync::Arc;

use polytrans::app_controller::Controller;
use polytrans::providers::MockTranslator;
use polytrans::translation::TranslationCache;

use crate::common;

const README: &str = "# Welcome\n\nRun `make` with $TARGET.\n\n```sh\nmake all\n```\n- See https://example.com\n";

fn controller(config: polytrans::Config, mock: &MockTranslator, online: bool) -> Controller {
    Controller::with_translator(config, Arc::new(mock.clone()))
        .expect("valid test config")
        .with_online(online)
        .with_progress(false)
}

#[tokio::test]
async fn test_markdown_document_should_be_written_per_language() -> anyhow::Result<()> {
    common::init_logging();
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "src/README.md", README)?;
    let output = dir.path().join("out");

    let mock = MockTranslator::working();
    let controller = controller(common::test_config(dir.path(), &["es", "pt_BR"], 4), &mock, true);

    let summary = controller.run(&[input], &output).await?;

    assert_eq!(summary.documents, 1);
    assert_eq!(summary.written.len(), 2);

    let spanish = fs::read_to_string(output.join("doc").join("README-es.md"))?;
    assert!(spanish.starts_with("# [es] Welcome\n\n"));
    assert!(spanish.contains("[es] Run `make` with $TARGET."));
    assert!(spanish.contains("```sh\nmake all\n```"));
    assert!(spanish.contains("- [es] See https://example.com"));

    let portuguese = fs::read_to_string(output.join("doc").join("README-pt_BR.md"))?;
    assert!(portuguese.starts_with("# [pt_BR] Welcome"));

    // Cache was persisted and serves the next run without calls
    let calls = mock.call_count();
    assert_eq!(TranslationCache::load(dir.path().join("cache.json")).len(), calls);

    let again = controller.run(&[dir.path().join("src")], &output).await?;
    assert_eq!(mock.call_count(), calls);
    assert_eq!(again.stats.net_calls, 0);
    assert_eq!(again.stats.cache_hits, calls);
    Ok(())
}

#[tokio::test]
async fn test_directory_should_translate_every_supported_format() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let input = dir.path().join("input");
    common::create_test_file(&input, "strings.json", r#"{"greeting": "Hello", "count": 2}"#)?;
    common::create_test_file(&input, "page.html", "<h1>Title</h1>\n<p>Body <b>text</b></p>")?;
    common::create_test_file(&input, "app.pot", "msgid \"\"\nmsgstr \"\"\n\"Language: \\n\"\n\nmsgid \"Quit\"\nmsgstr \"\"\n")?;
    common::create_test_file(&input, "notes.txt", "First line\n\nSecond line")?;
    common::create_test_file(&input, "image.png", "not a document")?;
    let output = dir.path().join("out");

    let mock = MockTranslator::working();
    let controller = controller(common::test_config(dir.path(), &["fr"], 2), &mock, true);

    let summary = controller.run(&[input], &output).await?;
    assert_eq!(summary.documents, 4);

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output.join("json/strings-fr.json"))?)?;
    assert_eq!(json, serde_json::json!({"greeting": "[fr] Hello", "count": 2}));

    let html = fs::read_to_string(output.join("html/page-fr.html"))?;
    assert_eq!(html, "[fr] <h1>Title</h1>\n[fr] <p>Body <b>text</b></p>");

    let po = fs::read_to_string(output.join("pot/app-fr.po"))?;
    assert!(po.contains("\"Language: fr\\n\""));
    assert!(po.contains("msgid \"Quit\"\nmsgstr \"[fr] Quit\""));

    let txt = fs::read_to_string(output.join("txt/notes-fr.txt"))?;
    assert_eq!(txt, "[fr] First line\n\n[fr] Second line");
    Ok(())
}

#[tokio::test]
async fn test_offline_run_should_write_source_text() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "notes.txt", "Keep this\nAnd this")?;
    let output = dir.path().join("out");

    let mock = MockTranslator::failing();
    let controller = controller(common::test_config(dir.path(), &["de"], 2), &mock, false);

    let summary = controller.run(&[input], &output).await?;

    assert_eq!(fs::read_to_string(&summary.written[0])?, "Keep this\nAnd this");
    assert_eq!(mock.call_count(), 0);
    assert!(TranslationCache::load(dir.path().join("cache.json")).is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unavailable_translator_should_abort_online_run() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let input = common::create_test_file(dir.path(), "notes.txt", "Hello")?;

    let mock = MockTranslator::failing();
    let controller = controller(common::test_config(dir.path(), &["de"], 2), &mock, true);

    assert!(controller.run(&[input], &dir.path().join("out")).await.is_err());
    Ok(())
}

#[test]
fn test_clean_cache_should_drop_stale_entries() -> anyhow::Result<()> {
    let dir = common::create_temp_dir()?;
    let config = common::test_config(dir.path(), &["es"], 1);
    let path = config.cache.resolved_path();

    let cache = TranslationCache::load(&path);
    cache.store_with_timestamp("es", "old", "viejo", chrono::Utc::now() - chrono::Duration::days(10));
    cache.store("es", "new", "nuevo");
    cache.save()?;

    let controller = Controller::with_translator(config, Arc::new(MockTranslator::working()))?;
    assert_eq!(controller.clean_cache(Some(7))?, 1);

    let reloaded = TranslationCache::load(&path);
    assert_eq!(reloaded.lookup("es", "new"), Some("nuevo".to_string()));
    assert_eq!(reloaded.lookup("es", "old"), None);
    Ok(())
}
