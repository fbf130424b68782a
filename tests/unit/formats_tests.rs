/*!
 * Tests for document formats
 */

use std::path::PathBuf;

use polytrans::file_utils::FileManager;
use polytrans::formats::DocumentFormat;

fn upper(units: &[String]) -> Vec<String> {
    units.iter().map(|u| u.to_uppercase()).collect()
}

#[test]
fn test_render_with_untouched_units_should_reproduce_text_documents() {
    let samples = [
        (DocumentFormat::Markdown, "# Title\n\n- item\n\n```\ncode\n```\n"),
        (DocumentFormat::PlainText, "one\n\n  two\n"),
        (DocumentFormat::Html, "<p>Hello <i>there</i></p>\n<br>\n"),
        (DocumentFormat::Gettext, "msgid \"Hi\"\nmsgstr \"Hi\"\n"),
    ];

    for (format, content) in samples {
        let document = format.parse(content).unwrap();
        let units = document.units().to_vec();
        assert_eq!(document.render("xx", &units), content, "{:?}", format);
    }
}

#[test]
fn test_json_document_should_translate_nested_strings() {
    let document = DocumentFormat::Json
        .parse(r#"{"menu": {"open": "Open", "items": ["Save", 3, null]}}"#)
        .unwrap();
    assert_eq!(document.units(), &["Open", "Save"]);

    let rendered: serde_json::Value = serde_json::from_str(&document.render("de", &upper(document.units()))).unwrap();
    assert_eq!(rendered, serde_json::json!({"menu": {"open": "OPEN", "items": ["SAVE", 3, null]}}));
}

#[test]
fn test_blank_translations_should_fall_back_to_source() {
    let document = DocumentFormat::PlainText.parse("alpha\nbeta").unwrap();
    let translations = vec![String::new(), "BETA".to_string()];
    assert_eq!(document.render("fr", &translations), "alpha\nBETA");
}

#[test]
fn test_output_paths_should_follow_format_layout() {
    let cases = [
        ("guide.md", DocumentFormat::Markdown, "out/doc/guide-es.md"),
        ("notes.txt", DocumentFormat::PlainText, "out/txt/notes-es.txt"),
        ("strings.json", DocumentFormat::Json, "out/json/strings-es.json"),
        ("index.html", DocumentFormat::Html, "out/html/index-es.html"),
        ("messages.pot", DocumentFormat::Gettext, "out/pot/messages-es.po"),
    ];

    for (input, format, expected) in cases {
        assert_eq!(DocumentFormat::from_path(input), Some(format));
        assert_eq!(
            FileManager::generate_output_path(input, "out", format, "es"),
            PathBuf::from(expected)
        );
    }
}
