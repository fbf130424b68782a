use once_cell::sync::Lazy;
use regex::Regex;

use super::{Document, translation_or_source};
use crate::translation::protect::{MARKUP_PREFIX, PlaceholderMap, SubstringProtector};

/// Tags, comments and doctype declarations
static TAG_PROTECTOR: Lazy<SubstringProtector> =
    Lazy::new(|| SubstringProtector::new(Regex::new(r"(?s)<.*?>").expect("valid tag pattern"), MARKUP_PREFIX));

static RAW_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<(script|style)[\s>]").expect("valid raw pattern"));
static RAW_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</(script|style)\s*>").expect("valid raw pattern"));

#[derive(Debug, Clone)]
enum Line {
    Verbatim(String),
    Text { unit: usize, tags: PlaceholderMap },
}

/// HTML processed line by line
///
/// Lines with visible text become units with their markup replaced by
/// placeholder tokens, so only the text reaches the translator. Script and
/// style blocks are never translated.
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    lines: Vec<Line>,
    units: Vec<String>,
}

impl HtmlDocument {
    /// Parse HTML content
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();
        let mut units = Vec::new();
        let mut in_raw_block = false;

        for line in content.split('\n') {
            if in_raw_block {
                in_raw_block = !RAW_CLOSE.is_match(line);
                lines.push(Line::Verbatim(line.to_string()));
                continue;
            }

            if RAW_OPEN.is_match(line) {
                in_raw_block = !RAW_CLOSE.is_match(line);
                lines.push(Line::Verbatim(line.to_string()));
                continue;
            }

            let (protected, tags) = TAG_PROTECTOR.protect(line);
            let visible = tags
                .iter()
                .fold(protected.clone(), |acc, (token, _)| acc.replace(token, ""));

            if visible.trim().is_empty() {
                lines.push(Line::Verbatim(line.to_string()));
                continue;
            }

            units.push(protected);
            lines.push(Line::Text {
                unit: units.len() - 1,
                tags,
            });
        }

        Self { lines, units }
    }
}

impl Document for HtmlDocument {
    fn units(&self) -> &[String] {
        &self.units
    }

    fn render(&self, _lang: &str, translations: &[String]) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                Line::Verbatim(text) => text.clone(),
                Line::Text { unit, tags } => {
                    TAG_PROTECTOR.restore(translation_or_source(&self.units, translations, *unit), tags)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
