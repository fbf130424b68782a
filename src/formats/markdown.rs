use once_cell::sync::Lazy;
use regex::Regex;

use super::{Document, translation_or_source};

/// Heading markers, bullets and numbered-list markers
static BLOCK_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*#+\s*|\s*[*\-+]\s+|\s*\d+\.\s*|\s*>\s*)").expect("valid prefix pattern"));

/// Horizontal rules and setext underlines
static RULE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*([-*_=]\s*){3,}$").expect("valid rule pattern"));

#[derive(Debug, Clone)]
enum Line {
    Verbatim(String),
    Text { prefix: String, unit: usize },
}

/// Markdown processed line by line
///
/// Fenced code blocks, blank lines and rules are copied verbatim. Heading,
/// list and quote markers stay in front of the translated remainder.
#[derive(Debug, Clone)]
pub struct MarkdownDocument {
    lines: Vec<Line>,
    units: Vec<String>,
}

impl MarkdownDocument {
    /// Parse Markdown content
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();
        let mut units = Vec::new();
        let mut in_code_block = false;

        for line in content.split('\n') {
            let trimmed = line.trim();

            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_code_block = !in_code_block;
                lines.push(Line::Verbatim(line.to_string()));
                continue;
            }

            if in_code_block || trimmed.is_empty() || RULE.is_match(line) {
                lines.push(Line::Verbatim(line.to_string()));
                continue;
            }

            let split = BLOCK_PREFIX.find(line).map(|m| m.end()).unwrap_or(0);
            let (prefix, text) = line.split_at(split);

            if text.trim().is_empty() {
                lines.push(Line::Verbatim(line.to_string()));
                continue;
            }

            units.push(text.to_string());
            lines.push(Line::Text {
                prefix: prefix.to_string(),
                unit: units.len() - 1,
            });
        }

        Self { lines, units }
    }
}

impl Document for MarkdownDocument {
    fn units(&self) -> &[String] {
        &self.units
    }

    fn render(&self, _lang: &str, translations: &[String]) -> String {
        self.lines
            .iter()
            .map(|line| match line {
                Line::Verbatim(text) => text.clone(),
                Line::Text { prefix, unit } => {
                    format!("{}{}", prefix, translation_or_source(&self.units, translations, *unit))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
