use super::{Document, translation_or_source};

/// Plain text: every non-blank line is one unit
#[derive(Debug, Clone)]
pub struct PlainTextDocument {
    /// Original lines, paired with their unit index
    lines: Vec<(String, Option<usize>)>,
    units: Vec<String>,
}

impl PlainTextDocument {
    /// Parse text content
    pub fn parse(content: &str) -> Self {
        let mut units = Vec::new();
        let lines = content
            .split('\n')
            .map(|line| {
                if line.trim().is_empty() {
                    (line.to_string(), None)
                } else {
                    units.push(line.to_string());
                    (line.to_string(), Some(units.len() - 1))
                }
            })
            .collect();

        Self { lines, units }
    }
}

impl Document for PlainTextDocument {
    fn units(&self) -> &[String] {
        &self.units
    }

    fn render(&self, _lang: &str, translations: &[String]) -> String {
        self.lines
            .iter()
            .map(|(line, unit)| match unit {
                Some(index) => translation_or_source(&self.units, translations, *index),
                None => line.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
