use once_cell::sync::Lazy;
use regex::Regex;

use super::{Document, translation_or_source};

static LANGUAGE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"Language:[^"]*\\n"\s*$"#).expect("valid header pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Context,
    Id,
    Plural,
    Str,
}

/// One catalogue entry, kept as its source lines
#[derive(Debug, Clone, Default)]
struct Entry {
    raw: Vec<String>,
    /// Lines up to the first `msgstr`
    head_len: usize,
    has_context: bool,
    id: String,
    plural: Option<String>,
    plural_forms: usize,
    /// Unit indexes of `msgid` and `msgid_plural`
    id_unit: Option<usize>,
    plural_unit: Option<usize>,
}

impl Entry {
    fn is_header(&self) -> bool {
        !self.has_context && self.id.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Item {
    Raw(String),
    Entry(Entry),
}

/// PO or POT catalogue
///
/// `msgid` and `msgid_plural` texts are the units. Comments and the header
/// entry are copied as they are, except the header's `Language` field which
/// is set to the target language.
#[derive(Debug, Clone)]
pub struct GettextDocument {
    items: Vec<Item>,
    units: Vec<String>,
}

struct Parser {
    items: Vec<Item>,
    units: Vec<String>,
    current: Option<Entry>,
    field: Option<Field>,
}

impl Parser {
    fn flush(&mut self) {
        if let Some(mut entry) = self.current.take() {
            if entry.head_len == 0 {
                entry.head_len = entry.raw.len();
            }
            if !entry.is_header() {
                if !entry.id.is_empty() {
                    self.units.push(entry.id.clone());
                    entry.id_unit = Some(self.units.len() - 1);
                }
                if let Some(plural) = entry.plural.as_ref().filter(|p| !p.is_empty()) {
                    self.units.push(plural.clone());
                    entry.plural_unit = Some(self.units.len() - 1);
                }
            }
            self.items.push(Item::Entry(entry));
        }
        self.field = None;
    }

    fn start_field(&mut self, field: Field, line: &str, value: &str) {
        // msgctxt and msgid begin a new entry, unless msgid follows its msgctxt
        let follows_context = field == Field::Id && self.field == Some(Field::Context);
        if matches!(field, Field::Context | Field::Id) && !follows_context {
            self.flush();
        }

        let entry = self.current.get_or_insert_with(Entry::default);
        match field {
            Field::Context => entry.has_context = true,
            Field::Id => entry.id.push_str(&decode(value)),
            Field::Plural => entry.plural = Some(decode(value)),
            Field::Str => {
                if entry.head_len == 0 {
                    entry.head_len = entry.raw.len();
                }
                entry.plural_forms += 1;
            }
        }
        entry.raw.push(line.to_string());
        self.field = Some(field);
    }

    fn continue_field(&mut self, line: &str) -> bool {
        let (Some(entry), Some(field)) = (self.current.as_mut(), self.field) else {
            return false;
        };
        let value = decode(line.trim());
        match field {
            Field::Context | Field::Str => {}
            Field::Id => entry.id.push_str(&value),
            Field::Plural => {
                if let Some(plural) = entry.plural.as_mut() {
                    plural.push_str(&value);
                }
            }
        }
        entry.raw.push(line.to_string());
        true
    }
}

impl GettextDocument {
    /// Parse catalogue content
    pub fn parse(content: &str) -> Self {
        let mut parser = Parser {
            items: Vec::new(),
            units: Vec::new(),
            current: None,
            field: None,
        };

        for line in content.split('\n') {
            let trimmed = line.trim();

            if let Some(rest) = trimmed.strip_prefix("msgctxt ") {
                parser.start_field(Field::Context, line, rest);
            } else if let Some(rest) = trimmed.strip_prefix("msgid_plural ") {
                parser.start_field(Field::Plural, line, rest);
            } else if let Some(rest) = trimmed.strip_prefix("msgid ") {
                parser.start_field(Field::Id, line, rest);
            } else if trimmed.starts_with("msgstr") {
                let value = trimmed.split_once(' ').map(|(_, v)| v).unwrap_or("\"\"");
                parser.start_field(Field::Str, line, value);
            } else if trimmed.starts_with('"') && parser.continue_field(line) {
                continue;
            } else {
                parser.flush();
                parser.items.push(Item::Raw(line.to_string()));
            }
        }
        parser.flush();

        Self {
            items: parser.items,
            units: parser.units,
        }
    }

    fn render_entry(&self, entry: &Entry, lang: &str, translations: &[String], out: &mut Vec<String>) {
        if entry.is_header() {
            out.extend(entry.raw.iter().map(|line| {
                if LANGUAGE_HEADER.is_match(line) {
                    format!("\"Language: {}\\n\"", lang)
                } else {
                    line.clone()
                }
            }));
            return;
        }

        out.extend(entry.raw[..entry.head_len].iter().cloned());

        let singular = entry
            .id_unit
            .map(|i| translation_or_source(&self.units, translations, i))
            .unwrap_or("");

        if entry.plural.is_some() {
            let plural = entry
                .plural_unit
                .map(|i| translation_or_source(&self.units, translations, i))
                .unwrap_or(singular);
            for form in 0..entry.plural_forms.max(2) {
                let text = if form == 0 { singular } else { plural };
                out.push(format!("msgstr[{}] \"{}\"", form, encode(text)));
            }
        } else {
            out.push(format!("msgstr \"{}\"", encode(singular)));
        }
    }
}

impl Document for GettextDocument {
    fn units(&self) -> &[String] {
        &self.units
    }

    fn render(&self, lang: &str, translations: &[String]) -> String {
        let mut out = Vec::new();
        for item in &self.items {
            match item {
                Item::Raw(line) => out.push(line.clone()),
                Item::Entry(entry) => self.render_entry(entry, lang, translations, &mut out),
            }
        }
        out.join("\n")
    }
}

/// Decode one quoted PO string
fn decode(quoted: &str) -> String {
    let inner = quoted
        .trim()
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(quoted);

    let mut decoded = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => decoded.push('\n'),
            Some('t') => decoded.push('\t'),
            Some('r') => decoded.push('\r'),
            Some(other) => decoded.push(other),
            None => decoded.push('\\'),
        }
    }
    decoded
}

/// Escape text for a quoted PO string
fn encode(text: &str) -> String {
    let mut encoded = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => encoded.push_str("\\\\"),
            '"' => encoded.push_str("\\\""),
            '\n' => encoded.push_str("\\n"),
            '\t' => encoded.push_str("\\t"),
            '\r' => encoded.push_str("\\r"),
            _ => encoded.push(c),
        }
    }
    encoded
}
