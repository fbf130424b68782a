/*!
 * Document formats.
 *
 * Each format splits a document into translatable text units and rebuilds
 * the document from their translations:
 * - `markdown`: line based, code fences and list/heading prefixes kept
 * - `plaintext`: one unit per non-blank line
 * - `json`: every string leaf
 * - `html`: line based, tags protected
 * - `gettext`: `msgid`/`msgid_plural` of PO and POT catalogues
 */

use anyhow::Result;
use std::path::Path;

pub mod gettext;
pub mod html;
pub mod json;
pub mod markdown;
pub mod plaintext;

pub use self::gettext::GettextDocument;
pub use self::html::HtmlDocument;
pub use self::json::JsonDocument;
pub use self::markdown::MarkdownDocument;
pub use self::plaintext::PlainTextDocument;

/// A parsed document that can be translated unit by unit
pub trait Document: Send + Sync {
    /// Translatable units, in document order
    fn units(&self) -> &[String];

    /// Rebuild the document for `lang`
    ///
    /// `translations[i]` replaces `units()[i]`; missing or blank
    /// translations fall back to the source unit.
    fn render(&self, lang: &str, translations: &[String]) -> String;
}

/// Translation of unit `index`, or the unit itself when there is none
pub(crate) fn translation_or_source<'a>(units: &'a [String], translations: &'a [String], index: usize) -> &'a str {
    match translations.get(index) {
        Some(t) if !t.trim().is_empty() => t,
        _ => &units[index],
    }
}

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Markdown,
    PlainText,
    Json,
    Html,
    Gettext,
}

impl DocumentFormat {
    /// Detect the format from a file extension
    ///
    /// Files without an extension are treated as plain text.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let extension = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());

        match extension.as_deref() {
            None | Some("txt") => Some(Self::PlainText),
            Some("md") | Some("markdown") => Some(Self::Markdown),
            Some("json") => Some(Self::Json),
            Some("html") | Some("htm") => Some(Self::Html),
            Some("po") | Some("pot") => Some(Self::Gettext),
            Some(_) => None,
        }
    }

    /// Subdirectory of the output root the translated files go to
    pub fn output_dir(&self) -> &'static str {
        match self {
            Self::Markdown => "doc",
            Self::PlainText => "txt",
            Self::Json => "json",
            Self::Html => "html",
            Self::Gettext => "pot",
        }
    }

    /// Extension of translated files, without the dot
    ///
    /// `None` keeps the input extension.
    pub fn output_extension(&self) -> Option<&'static str> {
        match self {
            Self::Gettext => Some("po"),
            _ => None,
        }
    }

    /// Short label for progress output
    pub fn label(&self) -> &'static str {
        match self {
            Self::Markdown => "MD",
            Self::PlainText => "TXT",
            Self::Json => "JSON",
            Self::Html => "HTML",
            Self::Gettext => "PO",
        }
    }

    /// Parse document content
    pub fn parse(&self, content: &str) -> Result<Box<dyn Document>> {
        Ok(match self {
            Self::Markdown => Box::new(MarkdownDocument::parse(content)),
            Self::PlainText => Box::new(PlainTextDocument::parse(content)),
            Self::Json => Box::new(JsonDocument::parse(content)?),
            Self::Html => Box::new(HtmlDocument::parse(content)),
            Self::Gettext => Box::new(GettextDocument::parse(content)),
        })
    }
}
