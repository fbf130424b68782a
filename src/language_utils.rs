use isolang::Language;

/// Language utilities for target language handling
///
/// Target languages use gettext-style locale codes (`pt_BR`, `zh_TW`); the
/// external engine expects BCP 47 style (`pt-BR`).
/// Every language the tool knows how to target
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "bg", "cs", "da", "de", "el", "en", "es", "et",
    "fa", "fi", "fr", "he", "hi", "hr", "hu", "is", "it",
    "ja", "ko", "nl", "no", "pl", "pt_PT", "pt_BR", "ro",
    "ru", "sk", "sv", "tr", "uk", "zh_CN", "zh_TW",
];

/// Languages used when none are requested
pub const DEFAULT_LANGUAGES: &[&str] = &[
    "pt_BR", "en", "es", "it", "de", "fr", "ru", "zh_CN", "zh_TW", "ja", "ko",
];

/// Keyword selecting every supported language
pub const ALL_LANGUAGES: &str = "all";

/// Expand a requested language list
///
/// An empty list yields the defaults, a list starting with "all" yields every
/// supported language. Blank entries and duplicates are dropped, order is kept.
pub fn resolve_target_languages<S: AsRef<str>>(requested: &[S]) -> Vec<String> {
    let requested: Vec<&str> = requested
        .iter()
        .map(|l| l.as_ref().trim())
        .filter(|l| !l.is_empty())
        .collect();

    let source: Vec<&str> = match requested.first() {
        None => DEFAULT_LANGUAGES.to_vec(),
        Some(first) if first.eq_ignore_ascii_case(ALL_LANGUAGES) => SUPPORTED_LANGUAGES.to_vec(),
        Some(_) => requested,
    };

    let mut languages: Vec<String> = Vec::with_capacity(source.len());
    for lang in source {
        if !languages.iter().any(|l| l == lang) {
            languages.push(lang.to_string());
        }
    }
    languages
}

/// Check whether a code is in the supported list
pub fn is_supported(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Convert a locale code to the form the engine expects (`pt_BR` -> `pt-BR`)
pub fn to_engine_code(code: &str) -> String {
    code.trim().replace('_', "-")
}

/// Base ISO 639-1 part of a locale code (`zh_TW` -> `zh`)
pub fn base_code(code: &str) -> String {
    code.trim()
        .split(['_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase()
}

/// Get the English language name for a code, falling back to the code itself
pub fn get_language_name(code: &str) -> String {
    let base = base_code(code);
    let language = match base.len() {
        2 => Language::from_639_1(&base),
        3 => Language::from_639_3(&base),
        _ => None,
    };

    match language {
        Some(lang) => lang.to_name().to_string(),
        None => code.to_string(),
    }
}
