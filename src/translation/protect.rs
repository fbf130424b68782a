/*!
 * Protection of substrings the translator must not touch.
 *
 * Variable references, format specifiers, links and URLs are swapped for
 * opaque tokens before a text goes to the translator and swapped back
 * afterwards. Tokens have the form `<PREFIX><index><PREFIX>`.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Default token prefix
pub const DEFAULT_PREFIX: &str = "ZXQ";

/// Token prefix used for markup hidden by document formats
pub const MARKUP_PREFIX: &str = "HTMLTAG";

/// Markup tokens, shell variables, printf specifiers, Markdown images and
/// links, raw URLs
static DEFAULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{0}Q*\d+{0}|\$\{{[A-Za-z0-9_.]+\}}|\$[A-Za-z0-9_.]+|%(?:\d+\$)?[-+#0]*\d*(?:\.\d+)?(?:hh|h|ll|l|z|j|t|L)?[diouxXeEfFgGaAcspn%]|!\[[^\]]*\]\([^)]*\)|\[[^\]]*\]\([^)]*\)|https?://[^\s]+",
        MARKUP_PREFIX
    ))
    .expect("default protection pattern is valid")
});

/// Mapping from generated tokens to the substrings they replaced
///
/// Entries keep match order, so the token with index `i` is entry `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderMap {
    prefix: String,
    entries: Vec<(String, String)>,
}

impl PlaceholderMap {
    /// Number of protected substrings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was protected
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Token and original text pairs, in match order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, o)| (t.as_str(), o.as_str()))
    }

    /// Prefix the tokens were built with
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Original text for a token
    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, o)| o.as_str())
    }
}

/// Replaces configured patterns with opaque tokens and restores them
#[derive(Debug, Clone)]
pub struct SubstringProtector {
    pattern: Regex,
    prefix: String,
}

impl Default for SubstringProtector {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl SubstringProtector {
    /// Create a protector with a custom pattern and token prefix
    ///
    /// The prefix should be alphanumeric so translators leave it alone.
    pub fn new(pattern: Regex, prefix: &str) -> Self {
        Self {
            pattern,
            prefix: prefix.to_string(),
        }
    }

    /// Create a protector from a pattern string
    pub fn with_pattern(pattern: &str, prefix: &str) -> Result<Self, regex::Error> {
        Ok(Self::new(Regex::new(pattern)?, prefix))
    }

    /// Replace every non-overlapping match, left to right, with a fresh token
    pub fn protect(&self, text: &str) -> (String, PlaceholderMap) {
        let mut map = PlaceholderMap::default();
        if !self.pattern.is_match(text) {
            return (text.to_string(), map);
        }

        let prefix = self.collision_free_prefix(text);
        map.prefix = prefix.clone();
        let protected = self
            .pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let token = format!("{}{}{}", prefix, map.entries.len(), prefix);
                map.entries.push((token.clone(), caps[0].to_string()));
                token
            })
            .into_owned();

        (protected, map)
    }

    /// Put the original substrings back
    ///
    /// Every occurrence of each token is replaced, wherever the translator
    /// moved it.
    pub fn restore(&self, text: &str, map: &PlaceholderMap) -> String {
        restore(text, map)
    }

    /// Extend the prefix until it does not occur in the text
    fn collision_free_prefix(&self, text: &str) -> String {
        let mut prefix = self.prefix.clone();
        while text.contains(&prefix) {
            prefix.push('Q');
        }
        prefix
    }
}

/// Put the original substrings back into a translated text
///
/// Tokens are resolved in one left-to-right scan, so digits between two
/// adjacent tokens never combine into a token of their own. Tokens with an
/// unknown index are left as they are.
pub fn restore(text: &str, map: &PlaceholderMap) -> String {
    if map.is_empty() {
        return text.to_string();
    }

    let prefix = regex::escape(&map.prefix);
    let token = match Regex::new(&format!(r"{}(\d+){}", prefix, prefix)) {
        Ok(token) => token,
        Err(_) => return text.to_string(),
    };

    token
        .replace_all(text, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| map.entries.get(index))
                .map_or_else(|| caps[0].to_string(), |(_, original)| original.clone())
        })
        .into_owned()
}
