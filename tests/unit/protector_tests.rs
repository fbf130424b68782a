/*!
 * Tests for substring protection
 */

use polytrans::translation::SubstringProtector;
use polytrans::translation::protect::restore;

const SAMPLES: &[&str] = &[
    "Hello ${user.name}, you have $count new messages",
    "Progress: %d%% of %5.2f MB, left %s",
    "See [the docs](https://example.com/docs) and ![logo](img/logo.png)",
    "Visit https://example.com/a?b=c or http://x.y/z",
    "Literal ZXQ0ZXQ with $var inside",
    "Nothing to protect here",
];

#[test]
fn test_restore_of_untouched_protected_text_should_be_identity() {
    let protector = SubstringProtector::default();
    for sample in SAMPLES {
        let (protected, map) = protector.protect(sample);
        assert_eq!(restore(&protected, &map), *sample);
    }
}

#[test]
fn test_protected_text_should_not_expose_patterns() {
    let protector = SubstringProtector::default();
    let (protected, map) = protector.protect("Hi $name, open https://example.com now");

    assert!(!protected.contains("$name"));
    assert!(!protected.contains("https://"));
    assert_eq!(map.len(), 2);
}

#[test]
fn test_restore_should_survive_token_moves() {
    let protector = SubstringProtector::default();
    let (protected, map) = protector.protect("$first then $second");

    let tokens: Vec<&str> = map.iter().map(|(t, _)| t).collect();
    let translated = format!("{} puis {}", tokens[1], tokens[0]);

    assert_eq!(restore(&translated, &map), "$second puis $first");
    assert!(protected.starts_with(tokens[0]));
}

#[test]
fn test_invalid_custom_pattern_should_error() {
    assert!(SubstringProtector::with_pattern("(unclosed", "TOK").is_err());
}

#[test]
fn test_adjacent_matches_separated_by_digits_should_round_trip() {
    let protector = SubstringProtector::default();
    let matches = ["%d", "%s", "${A}", "$B", "%5.2f", "[x](y)", "HTMLTAG3HTMLTAG"];
    let separators = ["", "1", "12", "0", " 7 ", "3x", "ZXQ"];

    for first in matches {
        for separator in separators {
            for second in matches {
                for tail in ["", "4", " end"] {
                    let original = format!("{}{}{}{}", first, separator, second, tail);
                    let (protected, map) = protector.protect(&original);
                    assert_eq!(restore(&protected, &map), original, "protected as {}", protected);
                }
            }
        }
    }
}

#[test]
fn test_markup_tokens_should_be_protected_by_default() {
    let protector = SubstringProtector::default();
    let (protected, map) = protector.protect("HTMLTAG0HTMLTAGTitleHTMLTAG1HTMLTAG");

    assert!(!protected.contains("HTMLTAG"));
    assert_eq!(map.len(), 2);
    assert_eq!(restore(&protected, &map), "HTMLTAG0HTMLTAGTitleHTMLTAG1HTMLTAG");
}
