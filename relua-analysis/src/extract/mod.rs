//! Reference extractor — `require` statements to tagged outcomes.
//!
//! Every recognized `require` yields exactly one tagged result instead of a
//! best-effort string: a statically-known identifier, a dynamic reference
//! (argument built at runtime), or a malformed one (literal present but
//! unusable). Dynamic and malformed references are counted for reporting
//! and never become edges.

use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use regex::Regex;

/// One reference statement found in file text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedRef {
    /// `require("a.b.c")` / `require 'a.b.c'` — statically known.
    Identifier(String),
    /// `require(expr)` — argument not statically determinable.
    Dynamic,
    /// A literal argument that cannot name a module (empty, bad characters).
    Malformed,
}

/// Cheap literal gate; most lines contain no reference at all.
static REQUIRE_SCAN: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::new(["require"]).expect("static pattern set")
});

/// `require("id")` / `require('id')` / `require "id"` / `require 'id'`,
/// anchored at the text following the `require` token.
static LITERAL_ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:\s*\(\s*|\s+)["']([^"']*)["']"#).expect("static pattern")
});

/// A call with anything but a string literal inside.
static DYNAMIC_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\(").expect("static pattern"));

/// Word-boundary occurrences of the `require` token.
static REQUIRE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\brequire\b").expect("static pattern"));

/// Extract all references from raw file text, in order of appearance.
///
/// Duplicates are preserved; the dependency graph deduplicates edges.
/// Text after a `--` line comment marker is not scanned.
pub fn extract_references(text: &str) -> Vec<ExtractedRef> {
    if !REQUIRE_SCAN.is_match(text) {
        return Vec::new();
    }

    let mut refs = Vec::new();
    for line in text.lines() {
        let code = strip_line_comment(line);
        if !REQUIRE_SCAN.is_match(code) {
            continue;
        }
        for token in REQUIRE_TOKEN.find_iter(code) {
            let rest = &code[token.end()..];
            if let Some(caps) = LITERAL_ARG.captures(rest) {
                let arg = &caps[1];
                if is_valid_identifier(arg) {
                    refs.push(ExtractedRef::Identifier(arg.to_string()));
                } else {
                    refs.push(ExtractedRef::Malformed);
                }
            } else if DYNAMIC_ARG.is_match(rest) {
                refs.push(ExtractedRef::Dynamic);
            }
            // Anything else is the word `require` outside a reference
            // statement (shadowed local, prose in a string); not a reference.
        }
    }
    refs
}

/// Truncate a line at its `--` comment marker.
fn strip_line_comment(line: &str) -> &str {
    match line.find("--") {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// A usable module identifier: dot-separated, non-empty segments of
/// word characters or dashes.
fn is_valid_identifier(arg: &str) -> bool {
    !arg.is_empty()
        && arg.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_paren_and_bare_forms() {
        let text = r#"
local a = require("luci.http")
local b = require('nixio.fs')
local c = require "luci.sys"
local d = require 'cjson'
"#;
        assert_eq!(
            extract_references(text),
            vec![
                ExtractedRef::Identifier("luci.http".to_string()),
                ExtractedRef::Identifier("nixio.fs".to_string()),
                ExtractedRef::Identifier("luci.sys".to_string()),
                ExtractedRef::Identifier("cjson".to_string()),
            ]
        );
    }

    #[test]
    fn whitespace_inside_call_is_tolerated() {
        let refs = extract_references(r#"local m = require ( "a.b" )"#);
        assert_eq!(refs, vec![ExtractedRef::Identifier("a.b".to_string())]);
    }

    #[test]
    fn dynamic_argument_is_tagged_not_dropped() {
        let refs = extract_references("local m = require(modname)");
        assert_eq!(refs, vec![ExtractedRef::Dynamic]);
    }

    #[test]
    fn concatenated_argument_is_not_an_identifier() {
        // The captured literal "mod." has an empty trailing segment; the
        // full argument is only known at runtime.
        let refs = extract_references(r#"local m = require("mod." .. suffix)"#);
        assert_eq!(refs, vec![ExtractedRef::Malformed]);
    }

    #[test]
    fn empty_literal_is_malformed() {
        let refs = extract_references(r#"require("")"#);
        assert_eq!(refs, vec![ExtractedRef::Malformed]);
    }

    #[test]
    fn path_like_literal_is_malformed() {
        let refs = extract_references(r#"require("a/b")"#);
        assert_eq!(refs, vec![ExtractedRef::Malformed]);
    }

    #[test]
    fn duplicates_preserved_in_order() {
        let text = "require('a')\nrequire('b')\nrequire('a')\n";
        assert_eq!(
            extract_references(text),
            vec![
                ExtractedRef::Identifier("a".to_string()),
                ExtractedRef::Identifier("b".to_string()),
                ExtractedRef::Identifier("a".to_string()),
            ]
        );
    }

    #[test]
    fn line_comments_are_ignored() {
        let text = "-- require('a')\nlocal b = require('b') -- require('c')\n";
        assert_eq!(
            extract_references(text),
            vec![ExtractedRef::Identifier("b".to_string())]
        );
    }

    #[test]
    fn shadowed_identifier_is_not_a_reference() {
        let refs = extract_references("local require = loader\nrequires('x')\n");
        assert!(refs.is_empty());
    }

    #[test]
    fn no_references_fast_path() {
        assert!(extract_references("local x = 1\nreturn x\n").is_empty());
    }
}
