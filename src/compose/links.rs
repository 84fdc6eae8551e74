// src/compose/links.rs
// =============================================================================
// This module rewrites links inside a fragment so they still work once the
// fragment is pasted into the root document.
//
// Two link shapes are handled, always in this order:
// 1. Anchor links back to the root document:
//      [Title](../README.md#some-heading)  ->  [Title](#some-heading)
// 2. Bare file links next to the fragment:
//      [Go](other)                         ->  [Go](./<dir>/other)
//
// Anything else (URLs, paths with slashes, images with extensions...) is
// left exactly as it was.
//
// Rust concepts:
// - regex::Regex::replace_all: walks the ORIGINAL text once and builds a new
//   string, so replaced text is never matched a second time
// - Cow<str>: "clone on write" - we only allocate when something changed
// - OnceLock: compile a constant regex once and reuse it
// =============================================================================

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::OnceLock;

// Label: anything up to the closing bracket, on one line
const LABEL: &str = r"[^\]\n]*";

// Link tokens are ASCII only: letters, digits, underscore.
// regex's \w is Unicode and would also accept "café"
const WORD: &str = "[A-Za-z0-9_]+";

// Heading anchors are the same, plus '-' (GitHub turns spaces into dashes)
const ANCHOR: &str = "[A-Za-z0-9_-]+";

// Rewrites anchor links that point back at the root document
//
// Built once per host file name because the file name is part of the
// pattern (README.md, index.md, ...)
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    anchor_links: Regex,
}

impl LinkRewriter {
    // Creates a rewriter for fragments of `host_file_name`
    //
    // Parameters:
    //   host_file_name: the root document's file name (e.g. "README.md")
    //
    // Example pattern for "README.md":
    //   \[([^\]\n]*)\]\(\.\./README\.md#([A-Za-z0-9_-]+)\)
    pub fn new(host_file_name: &str) -> Self {
        let pattern = format!(
            r"\[({})\]\(\.\./{}#({})\)",
            LABEL,
            regex::escape(host_file_name),
            ANCHOR
        );
        // The file name is escaped, so the pattern is always valid
        let anchor_links =
            Regex::new(&pattern).expect("escaped host file name forms a valid pattern");
        Self { anchor_links }
    }

    // Rewrites every anchor link in `text`
    //
    // Example:
    //   "[See X](../README.md#x-section)"  ->  "[See X](#x-section)"
    //
    // Returns: the rewritten text (borrowed if nothing matched)
    pub fn rewrite_anchor_links<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.anchor_links.replace_all(text, |caps: &Captures| {
            // caps[1] = label, caps[2] = anchor
            format!("[{}](#{})", &caps[1], &caps[2])
        })
    }
}

// The bare file link pattern never changes, so compile it once
fn file_link_regex() -> &'static Regex {
    static FILE_LINK: OnceLock<Regex> = OnceLock::new();
    FILE_LINK.get_or_init(|| {
        Regex::new(&format!(r"\[({})\]\(({})\)", LABEL, WORD)).expect("file link pattern is valid")
    })
}

// Rewrites anchor links for a one-off call
//
// Parameters:
//   text: fragment text
//   host_file_name: the root document's file name
//
// Returns: a new String with [label](../<host>#anchor) turned into
// [label](#anchor)
pub fn rewrite_anchor_links(text: &str, host_file_name: &str) -> String {
    LinkRewriter::new(host_file_name)
        .rewrite_anchor_links(text)
        .into_owned()
}

// Rewrites bare file links so they point into the fragment's directory
//
// Parameters:
//   text: fragment text (anchor links already rewritten)
//   dir_name: the marker's group name, e.g. "builder"
//
// Example:
//   "[Go](other)"  ->  "[Go](./builder/other)"
//
// Only a single token of ASCII letters, digits and '_' matches. An already
// rewritten anchor (#anchor) or a path (./x, a/b, x.md) is left alone.
pub fn rewrite_file_links<'t>(text: &'t str, dir_name: &str) -> Cow<'t, str> {
    file_link_regex().replace_all(text, |caps: &Captures| {
        format!("[{}](./{}/{})", &caps[1], dir_name, &caps[2])
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does the order of the two passes matter?
//    - The file link pattern is broad: any [x](word) matches
//    - Rewriting anchors first turns them into [x](#anchor), and '#' is not a
//      word character, so the second pass leaves them alone
//
// 2. What does regex::escape do?
//    - "README.md" contains '.', which means "any character" in a regex
//    - escape() turns it into "README\.md" so only a literal dot matches
//
// 3. Why return Cow<str> instead of String?
//    - replace_all returns Cow::Borrowed when nothing matched
//    - That means no allocation at all for fragments without links
//    - Call .into_owned() when you really need a String
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_anchor_link() {
        let text = "[See X](../README.md#x-section)";
        assert_eq!(rewrite_anchor_links(text, "README.md"), "[See X](#x-section)");
    }

    #[test]
    fn test_anchor_link_needs_exact_host_name() {
        let text = "[See X](../README_md#x) and [Y](../INDEX.md#y)";
        assert_eq!(rewrite_anchor_links(text, "README.md"), text);
    }

    #[test]
    fn test_anchor_link_with_empty_label() {
        assert_eq!(rewrite_anchor_links("[](../README.md#top)", "README.md"), "[](#top)");
    }

    #[test]
    fn test_rewrite_file_link() {
        assert_eq!(rewrite_file_links("[Go](other)", "demo"), "[Go](./demo/other)");
    }

    #[test]
    fn test_file_link_skips_rewritten_anchor() {
        let text = "[See X](#x-section)";
        assert!(matches!(rewrite_file_links(text, "demo"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_file_link_skips_paths_and_urls() {
        let text = "[a](./a) [b](a/b) [c](c.md) [d](https://example.com) [e](../e)";
        assert_eq!(rewrite_file_links(text, "demo"), text);
    }

    #[test]
    fn test_bracket_text_that_is_not_a_link() {
        let text = "array[0] (value) and [note] (spaced)";
        assert_eq!(rewrite_file_links(text, "demo"), text);
        assert_eq!(rewrite_anchor_links(text, "README.md"), text);
    }

    #[test]
    fn test_label_stops_at_closing_bracket() {
        let text = "[a] then [b](target)";
        assert_eq!(
            rewrite_file_links(text, "demo"),
            "[a] then [b](./demo/target)"
        );
    }

    #[test]
    fn test_both_passes_in_order() {
        let rewriter = LinkRewriter::new("README.md");
        let text = "[Up](../README.md#usage), [Code](main), [Web](https://x.io)";
        let anchored = rewriter.rewrite_anchor_links(text);
        let result = rewrite_file_links(&anchored, "builder");
        assert_eq!(
            result,
            "[Up](#usage), [Code](./builder/main), [Web](https://x.io)"
        );
    }

    #[test]
    fn test_non_ascii_targets_are_left_alone() {
        let text = "[x](café) [y](über)";
        assert!(matches!(rewrite_file_links(text, "d"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_non_ascii_anchor_is_left_alone() {
        let text = "[x](../README.md#café)";
        assert_eq!(rewrite_anchor_links(text, "README.md"), text);
    }

    #[test]
    fn test_multiple_links_on_many_lines() {
        let text = "- [One](one)\n- [Two](two)\n";
        assert_eq!(
            rewrite_file_links(text, "d"),
            "- [One](./d/one)\n- [Two](./d/two)\n"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Text without any '[' has nothing to rewrite
        #[test]
        fn prop_text_without_brackets_unchanged(text in "[^\\[]{0,80}") {
            prop_assert_eq!(rewrite_file_links(&text, "dir"), text.as_str());
            prop_assert_eq!(rewrite_anchor_links(&text, "README.md"), text);
        }

        /// A second file-link pass finds nothing left to rewrite
        #[test]
        fn prop_file_links_settle_after_one_pass(
            label in "[a-zA-Z ]{0,10}",
            target in "[a-z_]{1,10}",
            prefix in "[a-z ]{0,10}",
            suffix in "[a-z ]{0,10}",
        ) {
            let text = format!("{}[{}]({}){}", prefix, label, target, suffix);
            let once = rewrite_file_links(&text, "dir").into_owned();
            prop_assert_eq!(
                &once,
                &format!("{}[{}](./dir/{}){}", prefix, label, target, suffix)
            );
            prop_assert!(!file_link_regex().is_match(&once));
        }

        /// Rewritten anchors are never touched by the file-link pass
        #[test]
        fn prop_anchor_then_file_is_stable(
            label in "[a-zA-Z ]{0,10}",
            anchor in "[a-z][a-z0-9-]{0,12}",
        ) {
            let text = format!("[{}](../README.md#{})", label, anchor);
            let anchored = rewrite_anchor_links(&text, "README.md");
            let expected = format!("[{}](#{})", label, anchor);
            prop_assert_eq!(&anchored, &expected);
            prop_assert_eq!(rewrite_file_links(&anchored, "dir"), expected.as_str());
        }
    }
}
