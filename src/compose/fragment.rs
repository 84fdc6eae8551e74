// src/compose/fragment.rs
// =============================================================================
// Turns a loaded fragment into the text that replaces its marker.
//
// Steps:
// 1. Load ./<group>/<host file> (or produce a warning if it can't be read)
// 2. Drop the first line - it's the fragment's own title, and the root
//    document already shows a heading for it
// 3. Rewrite anchor links, then bare file links
//
// Rust concepts:
// - Enums with data: Insert is either the text or the path that was missing
// - let-else: bail out early when the fragment can't be loaded
// - split_once: split a string at the first occurrence of a character
// =============================================================================

use super::links::{rewrite_file_links, LinkRewriter};
use super::loader::{fragment_path, load_fragment, FragmentSource};

// What a marker gets replaced with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insert {
    /// The transformed fragment text
    Fragment(String),
    /// The fragment could not be read; holds the path that was tried
    Missing(String),
}

impl Insert {
    /// The text that goes into the composed document
    ///
    /// Missing fragments become the <WARNING: ...> placeholder
    pub fn into_text(self) -> String {
        match self {
            Insert::Fragment(text) => text,
            Insert::Missing(path) => warning(&path),
        }
    }
}

// Builds the placeholder for a fragment that couldn't be read
//
// Example:
//   warning("./missing/README.md")  ->  "<WARNING: ./missing/README.md not found>"
pub fn warning(path: &str) -> String {
    format!("<WARNING: {} not found>", path)
}

// Drops the fragment's title line
//
// Returns: everything after the first '\n'
//
// The first line is ALWAYS dropped, so a fragment that is only a title
// becomes empty text
pub fn strip_title(text: &str) -> &str {
    match text.split_once('\n') {
        Some((_title, rest)) => rest,
        None => "",
    }
}

// Loads and rewrites the fragment for `group`
//
// Parameters:
//   source: where fragments are read from
//   rewriter: anchor-link rewriter built for host_file_name
//   group: the marker's directory name, e.g. "builder"
//   host_file_name: e.g. "README.md"
//
// Returns:
//   Insert::Fragment(text) - title dropped, both link passes applied
//   Insert::Missing(path)  - ./<group>/<host_file_name> could not be read
pub fn transform_fragment<S: FragmentSource + ?Sized>(
    source: &S,
    rewriter: &LinkRewriter,
    group: &str,
    host_file_name: &str,
) -> Insert {
    let Some(raw) = load_fragment(source, group, host_file_name) else {
        return Insert::Missing(fragment_path(group, host_file_name));
    };

    let body = strip_title(&raw);

    // Anchors first: afterwards they look like (#anchor), which the
    // file-link pattern can't match
    let anchored = rewriter.rewrite_anchor_links(body);
    Insert::Fragment(rewrite_file_links(&anchored, group).into_owned())
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does strip_title return &str and not String?
//    - The result is just a slice of the input - no copy needed
//    - The lifetime ties it to `text`: it can't outlive the original
//
// 2. What does split_once return?
//    - Some((before, after)) when the separator is found
//    - None when it isn't (here: a one-line fragment)
//
// 3. Why an Insert enum instead of Result?
//    - A missing fragment is an expected situation, not a failure
//    - The composer still needs the path to build the warning and report it
// -----------------------------------------------------------------------------
