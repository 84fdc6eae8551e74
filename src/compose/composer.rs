// src/compose/composer.rs
// =============================================================================
// The composer: finds every marker in the root document and swaps it for the
// transformed fragment.
//
// Example (host file README.md, fragment ./builder/README.md):
//
//   ## Builder                      ## Builder
//   <INSERT:builder>        ->      Separates construction from...
//                                   [Code](./builder/builder)
//
// Rules:
// - One pass, left to right. Text we insert is never scanned again, so a
//   fragment containing its own <INSERT:...> marker stays as it is.
// - Every match is computed against the ORIGINAL text, so replacing one
//   marker can't shift or break the next one.
// - A missing fragment becomes an inline <WARNING: ...> and composition
//   carries on with the rest of the document.
//
// Rust concepts:
// - Generics: Composer<S> works with any FragmentSource
// - Closures: replace_all calls our closure once per marker
// - serde: MarkerOutcome can be printed as JSON
// =============================================================================

use regex::{Captures, Regex};
use serde::Serialize;

use super::error::ComposeError;
use super::fragment::{transform_fragment, warning, Insert};
use super::links::LinkRewriter;
use super::loader::FragmentSource;

// The marker syntax existing root documents use: <INSERT:name>
// The name is ASCII letters, digits and '_' only; <INSERT:café> is not a marker
pub const DEFAULT_MARKER_PATTERN: &str = r"<INSERT:([A-Za-z0-9_]+)>";

// The root document name fragments are looked up by
pub const DEFAULT_HOST_FILE_NAME: &str = "README.md";

// A compiled marker pattern with exactly one capturing group
//
// The group captures the directory name: for <INSERT:builder> it is "builder"
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    regex: Regex,
}

impl MarkerPattern {
    // Compiles and validates a marker pattern
    //
    // Parameters:
    //   pattern: a regex such as <INSERT:([A-Za-z0-9_]+)>
    //
    // Returns:
    //   Ok(MarkerPattern) if it compiles and has exactly one capturing group
    //   Err(MalformedPattern) otherwise - this is a configuration mistake,
    //   so we fail right away instead of guessing
    pub fn new(pattern: &str) -> Result<Self, ComposeError> {
        let regex = Regex::new(pattern).map_err(|e| ComposeError::MalformedPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        // captures_len() counts the implicit whole-match group too
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(ComposeError::MalformedPattern {
                pattern: pattern.to_string(),
                reason: format!("expected exactly one capturing group, found {}", groups),
            });
        }

        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for MarkerPattern {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_PATTERN).expect("default marker pattern is valid")
    }
}

// Settings for one composition run
//
// Passed in explicitly instead of living in globals, so the same composer
// works for README.md, index.md, or any other root document
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// File name of the root document, e.g. README.md. Fragments are
    /// ./<group>/<host_file_name>, and anchor links point at ../<host_file_name>
    pub host_file_name: String,
    pub marker_pattern: MarkerPattern,
}

impl ComposeConfig {
    pub fn new(host_file_name: impl Into<String>, marker_pattern: MarkerPattern) -> Self {
        Self {
            host_file_name: host_file_name.into(),
            marker_pattern,
        }
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST_FILE_NAME, MarkerPattern::default())
    }
}

// What happened to one marker
//
// #[serde(tag = "status")] produces {"status": "missing", "group": ..., "path": ...}
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MarkerOutcome {
    /// Fragment found and inserted
    Inserted { group: String },
    /// Fragment could not be read; a warning was inserted instead
    Missing { group: String, path: String },
}

impl MarkerOutcome {
    pub fn is_missing(&self) -> bool {
        matches!(self, MarkerOutcome::Missing { .. })
    }
}

// Result of composing one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub text: String,
    /// One entry per marker, in document order
    pub markers: Vec<MarkerOutcome>,
}

impl Composition {
    pub fn missing_count(&self) -> usize {
        self.markers.iter().filter(|m| m.is_missing()).count()
    }
}

// Composes root documents using one configuration and one fragment source
pub struct Composer<'c, S> {
    config: &'c ComposeConfig,
    source: S,
    rewriter: LinkRewriter,
}

impl<'c, S: FragmentSource> Composer<'c, S> {
    pub fn new(config: &'c ComposeConfig, source: S) -> Self {
        Self {
            rewriter: LinkRewriter::new(&config.host_file_name),
            config,
            source,
        }
    }

    // Replaces every marker in `host_text`
    //
    // Parameters:
    //   host_text: the root document's content (never modified)
    //
    // Returns: Composition with the new text and one MarkerOutcome per marker
    //
    // Never fails: a missing fragment turns into an inline warning
    pub fn compose(&self, host_text: &str) -> Composition {
        let host_file_name = self.config.host_file_name.as_str();
        let mut markers = Vec::new();

        let text = self
            .config
            .marker_pattern
            .regex
            .replace_all(host_text, |caps: &Captures| {
                // A pattern like <INSERT:(\w+)?> can match without the group
                let Some(group) = caps.get(1).map(|m| m.as_str()) else {
                    log::warn!("marker '{}' has no group name, leaving it as is", &caps[0]);
                    return caps[0].to_string();
                };

                match transform_fragment(&self.source, &self.rewriter, group, host_file_name) {
                    Insert::Fragment(text) => {
                        log::debug!("inserted fragment for '{}'", group);
                        markers.push(MarkerOutcome::Inserted {
                            group: group.to_string(),
                        });
                        text
                    }
                    Insert::Missing(path) => {
                        log::warn!("{} not found", path);
                        let text = warning(&path);
                        markers.push(MarkerOutcome::Missing {
                            group: group.to_string(),
                            path,
                        });
                        text
                    }
                }
            })
            .into_owned();

        Composition { text, markers }
    }
}

// Composes `host_text` and returns only the new text
//
// Parameters:
//   host_file_name: e.g. "README.md"
//   host_text: the root document's content
//   marker_pattern: a validated MarkerPattern
//   source: where fragments are read from
//
// Returns: the composed document text
pub fn compose<S: FragmentSource>(
    host_file_name: &str,
    host_text: &str,
    marker_pattern: &MarkerPattern,
    source: S,
) -> String {
    let config = ComposeConfig::new(host_file_name, marker_pattern.clone());
    Composer::new(&config, source).compose(host_text).text
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a capturing group?
//    - The part of a regex inside ( ... )
//    - caps[0] is the whole match, caps[1] the first group, and so on
//    - captures_len() includes caps[0], which is why we subtract 1
//
// 2. Why does replace_all take a closure?
//    - The replacement depends on the match (which fragment to load)
//    - The closure is called once per marker, left to right
//    - It can also push to `markers` because it's an FnMut closure
//
// 3. What is the 'c lifetime on Composer?
//    - Composer borrows the ComposeConfig instead of copying it
//    - 'c says "the config must live at least as long as the Composer"
//
// 4. What does let-else do?
//    - let Some(x) = value else { return ...; };
//    - Binds x if the pattern matches, otherwise runs the else block,
//      which must leave the function (return, break, panic...)
// -----------------------------------------------------------------------------


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::compose::loader::tests::MemorySource;
    use proptest::prelude::*;

    proptest! {
        /// Without '<' there can be no marker, so nothing changes
        #[test]
        fn prop_text_without_markers_unchanged(text in "[^<]{0,120}") {
            let config = ComposeConfig::default();
            let result = Composer::new(&config, MemorySource::default()).compose(&text);
            prop_assert_eq!(result.text, text);
            prop_assert!(result.markers.is_empty());
        }

        /// Text around markers is kept byte for byte
        #[test]
        fn prop_surrounding_text_preserved(
            before in "[^<]{0,30}",
            after in "[^<]{0,30}",
            group in "[a-z_]{1,8}",
        ) {
            let source = MemorySource::default()
                .with(&format!("./{}/README.md", group), "title\nbody");
            let config = ComposeConfig::default();
            let text = format!("{}<INSERT:{}>{}", before, group, after);
            let result = Composer::new(&config, source).compose(&text);
            prop_assert_eq!(result.text, format!("{}body{}", before, after));
        }
    }
}
