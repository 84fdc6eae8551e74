// src/compose/mod.rs
// =============================================================================
// This module builds one root document out of per-directory fragments.
//
// Submodules (leaves first):
// - links: rewrites the two link shapes found in a fragment
// - loader: reads ./<dir>/<host file> through a FragmentSource
// - fragment: drops the title line and applies both link rewrites
// - composer: finds markers in the root document and replaces them
// - error: the one way composition can fail (a bad marker pattern)
//
// Everything here is pure apart from reading fragments, which goes through
// the FragmentSource trait.
// =============================================================================

mod composer;
mod error;
mod fragment;
mod links;
mod loader;

pub use composer::{
    compose, ComposeConfig, Composer, Composition, MarkerOutcome, MarkerPattern,
    DEFAULT_HOST_FILE_NAME, DEFAULT_MARKER_PATTERN,
};
pub use error::ComposeError;
pub use fragment::{strip_title, transform_fragment, warning, Insert};
pub use links::{rewrite_anchor_links, rewrite_file_links, LinkRewriter};
pub use loader::{fragment_path, load_fragment, FragmentSource, FsSource};

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why are the submodules private (mod, not pub mod)?
//    - Users of this module only see what we re-export with pub use
//    - We can move code between files without breaking anyone
//
// 2. Why is "leaves first" order useful?
//    - links and loader depend on nothing else here
//    - fragment uses both; composer uses fragment
//    - Reading them in this order, each file only needs what you've seen
// -----------------------------------------------------------------------------
