// src/batch/mod.rs
// =============================================================================
// This module handles the files around the composer: reading root
// documents, writing the composed result, and doing that for several
// documents at once.
//
// Rust concepts:
// - Modules: the composer itself (src/compose/) never touches the root
//   document on disk; this module does
// =============================================================================

mod run;

pub use run::{
    compose_document, compose_documents, DocumentJob, DocumentReport, DocumentStatus, Mode,
};
