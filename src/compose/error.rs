// src/compose/error.rs
// =============================================================================
// Errors the composer can return.
//
// There is only one: a bad marker pattern. A missing fragment is NOT an error
// here - it is reported as MarkerOutcome::Missing and rendered inline as a
// warning, so one missing fragment never blocks the rest of the document.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposeError {
    /// The marker pattern did not compile, or it does not have exactly
    /// one capturing group for the directory name
    #[error("malformed marker pattern '{pattern}': {reason}")]
    MalformedPattern { pattern: String, reason: String },
}
