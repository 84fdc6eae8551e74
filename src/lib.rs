// src/lib.rs
// =============================================================================
// readme-composer builds a root README out of the READMEs in its
// sub-directories.
//
// A root document contains markers like <INSERT:builder>. Each marker is
// replaced with ./builder/README.md (minus its title line), and the links in
// that fragment are rewritten so they still work from the root:
//
//   [Back](../README.md#intro)  ->  [Back](#intro)
//   [Code](builder)             ->  [Code](./builder/builder)
//
// Modules:
// - compose: the composer and link rewriting (no root-document I/O)
// - batch: reads/writes root documents, several at a time
// =============================================================================

pub mod batch;
pub mod compose;
