// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - compose: replace markers and write the result
// - check:   compose without writing and report what's missing
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use readme_composer::compose::{DEFAULT_HOST_FILE_NAME, DEFAULT_MARKER_PATTERN};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "readme-composer",
    version = "0.1.0",
    about = "Builds a root README out of the READMEs in its sub-directories",
    long_about = "readme-composer replaces markers like <INSERT:builder> in a root document with \
                  ./builder/README.md, dropping the fragment's title line and rewriting its links \
                  so they keep working from the root document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace markers and write the composed document
    ///
    /// Example: readme-composer compose README.md
    Compose {
        #[command(flatten)]
        common: CommonArgs,

        /// Write the result here instead of over the document
        ///
        /// Only valid with a single document
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Print the result instead of writing it
        #[arg(long, conflicts_with_all = ["output", "json"])]
        stdout: bool,
    },

    /// Compose without writing; exit 1 if any fragment is missing
    ///
    /// Example: readme-composer check README.md docs/README.md
    Check {
        #[command(flatten)]
        common: CommonArgs,
    },
}

// Arguments shared by both subcommands
#[derive(Args, Debug)]
pub struct CommonArgs {
    /// Root documents to compose
    ///
    /// Fragments are looked up next to each document as ./<dir>/<file name>
    #[arg(default_value = DEFAULT_HOST_FILE_NAME)]
    pub documents: Vec<PathBuf>,

    /// Marker regex; must have exactly one capturing group (the directory)
    #[arg(long, env = "README_COMPOSER_MARKER", default_value = DEFAULT_MARKER_PATTERN)]
    pub marker_pattern: String,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// How many documents to compose at once
    #[arg(long, short, default_value_t = 4)]
    pub jobs: usize,
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does #[command(flatten)] do?
//    - It pulls every field of CommonArgs into the subcommand
//    - Both compose and check get the same flags without repeating them
//
// 2. Why Vec<PathBuf> for documents?
//    - A positional Vec accepts any number of values
//    - default_value gives us README.md when none are passed
//
// 3. What does env = "README_COMPOSER_MARKER" do?
//    - If --marker-pattern isn't given, clap reads the environment variable
//    - If neither is set, default_value is used
//
// 4. What is conflicts_with_all?
//    - clap refuses --stdout together with --output or --json
//    - The user gets a clear error instead of surprising output
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["readme-composer", "check"]);
        let Commands::Check { common } = cli.command else {
            panic!("expected check");
        };
        assert_eq!(common.documents, vec![PathBuf::from("README.md")]);
        assert_eq!(common.marker_pattern, DEFAULT_MARKER_PATTERN);
        assert_eq!(common.jobs, 4);
        assert!(!common.json);
    }

    #[test]
    fn test_compose_with_output() {
        let cli = Cli::parse_from(["readme-composer", "compose", "docs/README.md", "-o", "OUT.md"]);
        let Commands::Compose { common, output, stdout } = cli.command else {
            panic!("expected compose");
        };
        assert_eq!(common.documents, vec![PathBuf::from("docs/README.md")]);
        assert_eq!(output, Some(PathBuf::from("OUT.md")));
        assert!(!stdout);
    }

    #[test]
    fn test_stdout_conflicts_with_json() {
        let result = Cli::try_parse_from(["readme-composer", "compose", "--stdout", "--json"]);
        assert!(result.is_err());
    }
}
