// src/compose/loader.rs
// =============================================================================
// This module loads a fragment: the README that lives in a sub-directory.
//
// For a marker <INSERT:builder> in README.md the fragment path is
//     ./builder/README.md
// relative to the directory of the root document.
//
// The actual file reading is behind the FragmentSource trait so the composer
// can be tested without touching the disk.
//
// Rust concepts:
// - Traits: describe a capability ("can read a file") without saying how
// - io::Result: the standard error type for I/O operations
// - Option: "found or not found" without a separate bool
// =============================================================================

use std::io;
use std::path::{Path, PathBuf};

// Something that can read fragment files
//
// Any error means "not found" to the composer; implementations do not
// need to distinguish missing files from permission problems.
pub trait FragmentSource {
    fn read(&self, path: &Path) -> io::Result<String>;
}

// Reads fragments from the filesystem, relative to `root`
// (the directory that holds the root document)
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FragmentSource for FsSource {
    fn read(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(self.root.join(path))
    }
}

// References work too, so callers can keep ownership of their source
impl<S: FragmentSource + ?Sized> FragmentSource for &S {
    fn read(&self, path: &Path) -> io::Result<String> {
        (**self).read(path)
    }
}

// Builds the fragment path for a marker
//
// Example:
//   fragment_path("builder", "README.md")  ->  "./builder/README.md"
//
// The same string is used for reading and in warnings
pub fn fragment_path(group: &str, host_file_name: &str) -> String {
    format!("./{}/{}", group, host_file_name)
}

// Loads the raw fragment text for a marker's group name
//
// Parameters:
//   source: where to read from
//   group: the marker's directory name
//   host_file_name: e.g. "README.md"
//
// Returns: Some(text), or None on ANY read failure (missing file, not a
// file, no permission, not UTF-8...)
pub fn load_fragment<S: FragmentSource + ?Sized>(
    source: &S,
    group: &str,
    host_file_name: &str,
) -> Option<String> {
    let path = fragment_path(group, host_file_name);
    match source.read(Path::new(&path)) {
        Ok(text) => Some(text),
        Err(e) => {
            log::debug!("could not read {}: {}", path, e);
            None
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for reading files?
//    - Tests can use an in-memory source instead of real files
//    - The composer code doesn't change either way
//
// 2. What does ?Sized mean in <S: FragmentSource + ?Sized>?
//    - By default generic types must have a known size at compile time
//    - ?Sized relaxes that so trait objects (&dyn FragmentSource) work too
//
// 3. What is (**self).read(path)?
//    - self is &&S here (a reference to our reference)
//    - ** gets back to S so we call the real implementation
// -----------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory fragments keyed by their `./dir/file` path
    #[derive(Default)]
    pub(crate) struct MemorySource(pub HashMap<String, String>);

    impl MemorySource {
        pub(crate) fn with(mut self, path: &str, text: &str) -> Self {
            self.0.insert(path.to_string(), text.to_string());
            self
        }
    }

    impl FragmentSource for MemorySource {
        fn read(&self, path: &Path) -> io::Result<String> {
            let key = path.to_string_lossy();
            self.0
                .get(&*key)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, key.into_owned()))
        }
    }

    #[test]
    fn test_fragment_path() {
        assert_eq!(fragment_path("builder", "README.md"), "./builder/README.md");
    }

    #[test]
    fn test_load_from_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("demo")).unwrap();
        std::fs::write(dir.path().join("demo/README.md"), "# Demo\nbody").unwrap();

        let source = FsSource::new(dir.path());
        assert_eq!(
            load_fragment(&source, "demo", "README.md").as_deref(),
            Some("# Demo\nbody")
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsSource::new(dir.path());
        assert!(load_fragment(&source, "missing", "README.md").is_none());
    }

    #[test]
    fn test_directory_instead_of_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("demo/README.md")).unwrap();
        let source = FsSource::new(dir.path());
        assert!(load_fragment(&source, "demo", "README.md").is_none());
    }

    #[test]
    fn test_invalid_utf8_is_none() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        std::fs::write(dir.path().join("bin/README.md"), [0xff, 0xfe, 0x00]).unwrap();
        let source = FsSource::new(dir.path());
        assert!(load_fragment(&source, "bin", "README.md").is_none());
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::default().with("./a/README.md", "text");
        assert_eq!(load_fragment(&source, "a", "README.md").as_deref(), Some("text"));
        assert!(load_fragment(&source, "b", "README.md").is_none());
    }
}
