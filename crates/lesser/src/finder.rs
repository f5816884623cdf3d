//! Static asset resolution.
//!
//! Logical paths like `"css/app.less"` are what templates mention; a
//! [`StaticFinder`] maps them to real files under one of a set of search
//! roots, the same way a deployed site gathers static directories from
//! several places.

use std::io;
use std::path::{Path, PathBuf};

/// Maps logical asset paths to filesystem paths.
pub trait StaticFinder: Send + Sync {
    /// Resolves a logical path, or `None` if no search root contains it.
    fn find(&self, logical: &str) -> Option<PathBuf>;

    /// The directories this finder searches, in registration order.
    ///
    /// These become the compiler's include path when the pipeline is
    /// configured to pass them.
    fn search_dirs(&self) -> Vec<PathBuf> {
        Vec::new()
    }
}

/// Finder over an ordered list of static directories.
///
/// The first root containing the requested file wins.
#[derive(Debug, Default, Clone)]
pub struct DirFinder {
    roots: Vec<PathBuf>,
}

impl DirFinder {
    /// Creates a finder with no search roots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a directory to search.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or is not a directory;
    /// registering a missing root is a configuration mistake worth
    /// surfacing early.
    pub fn add_root<P: AsRef<Path>>(&mut self, path: P) -> Result<(), io::Error> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Static directory not found: {}", path.display()),
            ));
        }
        self.roots.push(path.to_path_buf());
        Ok(())
    }
}

impl StaticFinder for DirFinder {
    fn find(&self, logical: &str) -> Option<PathBuf> {
        let relative = Path::new(logical);
        // Logical paths never escape their root.
        if relative.is_absolute() || logical.split('/').any(|segment| segment == "..") {
            return None;
        }
        self.roots
            .iter()
            .map(|root| root.join(relative))
            .find(|candidate| candidate.is_file())
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        self.roots.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_file(dir: &Path, relative_path: &str, content: &str) {
        let full_path = dir.join(relative_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    #[test]
    fn test_find_in_single_root() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "css/app.less", "body {}");

        let mut finder = DirFinder::new();
        finder.add_root(dir.path()).unwrap();

        let found = finder.find("css/app.less").unwrap();
        assert_eq!(found, dir.path().join("css/app.less"));
    }

    #[test]
    fn test_first_root_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        create_file(first.path(), "app.less", "from first");
        create_file(second.path(), "app.less", "from second");

        let mut finder = DirFinder::new();
        finder.add_root(first.path()).unwrap();
        finder.add_root(second.path()).unwrap();

        let found = finder.find("app.less").unwrap();
        assert_eq!(found, first.path().join("app.less"));
    }

    #[test]
    fn test_later_root_searched_when_first_misses() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        create_file(second.path(), "only/here.less", "x");

        let mut finder = DirFinder::new();
        finder.add_root(first.path()).unwrap();
        finder.add_root(second.path()).unwrap();

        assert!(finder.find("only/here.less").is_some());
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let mut finder = DirFinder::new();
        finder.add_root(dir.path()).unwrap();
        assert!(finder.find("nope.less").is_none());
    }

    #[test]
    fn test_directories_are_not_files() {
        let dir = TempDir::new().unwrap();
        create_file(dir.path(), "css/app.less", "x");

        let mut finder = DirFinder::new();
        finder.add_root(dir.path()).unwrap();
        assert!(finder.find("css").is_none());
    }

    #[test]
    fn test_traversal_is_rejected() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("static")).unwrap();
        create_file(dir.path(), "secret.less", "x");

        let mut finder = DirFinder::new();
        finder.add_root(dir.path().join("static")).unwrap();
        assert!(finder.find("../secret.less").is_none());
    }

    #[test]
    fn test_absolute_logical_path_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut finder = DirFinder::new();
        finder.add_root(dir.path()).unwrap();
        assert!(finder.find("/etc/passwd").is_none());
    }

    #[test]
    fn test_add_missing_root_errors() {
        let mut finder = DirFinder::new();
        assert!(finder.add_root("/nonexistent/static").is_err());
    }

    #[test]
    fn test_search_dirs_keep_registration_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();

        let mut finder = DirFinder::new();
        finder.add_root(first.path()).unwrap();
        finder.add_root(second.path()).unwrap();

        assert_eq!(
            finder.search_dirs(),
            vec![first.path().to_path_buf(), second.path().to_path_buf()]
        );
    }
}
