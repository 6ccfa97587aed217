//! # Filesystem Access
//!
//! The resolver never touches `std::fs` directly. Every read goes through
//! [`SourceFs`] so tests can swap in an in-memory or throwing implementation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Read-only filesystem operations needed by the resolver (allows dependency
/// injection for testing)
pub trait SourceFs: Send + Sync {
    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// List the entry names (files and directories) of a directory.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>>;
}

/// Production filesystem rooted at a project directory.
///
/// Relative paths are joined onto `root`; absolute paths are used as is.
#[derive(Debug, Clone)]
pub struct DiskFs {
    root: PathBuf,
}

impl DiskFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl SourceFs for DiskFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(self.full_path(path))
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.full_path(path))? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
