//! Caller-supplied validation settings

use crate::config::plan::RunMode;
use std::path::{Path, PathBuf};

/// Where relative paths resolve and which checks run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Run root; relative dataset and checkpoint paths resolve against it
    pub root: PathBuf,
    /// Explicit run mode; inferred from the document when `None`
    pub mode: Option<RunMode>,
    /// Whether referenced paths must exist on disk
    pub check_paths: bool,
}

impl ValidationContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            mode: None,
            check_paths: true,
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_path_checks(mut self, check_paths: bool) -> Self {
        self.check_paths = check_paths;
        self
    }

    /// `path` itself when absolute, otherwise joined onto the root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::new(".")
    }
}
