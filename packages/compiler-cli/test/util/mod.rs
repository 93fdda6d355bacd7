#![allow(dead_code)]

//! Scratch project directories for the CLI tests.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Project {
            dir: tempfile::tempdir().expect("temporary directory"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root().join(relative)
    }

    /// Writes `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("parent directory");
        }
        fs::write(&path, content).expect("written file");
        path
    }

    /// A glob pattern rooted in the project.
    pub fn pattern(&self, relative: &str) -> String {
        self.path(relative).to_string_lossy().into_owned()
    }
}
