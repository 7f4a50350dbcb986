// Integration test utilities and common code shared across test targets.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test fixture helper owning a temporary directory for stage files.
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Absolute path for a file name inside the fixture directory.
    pub fn path<P: AsRef<Path>>(&self, name: P) -> PathBuf {
        self.root_path.join(name)
    }

    /// Write a file with the given content, creating parents if needed.
    pub fn write_file<P: AsRef<Path>>(&self, name: P, content: &str) -> PathBuf {
        let file_path = self.path(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    /// Read a fixture file back as a string.
    pub fn read_to_string<P: AsRef<Path>>(&self, name: P) -> String {
        fs::read_to_string(self.path(name)).expect("Failed to read test file")
    }

    /// File names currently present in the fixture directory.
    pub fn file_names(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&self.root_path)
            .expect("Failed to list fixture directory")
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}
