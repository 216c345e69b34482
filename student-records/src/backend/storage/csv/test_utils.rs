//! Test utilities for isolated, self-cleaning data directories.
//!
//! The temporary directory is removed when the environment is dropped, even
//! if the test panics.

use anyhow::Result;
use tempfile::TempDir;

use super::connection::CsvConnection;

/// Test environment that provides a temporary directory and an initialized connection
pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    /// Create a new test environment with all four tables present
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().join("student_data");
        let connection = CsvConnection::new(&base_path);
        connection.initialize_if_absent()?;

        Ok(Self {
            connection,
            base_path,
            _temp_dir: temp_dir,
        })
    }

    /// Raw contents of one table file
    pub fn read_table(&self, file_name: &str) -> String {
        std::fs::read_to_string(self.base_path.join(file_name)).unwrap_or_default()
    }

    /// Number of lines in one table file
    pub fn line_count(&self, file_name: &str) -> usize {
        self.read_table(file_name).lines().filter(|line| !line.is_empty()).count()
    }
}
