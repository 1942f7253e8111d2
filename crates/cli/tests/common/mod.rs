//! Common utilities for integration tests

pub mod cli;

use tempfile::TempDir;

/// Scratch directory holding a test's data file
pub struct TestData {
    _dir: TempDir,
    pub data_file: std::path::PathBuf,
}

impl TestData {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let data_file = dir.path().join("exhibit_data.json");
        Self { _dir: dir, data_file }
    }

    /// Parsed contents of the data file
    pub fn read(&self) -> serde_json::Value {
        let bytes = std::fs::read(&self.data_file).expect("Data file missing");
        serde_json::from_slice(&bytes).expect("Data file is not JSON")
    }
}
