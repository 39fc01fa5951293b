/// Test utilities with automatic cleanup
///
/// The temporary directory is removed when the environment is dropped,
/// even if a test panics.
use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

use super::connection::CsvConnection;
use super::sale_repository::SaleRepository;

/// Temporary data directory plus a connection to the default sale box
pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for reopening the box or inspecting files
    pub base_path: PathBuf,
    _temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        crate::logging::init_test_logging();
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }

    /// A fresh repository over this environment's box
    pub fn sale_repository(&self) -> SaleRepository {
        SaleRepository::new(self.connection.clone())
    }
}
