use anyhow::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::sale_repository::SaleRepository;
use crate::config::SALES_BOX_NAME;
use crate::storage::traits::Connection;

const BOX_HEADER: &str = "key,customer_name,product,amount,date\n";

/// CsvConnection manages the file paths of a sale box and makes sure they exist
#[derive(Clone, Debug)]
pub struct CsvConnection {
    base_directory: PathBuf,
    box_name: String,
}

impl CsvConnection {
    /// Create a new CSV connection for the default box in a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        Self::with_box_name(base_directory, SALES_BOX_NAME)
    }

    /// Create a new CSV connection for a named box
    pub fn with_box_name<P: AsRef<Path>>(base_directory: P, box_name: &str) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path).with_context(|| {
                format!("Failed to create data directory {}", base_path.display())
            })?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            box_name: box_name.to_string(),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn box_name(&self) -> &str {
        &self.box_name
    }

    /// Get the path to the box's records file
    pub fn get_box_file_path(&self) -> PathBuf {
        self.base_directory.join(format!("{}.csv", self.box_name))
    }

    /// Get the path to the box's metadata file
    pub fn get_box_metadata_path(&self) -> PathBuf {
        self.base_directory.join(format!("{}.meta.yaml", self.box_name))
    }

    /// Ensure the records file exists with a header row.
    ///
    /// A zero-byte file (left behind by an interrupted create) is given its
    /// header as well.
    pub fn ensure_box_file_exists(&self) -> Result<()> {
        let file_path = self.get_box_file_path();

        let is_empty = file_path.exists()
            && fs::metadata(&file_path)
                .with_context(|| format!("Failed to inspect {}", file_path.display()))?
                .len()
                == 0;

        if !file_path.exists() || is_empty {
            fs::write(&file_path, BOX_HEADER)
                .with_context(|| format!("Failed to create box file {}", file_path.display()))?;
            if is_empty {
                warn!("Wrote missing header to empty box file: {}", file_path.display());
            } else {
                info!("Created sale box file: {}", file_path.display());
            }
        }

        Ok(())
    }
}

impl Connection for CsvConnection {
    type SaleRepository = SaleRepository;

    fn create_sale_repository(&self) -> Self::SaleRepository {
        SaleRepository::new(self.clone())
    }
}
