//! # Sale Box Metadata
//!
//! Key allocation state for a CSV sale box, stored next to the records file
//! as `<box_name>.meta.yaml`:
//!
//! ```yaml
//! next_key: 12
//! data_format_version: "1.0"
//! created_at: "2025-01-21T19:30:00+00:00"
//! updated_at: "2025-01-21T19:35:00+00:00"
//! ```
//!
//! `next_key` is persisted rather than derived from the records so a key is
//! never handed out again after the record holding it has been deleted.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;

use super::connection::CsvConnection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxMetadata {
    /// Key the next appended sale receives
    pub next_key: u64,
    /// Data format version for future migrations
    pub data_format_version: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Default for BoxMetadata {
    fn default() -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            next_key: 0,
            data_format_version: "1.0".to_string(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BoxMetadataRepository {
    connection: CsvConnection,
}

impl BoxMetadataRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Load metadata from file, creating default if it doesn't exist
    pub fn load_or_create(&self) -> Result<BoxMetadata> {
        let metadata_path = self.connection.get_box_metadata_path();

        if metadata_path.exists() {
            let yaml_content = fs::read_to_string(&metadata_path)
                .with_context(|| format!("Failed to read {}", metadata_path.display()))?;
            let metadata: BoxMetadata = serde_yaml::from_str(&yaml_content)
                .with_context(|| format!("Malformed box metadata in {}", metadata_path.display()))?;
            debug!("Loaded box metadata from {:?}", metadata_path);
            Ok(metadata)
        } else {
            let metadata = BoxMetadata::default();
            self.save(&metadata)?;
            info!("Created box metadata at {:?}", metadata_path);
            Ok(metadata)
        }
    }

    /// Save metadata using a temp file and rename
    pub fn save(&self, metadata: &BoxMetadata) -> Result<()> {
        let metadata_path = self.connection.get_box_metadata_path();
        let yaml_content = serde_yaml::to_string(metadata)?;

        let temp_path = metadata_path.with_extension("yaml.tmp");
        fs::write(&temp_path, yaml_content)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, &metadata_path)
            .with_context(|| format!("Failed to replace {}", metadata_path.display()))?;

        debug!("Saved box metadata to {:?}", metadata_path);
        Ok(())
    }

    /// Reserve the next key, never returning anything below `floor`.
    ///
    /// The floor protects against a metadata file that was lost or restored
    /// from an older copy while the records file kept newer keys.
    pub fn reserve_key(&self, floor: u64) -> Result<u64> {
        let mut metadata = self.load_or_create()?;
        let key = metadata.next_key.max(floor);
        metadata.next_key = key + 1;
        metadata.updated_at = Utc::now().to_rfc3339();
        self.save(&metadata)?;
        Ok(key)
    }
}
