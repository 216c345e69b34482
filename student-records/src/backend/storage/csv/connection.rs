use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::record_store::RecordStore;
use super::schema::{TableSchema, ALL_TABLES};
use crate::backend::error::Result;

/// CsvConnection owns the data directory and hands out one store per table
#[derive(Debug, Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
}

impl CsvConnection {
    /// Create a new CSV connection rooted at `base_directory`.
    ///
    /// Nothing is touched on disk until [`CsvConnection::initialize_if_absent`]
    /// or the first append.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Self {
        Self {
            base_directory: base_directory.as_ref().to_path_buf(),
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Get the file path backing a table
    pub fn table_path(&self, schema: &TableSchema) -> PathBuf {
        self.base_directory.join(schema.file_name)
    }

    /// Open a store over one table
    pub fn table(&self, schema: &'static TableSchema) -> RecordStore {
        RecordStore::new(self.table_path(schema), schema)
    }

    /// Ensure the data directory and all four tables exist
    pub fn initialize_if_absent(&self) -> Result<()> {
        if !self.base_directory.exists() {
            fs::create_dir_all(&self.base_directory)?;
            info!("Created data directory: {:?}", self.base_directory);
        }

        for schema in ALL_TABLES {
            self.table(schema).initialize_if_absent()?;
        }

        Ok(())
    }
}
