//! # Backend Module
//!
//! All non-UI logic for the student records tool.
//!
//! ```text
//! Shell (menus, prompts)
//!     ↓
//! Domain (AccountService)
//!     ↓
//! Storage (CSV repositories → RecordStore → files)
//! ```
//!
//! The backend never prompts or prints. Every operation takes values the shell
//! already collected and returns a `Result` for the shell to present.

use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use config::{AdminCredentials, AppConfig};
pub use error::StudentRecordsError;
pub use storage::csv::CsvConnection;

/// Main backend struct, built once per process from the loaded config
pub struct Backend {
    pub config: AppConfig,
    pub account_service: domain::AccountService,
}

impl Backend {
    /// Create the backend and make sure every table exists on disk
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Setting up storage in {:?}", config.data_directory);
        let csv_conn = Arc::new(CsvConnection::new(&config.data_directory));

        let account_service = domain::AccountService::new(csv_conn, config.admin.clone());
        account_service
            .initialize_storage()
            .with_context(|| format!("Failed to initialize data directory {:?}", config.data_directory))?;

        Ok(Backend {
            config,
            account_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::csv::schema::ALL_TABLES;
    use tempfile::TempDir;

    #[test]
    fn test_backend_new_creates_tables() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = AppConfig {
            data_directory: temp_dir.path().join("student_data"),
            ..AppConfig::default()
        };

        let backend = Backend::new(config).unwrap();

        for schema in ALL_TABLES {
            assert!(backend.config.data_directory.join(schema.file_name).exists());
        }
    }
}
