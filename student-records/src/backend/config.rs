//! # Application Configuration
//!
//! Loaded once at startup from a YAML file and injected into the backend.
//!
//! ```yaml
//! data_directory: student_data
//! admin:
//!   username: admin
//!   password: change-me
//! ```

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "student-records.yaml";

const DEFAULT_DATA_DIRECTORY: &str = "student_data";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Single administrator account checked by the admin login
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            username: DEFAULT_ADMIN_USERNAME.to_string(),
            password: DEFAULT_ADMIN_PASSWORD.to_string(),
        }
    }
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the four table files
    pub data_directory: PathBuf,
    pub admin: AdminCredentials,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_directory: PathBuf::from(DEFAULT_DATA_DIRECTORY),
            admin: AdminCredentials::default(),
        }
    }
}

impl AppConfig {
    /// Read a config file. Missing keys fall back to their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml_content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: AppConfig = serde_yaml::from_str(&yaml_content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load the explicit config file if one was given, otherwise
    /// [`DEFAULT_CONFIG_FILE`] if it exists, otherwise built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::load(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => {
                info!("No config file found, using defaults");
                Self::default()
            }
        };

        if config.uses_default_admin() {
            warn!("Default admin credentials are active; set admin.password in the config file");
        }

        Ok(config)
    }

    pub fn uses_default_admin(&self) -> bool {
        self.admin == AdminCredentials::default()
    }
}
