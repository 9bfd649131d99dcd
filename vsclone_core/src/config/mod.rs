/*
* The vsclone command line configuration.
*/
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

// Error Handling
use log::{debug, info};
use vsclone_error::{CastError, TomlError, VscloneError};

pub const CONFIG_DIR: &str = "/etc/vsclone";
pub const CONFIG_ENV: &str = "VSCLONE_CONFIG";
pub const DEFAULT_INVENTORY: &str = "/var/lib/vsclone/inventory.json";

#[derive(Debug, Clone, Eq, PartialEq, Deserialize, Serialize)]
pub struct VscloneConfig {
    /// Path to the inventory snapshot used when none is given on the command line.
    #[serde(default = "default_inventory")]
    pub inventory: String,
    /// Seconds to wait on a single management api call.
    pub api_timeout: Option<u64>,
}
impl Default for VscloneConfig {
    fn default() -> Self {
        Self {
            inventory: default_inventory(),
            api_timeout: None,
        }
    }
}

fn default_inventory() -> String {
    DEFAULT_INVENTORY.to_owned()
}

impl VscloneConfig {
    /*
     * Get config from FHS path.
     */
    fn release_path() -> PathBuf {
        let mut path = PathBuf::from(CONFIG_DIR);
        path.push("config.toml");
        path
    }
    /*
     * Search the configuration file:
     * - the path in VSCLONE_CONFIG,
     * - then the FHS path,
     * - then fall back to defaults.
     */
    pub fn get() -> Result<Self, VscloneError> {
        info!("Search config file.");
        if let Ok(path) = env::var(CONFIG_ENV) {
            debug!("config file from {}: {:#?}", CONFIG_ENV, path);
            return Self::from_file(&path);
        }
        let path = Self::release_path();
        if path.exists() {
            return Self::from_file(&path.display().to_string());
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }
    pub fn api_timeout(&self) -> Option<Duration> {
        self.api_timeout.map(Duration::from_secs)
    }
    pub fn from_file(path: &str) -> Result<Self, VscloneError> {
        let string = fs::read_to_string(path)?;
        Self::from_toml(&string)
    }
    pub fn from_toml(string: &str) -> Result<Self, VscloneError> {
        let res = toml::from_str::<Self>(string);
        let item = match res {
            Ok(res) => res,
            Err(e) => {
                let err = CastError::TomlError(TomlError::new(e, string));
                return Err(err.into());
            }
        };
        Ok(item)
    }
}
