use crate::schedule::schedule::Schedule;
use crate::schedule::shift::ShiftParams;
use serde::{Deserialize, Serialize};
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {cause}")]
    Read { path: PathBuf, cause: io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub addr: SocketAddr,
    /// CSV file every query reads from.
    pub dataset_path: PathBuf,
    /// Where validated uploads are written.
    pub upload_path: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    pub index_path: PathBuf,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Flights delayed by more than this many minutes count as delayed.
    pub delayed_threshold_min: i64,
    pub cascade: CascadeConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeConfig {
    pub window_min: u32,
    pub max_shift: i64,
    pub step: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            dataset_path: PathBuf::from("data/sample_flight_data.csv"),
            upload_path: PathBuf::from("data/uploaded.csv"),
            static_dir: PathBuf::from("data"),
            index_path: PathBuf::from("frontend/index.html"),
            request_timeout: Duration::from_secs(10),
            delayed_threshold_min: 5,
            cascade: CascadeConfig::default(),
        }
    }
}

impl Default for CascadeConfig {
    fn default() -> Self {
        let shift = ShiftParams::default();
        Self {
            window_min: Schedule::DEFAULT_WINDOW as u32,
            max_shift: shift.max_shift,
            step: shift.step,
        }
    }
}

impl CascadeConfig {
    pub fn shift_params(&self) -> ShiftParams {
        ShiftParams {
            window: i64::from(self.window_min),
            max_shift: self.max_shift,
            step: self.step,
        }
    }
}

impl Config {
    /// Reads a TOML file; keys it leaves out keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|cause| ConfigError::Read {
            path: path.to_path_buf(),
            cause,
        })?;
        Ok(toml::from_str(&data)?)
    }
}
