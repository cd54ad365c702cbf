//! Ingestion configuration
//!
//! Values come from defaults, optionally overlaid by a YAML file, then by
//! command line flags. `validate` catches everything that must stop a run
//! before any work is dispatched.

use crate::ingest::DEFAULT_SUFFIX;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration problems; all of them are fatal
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("review file suffix must not be empty")]
    EmptySuffix,

    #[error("wait timeout must be greater than zero")]
    ZeroTimeout,

    #[error("review directory not found: {}", .0.display())]
    ReviewsNotFound(PathBuf),

    #[error("review path is not a directory: {}", .0.display())]
    ReviewsNotADirectory(PathBuf),

    #[error("review directory {} cannot be read: {source}", path.display())]
    ReviewsUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Settings for one ingestion run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestConfig {
    /// Hotel metadata document
    pub hotels: PathBuf,
    /// Root of the review document tree
    pub reviews: PathBuf,
    /// Where the report is written; no report when unset
    pub output: Option<PathBuf>,
    /// Worker threads in the pool
    pub workers: usize,
    /// File name suffix selecting review documents
    pub suffix: String,
    /// Follow symbolic links while walking the review tree
    pub follow_links: bool,
    /// Upper bound in milliseconds on waiting for outstanding units;
    /// unbounded when unset
    pub wait_timeout_ms: Option<u64>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            hotels: PathBuf::from("input/hotels.json"),
            reviews: PathBuf::from("input/reviews"),
            output: None,
            workers: num_cpus::get(),
            suffix: DEFAULT_SUFFIX.to_string(),
            follow_links: false,
            wait_timeout_ms: None,
        }
    }
}

impl IngestConfig {
    pub fn new(hotels: impl Into<PathBuf>, reviews: impl Into<PathBuf>) -> Self {
        Self {
            hotels: hotels.into(),
            reviews: reviews.into(),
            ..Default::default()
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Bound the wait for outstanding units.
    ///
    /// Stored at millisecond resolution; a non-zero bound shorter than one
    /// millisecond rounds up to one.
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        let mut millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 && !timeout.is_zero() {
            millis = 1;
        }
        self.wait_timeout_ms = Some(millis);
        self
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }

    /// Load a YAML config file; missing keys keep their defaults
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check everything that must hold before dispatch begins
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.suffix.is_empty() {
            return Err(ConfigError::EmptySuffix);
        }
        if self.wait_timeout_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }
        if !self.reviews.exists() {
            return Err(ConfigError::ReviewsNotFound(self.reviews.clone()));
        }
        if !self.reviews.is_dir() {
            return Err(ConfigError::ReviewsNotADirectory(self.reviews.clone()));
        }
        std::fs::read_dir(&self.reviews).map_err(|source| ConfigError::ReviewsUnreadable {
            path: self.reviews.clone(),
            source,
        })?;
        Ok(())
    }
}
