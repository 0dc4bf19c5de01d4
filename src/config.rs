use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::ColumnMap;
use crate::error::{TrackerError, TrackerResult};

pub const CONFIG_ENV: &str = "REVIEW_QUOTA_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// First day quotas accrue.
    pub start_date: NaiveDate,
    /// IANA zone used to decide what "today" is.
    pub timezone: String,
    /// Optional per-date quota sheet; fixed role quotas apply without it.
    pub quota_schedule: Option<PathBuf>,
    pub columns: ColumnMap,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2025, 9, 16).unwrap_or_default(),
            timezone: "America/Bogota".into(),
            quota_schedule: None,
            columns: ColumnMap::default(),
        }
    }
}

impl TrackerConfig {
    pub fn from_toml_str(path: &Path, contents: &str) -> TrackerResult<Self> {
        toml::from_str(contents).map_err(|error| TrackerError::Config {
            path: path.to_path_buf(),
            message: error.to_string(),
        })
    }

    pub fn load(path: &Path) -> TrackerResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(path, &contents)?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Explicit path first, then the environment variable, then defaults.
    pub fn resolve(explicit: Option<&Path>) -> TrackerResult<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::load(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn timezone(&self) -> TrackerResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| TrackerError::InvalidTimezone(self.timezone.clone()))
    }
}
