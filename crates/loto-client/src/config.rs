use anyhow::{Context as _, Result};
use chrono::{FixedOffset, NaiveDate};
use loto_combora::checker::{FilterError, FilterFlags, SumRange};
use loto_combora::frequency::MODERN_ERA_CUTOFF;
use loto_combora::generator::{GenerationRequest, MAX_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ENV_GUARD;

pub const CONFIG_FILE: &str = "loto.toml";
const DEFAULT_DATABASE: &str = "loto.db";
const DEFAULT_RESULTS_URL: &str = "https://www.yelu.do/leidsa/results/history";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LotoConfig {
    pub database: DatabaseConfig,
    pub history: HistoryConfig,
    pub generator: GeneratorConfig,
    pub clock: ClockConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE.to_owned(),
            pool_size: 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub csv_path: PathBuf,
    pub remote_url: String,
    /// Start of the modern era; earlier drawings are not fetched or analysed.
    pub cutoff: NaiveDate,
    pub request_pause_ms: u64,
    pub timeout_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("data/historial_loto.csv"),
            remote_url: DEFAULT_RESULTS_URL.to_owned(),
            cutoff: MODERN_ERA_CUTOFF,
            request_pause_ms: 1000,
            timeout_secs: 10,
        }
    }
}

impl HistoryConfig {
    pub fn request_pause(&self) -> Duration {
        Duration::from_millis(self.request_pause_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub sum_min: u16,
    pub sum_max: u16,
    pub parity: bool,
    pub endings: bool,
    pub consecutive: bool,
    pub anti_clone: bool,
    pub max_attempts: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        let range = SumRange::default();
        let flags = FilterFlags::default();
        Self {
            count: 5,
            sum_min: range.low(),
            sum_max: range.high(),
            parity: flags.parity,
            endings: flags.endings,
            consecutive: flags.consecutive,
            anti_clone: flags.anti_clone,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl GeneratorConfig {
    pub fn flags(&self) -> FilterFlags {
        FilterFlags {
            parity: self.parity,
            endings: self.endings,
            consecutive: self.consecutive,
            anti_clone: self.anti_clone,
        }
    }

    pub fn request(&self, cutoff: NaiveDate) -> Result<GenerationRequest, FilterError> {
        Ok(GenerationRequest::new(self.count)
            .with_sum_range(SumRange::new(self.sum_min, self.sum_max)?)
            .with_flags(self.flags())
            .with_cutoff(cutoff)
            .with_max_attempts(self.max_attempts))
    }
}

/// Wall clock of the drawings. Santo Domingo is UTC-4 all year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    pub utc_offset_hours: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: -4,
        }
    }
}

impl ClockConfig {
    pub fn offset(&self) -> Result<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
            .with_context(|| format!("Invalid UTC offset: {} hours", self.utc_offset_hours))
    }
}

impl LotoConfig {
    /// Read `path`, or `loto.toml` beside `.env` (else the working directory)
    /// when no path is given. A missing default file yields the defaults.
    /// `DATABASE_URL` overrides the database url either way.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_path();
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    log::debug!("{} not found, using defaults", default_path.display());
                    Self::default()
                }
            }
        };
        config.override_database_url(std::env::var("DATABASE_URL").ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid loto config")
    }

    fn default_path() -> PathBuf {
        match ENV_GUARD.as_ref() {
            Ok(env_file) => env_file
                .parent()
                .map_or_else(|| PathBuf::from(CONFIG_FILE), |dir| dir.join(CONFIG_FILE)),
            Err(_) => PathBuf::from(CONFIG_FILE),
        }
    }

    fn override_database_url(&mut self, url: Option<String>) {
        if let Some(url) = url.filter(|url| !url.trim().is_empty()) {
            log::debug!("DATABASE_URL overrides configured database {}", self.database.url);
            self.database.url = url;
        }
    }
}
