//! Adapter registry: the per-site scrape configuration, loaded once at startup.
//!
//! The shipped tables live in `config/adapters.toml` and are compiled into
//! the binary; `--adapters <file>` swaps them for a file on disk. Table order
//! is run order.

pub mod sources;

use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub use sources::{DelayRange, FeedsConfig, JobSource, NewsSource, RatesConfig, RetailSource};

const BUILTIN_ADAPTERS: &str = include_str!("../../config/adapters.toml");

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdapterRegistry {
    #[serde(default)]
    pub jobs: Vec<JobSource>,
    #[serde(default)]
    pub news: Vec<NewsSource>,
    #[serde(default)]
    pub retail: Vec<RetailSource>,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub rates: RatesConfig,
}

impl AdapterRegistry {
    /// The tables shipped with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_ADAPTERS)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let registry: AdapterRegistry = toml::from_str(content)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Delay bounds end up in `Duration::from_secs_f64`, which panics on `inf`/`nan`.
    fn validate(&self) -> Result<()> {
        let delays = self
            .jobs
            .iter()
            .map(|s| (&s.name, s.request_delay_range))
            .chain(self.news.iter().map(|s| (&s.name, s.request_delay_range)))
            .chain(self.retail.iter().map(|s| (&s.name, s.request_delay_range)));
        for (name, range) in delays {
            if !range.is_finite() {
                return Err(ScraperError::Config(format!(
                    "request_delay_range of '{}' must be finite, got {:?}",
                    name, range
                )));
            }
        }
        if !self.rates.spread.is_finite() {
            return Err(ScraperError::Config(format!(
                "rates spread must be finite, got {}",
                self.rates.spread
            )));
        }
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read adapter file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let registry = Self::from_toml_str(&content)?;
        info!(
            "Loaded adapters from {} ({} job, {} news, {} retail sources)",
            path.display(),
            registry.jobs.len(),
            registry.news.len(),
            registry.retail.len()
        );
        Ok(registry)
    }

    /// Keep only sources whose name is in `names` (case-insensitive).
    ///
    /// Feeds and rates have no per-source names and are left untouched.
    pub fn retain_sources(&mut self, names: &[String]) {
        let wanted = |name: &str| names.iter().any(|n| n.trim().eq_ignore_ascii_case(name));
        self.jobs.retain(|s| wanted(&s.name));
        self.news.retain(|s| wanted(&s.name));
        self.retail.retain(|s| wanted(&s.name));
    }
}
