use std::{env, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{
    constants::{COVER_ART_BASE_URL, LATEST_VERSION, OLDER_CAPACITY, RECENT_CAPACITY, REFERENCE_URL},
    selector::SelectionLimits,
    structures::processing_mode::ProcessingMode
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String }
}

/// Runtime settings of the rating pipeline, the renderer, and the HTTP client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// Charts released at or after this version count as recent
    pub version_threshold: u32,
    pub recent_capacity: usize,
    pub older_capacity: usize,
    pub mode: ProcessingMode,
    /// Where the reference song table is fetched from
    pub reference_url: String,
    /// Prefix for cover art file names found in the reference table
    pub cover_art_base_url: String,
    /// Maximum number of cover images fetched at once
    pub cover_art_concurrency: usize,
    /// Number of cover images kept in memory between renders
    pub cover_art_cache_size: usize,
    pub request_timeout: Duration
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            version_threshold: LATEST_VERSION,
            recent_capacity: RECENT_CAPACITY,
            older_capacity: OLDER_CAPACITY,
            mode: ProcessingMode::default(),
            reference_url: REFERENCE_URL.to_string(),
            cover_art_base_url: COVER_ART_BASE_URL.to_string(),
            cover_art_concurrency: 8,
            cover_art_cache_size: 128,
            request_timeout: Duration::from_secs(10)
        }
    }
}

impl RatingConfig {
    /// Reads `DXR_*` variables, keeping the default for any that are unset.
    /// A variable that is set but does not parse is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            version_threshold: parse_var("DXR_VERSION_THRESHOLD", defaults.version_threshold)?,
            recent_capacity: parse_var("DXR_RECENT_CAPACITY", defaults.recent_capacity)?,
            older_capacity: parse_var("DXR_OLDER_CAPACITY", defaults.older_capacity)?,
            mode: parse_var("DXR_MODE", defaults.mode)?,
            reference_url: env::var("DXR_REFERENCE_URL").unwrap_or(defaults.reference_url),
            cover_art_base_url: env::var("DXR_COVER_ART_BASE_URL").unwrap_or(defaults.cover_art_base_url),
            cover_art_concurrency: parse_var("DXR_COVER_ART_CONCURRENCY", defaults.cover_art_concurrency)?,
            cover_art_cache_size: parse_var("DXR_COVER_ART_CACHE_SIZE", defaults.cover_art_cache_size)?,
            request_timeout: parse_var("DXR_REQUEST_TIMEOUT_SECS", defaults.request_timeout.as_secs())
                .map(Duration::from_secs)?
        })
    }

    pub fn limits(&self) -> SelectionLimits {
        SelectionLimits {
            version_threshold: self.version_threshold,
            recent_capacity: self.recent_capacity,
            older_capacity: self.older_capacity
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default)
    }
}
