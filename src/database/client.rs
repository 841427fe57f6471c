use std::{path::Path, time::Duration};

use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use tracing::info;

use crate::database::db_structs::ReferenceEntry;

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Failed to fetch reference table: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to read reference table from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error
    },

    #[error("Failed to decode reference table: {0}")]
    Decode(#[from] serde_json::Error)
}

/// Fetches the reference song table.
#[derive(Clone)]
pub struct ReferenceClient {
    http: Client,
    url: String
}

impl ReferenceClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ReferenceError> {
        let http = ClientBuilder::new().timeout(timeout).build()?;

        Ok(ReferenceClient { http, url: url.into() })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Vec<ReferenceEntry>, ReferenceError> {
        info!("Fetching reference table from {}", self.url);

        let body = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let entries = parse_reference_table(&body)?;
        info!("Fetched {} reference entries", entries.len());

        Ok(entries)
    }
}

/// Reads a reference table previously saved to disk.
pub async fn load_reference_file(path: &Path) -> Result<Vec<ReferenceEntry>, ReferenceError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ReferenceError::Io {
        path: path.display().to_string(),
        source
    })?;

    let entries = parse_reference_table(&bytes)?;
    info!("Loaded {} reference entries from {}", entries.len(), path.display());

    Ok(entries)
}

/// The table must be a JSON array of song rows.
pub fn parse_reference_table(bytes: &[u8]) -> Result<Vec<ReferenceEntry>, ReferenceError> {
    Ok(serde_json::from_slice(bytes)?)
}
