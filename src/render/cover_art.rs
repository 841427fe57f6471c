use std::{
    collections::HashMap,
    num::NonZeroUsize,
    sync::{Mutex, MutexGuard},
    time::Duration
};

use base64::prelude::*;
use bytes::Bytes;
use futures::{stream, StreamExt};
use lru::LruCache;
use itertools::Itertools;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn, Instrument};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::utils::progress_utils::progress_span;

#[derive(Debug, Error)]
pub enum ResourceLoadError {
    #[error("Failed to fetch cover art from {url}: {source}")]
    Fetch { url: String, source: reqwest::Error },

    #[error("Cover art request to {url} returned {status}")]
    Status { url: String, status: StatusCode }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub content_type: String,
    pub data: Bytes
}

impl CoverArt {
    pub fn new(content_type: impl Into<String>, data: impl Into<Bytes>) -> CoverArt {
        CoverArt {
            content_type: content_type.into(),
            data: data.into()
        }
    }

    /// The image as a `data:` URI, ready to embed in the chart.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, BASE64_STANDARD.encode(&self.data))
    }
}

/// Least recently used cache of fetched images, keyed by URL. A capacity
/// of zero disables caching.
#[derive(Debug)]
pub struct CoverArtCache {
    entries: Option<LruCache<String, CoverArt>>
}

impl CoverArtCache {
    pub fn new(capacity: usize) -> CoverArtCache {
        CoverArtCache {
            entries: NonZeroUsize::new(capacity).map(LruCache::new)
        }
    }

    /// Marks the entry as recently used.
    pub fn get(&mut self, url: &str) -> Option<&CoverArt> {
        self.entries.as_mut()?.get(url)
    }

    pub fn insert(&mut self, url: String, art: CoverArt) {
        if let Some(entries) = self.entries.as_mut() {
            entries.put(url, art);
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.as_ref().is_some_and(|entries| entries.contains(url))
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetches cover art over HTTP with bounded concurrency.
///
/// Failures are never fatal: a missing image only means the tile is drawn
/// without one.
#[derive(Debug)]
pub struct CoverArtLoader {
    http: Client,
    base_url: String,
    concurrency: usize,
    cache: Mutex<CoverArtCache>
}

impl CoverArtLoader {
    pub fn new(
        base_url: impl Into<String>,
        concurrency: usize,
        cache_size: usize,
        timeout: Duration
    ) -> Result<CoverArtLoader, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(CoverArtLoader::with_client(http, base_url, concurrency, cache_size))
    }

    pub fn with_client(
        http: Client,
        base_url: impl Into<String>,
        concurrency: usize,
        cache_size: usize
    ) -> CoverArtLoader {
        CoverArtLoader {
            http,
            base_url: base_url.into(),
            concurrency: concurrency.max(1),
            cache: Mutex::new(CoverArtCache::new(cache_size))
        }
    }

    pub fn resolve_url(&self, image_ref: &str) -> String {
        if image_ref.starts_with("http://") || image_ref.starts_with("https://") {
            return image_ref.to_string();
        }

        format!("{}/{}", self.base_url.trim_end_matches('/'), image_ref.trim_start_matches('/'))
    }

    pub fn cached(&self) -> usize {
        self.lock_cache().len()
    }

    /// Loads every distinct image reference. The result is keyed by the
    /// reference as given; references that failed to load are absent.
    pub async fn load_all<I>(&self, image_refs: I) -> HashMap<String, CoverArt>
    where
        I: IntoIterator<Item = String>
    {
        let mut loaded = HashMap::new();
        let mut pending = Vec::new();

        {
            let mut cache = self.lock_cache();
            for image_ref in image_refs.into_iter().unique() {
                let url = self.resolve_url(&image_ref);
                match cache.get(&url) {
                    Some(art) => {
                        loaded.insert(image_ref, art.clone());
                    }
                    None => pending.push((image_ref, url))
                }
            }
        }

        if pending.is_empty() {
            return loaded;
        }

        debug!("Fetching {} cover images ({} cached)", pending.len(), loaded.len());
        let span = progress_span(pending.len() as u64, "Fetching cover art");

        let results: Vec<_> = stream::iter(pending)
            .map(|(image_ref, url)| async move {
                let result = self.fetch(&url).await;
                (image_ref, url, result)
            })
            .buffer_unordered(self.concurrency)
            .inspect(|_| span.pb_inc(1))
            .collect::<Vec<_>>()
            .instrument(span.clone())
            .await;

        let mut cache = self.lock_cache();
        for (image_ref, url, result) in results {
            match result {
                Ok(art) => {
                    cache.insert(url, art.clone());
                    loaded.insert(image_ref, art);
                }
                Err(e) => warn!("{e}")
            }
        }

        loaded
    }

    async fn fetch(&self, url: &str) -> Result<CoverArt, ResourceLoadError> {
        let fetch_error = |source: reqwest::Error| ResourceLoadError::Fetch {
            url: url.to_string(),
            source
        };

        let response = self.http.get(url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResourceLoadError::Status {
                url: url.to_string(),
                status
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| v.starts_with("image/"))
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(url).to_string());
        let data = response.bytes().await.map_err(fetch_error)?;

        Ok(CoverArt::new(content_type, data))
    }

    fn lock_cache(&self) -> MutexGuard<'_, CoverArtCache> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn guess_content_type(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url).to_ascii_lowercase();

    if path.ends_with(".jpg") || path.ends_with(".jpeg") {
        "image/jpeg"
    } else if path.ends_with(".webp") {
        "image/webp"
    } else if path.ends_with(".gif") {
        "image/gif"
    } else {
        "image/png"
    }
}
