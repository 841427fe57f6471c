use std::collections::{hash_map::Entry, HashMap};

use tracing::debug;

use crate::{
    database::db_structs::{LevelFields, ReferenceEntry},
    model::structures::{chart_type::ChartType, difficulty::Difficulty}
};

/// Lookup tables over the reference song table, keyed by normalized title.
///
/// Built once per table load and read-only afterwards, so it can be shared
/// behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    versions: HashMap<String, u32>,
    cover_art: HashMap<String, String>,
    levels: HashMap<String, LevelFields>
}

impl ReferenceIndex {
    /// Rows without a title are skipped entirely; rows without a version or
    /// image are left out of that mapping only.
    ///
    /// When a title repeats, the first row supplies the levels and the last
    /// row with a value supplies the version and image.
    pub fn build(entries: &[ReferenceEntry]) -> ReferenceIndex {
        let mut index = ReferenceIndex::default();

        for entry in entries {
            let Some(title) = entry.title.as_deref().filter(|t| !t.is_empty()) else {
                continue;
            };
            let key = normalize_title(title);

            if let Some(version) = entry.version.as_deref().and_then(parse_version) {
                index.versions.insert(key.clone(), version);
            }

            if let Some(image) = entry.image_url.as_deref().filter(|i| !i.is_empty()) {
                index.cover_art.insert(key.clone(), image.to_string());
            }

            if let Entry::Vacant(slot) = index.levels.entry(key) {
                slot.insert(entry.levels.clone());
            }
        }

        debug!(
            "Built reference index: {} titles, {} versions, {} cover art references",
            index.levels.len(),
            index.versions.len(),
            index.cover_art.len()
        );

        index
    }

    /// Chart level for a title, `0.0` when the title is unknown or the chart
    /// has no usable level.
    pub fn level(&self, title: &str, chart_type: ChartType, difficulty: Difficulty) -> f64 {
        self.levels
            .get(&normalize_title(title))
            .and_then(|levels| levels.level_str(chart_type, difficulty))
            .and_then(parse_level)
            .unwrap_or(0.0)
    }

    /// Release version for a title, `0` when unknown.
    pub fn version(&self, title: &str) -> u32 {
        self.versions.get(&normalize_title(title)).copied().unwrap_or(0)
    }

    pub fn cover_art(&self, title: &str) -> Option<&str> {
        self.cover_art.get(&normalize_title(title)).map(String::as_str)
    }

    /// Number of distinct titles.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Parses the leading decimal number of a level string, so `13+` reads as
/// `13` and `13.7` as `13.7`. Returns `None` when there is no leading number.
pub fn parse_level(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {}
            b'.' if !seen_dot => seen_dot = true,
            _ => break
        }
        end += 1;
    }

    s[..end].parse::<f64>().ok()
}

fn parse_version(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    raw.parse::<u32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v as u32)
    })
}
