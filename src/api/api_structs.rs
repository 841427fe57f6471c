use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    database::reference_index::normalize_title,
    model::structures::records::{EnrichedRecord, SelectionResult}
};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok` once the reference table is loaded, `loading` before that
    pub status: String,
    pub module: String,
    pub version: String,
    pub reference_loaded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_titles: Option<usize>,
    pub uptime_seconds: u64
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: String
}

/// Body of `POST /api/render`: an already selected pair of lists.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    #[serde(default)]
    pub recent_list: Vec<EnrichedRecord>,
    #[serde(default)]
    pub older_list: Vec<EnrichedRecord>,
    /// Song title to cover art reference. When empty, references are looked
    /// up in the reference table.
    #[serde(default)]
    pub cover_art: HashMap<String, String>
}

impl RenderRequest {
    pub fn into_parts(self) -> (SelectionResult, HashMap<String, String>) {
        let cover_art = self
            .cover_art
            .into_iter()
            .map(|(title, image_ref)| (normalize_title(&title), image_ref))
            .collect();

        (
            SelectionResult {
                recent_list: self.recent_list,
                older_list: self.older_list
            },
            cover_art
        )
    }
}
