use serde::{Deserialize, Serialize};

use crate::model::{
    rating::dx_rating,
    structures::{chart_type::ChartType, difficulty::Difficulty}
};

/// One achievement record as exported by the score tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// Encoded chart identifier, `song__x__variant__y__difficulty`
    #[serde(alias = "identifier")]
    pub sheet_id: String,
    pub achievement_rate: f64
}

impl RawRecord {
    pub fn new(sheet_id: impl Into<String>, achievement_rate: f64) -> RawRecord {
        RawRecord {
            sheet_id: sheet_id.into(),
            achievement_rate
        }
    }
}

/// A record matched against the reference table and scored.
///
/// The rating is derived from `level` and `achievement` when the record is
/// built and cannot be supplied or changed independently. Deserializing goes
/// through [`EnrichedRecordData`] for the same reason: any rating present in
/// the payload is ignored and recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "EnrichedRecordData")]
pub struct EnrichedRecord {
    song_name: String,
    chart_type: ChartType,
    difficulty: Difficulty,
    achievement: f64,
    level: f64,
    version: u32,
    rating: u32
}

impl EnrichedRecord {
    pub fn new(
        song_name: impl Into<String>,
        chart_type: ChartType,
        difficulty: Difficulty,
        achievement: f64,
        level: f64,
        version: u32
    ) -> EnrichedRecord {
        EnrichedRecord {
            song_name: song_name.into(),
            chart_type,
            difficulty,
            achievement,
            level,
            version,
            rating: dx_rating(Some(level), achievement)
        }
    }

    pub fn song_name(&self) -> &str {
        &self.song_name
    }

    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn achievement(&self) -> f64 {
        self.achievement
    }

    /// Chart level from the reference table, `0.0` when the chart was not found.
    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn rating(&self) -> u32 {
        self.rating
    }
}

/// Wire shape of an enriched record coming from a client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedRecordData {
    pub song_name: String,
    pub chart_type: ChartType,
    pub difficulty: Difficulty,
    pub achievement: f64,
    #[serde(default)]
    pub level: Option<f64>,
    #[serde(default)]
    pub version: u32
}

impl From<EnrichedRecordData> for EnrichedRecord {
    fn from(data: EnrichedRecordData) -> Self {
        EnrichedRecord::new(
            data.song_name,
            data.chart_type,
            data.difficulty,
            data.achievement,
            data.level.unwrap_or(0.0),
            data.version
        )
    }
}

/// The two top lists. Either list may be shorter than its capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResult {
    pub recent_list: Vec<EnrichedRecord>,
    pub older_list: Vec<EnrichedRecord>
}

impl SelectionResult {
    pub fn totals(&self) -> RatingTotals {
        RatingTotals::from_records(&self.recent_list, &self.older_list)
    }

    pub fn is_empty(&self) -> bool {
        self.recent_list.is_empty() && self.older_list.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingTotals {
    pub recent: u32,
    pub older: u32,
    pub total: u32
}

impl RatingTotals {
    /// Sums saturate at `u32::MAX`: ratings of client-supplied records are
    /// unbounded.
    pub fn from_records<'a, R, O>(recent: R, older: O) -> RatingTotals
    where
        R: IntoIterator<Item = &'a EnrichedRecord>,
        O: IntoIterator<Item = &'a EnrichedRecord>
    {
        let recent = sum_ratings(recent);
        let older = sum_ratings(older);

        RatingTotals {
            recent,
            older,
            total: recent.saturating_add(older)
        }
    }
}

fn sum_ratings<'a>(records: impl IntoIterator<Item = &'a EnrichedRecord>) -> u32 {
    records.into_iter().fold(0u32, |acc, r| acc.saturating_add(r.rating()))
}
