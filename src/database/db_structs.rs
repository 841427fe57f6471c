use serde::{Deserialize, Deserializer, Serialize};

use crate::model::structures::{chart_type::ChartType, difficulty::Difficulty};

/// One song row of the reference table.
///
/// Only the fields the processor reads are modelled; the table carries many
/// more (note counts, designers, artist) which are ignored on decode. Every
/// field is optional because partial rows are common.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    /// Release version, e.g. `25500`. Published as either a string or a number.
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    /// Cover art file name, relative to the jacket base url
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub levels: LevelFields
}

/// Per-chart level strings. The `_i` fields hold the precise internal level
/// (`13.7`) where known; the plain fields hold the displayed level (`13+`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelFields {
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_bas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_bas_i: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_adv: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_adv_i: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_exp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_exp_i: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_mas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_mas_i: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_remas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub lev_remas_i: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dx_lev_bas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dx_lev_adv: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dx_lev_exp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dx_lev_exp_i: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dx_lev_mas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dx_lev_mas_i: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dx_lev_remas: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub dx_lev_remas_i: Option<String>
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelField {
    LevBas,
    LevBasI,
    LevAdv,
    LevAdvI,
    LevExp,
    LevExpI,
    LevMas,
    LevMasI,
    LevRemas,
    LevRemasI,
    DxLevBas,
    DxLevAdv,
    DxLevExp,
    DxLevExpI,
    DxLevMas,
    DxLevMasI,
    DxLevRemas,
    DxLevRemasI
}

/// (primary, fallback) per difficulty, indexed by `Difficulty as usize`.
const STD_LEVEL_FIELDS: [(LevelField, LevelField); 5] = [
    (LevelField::LevBasI, LevelField::LevBas),
    (LevelField::LevAdvI, LevelField::LevAdv),
    (LevelField::LevExpI, LevelField::LevExp),
    (LevelField::LevMasI, LevelField::LevMas),
    (LevelField::LevRemasI, LevelField::LevRemas)
];

// The table has no `_i` field for DX basic and advanced, so both halves of
// those pairs name the same field.
const DX_LEVEL_FIELDS: [(LevelField, LevelField); 5] = [
    (LevelField::DxLevBas, LevelField::DxLevBas),
    (LevelField::DxLevAdv, LevelField::DxLevAdv),
    (LevelField::DxLevExpI, LevelField::DxLevExp),
    (LevelField::DxLevMasI, LevelField::DxLevMas),
    (LevelField::DxLevRemasI, LevelField::DxLevRemas)
];

pub fn level_field_pair(chart_type: ChartType, difficulty: Difficulty) -> (LevelField, LevelField) {
    let table = match chart_type {
        ChartType::Std => &STD_LEVEL_FIELDS,
        ChartType::Dx => &DX_LEVEL_FIELDS
    };

    table[difficulty as usize]
}

impl LevelFields {
    pub fn get(&self, field: LevelField) -> Option<&str> {
        let value = match field {
            LevelField::LevBas => &self.lev_bas,
            LevelField::LevBasI => &self.lev_bas_i,
            LevelField::LevAdv => &self.lev_adv,
            LevelField::LevAdvI => &self.lev_adv_i,
            LevelField::LevExp => &self.lev_exp,
            LevelField::LevExpI => &self.lev_exp_i,
            LevelField::LevMas => &self.lev_mas,
            LevelField::LevMasI => &self.lev_mas_i,
            LevelField::LevRemas => &self.lev_remas,
            LevelField::LevRemasI => &self.lev_remas_i,
            LevelField::DxLevBas => &self.dx_lev_bas,
            LevelField::DxLevAdv => &self.dx_lev_adv,
            LevelField::DxLevExp => &self.dx_lev_exp,
            LevelField::DxLevExpI => &self.dx_lev_exp_i,
            LevelField::DxLevMas => &self.dx_lev_mas,
            LevelField::DxLevMasI => &self.dx_lev_mas_i,
            LevelField::DxLevRemas => &self.dx_lev_remas,
            LevelField::DxLevRemasI => &self.dx_lev_remas_i
        };

        value.as_deref()
    }

    /// The level string for a chart: the primary field when it is present and
    /// not blank, otherwise the fallback field when that is not blank.
    pub fn level_str(&self, chart_type: ChartType, difficulty: Difficulty) -> Option<&str> {
        let (primary, fallback) = level_field_pair(chart_type, difficulty);

        self.get(primary)
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.get(fallback).filter(|s| !s.trim().is_empty()))
    }
}

/// Accepts a string, a number, or null. Anything else decodes as `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Field {
        Text(String),
        Number(serde_json::Number),
        Other(serde_json::Value)
    }

    Ok(match Option::<Field>::deserialize(deserializer)? {
        Some(Field::Text(s)) => Some(s),
        Some(Field::Number(n)) => Some(n.to_string()),
        Some(Field::Other(_)) | None => None
    })
}
