use std::str::FromStr;

use thiserror::Error;

use crate::model::{
    constants::{
        SHEET_ID_DELIMITER, SHEET_ID_DIFFICULTY_FIELD, SHEET_ID_FIELDS, SHEET_ID_SONG_FIELD, SHEET_ID_VARIANT_FIELD
    },
    structures::{chart_type::ChartType, difficulty::Difficulty}
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Invalid sheet id format: {sheet_id} (expected 5 fields, found {fields})")]
    Format { sheet_id: String, fields: usize },

    #[error("Unknown difficulty '{difficulty}' in sheet id: {sheet_id}")]
    UnknownDifficulty { sheet_id: String, difficulty: String }
}

/// The decoded fields of a sheet id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetId {
    /// Exactly as written in the id; lookups normalize it later.
    pub song_name: String,
    pub chart_type: ChartType,
    pub difficulty: Difficulty
}

/// Decodes `song__x__variant__y__difficulty`.
///
/// The second and fourth fields carry no information and are ignored.
pub fn parse_sheet_id(sheet_id: &str) -> Result<SheetId, IdentifierError> {
    let parts: Vec<&str> = sheet_id.split(SHEET_ID_DELIMITER).collect();
    if parts.len() != SHEET_ID_FIELDS {
        return Err(IdentifierError::Format {
            sheet_id: sheet_id.to_string(),
            fields: parts.len()
        });
    }

    let difficulty_token = parts[SHEET_ID_DIFFICULTY_FIELD];
    let difficulty =
        Difficulty::from_str(difficulty_token).map_err(|_| IdentifierError::UnknownDifficulty {
            sheet_id: sheet_id.to_string(),
            difficulty: difficulty_token.to_string()
        })?;

    Ok(SheetId {
        song_name: parts[SHEET_ID_SONG_FIELD].to_string(),
        chart_type: ChartType::from_token(parts[SHEET_ID_VARIANT_FIELD]),
        difficulty
    })
}

impl FromStr for SheetId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_sheet_id(s)
    }
}
