use std::borrow::Cow;

use crate::model::structures::{chart_type::ChartType, difficulty::Difficulty, records::EnrichedRecord};

pub const PLACEHOLDER_NAME: &str = "NO DATA";
/// Names longer than this many characters are cut and suffixed with `...`
pub const NAME_LIMIT: usize = 20;

/// One cell of a grid section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tile<'a> {
    /// `position` is the zero-based rank within the section
    Record { position: usize, record: &'a EnrichedRecord },
    Placeholder
}

/// Fills a section to exactly `capacity` cells, placeholders last.
pub fn pad_tiles(records: &[EnrichedRecord], capacity: usize) -> Vec<Tile<'_>> {
    let mut tiles: Vec<Tile<'_>> = records
        .iter()
        .take(capacity)
        .enumerate()
        .map(|(position, record)| Tile::Record { position, record })
        .collect();
    tiles.resize(capacity, Tile::Placeholder);

    tiles
}

pub fn difficulty_color(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Basic => "#81d955",
        Difficulty::Advanced => "#ffb400",
        Difficulty::Expert => "#ff008a",
        Difficulty::Master => "#c002f0",
        Difficulty::ReMaster => "#e1beff"
    }
}

pub fn chart_type_color(chart_type: ChartType) -> &'static str {
    match chart_type {
        ChartType::Dx => "#ff6b35",
        ChartType::Std => "#4a90e2"
    }
}

pub fn truncate_name(name: &str) -> Cow<'_, str> {
    match name.char_indices().nth(NAME_LIMIT) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &name[..cut])),
        None => Cow::Borrowed(name)
    }
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c)
        }
    }

    Cow::Owned(escaped)
}
