use crate::{
    database::{db_structs::ReferenceEntry, reference_index::ReferenceIndex},
    model::structures::{
        chart_type::ChartType,
        difficulty::Difficulty,
        records::{EnrichedRecord, RawRecord}
    }
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Builds a reference row from `(field, value)` level pairs, e.g.
/// `[("dx_lev_mas", "13.5")]`. Unknown field names panic.
pub fn generate_reference_entry(title: &str, version: u32, levels: &[(&str, &str)]) -> ReferenceEntry {
    let mut entry = ReferenceEntry {
        title: Some(title.to_string()),
        version: Some(version.to_string()),
        image_url: Some(format!("{}.png", title.trim().to_lowercase().replace(' ', "_"))),
        ..Default::default()
    };

    for (field, value) in levels {
        let value = Some(value.to_string());
        let slot = match *field {
            "lev_bas" => &mut entry.levels.lev_bas,
            "lev_bas_i" => &mut entry.levels.lev_bas_i,
            "lev_adv" => &mut entry.levels.lev_adv,
            "lev_adv_i" => &mut entry.levels.lev_adv_i,
            "lev_exp" => &mut entry.levels.lev_exp,
            "lev_exp_i" => &mut entry.levels.lev_exp_i,
            "lev_mas" => &mut entry.levels.lev_mas,
            "lev_mas_i" => &mut entry.levels.lev_mas_i,
            "lev_remas" => &mut entry.levels.lev_remas,
            "lev_remas_i" => &mut entry.levels.lev_remas_i,
            "dx_lev_bas" => &mut entry.levels.dx_lev_bas,
            "dx_lev_adv" => &mut entry.levels.dx_lev_adv,
            "dx_lev_exp" => &mut entry.levels.dx_lev_exp,
            "dx_lev_exp_i" => &mut entry.levels.dx_lev_exp_i,
            "dx_lev_mas" => &mut entry.levels.dx_lev_mas,
            "dx_lev_mas_i" => &mut entry.levels.dx_lev_mas_i,
            "dx_lev_remas" => &mut entry.levels.dx_lev_remas,
            "dx_lev_remas_i" => &mut entry.levels.dx_lev_remas_i,
            other => panic!("Unknown level field {other}")
        };
        *slot = value;
    }

    entry
}

/// A small table covering both variants and both sides of the default
/// version threshold.
///
/// - `Foo`: version 25500, DX master 13.5
/// - `Bar`: version 20000, STD expert 12+ / 12.4
/// - `Baz`: version 19000, STD master 13, STD re:master 14+
pub fn generate_reference_table() -> Vec<ReferenceEntry> {
    vec![
        generate_reference_entry("Foo", 25500, &[("dx_lev_mas", "13.5")]),
        generate_reference_entry("Bar", 20000, &[("lev_exp", "12+"), ("lev_exp_i", "12.4")]),
        generate_reference_entry("Baz", 19000, &[("lev_mas", "13"), ("lev_remas", "14+")]),
    ]
}

pub fn generate_reference_index() -> ReferenceIndex {
    ReferenceIndex::build(&generate_reference_table())
}

pub fn generate_enriched_record(song_name: &str, level: f64, achievement: f64, version: u32) -> EnrichedRecord {
    EnrichedRecord::new(song_name, ChartType::Std, Difficulty::Master, achievement, level, version)
}

/// Seeded random records with versions around the default threshold.
pub fn generate_random_enriched_records(n: usize, seed: u64) -> Vec<EnrichedRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..n)
        .map(|i| {
            let level = (rng.random_range(10..=150) as f64) / 10.0;
            let achievement = (rng.random_range(750_000..=1_010_000) as f64) / 10_000.0;
            let version = rng.random_range(10_000..=26_000);
            let chart_type = if rng.random_bool(0.5) { ChartType::Dx } else { ChartType::Std };

            EnrichedRecord::new(
                format!("Song {i}"),
                chart_type,
                Difficulty::Master,
                achievement,
                level,
                version
            )
        })
        .collect()
}

/// Seeded random raw records with songs named `Song 0 .. Song {songs-1}`.
/// About one in fifty sheet ids is malformed.
pub fn generate_random_raw_records(n: usize, songs: usize, seed: u64) -> Vec<RawRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let tiers = ["easy", "advanced", "expert", "master", "remaster"];

    (0..n)
        .map(|_| {
            let song = rng.random_range(0..songs.max(1));
            let variant = if rng.random_bool(0.5) { "dx" } else { "std" };
            let tier = tiers[rng.random_range(0..tiers.len())];
            let achievement = (rng.random_range(750_000..=1_010_000) as f64) / 10_000.0;

            let sheet_id = if rng.random_ratio(1, 50) {
                format!("Song {song}__{variant}__{tier}")
            } else {
                format!("Song {song}__x__{variant}__y__{tier}")
            };

            RawRecord::new(sheet_id, achievement)
        })
        .collect()
}

/// A reference table for the songs produced by [`generate_random_raw_records`].
pub fn generate_random_reference_table(songs: usize, seed: u64) -> Vec<ReferenceEntry> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    (0..songs)
        .map(|i| {
            let version = rng.random_range(10_000..=26_000);
            let base = rng.random_range(1..=14);
            let levels = [
                ("lev_bas", base.min(5).to_string()),
                ("lev_adv", (base.min(8) + 1).to_string()),
                ("lev_exp_i", format!("{}.{}", base.min(12) + 1, rng.random_range(0..10))),
                ("lev_mas", format!("{}+", base.min(13) + 1)),
                ("dx_lev_mas_i", format!("{}.{}", base.min(13) + 1, rng.random_range(0..10))),
                ("dx_lev_remas", (base.min(14) + 1).to_string())
            ];
            let levels = levels.iter().map(|(f, v)| (*f, v.as_str())).collect::<Vec<_>>();

            generate_reference_entry(&format!("Song {i}"), version, &levels)
        })
        .collect()
}
