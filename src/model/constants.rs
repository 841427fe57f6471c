// Rating constants
pub const ACHIEVEMENT_CAP: f64 = 100.5;

// Selection defaults
pub const LATEST_VERSION: u32 = 25500;
pub const RECENT_CAPACITY: usize = 15;
pub const OLDER_CAPACITY: usize = 35;

// Sheet id layout: song__x__variant__y__difficulty
pub const SHEET_ID_DELIMITER: &str = "__";
pub const SHEET_ID_FIELDS: usize = 5;
pub const SHEET_ID_SONG_FIELD: usize = 0;
pub const SHEET_ID_VARIANT_FIELD: usize = 2;
pub const SHEET_ID_DIFFICULTY_FIELD: usize = 4;

// Reference table defaults
pub const REFERENCE_URL: &str = "https://otoge-db.net/maimai/data/music-ex-intl.json";
pub const COVER_ART_BASE_URL: &str = "https://otoge-db.net/maimai/jacket/";
