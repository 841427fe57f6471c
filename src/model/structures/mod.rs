pub mod chart_type;
pub mod difficulty;
pub mod processing_mode;
pub mod rank;
pub mod records;
