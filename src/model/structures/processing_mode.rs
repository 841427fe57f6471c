use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// How a batch reacts to a record whose sheet id cannot be parsed.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProcessingMode {
    /// The first bad record fails the whole batch.
    Strict,
    /// Bad records are reported and skipped; the rest of the batch is scored.
    #[default]
    Lenient
}
