use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Difficulty tiers of a chart, lowest first.
///
/// The string forms are the tokens used in the last field of a sheet id.
#[derive(
    Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, IntoStaticStr,
)]
#[repr(u8)]
pub enum Difficulty {
    #[strum(serialize = "easy")]
    Basic = 0,
    #[strum(serialize = "advanced")]
    Advanced = 1,
    #[strum(serialize = "expert")]
    Expert = 2,
    #[strum(serialize = "master")]
    Master = 3,
    #[strum(serialize = "remaster")]
    ReMaster = 4
}

impl TryFrom<i32> for Difficulty {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Difficulty::Basic),
            1 => Ok(Difficulty::Advanced),
            2 => Ok(Difficulty::Expert),
            3 => Ok(Difficulty::Master),
            4 => Ok(Difficulty::ReMaster),
            _ => Err(())
        }
    }
}
