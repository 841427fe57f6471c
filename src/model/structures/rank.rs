use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// Display grade for an achievement rate. Variants are ordered best first,
/// which is also the order [`Rank::from_achievement`] checks them in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, IntoStaticStr)]
pub enum Rank {
    #[strum(serialize = "SSS+")]
    #[serde(rename = "SSS+")]
    SssPlus,
    #[strum(serialize = "SSS")]
    #[serde(rename = "SSS")]
    Sss,
    #[strum(serialize = "SS+")]
    #[serde(rename = "SS+")]
    SsPlus,
    #[strum(serialize = "SS")]
    #[serde(rename = "SS")]
    Ss,
    #[strum(serialize = "S+")]
    #[serde(rename = "S+")]
    SPlus,
    #[strum(serialize = "S")]
    #[serde(rename = "S")]
    S,
    #[strum(serialize = "AAA")]
    #[serde(rename = "AAA")]
    Aaa,
    #[strum(serialize = "AA")]
    #[serde(rename = "AA")]
    Aa,
    #[strum(serialize = "A")]
    #[serde(rename = "A")]
    A,
    #[strum(serialize = "B")]
    #[serde(rename = "B")]
    B
}

impl Rank {
    /// Minimum achievement rate for this rank.
    pub fn threshold(&self) -> f64 {
        match self {
            Rank::SssPlus => 100.5,
            Rank::Sss => 100.0,
            Rank::SsPlus => 99.5,
            Rank::Ss => 99.0,
            Rank::SPlus => 98.0,
            Rank::S => 97.0,
            Rank::Aaa => 94.0,
            Rank::Aa => 90.0,
            Rank::A => 80.0,
            Rank::B => f64::NEG_INFINITY
        }
    }

    /// Multiplier used by the rating formula for achievements in this rank.
    pub fn factor(&self) -> f64 {
        match self {
            Rank::SssPlus => 0.224,
            Rank::Sss => 0.216,
            Rank::SsPlus => 0.211,
            Rank::Ss => 0.208,
            Rank::SPlus => 0.203,
            Rank::S => 0.200,
            Rank::Aaa => 0.168,
            Rank::Aa => 0.152,
            Rank::A => 0.136,
            Rank::B => 0.0
        }
    }

    pub fn from_achievement(achievement: f64) -> Rank {
        Rank::iter()
            .find(|rank| achievement >= rank.threshold())
            .unwrap_or(Rank::B)
    }
}
