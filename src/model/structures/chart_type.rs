use serde_repr::{Deserialize_repr, Serialize_repr};
use std::convert::TryFrom;
use strum_macros::{Display, EnumIter};

/// The two parallel rule sets a song may be charted under.
#[derive(Deserialize_repr, Serialize_repr, Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, Display)]
#[repr(u8)]
pub enum ChartType {
    #[default]
    #[strum(serialize = "STD")]
    Std = 0,
    #[strum(serialize = "DX")]
    Dx = 1
}

impl ChartType {
    /// Maps the variant token of a sheet id. Only `dx` selects DX charts,
    /// every other token is treated as a standard chart.
    pub fn from_token(token: &str) -> ChartType {
        match token {
            "dx" => ChartType::Dx,
            _ => ChartType::Std
        }
    }
}

impl TryFrom<i32> for ChartType {
    type Error = ();

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(ChartType::Std),
            1 => Ok(ChartType::Dx),
            _ => Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::structures::chart_type::ChartType;

    #[test]
    fn test_from_token() {
        assert_eq!(ChartType::from_token("dx"), ChartType::Dx);
        assert_eq!(ChartType::from_token("std"), ChartType::Std);
        assert_eq!(ChartType::from_token("DX"), ChartType::Std);
        assert_eq!(ChartType::from_token(""), ChartType::Std);
    }

    #[test]
    fn test_convert() {
        assert_eq!(ChartType::try_from(0), Ok(ChartType::Std));
        assert_eq!(ChartType::try_from(1), Ok(ChartType::Dx));
        assert_eq!(ChartType::try_from(2), Err(()));
    }

    #[test]
    fn test_display() {
        assert_eq!(ChartType::Std.to_string(), "STD");
        assert_eq!(ChartType::Dx.to_string(), "DX");
    }

    #[test]
    fn test_serialize_as_number() {
        assert_eq!(serde_json::to_string(&ChartType::Dx).unwrap(), "1");
        assert_eq!(serde_json::from_str::<ChartType>("0").unwrap(), ChartType::Std);
    }
}
