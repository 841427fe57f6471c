use crate::model::{constants::ACHIEVEMENT_CAP, structures::rank::Rank};

/// # DX rating
///
/// `floor(|level| * min(achievement, 100.5) * factor)`, where the factor comes
/// from the rank the capped achievement falls into.
///
/// A missing or zero level scores `0`. This is also the result for a `NaN`
/// level or achievement, so the function is total.
pub fn dx_rating(level: Option<f64>, achievement: f64) -> u32 {
    let level = match level {
        Some(l) if l != 0.0 && !l.is_nan() => l,
        _ => return 0
    };

    if achievement.is_nan() {
        return 0;
    }

    let capped = achievement.min(ACHIEVEMENT_CAP);
    let factor = achievement_factor(capped);

    // `as` saturates, so negative products land on 0
    (level.abs() * capped * factor).floor() as u32
}

pub fn achievement_factor(achievement: f64) -> f64 {
    Rank::from_achievement(achievement).factor()
}

/// Display label for an achievement rate, e.g. `SSS+`.
pub fn rank_label(achievement: f64) -> &'static str {
    Rank::from_achievement(achievement).into()
}
