//! Lifestyle sub-score.

use std::collections::BTreeMap;

use crate::models::{LifestyleDetails, LifestyleProfile};
use crate::tables::{LifestyleTables, Lookup};

use super::round_div;

pub const SMOKING_FACTOR: &str = "smoking";
pub const ALCOHOL_FACTOR: &str = "alcohol";

/// Stepped sleep score: 7-9h is ideal, falling off on both sides.
pub fn sleep_score(hours: Option<f64>, neutral: u32) -> u32 {
    let Some(h) = hours else {
        return neutral;
    };
    if (7.0..=9.0).contains(&h) {
        100
    } else if (6.0..7.0).contains(&h) || (h > 9.0 && h <= 10.0) {
        75
    } else if (5.0..6.0).contains(&h) || h > 10.0 {
        50
    } else {
        25
    }
}

/// Mean of sleep, diet, exercise, stress and any reported other factors.
pub fn score_lifestyle(
    tables: &LifestyleTables,
    lifestyle: &LifestyleProfile,
    neutral: u32,
) -> (u32, LifestyleDetails) {
    let sleep = sleep_score(lifestyle.sleep_hours, neutral);
    let diet = tables.diet.lookup_or(answer(&lifestyle.dietary_pattern), neutral);
    let exercise = tables.activity.lookup_or(answer(&lifestyle.activity_level), neutral);
    let stress = tables.stress.lookup_or(answer(&lifestyle.stress_level), neutral);

    let mut other_factors = BTreeMap::new();
    if let Some(status) = answer(&lifestyle.smoking_status) {
        other_factors.insert(
            SMOKING_FACTOR.to_string(),
            tables.smoking.lookup_or(Some(status), neutral),
        );
    }
    if let Some(frequency) = answer(&lifestyle.alcohol_frequency) {
        other_factors.insert(
            ALCOHOL_FACTOR.to_string(),
            tables.alcohol.lookup_or(Some(frequency), neutral),
        );
    }

    let scores: Vec<u32> = [sleep, diet, exercise, stress]
        .into_iter()
        .chain(other_factors.values().copied())
        .collect();
    let sum: u64 = scores.iter().map(|&s| u64::from(s)).sum();
    let score = round_div(sum, scores.len() as u64);

    (
        score,
        LifestyleDetails {
            sleep,
            diet,
            exercise,
            stress,
            other_factors,
        },
    )
}

/// A non-blank answer, or `None`.
fn answer(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
