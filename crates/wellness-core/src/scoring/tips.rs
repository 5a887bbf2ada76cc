//! Improvement tip generation.
//!
//! Runs after every sub-score is final. Tips are emitted in a fixed order
//! (biomarkers, genetics, lifestyle) and truncated only at the end.

use crate::config::ScoringConfig;
use crate::models::{BiomarkerDetails, BiomarkerStatus, GeneticDetails, LifestyleDetails};
use crate::tables::TipTables;

use super::lifestyle::{ALCOHOL_FACTOR, SMOKING_FACTOR};

/// Sub-scores and breakdowns the tip generator reads.
pub struct TipInputs<'a> {
    pub biomarker_score: u32,
    pub genetic_score: u32,
    pub biomarkers: &'a BiomarkerDetails,
    pub genetics: &'a GeneticDetails,
    pub lifestyle: &'a LifestyleDetails,
}

pub fn generate_tips(inputs: &TipInputs<'_>, tips: &TipTables, config: &ScoringConfig) -> Vec<String> {
    let mut out = Vec::new();

    if inputs.biomarker_score < config.tip_threshold {
        for marker in &inputs.biomarkers.markers {
            if marker.status != BiomarkerStatus::Normal {
                out.push(tips.biomarker_tip(&marker.name, marker.status));
            }
        }
    }

    if inputs.genetic_score < config.tip_threshold {
        for variant in &inputs.genetics.variants {
            if variant.impact < 0.0 {
                if let Some(tip) = tips.gene_tip(&variant.gene) {
                    out.push(tip);
                }
            }
        }
    }

    let lifestyle = inputs.lifestyle;
    let named = [
        (lifestyle.sleep, &tips.lifestyle.sleep),
        (lifestyle.diet, &tips.lifestyle.diet),
        (lifestyle.exercise, &tips.lifestyle.exercise),
        (lifestyle.stress, &tips.lifestyle.stress),
    ];
    for (score, tip) in named {
        if score < config.tip_threshold {
            out.push(tip.clone());
        }
    }

    if let Some(&smoking) = lifestyle.other_factors.get(SMOKING_FACTOR) {
        if smoking < config.smoking_tip_threshold {
            out.push(tips.lifestyle.smoking.clone());
        }
    }
    if let Some(&alcohol) = lifestyle.other_factors.get(ALCOHOL_FACTOR) {
        if alcohol < config.alcohol_tip_threshold {
            out.push(tips.lifestyle.alcohol.clone());
        }
    }

    out.truncate(config.max_tips);
    out
}
