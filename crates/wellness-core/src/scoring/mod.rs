//! Health scoring.
//!
//! Pipeline: Biomarkers + Genetics + Lifestyle → Weighted Total → Tips
//!
//! Scoring is a pure function of the profile, the records and the loaded
//! tables. Persisting the result is the caller's job.

mod biomarker;
mod genetic;
mod lifestyle;
mod tips;

pub use biomarker::*;
pub use genetic::*;
pub use lifestyle::*;
pub use tips::*;

use crate::config::ScoringConfig;
use crate::models::{BiomarkerRecord, GeneticVariantRecord, HealthScoreResult, WellnessProfile};
use crate::tables::ScoringTables;

/// Computes health scores against a fixed set of tables.
pub struct HealthScorer<'a> {
    tables: &'a ScoringTables,
    config: &'a ScoringConfig,
}

impl<'a> HealthScorer<'a> {
    /// Create a new scorer.
    pub fn new(tables: &'a ScoringTables, config: &'a ScoringConfig) -> Self {
        Self { tables, config }
    }

    /// Score one profile.
    pub fn score(
        &self,
        profile: &WellnessProfile,
        biomarkers: &[BiomarkerRecord],
        genetics: &[GeneticVariantRecord],
    ) -> HealthScoreResult {
        let neutral = self.config.neutral_score;

        let (biomarker_score, biomarker_details) = score_biomarkers(biomarkers, neutral);
        let (genetic_score, genetic_details) =
            score_genetics(&self.tables.gene_impacts, genetics, neutral);
        let (lifestyle_score, lifestyle_details) =
            score_lifestyle(&self.tables.lifestyle, &profile.lifestyle, neutral);

        let total_score = self.weighted_total(biomarker_score, genetic_score, lifestyle_score);

        // Tips read only the finished sub-scores
        let improvement_tips = generate_tips(
            &TipInputs {
                biomarker_score,
                genetic_score,
                biomarkers: &biomarker_details,
                genetics: &genetic_details,
                lifestyle: &lifestyle_details,
            },
            &self.tables.tips,
            self.config,
        );

        HealthScoreResult {
            total_score,
            biomarker_score,
            genetic_score,
            lifestyle_score,
            biomarker_details,
            genetic_details,
            lifestyle_details,
            improvement_tips,
        }
    }

    /// `round(wb * b + wg * g + wl * l)` with weights in percent.
    pub fn weighted_total(&self, biomarker: u32, genetic: u32, lifestyle: u32) -> u32 {
        let c = self.config;
        let weight_sum =
            u64::from(c.biomarker_weight) + u64::from(c.genetic_weight) + u64::from(c.lifestyle_weight);
        if weight_sum == 0 {
            return c.neutral_score;
        }
        let weighted = u64::from(c.biomarker_weight) * u64::from(biomarker)
            + u64::from(c.genetic_weight) * u64::from(genetic)
            + u64::from(c.lifestyle_weight) * u64::from(lifestyle);
        round_div(weighted, weight_sum)
    }
}

/// `round(n / d)` with halves rounded up, in exact integer arithmetic.
pub(crate) fn round_div(n: u64, d: u64) -> u32 {
    ((2 * n + d) / (2 * d)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LifestyleProfile;

    #[test]
    fn test_round_div() {
        assert_eq!(round_div(1, 2), 1);
        assert_eq!(round_div(370, 4), 93);
        assert_eq!(round_div(200, 3), 67);
        assert_eq!(round_div(100, 3), 33);
        assert_eq!(round_div(0, 7), 0);
    }

    #[test]
    fn test_weighted_total() {
        let tables = ScoringTables::embedded().unwrap();
        let config = ScoringConfig::default();
        let scorer = HealthScorer::new(&tables, &config);

        assert_eq!(scorer.weighted_total(100, 100, 100), 100);
        assert_eq!(scorer.weighted_total(0, 0, 0), 0);
        // 50 + 0 + 27.9 = 77.9 → 78
        assert_eq!(scorer.weighted_total(100, 0, 93), 78);
        // 0.5 + 0 + 0 → 1
        assert_eq!(scorer.weighted_total(1, 0, 0), 1);
    }

    #[test]
    fn test_empty_profile_is_neutral() {
        let tables = ScoringTables::embedded().unwrap();
        let config = ScoringConfig::default();
        let profile = WellnessProfile::new("u1".into(), 35, "female".into());

        let result = HealthScorer::new(&tables, &config).score(&profile, &[], &[]);
        assert_eq!(result.biomarker_score, 50);
        assert_eq!(result.genetic_score, 50);
        assert_eq!(result.lifestyle_score, 50);
        assert_eq!(result.total_score, 50);
        // Missing lifestyle answers score 50, below the tip threshold
        assert_eq!(result.improvement_tips.len(), 4);
    }

    #[test]
    fn test_full_profile() {
        let tables = ScoringTables::embedded().unwrap();
        let config = ScoringConfig::default();
        let mut profile = WellnessProfile::new("u1".into(), 35, "male".into());
        profile.lifestyle = LifestyleProfile {
            sleep_hours: Some(8.0),
            dietary_pattern: Some("mediterranean".into()),
            activity_level: Some("athlete".into()),
            stress_level: Some("low".into()),
            ..Default::default()
        };
        let genetics = vec![GeneticVariantRecord::new("MTHFR", "C677T")];

        let result = HealthScorer::new(&tables, &config).score(&profile, &[], &genetics);
        assert_eq!(result.genetic_score, 0);
        assert_eq!(result.lifestyle_score, 93);
        // 25 + 0 + 27.9 = 52.9 → 53
        assert_eq!(result.total_score, 53);
        assert_eq!(result.improvement_tips.len(), 1);
        assert!(result.improvement_tips[0].contains("MTHFR"));
    }
}
