//! Supplement recommender.
//!
//! Pipeline: Contraindication Filter → Relevance Scoring → Stable Sort → Greedy Budget Fit
//!
//! Scoring points:
//! - Evidence level: strong 3, moderate 2, preliminary 1
//! - Priority: high 3, medium 2, low 1
//! - +2 per goal tag matching any consideration
//! - +1 for vitamin D, magnesium and omega-3 when age > 50
//! - +1 for iron when the profile is female

mod matcher;
mod orchestrator;

pub use matcher::*;
pub use orchestrator::*;

use crate::config::RecommenderConfig;
use crate::models::{SupplementCatalogEntry, SupplementRecommendation, WellnessProfile};

/// Points per matching goal tag.
const GOAL_MATCH_POINTS: u32 = 2;

/// Entries that get a bonus point for older profiles.
const AGE_BONUS_IDS: [&str; 3] = ["vitamin-d", "magnesium", "omega3"];

/// Profiles strictly older than this get the age bonus.
const AGE_BONUS_AFTER: u32 = 50;

/// Entries that get a bonus point for female profiles.
const FEMALE_BONUS_IDS: [&str; 1] = ["iron"];

/// Ranks and selects catalog entries for a profile.
pub struct Recommender<'a> {
    config: &'a RecommenderConfig,
}

impl<'a> Recommender<'a> {
    /// Create a new recommender.
    pub fn new(config: &'a RecommenderConfig) -> Self {
        Self { config }
    }

    /// Recommend at most `max_recommendations` entries within the profile's budget.
    ///
    /// Ordering is by descending score, ties kept in catalog order.
    pub fn recommend(
        &self,
        profile: &WellnessProfile,
        catalog: &[SupplementCatalogEntry],
    ) -> Vec<SupplementRecommendation> {
        if catalog.is_empty() || !has_budget(profile.monthly_budget) {
            return Vec::new();
        }

        let mut ranked: Vec<SupplementRecommendation> = catalog
            .iter()
            .filter(|entry| !self.is_contraindicated(entry, &profile.wellness_sensitivities))
            .map(|entry| SupplementRecommendation {
                entry: entry.clone(),
                score: self.score_entry(entry, profile),
                rationale: None,
            })
            .collect();

        // Vec::sort_by is stable, so ties keep catalog order
        ranked.sort_by(|a, b| b.score.cmp(&a.score));

        self.select_within_budget(ranked, profile.monthly_budget)
    }

    /// Whether any sensitivity matches any of the entry's contraindications.
    pub fn is_contraindicated(&self, entry: &SupplementCatalogEntry, sensitivities: &[String]) -> bool {
        let hit = entry
            .contraindications
            .iter()
            .find(|c| matches_any(c, sensitivities, self.config.match_policy));
        if let Some(tag) = hit {
            log::debug!("Excluding {}: contraindicated by {}", entry.id, tag);
        }
        hit.is_some()
    }

    /// Relevance score of one entry for one profile.
    pub fn score_entry(&self, entry: &SupplementCatalogEntry, profile: &WellnessProfile) -> u32 {
        let mut score = entry.evidence_level.points() + entry.priority.points();

        let goal_matches = entry
            .wellness_goals
            .iter()
            .filter(|goal| matches_any(goal, &profile.wellness_considerations, self.config.match_policy))
            .count() as u32;
        score += GOAL_MATCH_POINTS * goal_matches;

        if profile.age > AGE_BONUS_AFTER && AGE_BONUS_IDS.contains(&entry.id.as_str()) {
            score += 1;
        }
        if profile.is_female() && FEMALE_BONUS_IDS.contains(&entry.id.as_str()) {
            score += 1;
        }

        score
    }

    /// Walk `ranked` in order, keeping every entry that still fits the budget.
    ///
    /// Entries that would overflow are skipped and the walk continues, so a
    /// cheaper entry further down can still be picked.
    pub fn select_within_budget(
        &self,
        ranked: Vec<SupplementRecommendation>,
        budget: f64,
    ) -> Vec<SupplementRecommendation> {
        let mut selected = Vec::new();
        if !has_budget(budget) {
            return selected;
        }

        let mut total = 0.0;
        for rec in ranked {
            if selected.len() >= self.config.max_recommendations {
                break;
            }
            if total + rec.price() <= budget {
                total += rec.price();
                selected.push(rec);
            } else {
                log::debug!(
                    "Skipping {} (${:.2}): ${:.2} of ${:.2} already committed",
                    rec.id(),
                    rec.price(),
                    total,
                    budget
                );
            }
        }
        selected
    }

    /// Apply the contraindication filter, the limit and the budget to an
    /// already-ordered list from another source.
    pub fn enforce_constraints(
        &self,
        profile: &WellnessProfile,
        picks: Vec<SupplementRecommendation>,
    ) -> Vec<SupplementRecommendation> {
        let allowed: Vec<SupplementRecommendation> = picks
            .into_iter()
            .filter(|rec| !self.is_contraindicated(&rec.entry, &profile.wellness_sensitivities))
            .collect();
        self.select_within_budget(allowed, profile.monthly_budget)
    }
}

fn has_budget(budget: f64) -> bool {
    budget.is_finite() && budget > 0.0
}
