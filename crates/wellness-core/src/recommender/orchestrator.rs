//! External recommender with deterministic fallback.

use serde::{Deserialize, Serialize};

use crate::models::{
    RecommendationSource, SupplementCatalogEntry, SupplementRecommendation, WellnessProfile,
};

use super::Recommender;

/// Result of asking an external recommender.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalOutcome {
    /// Ordered picks from the external source
    Success(Vec<SupplementRecommendation>),
    /// The source could not answer (missing key, network, malformed output, ...)
    Unavailable(String),
}

/// A non-deterministic recommendation source, e.g. an LLM.
///
/// Implementations must not panic or return errors; every failure is
/// reported as [`ExternalOutcome::Unavailable`].
pub trait ExternalRecommender {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn recommend(
        &self,
        profile: &WellnessProfile,
        catalog: &[SupplementCatalogEntry],
    ) -> ExternalOutcome;
}

/// Recommendations plus where they came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    pub recommendations: Vec<SupplementRecommendation>,
    pub source: RecommendationSource,
    /// Why the external source was not used, when one was tried
    pub fallback_reason: Option<String>,
}

/// Try `external` first; fall back to the deterministic ranking when it is
/// absent, unavailable, or yields nothing usable.
///
/// External picks go through the same contraindication filter, limit and
/// budget as deterministic ones.
pub fn recommend_with_fallback(
    recommender: &Recommender<'_>,
    external: Option<&dyn ExternalRecommender>,
    profile: &WellnessProfile,
    catalog: &[SupplementCatalogEntry],
) -> RecommendationOutcome {
    let fallback_reason = match external {
        None => None,
        Some(source) => match source.recommend(profile, catalog) {
            ExternalOutcome::Success(picks) => {
                let recommendations = recommender.enforce_constraints(profile, picks);
                if !recommendations.is_empty() {
                    return RecommendationOutcome {
                        recommendations,
                        source: RecommendationSource::External,
                        fallback_reason: None,
                    };
                }
                Some(format!("{} returned no usable recommendations", source.name()))
            }
            ExternalOutcome::Unavailable(reason) => Some(format!("{}: {}", source.name(), reason)),
        },
    };

    if let Some(reason) = &fallback_reason {
        log::warn!("External recommender unavailable, using deterministic ranking ({})", reason);
    }

    RecommendationOutcome {
        recommendations: recommender.recommend(profile, catalog),
        source: RecommendationSource::Deterministic,
        fallback_reason,
    }
}
