//! Supplement catalog and recommendation models.

use serde::{Deserialize, Serialize};

/// A single supplement in the recommendation catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplementCatalogEntry {
    /// Stable identifier (e.g., "vitamin-d")
    pub id: String,
    /// Display name
    pub name: String,
    /// Dose per serving (e.g., "2000 IU")
    pub dosage: String,
    /// Intake schedule
    pub frequency: String,
    pub description: String,
    /// Cost in USD per month
    pub price: f64,
    pub priority: Priority,
    pub evidence_level: EvidenceLevel,
    /// Goal tags matched against a profile's considerations
    #[serde(default)]
    pub wellness_goals: Vec<String>,
    /// Tags matched against a profile's sensitivities
    #[serde(default)]
    pub contraindications: Vec<String>,
}

/// Clinical priority of a catalog entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// Strength of the supporting evidence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceLevel {
    Strong,
    Moderate,
    Preliminary,
}

impl Priority {
    /// Ranking points (high 3, medium 2, low 1).
    pub fn points(&self) -> u32 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl EvidenceLevel {
    /// Ranking points (strong 3, moderate 2, preliminary 1).
    pub fn points(&self) -> u32 {
        match self {
            EvidenceLevel::Strong => 3,
            EvidenceLevel::Moderate => 2,
            EvidenceLevel::Preliminary => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceLevel::Strong => "strong",
            EvidenceLevel::Moderate => "moderate",
            EvidenceLevel::Preliminary => "preliminary",
        }
    }
}

/// A catalog entry selected for a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplementRecommendation {
    #[serde(flatten)]
    pub entry: SupplementCatalogEntry,
    /// Ranking score; not meaningful outside one recommendation run
    pub score: u32,
    /// Explanation supplied by an external recommender
    #[serde(default)]
    pub rationale: Option<String>,
}

impl SupplementRecommendation {
    pub fn id(&self) -> &str {
        &self.entry.id
    }

    pub fn price(&self) -> f64 {
        self.entry.price
    }
}

/// Which path produced a set of recommendations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    /// The deterministic ranking algorithm
    Deterministic,
    /// An external recommender (e.g., an LLM)
    External,
}

impl RecommendationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationSource::Deterministic => "deterministic",
            RecommendationSource::External => "external",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "deterministic" => Some(RecommendationSource::Deterministic),
            "external" => Some(RecommendationSource::External),
            _ => None,
        }
    }
}

/// A saved set of recommendations for a user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplementPlan {
    /// Plan UUID
    pub plan_id: String,
    pub user_id: String,
    pub items: Vec<SupplementRecommendation>,
    /// Sum of item prices
    pub total_monthly_cost: f64,
    pub source: RecommendationSource,
    /// RFC 3339 timestamp
    pub created_at: String,
}

impl SupplementPlan {
    /// Create a new plan from selected items.
    pub fn new(
        user_id: String,
        items: Vec<SupplementRecommendation>,
        source: RecommendationSource,
    ) -> Self {
        let total_monthly_cost = items.iter().map(|i| i.price()).sum();
        Self {
            plan_id: uuid::Uuid::new_v4().to_string(),
            user_id,
            items,
            total_monthly_cost,
            source,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, price: f64) -> SupplementCatalogEntry {
        SupplementCatalogEntry {
            id: id.into(),
            name: id.into(),
            dosage: "1 capsule".into(),
            frequency: "daily".into(),
            description: String::new(),
            price,
            priority: Priority::Medium,
            evidence_level: EvidenceLevel::Moderate,
            wellness_goals: vec![],
            contraindications: vec![],
        }
    }

    #[test]
    fn test_points() {
        assert_eq!(Priority::High.points(), 3);
        assert_eq!(Priority::Low.points(), 1);
        assert_eq!(EvidenceLevel::Strong.points(), 3);
        assert_eq!(EvidenceLevel::Preliminary.points(), 1);
    }

    #[test]
    fn test_plan_total_cost() {
        let items = vec![
            SupplementRecommendation { entry: entry("a", 15.0), score: 5, rationale: None },
            SupplementRecommendation { entry: entry("b", 12.5), score: 4, rationale: None },
        ];
        let plan = SupplementPlan::new("u1".into(), items, RecommendationSource::Deterministic);
        assert!((plan.total_monthly_cost - 27.5).abs() < 1e-9);
        assert_eq!(plan.items.len(), 2);
    }

    #[test]
    fn test_recommendation_serializes_flat() {
        let rec = SupplementRecommendation { entry: entry("zinc", 10.0), score: 3, rationale: None };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["id"], "zinc");
        assert_eq!(json["score"], 3);
        assert_eq!(json["priority"], "medium");
    }
}
