//! Health score result models.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BiomarkerStatus;

/// Output of one scoring run. Built fresh per call and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthScoreResult {
    /// Weighted composite (0 - 100)
    pub total_score: u32,
    /// Share of in-range biomarkers (0 - 100)
    pub biomarker_score: u32,
    /// Normalized genetic impact (0 - 100)
    pub genetic_score: u32,
    /// Mean of lifestyle sub-scores (0 - 100)
    pub lifestyle_score: u32,
    pub biomarker_details: BiomarkerDetails,
    pub genetic_details: GeneticDetails,
    pub lifestyle_details: LifestyleDetails,
    /// At most five tips: biomarker tips, then genetic, then lifestyle
    pub improvement_tips: Vec<String>,
}

/// Per-marker breakdown of the biomarker sub-score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BiomarkerDetails {
    pub normal_count: u32,
    pub total_count: u32,
    /// Latest record per marker, in first-seen order
    pub markers: Vec<MarkerStatus>,
}

/// Classification of one deduplicated biomarker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerStatus {
    pub name: String,
    pub value: f64,
    pub status: BiomarkerStatus,
    pub measured_at: DateTime<Utc>,
}

/// Breakdown of the genetic sub-score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneticDetails {
    /// Variants with negative impact
    pub actionable_count: u32,
    /// Variants with positive impact
    pub protective_count: u32,
    pub variants: Vec<VariantImpact>,
}

/// Table impact of one reported variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantImpact {
    pub gene: String,
    pub genotype: String,
    /// Impact in [-1, 1]; 0 when the table has no entry
    pub impact: f64,
}

/// Breakdown of the lifestyle sub-score.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LifestyleDetails {
    pub sleep: u32,
    pub diet: u32,
    pub exercise: u32,
    pub stress: u32,
    /// Optional factors that were reported ("smoking", "alcohol")
    pub other_factors: BTreeMap<String, u32>,
}

/// A persisted scoring run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthScoreSnapshot {
    /// Snapshot UUID
    pub id: String,
    pub user_id: String,
    pub result: HealthScoreResult,
    /// Fingerprint of the lookup tables that produced the result
    pub tables_fingerprint: String,
    /// RFC 3339 timestamp
    pub recorded_at: String,
}

impl HealthScoreSnapshot {
    /// Wrap a result for persistence, stamping id and time.
    pub fn new(user_id: String, result: HealthScoreResult, tables_fingerprint: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            result,
            tables_fingerprint,
            recorded_at: Utc::now().to_rfc3339(),
        }
    }
}
