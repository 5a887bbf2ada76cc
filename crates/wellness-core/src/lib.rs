//! Wellness Core Library
//!
//! Local-first health scoring and supplement recommendation.
//!
//! # Architecture
//!
//! ```text
//!   Profile + Lab Results + Genotypes
//!                 │
//!     ┌───────────▼───────────┐
//!     │     Health Scorer     │   biomarker / genetic / lifestyle
//!     │  weighted 50/20/30    │   sub-scores → total → tips
//!     └───────────┬───────────┘
//!                 │
//!     [APPEND-ONLY: health_score_snapshots]
//!
//!   Profile + Catalog
//!                 │
//!     ┌───────────▼───────────┐      ┌──────────────────────┐
//!     │  External Recommender │─ ✗ ─▶│ Deterministic Ranker │
//!     │   (LLM, optional)     │      │ filter → score → fit │
//!     └───────────┬───────────┘      └──────────┬───────────┘
//!                 │  contraindications, limit,  │
//!                 └──────── budget re-applied ──┘
//!                               │
//!                    [supplement_plans]
//! ```
//!
//! # Core Principle
//!
//! **Scoring and ranking are pure.** They read the profile, the records and
//! the loaded tables, never the store. Persistence lives in [`service`].
//!
//! # Modules
//!
//! - [`db`]: SQLite data store
//! - [`models`]: Domain types (WellnessProfile, BiomarkerRecord, etc.)
//! - [`tables`]: JSON lookup tables (gene impacts, lifestyle, tips, catalog)
//! - [`scoring`]: Health scorer
//! - [`recommender`]: Supplement recommender and external fallback
//! - [`service`]: Load, compute, persist
//! - [`config`]: Engine configuration

pub mod config;
pub mod db;
pub mod models;
pub mod recommender;
pub mod scoring;
pub mod service;
pub mod tables;

// Re-export commonly used types
pub use config::{EngineConfig, MatchPolicy, RecommenderConfig, ScoringConfig};
pub use db::Database;
pub use models::{
    BiomarkerRecord, BiomarkerStatus, EvidenceLevel, GeneticVariantRecord, HealthScoreResult,
    HealthScoreSnapshot, LifestyleProfile, Priority, RecommendationSource, SupplementCatalogEntry,
    SupplementPlan, SupplementRecommendation, WellnessProfile,
};
pub use recommender::{
    recommend_with_fallback, ExternalOutcome, ExternalRecommender, RecommendationOutcome, Recommender,
};
pub use scoring::HealthScorer;
pub use service::{ServiceError, WellnessService};
pub use tables::ScoringTables;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

/// Score a profile with the built-in tables and default weights.
pub fn compute_health_score(
    profile: &WellnessProfile,
    biomarkers: &[BiomarkerRecord],
    genetics: &[GeneticVariantRecord],
) -> HealthScoreResult {
    let config = ScoringConfig::default();
    HealthScorer::new(ScoringTables::builtin(), &config).score(profile, biomarkers, genetics)
}

/// Rank `catalog` for a profile with the default recommender settings.
pub fn recommend(
    profile: &WellnessProfile,
    catalog: &[SupplementCatalogEntry],
) -> Vec<SupplementRecommendation> {
    let config = RecommenderConfig::default();
    Recommender::new(&config).recommend(profile, catalog)
}

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum WellnessError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for WellnessError {
    fn from(e: db::DbError) -> Self {
        WellnessError::DatabaseError(e.to_string())
    }
}

impl From<ServiceError> for WellnessError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Database(db) => db.into(),
            ServiceError::ProfileNotFound(user_id) => WellnessError::NotFound(format!("profile {}", user_id)),
        }
    }
}

impl From<tables::TableError> for WellnessError {
    fn from(e: tables::TableError) -> Self {
        WellnessError::ConfigError(e.to_string())
    }
}

impl From<config::ConfigError> for WellnessError {
    fn from(e: config::ConfigError) -> Self {
        WellnessError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for WellnessError {
    fn from(e: serde_json::Error) -> Self {
        WellnessError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for WellnessError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        WellnessError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
///
/// `tables_dir` may hold replacement JSON tables; absent files keep the
/// built-in defaults.
#[uniffi::export]
pub fn open_database(path: String, tables_dir: Option<String>) -> Result<Arc<WellnessCore>, WellnessError> {
    let db = Database::open(&path)?;
    WellnessCore::build(db, tables_dir, EngineConfig::default())
}

/// Like [`open_database`], with an engine configuration given as JSON.
#[uniffi::export]
pub fn open_database_with_config(
    path: String,
    tables_dir: Option<String>,
    config_json: String,
) -> Result<Arc<WellnessCore>, WellnessError> {
    let config = EngineConfig::from_json_str(&config_json)?;
    let db = Database::open(&path)?;
    WellnessCore::build(db, tables_dir, config)
}

/// Create an in-memory database with the built-in tables (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<WellnessCore>, WellnessError> {
    let db = Database::open_in_memory()?;
    WellnessCore::build(db, None, EngineConfig::default())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe engine handle for FFI.
#[derive(uniffi::Object)]
pub struct WellnessCore {
    db: Arc<Mutex<Database>>,
    tables: ScoringTables,
    config: EngineConfig,
}

impl WellnessCore {
    fn build(
        db: Database,
        tables_dir: Option<String>,
        config: EngineConfig,
    ) -> Result<Arc<Self>, WellnessError> {
        let tables = match tables_dir {
            Some(dir) => ScoringTables::load_dir(dir)?,
            None => ScoringTables::builtin().clone(),
        };
        Ok(Arc::new(Self {
            db: Arc::new(Mutex::new(db)),
            tables,
            config,
        }))
    }
}

#[uniffi::export]
impl WellnessCore {
    // =========================================================================
    // Profile Operations
    // =========================================================================

    /// Add or replace a profile.
    pub fn upsert_profile(&self, profile: FfiWellnessProfile) -> Result<(), WellnessError> {
        let db = self.db.lock()?;
        let profile = profile.into_profile(self.config.recommender.default_monthly_budget);
        db.upsert_profile(&profile)?;
        Ok(())
    }

    /// Get a profile by user ID.
    pub fn get_profile(&self, user_id: String) -> Result<Option<FfiWellnessProfile>, WellnessError> {
        let db = self.db.lock()?;
        let profile = db.get_profile(&user_id)?;
        Ok(profile.map(|p| p.into()))
    }

    // =========================================================================
    // Lab Data Operations
    // =========================================================================

    /// Record one lab result.
    pub fn add_biomarker(&self, user_id: String, record: FfiBiomarkerRecord) -> Result<(), WellnessError> {
        let record = BiomarkerRecord::try_from(record)?;
        let db = self.db.lock()?;
        db.insert_biomarker(&user_id, &record)?;
        Ok(())
    }

    /// Record one reported genotype.
    pub fn add_genetic_variant(
        &self,
        user_id: String,
        variant: FfiGeneticVariant,
    ) -> Result<(), WellnessError> {
        let db = self.db.lock()?;
        db.insert_genetic_variant(&user_id, &variant.into())?;
        Ok(())
    }

    // =========================================================================
    // Scoring Operations
    // =========================================================================

    /// Score a user from stored data and record the snapshot.
    pub fn compute_health_score(&self, user_id: String) -> Result<FfiHealthScore, WellnessError> {
        let db = self.db.lock()?;
        let service = WellnessService::new(&db, &self.tables, &self.config);
        let snapshot = service.score_user(&user_id)?;
        FfiHealthScore::try_from(snapshot)
    }

    /// Most recent recorded score.
    pub fn latest_health_score(&self, user_id: String) -> Result<Option<FfiHealthScore>, WellnessError> {
        let db = self.db.lock()?;
        db.latest_snapshot(&user_id)?
            .map(FfiHealthScore::try_from)
            .transpose()
    }

    /// Past scores, newest first.
    pub fn score_history(&self, user_id: String, limit: u32) -> Result<Vec<FfiHealthScore>, WellnessError> {
        let db = self.db.lock()?;
        let service = WellnessService::new(&db, &self.tables, &self.config);
        service
            .score_history(&user_id, limit)?
            .into_iter()
            .map(FfiHealthScore::try_from)
            .collect()
    }

    // =========================================================================
    // Recommendation Operations
    // =========================================================================

    /// Rank the catalog for a stored user.
    pub fn recommend_supplements(&self, user_id: String) -> Result<FfiRecommendationOutcome, WellnessError> {
        let db = self.db.lock()?;
        let service = WellnessService::new(&db, &self.tables, &self.config);
        let outcome = service.recommend_for_user(&user_id, None)?;
        Ok(outcome.into())
    }

    /// Rank the catalog for a stored user and save the result as a plan.
    pub fn save_supplement_plan(&self, user_id: String) -> Result<FfiSupplementPlan, WellnessError> {
        let db = self.db.lock()?;
        let service = WellnessService::new(&db, &self.tables, &self.config);
        let outcome = service.recommend_for_user(&user_id, None)?;
        let plan = service.save_plan(&user_id, &outcome)?;
        Ok(plan.into())
    }

    /// The loaded supplement catalog.
    pub fn catalog(&self) -> Vec<FfiCatalogEntry> {
        self.tables.catalog.iter().cloned().map(|e| e.into()).collect()
    }

    /// Fingerprint of the loaded tables.
    pub fn tables_fingerprint(&self) -> String {
        self.tables.fingerprint()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe wellness profile. Lifestyle answers are flattened.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiWellnessProfile {
    pub user_id: String,
    pub age: u32,
    pub gender: String,
    pub wellness_considerations: Vec<String>,
    pub wellness_sensitivities: Vec<String>,
    /// `None` uses the configured default budget
    pub monthly_budget: Option<f64>,
    pub sleep_hours: Option<f64>,
    pub dietary_pattern: Option<String>,
    pub activity_level: Option<String>,
    pub stress_level: Option<String>,
    pub smoking_status: Option<String>,
    pub alcohol_frequency: Option<String>,
}

impl FfiWellnessProfile {
    fn into_profile(self, default_budget: f64) -> WellnessProfile {
        WellnessProfile {
            user_id: self.user_id,
            age: self.age,
            gender: self.gender,
            wellness_considerations: models::normalize_text_list(self.wellness_considerations),
            wellness_sensitivities: models::normalize_text_list(self.wellness_sensitivities),
            monthly_budget: self.monthly_budget.unwrap_or(default_budget),
            lifestyle: LifestyleProfile {
                sleep_hours: self.sleep_hours,
                dietary_pattern: self.dietary_pattern,
                activity_level: self.activity_level,
                stress_level: self.stress_level,
                smoking_status: self.smoking_status,
                alcohol_frequency: self.alcohol_frequency,
            },
        }
    }
}

impl From<WellnessProfile> for FfiWellnessProfile {
    fn from(profile: WellnessProfile) -> Self {
        let lifestyle = profile.lifestyle;
        Self {
            user_id: profile.user_id,
            age: profile.age,
            gender: profile.gender,
            wellness_considerations: profile.wellness_considerations,
            wellness_sensitivities: profile.wellness_sensitivities,
            monthly_budget: Some(profile.monthly_budget),
            sleep_hours: lifestyle.sleep_hours,
            dietary_pattern: lifestyle.dietary_pattern,
            activity_level: lifestyle.activity_level,
            stress_level: lifestyle.stress_level,
            smoking_status: lifestyle.smoking_status,
            alcohol_frequency: lifestyle.alcohol_frequency,
        }
    }
}

/// FFI-safe lab result. `measurement_date` is RFC 3339.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiBiomarkerRecord {
    pub biomarker_name: String,
    pub biomarker_value: f64,
    pub unit: Option<String>,
    pub measurement_date: String,
    pub normal_range_low: Option<f64>,
    pub normal_range_high: Option<f64>,
}

impl TryFrom<FfiBiomarkerRecord> for BiomarkerRecord {
    type Error = WellnessError;

    fn try_from(record: FfiBiomarkerRecord) -> Result<Self, Self::Error> {
        let measurement_date = chrono::DateTime::parse_from_rfc3339(&record.measurement_date)
            .map_err(|e| {
                WellnessError::InvalidInput(format!(
                    "measurement_date {:?}: {}",
                    record.measurement_date, e
                ))
            })?
            .with_timezone(&chrono::Utc);
        Ok(BiomarkerRecord {
            biomarker_name: record.biomarker_name,
            biomarker_value: record.biomarker_value,
            unit: record.unit,
            measurement_date,
            normal_range_low: record.normal_range_low,
            normal_range_high: record.normal_range_high,
        })
    }
}

/// FFI-safe genotype.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiGeneticVariant {
    pub gene: String,
    pub genotype: String,
    pub rsid: Option<String>,
}

impl From<FfiGeneticVariant> for GeneticVariantRecord {
    fn from(variant: FfiGeneticVariant) -> Self {
        GeneticVariantRecord {
            gene: variant.gene,
            genotype: variant.genotype,
            rsid: variant.rsid,
        }
    }
}

/// FFI-safe health score. The full breakdown crosses as JSON.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHealthScore {
    pub snapshot_id: String,
    pub user_id: String,
    pub total_score: u32,
    pub biomarker_score: u32,
    pub genetic_score: u32,
    pub lifestyle_score: u32,
    pub normal_biomarkers: u32,
    pub total_biomarkers: u32,
    pub actionable_variants: u32,
    pub protective_variants: u32,
    pub improvement_tips: Vec<String>,
    pub breakdown_json: String,
    pub tables_fingerprint: String,
    pub recorded_at: String,
}

impl TryFrom<HealthScoreSnapshot> for FfiHealthScore {
    type Error = WellnessError;

    fn try_from(snapshot: HealthScoreSnapshot) -> Result<Self, Self::Error> {
        let breakdown_json = serde_json::to_string(&snapshot.result)?;
        let result = snapshot.result;
        Ok(Self {
            snapshot_id: snapshot.id,
            user_id: snapshot.user_id,
            total_score: result.total_score,
            biomarker_score: result.biomarker_score,
            genetic_score: result.genetic_score,
            lifestyle_score: result.lifestyle_score,
            normal_biomarkers: result.biomarker_details.normal_count,
            total_biomarkers: result.biomarker_details.total_count,
            actionable_variants: result.genetic_details.actionable_count,
            protective_variants: result.genetic_details.protective_count,
            improvement_tips: result.improvement_tips,
            breakdown_json,
            tables_fingerprint: snapshot.tables_fingerprint,
            recorded_at: snapshot.recorded_at,
        })
    }
}

/// FFI-safe catalog entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCatalogEntry {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub description: String,
    pub price: f64,
    pub priority: String,
    pub evidence_level: String,
    pub wellness_goals: Vec<String>,
    pub contraindications: Vec<String>,
}

impl From<SupplementCatalogEntry> for FfiCatalogEntry {
    fn from(entry: SupplementCatalogEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name,
            dosage: entry.dosage,
            frequency: entry.frequency,
            description: entry.description,
            price: entry.price,
            priority: entry.priority.as_str().to_string(),
            evidence_level: entry.evidence_level.as_str().to_string(),
            wellness_goals: entry.wellness_goals,
            contraindications: entry.contraindications,
        }
    }
}

/// FFI-safe recommendation.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecommendation {
    pub entry: FfiCatalogEntry,
    pub score: u32,
    pub rationale: Option<String>,
}

impl From<SupplementRecommendation> for FfiRecommendation {
    fn from(rec: SupplementRecommendation) -> Self {
        Self {
            entry: rec.entry.into(),
            score: rec.score,
            rationale: rec.rationale,
        }
    }
}

/// FFI-safe recommendation outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRecommendationOutcome {
    pub recommendations: Vec<FfiRecommendation>,
    pub source: String,
    pub fallback_reason: Option<String>,
    pub total_monthly_cost: f64,
}

impl From<RecommendationOutcome> for FfiRecommendationOutcome {
    fn from(outcome: RecommendationOutcome) -> Self {
        let total_monthly_cost = outcome.recommendations.iter().map(|r| r.price()).sum();
        Self {
            recommendations: outcome.recommendations.into_iter().map(|r| r.into()).collect(),
            source: outcome.source.as_str().to_string(),
            fallback_reason: outcome.fallback_reason,
            total_monthly_cost,
        }
    }
}

/// FFI-safe supplement plan.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSupplementPlan {
    pub plan_id: String,
    pub user_id: String,
    pub items: Vec<FfiRecommendation>,
    pub total_monthly_cost: f64,
    pub source: String,
    pub created_at: String,
}

impl From<SupplementPlan> for FfiSupplementPlan {
    fn from(plan: SupplementPlan) -> Self {
        Self {
            plan_id: plan.plan_id,
            user_id: plan.user_id,
            items: plan.items.into_iter().map(|r| r.into()).collect(),
            total_monthly_cost: plan.total_monthly_cost,
            source: plan.source.as_str().to_string(),
            created_at: plan.created_at,
        }
    }
}
