//! Service layer: loads rows from the store, runs the scorer or the
//! recommender, and persists the results.

use thiserror::Error;

use crate::config::EngineConfig;
use crate::db::{Database, DbError};
use crate::models::{HealthScoreSnapshot, SupplementPlan, WellnessProfile};
use crate::recommender::{recommend_with_fallback, ExternalRecommender, RecommendationOutcome, Recommender};
use crate::scoring::HealthScorer;
use crate::tables::ScoringTables;

/// Service errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("No wellness profile for user {0}")]
    ProfileNotFound(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Runs scoring and recommendation for stored users.
pub struct WellnessService<'a> {
    db: &'a Database,
    tables: &'a ScoringTables,
    config: &'a EngineConfig,
}

impl<'a> WellnessService<'a> {
    /// Create a new service.
    pub fn new(db: &'a Database, tables: &'a ScoringTables, config: &'a EngineConfig) -> Self {
        Self { db, tables, config }
    }

    fn load_profile(&self, user_id: &str) -> ServiceResult<WellnessProfile> {
        self.db
            .get_profile(user_id)?
            .ok_or_else(|| ServiceError::ProfileNotFound(user_id.to_string()))
    }

    /// Score a user from stored data and append the result as a snapshot.
    pub fn score_user(&self, user_id: &str) -> ServiceResult<HealthScoreSnapshot> {
        let profile = self.load_profile(user_id)?;
        let biomarkers = self.db.list_biomarkers(user_id)?;
        let genetics = self.db.list_genetic_variants(user_id)?;

        let result = HealthScorer::new(self.tables, &self.config.scoring).score(&profile, &biomarkers, &genetics);
        let snapshot = HealthScoreSnapshot::new(user_id.to_string(), result, self.tables.fingerprint());
        self.db.insert_snapshot(&snapshot)?;

        log::info!(
            "Recorded health score {} for {} ({} biomarkers, {} variants)",
            snapshot.result.total_score,
            user_id,
            biomarkers.len(),
            genetics.len()
        );
        Ok(snapshot)
    }

    /// Recommend supplements for a stored user, trying `external` first.
    pub fn recommend_for_user(
        &self,
        user_id: &str,
        external: Option<&dyn ExternalRecommender>,
    ) -> ServiceResult<RecommendationOutcome> {
        let profile = self.load_profile(user_id)?;
        let recommender = Recommender::new(&self.config.recommender);
        Ok(recommend_with_fallback(&recommender, external, &profile, &self.tables.catalog))
    }

    /// Persist an outcome as the user's current plan.
    pub fn save_plan(&self, user_id: &str, outcome: &RecommendationOutcome) -> ServiceResult<SupplementPlan> {
        // Plans reference the profile row, so check it exists for a clear error
        self.load_profile(user_id)?;

        let plan = SupplementPlan::new(user_id.to_string(), outcome.recommendations.clone(), outcome.source);
        self.db.insert_plan(&plan)?;

        log::info!(
            "Saved {} plan {} for {} ({} items, ${:.2}/month)",
            plan.source.as_str(),
            plan.plan_id,
            user_id,
            plan.items.len(),
            plan.total_monthly_cost
        );
        Ok(plan)
    }

    /// Up to `limit` past scores, newest first.
    pub fn score_history(&self, user_id: &str, limit: u32) -> ServiceResult<Vec<HealthScoreSnapshot>> {
        Ok(self.db.list_snapshots(user_id, limit)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BiomarkerRecord, RecommendationSource};
    use chrono::{TimeZone, Utc};

    fn setup() -> (Database, ScoringTables, EngineConfig) {
        let db = Database::open_in_memory().unwrap();
        let profile = WellnessProfile::new("user-1".into(), 60, "male".into()).with_considerations("sleep");
        db.upsert_profile(&profile).unwrap();
        (db, ScoringTables::embedded().unwrap(), EngineConfig::default())
    }

    #[test]
    fn test_score_user_persists_snapshot() {
        let (db, tables, config) = setup();
        let date = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        db.insert_biomarker(
            "user-1",
            &BiomarkerRecord::new("Glucose", 85.0, date).with_range(Some(70.0), Some(99.0)),
        )
        .unwrap();

        let service = WellnessService::new(&db, &tables, &config);
        let snapshot = service.score_user("user-1").unwrap();
        assert_eq!(snapshot.result.biomarker_score, 100);
        assert_eq!(snapshot.tables_fingerprint, tables.fingerprint());

        let latest = db.latest_snapshot("user-1").unwrap().unwrap();
        assert_eq!(latest, snapshot);
    }

    #[test]
    fn test_missing_profile_is_typed_error() {
        let (db, tables, config) = setup();
        let service = WellnessService::new(&db, &tables, &config);

        assert!(matches!(
            service.score_user("ghost"),
            Err(ServiceError::ProfileNotFound(id)) if id == "ghost"
        ));
        assert!(matches!(
            service.recommend_for_user("ghost", None),
            Err(ServiceError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_recommend_and_save_plan() {
        let (db, tables, config) = setup();
        let service = WellnessService::new(&db, &tables, &config);

        let outcome = service.recommend_for_user("user-1", None).unwrap();
        assert_eq!(outcome.source, RecommendationSource::Deterministic);
        assert_eq!(outcome.recommendations[0].id(), "magnesium");

        let plan = service.save_plan("user-1", &outcome).unwrap();
        assert_eq!(plan.items, outcome.recommendations);
        assert_eq!(db.latest_plan("user-1").unwrap().unwrap(), plan);
    }

    #[test]
    fn test_score_history_is_append_only() {
        let (db, tables, config) = setup();
        let service = WellnessService::new(&db, &tables, &config);

        service.score_user("user-1").unwrap();
        service.score_user("user-1").unwrap();
        assert_eq!(service.score_history("user-1", 10).unwrap().len(), 2);
        assert_eq!(service.score_history("user-1", 1).unwrap().len(), 1);
    }
}
