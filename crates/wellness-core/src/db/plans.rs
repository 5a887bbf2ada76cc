//! Supplement plan database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{RecommendationSource, SupplementPlan};

impl Database {
    /// Save a plan.
    pub fn insert_plan(&self, plan: &SupplementPlan) -> DbResult<()> {
        let items_json = serde_json::to_string(&plan.items)?;

        self.conn.execute(
            r#"
            INSERT INTO supplement_plans (
                plan_id, user_id, items, total_monthly_cost, source, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                plan.plan_id,
                plan.user_id,
                items_json,
                plan.total_monthly_cost,
                plan.source.as_str(),
                plan.created_at,
            ],
        )?;
        Ok(())
    }

    /// Most recently created plan for a user.
    pub fn latest_plan(&self, user_id: &str) -> DbResult<Option<SupplementPlan>> {
        self.conn
            .query_row(
                r#"
                SELECT plan_id, user_id, items, total_monthly_cost, source, created_at
                FROM supplement_plans
                WHERE user_id = ?
                ORDER BY created_at DESC, rowid DESC
                LIMIT 1
                "#,
                [user_id],
                |row| {
                    Ok(PlanRow {
                        plan_id: row.get(0)?,
                        user_id: row.get(1)?,
                        items: row.get(2)?,
                        total_monthly_cost: row.get(3)?,
                        source: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }
}

struct PlanRow {
    plan_id: String,
    user_id: String,
    items: String,
    total_monthly_cost: f64,
    source: String,
    created_at: String,
}

impl TryFrom<PlanRow> for SupplementPlan {
    type Error = DbError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let source = RecommendationSource::parse(&row.source)
            .ok_or_else(|| DbError::Constraint(format!("unknown plan source: {}", row.source)))?;
        Ok(SupplementPlan {
            plan_id: row.plan_id,
            user_id: row.user_id,
            items: serde_json::from_str(&row.items)?,
            total_monthly_cost: row.total_monthly_cost,
            source,
            created_at: row.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecommenderConfig;
    use crate::models::WellnessProfile;
    use crate::recommender::Recommender;
    use crate::tables::ScoringTables;

    #[test]
    fn test_insert_and_latest_plan() {
        let db = Database::open_in_memory().unwrap();
        let profile = WellnessProfile::new("user-1".into(), 60, "male".into()).with_considerations("sleep");
        db.upsert_profile(&profile).unwrap();
        assert!(db.latest_plan("user-1").unwrap().is_none());

        let tables = ScoringTables::embedded().unwrap();
        let config = RecommenderConfig::default();
        let items = Recommender::new(&config).recommend(&profile, &tables.catalog);

        let mut older = SupplementPlan::new("user-1".into(), vec![], RecommendationSource::External);
        older.created_at = "2024-01-01T00:00:00+00:00".into();
        let plan = SupplementPlan::new("user-1".into(), items, RecommendationSource::Deterministic);
        db.insert_plan(&older).unwrap();
        db.insert_plan(&plan).unwrap();

        let loaded = db.latest_plan("user-1").unwrap().unwrap();
        assert_eq!(loaded, plan);
        assert!(!loaded.items.is_empty());
    }

    #[test]
    fn test_plan_source_is_checked() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_profile(&WellnessProfile::new("user-1".into(), 30, "male".into()))
            .unwrap();
        let result = db.conn().execute(
            "INSERT INTO supplement_plans (plan_id, user_id, total_monthly_cost, source, created_at) \
             VALUES ('p1', 'user-1', 0, 'oracle', '2024-01-01T00:00:00+00:00')",
            [],
        );
        assert!(result.is_err());
    }
}
