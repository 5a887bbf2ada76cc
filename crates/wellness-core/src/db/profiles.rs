//! Wellness profile database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{LifestyleProfile, WellnessProfile};

impl Database {
    /// Insert a profile, or replace every field of an existing one.
    pub fn upsert_profile(&self, profile: &WellnessProfile) -> DbResult<()> {
        let considerations_json = serde_json::to_string(&profile.wellness_considerations)?;
        let sensitivities_json = serde_json::to_string(&profile.wellness_sensitivities)?;
        let lifestyle_json = serde_json::to_string(&profile.lifestyle)?;

        self.conn.execute(
            r#"
            INSERT INTO wellness_profiles (
                user_id, age, gender, wellness_considerations,
                wellness_sensitivities, monthly_budget, lifestyle
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(user_id) DO UPDATE SET
                age = excluded.age,
                gender = excluded.gender,
                wellness_considerations = excluded.wellness_considerations,
                wellness_sensitivities = excluded.wellness_sensitivities,
                monthly_budget = excluded.monthly_budget,
                lifestyle = excluded.lifestyle,
                updated_at = datetime('now')
            "#,
            params![
                profile.user_id,
                profile.age,
                profile.gender,
                considerations_json,
                sensitivities_json,
                profile.monthly_budget,
                lifestyle_json,
            ],
        )?;
        Ok(())
    }

    /// Get a profile by user ID.
    pub fn get_profile(&self, user_id: &str) -> DbResult<Option<WellnessProfile>> {
        self.conn
            .query_row(
                r#"
                SELECT user_id, age, gender, wellness_considerations,
                       wellness_sensitivities, monthly_budget, lifestyle
                FROM wellness_profiles
                WHERE user_id = ?
                "#,
                [user_id],
                |row| {
                    Ok(ProfileRow {
                        user_id: row.get(0)?,
                        age: row.get(1)?,
                        gender: row.get(2)?,
                        wellness_considerations: row.get(3)?,
                        wellness_sensitivities: row.get(4)?,
                        monthly_budget: row.get(5)?,
                        lifestyle: row.get(6)?,
                    })
                },
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Delete a profile and, by cascade, its lab data, snapshots and plans.
    pub fn delete_profile(&self, user_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM wellness_profiles WHERE user_id = ?", [user_id])?;
        Ok(rows_affected > 0)
    }
}

struct ProfileRow {
    user_id: String,
    age: u32,
    gender: String,
    wellness_considerations: String,
    wellness_sensitivities: String,
    monthly_budget: f64,
    lifestyle: String,
}

impl TryFrom<ProfileRow> for WellnessProfile {
    type Error = DbError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let lifestyle: LifestyleProfile = serde_json::from_str(&row.lifestyle)?;
        Ok(WellnessProfile {
            user_id: row.user_id,
            age: row.age,
            gender: row.gender,
            wellness_considerations: serde_json::from_str(&row.wellness_considerations)?,
            wellness_sensitivities: serde_json::from_str(&row.wellness_sensitivities)?,
            monthly_budget: row.monthly_budget,
            lifestyle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WellnessProfile {
        let mut profile = WellnessProfile::new("user-1".into(), 42, "female".into())
            .with_considerations("sleep, energy")
            .with_sensitivities("fish allergy");
        profile.monthly_budget = 60.0;
        profile.lifestyle.sleep_hours = Some(6.5);
        profile.lifestyle.dietary_pattern = Some("vegan".into());
        profile
    }

    #[test]
    fn test_insert_and_get_profile() {
        let db = Database::open_in_memory().unwrap();
        let profile = sample();
        db.upsert_profile(&profile).unwrap();

        let loaded = db.get_profile("user-1").unwrap().unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_upsert_replaces_fields() {
        let db = Database::open_in_memory().unwrap();
        let mut profile = sample();
        db.upsert_profile(&profile).unwrap();

        profile.age = 43;
        profile.wellness_sensitivities.clear();
        db.upsert_profile(&profile).unwrap();

        let loaded = db.get_profile("user-1").unwrap().unwrap();
        assert_eq!(loaded.age, 43);
        assert!(loaded.wellness_sensitivities.is_empty());
    }

    #[test]
    fn test_missing_profile() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_profile("nobody").unwrap().is_none());
        assert!(!db.delete_profile("nobody").unwrap());
    }
}
