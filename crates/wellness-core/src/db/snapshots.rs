//! Health score snapshot database operations (append-only).

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{HealthScoreResult, HealthScoreSnapshot};

const SNAPSHOT_COLUMNS: &str = "id, user_id, breakdown, tables_fingerprint, recorded_at";

impl Database {
    /// Append a scoring run. Existing snapshots are never modified.
    pub fn insert_snapshot(&self, snapshot: &HealthScoreSnapshot) -> DbResult<()> {
        let result = &snapshot.result;
        let breakdown_json = serde_json::to_string(result)?;
        let tips_json = serde_json::to_string(&result.improvement_tips)?;

        self.conn.execute(
            r#"
            INSERT INTO health_score_snapshots (
                id, user_id, total_score, biomarker_score, genetic_score,
                lifestyle_score, breakdown, improvement_tips,
                tables_fingerprint, recorded_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                snapshot.id,
                snapshot.user_id,
                result.total_score,
                result.biomarker_score,
                result.genetic_score,
                result.lifestyle_score,
                breakdown_json,
                tips_json,
                snapshot.tables_fingerprint,
                snapshot.recorded_at,
            ],
        )?;
        Ok(())
    }

    /// Most recent snapshot for a user.
    pub fn latest_snapshot(&self, user_id: &str) -> DbResult<Option<HealthScoreSnapshot>> {
        let sql = format!(
            "SELECT {} FROM health_score_snapshots WHERE user_id = ? \
             ORDER BY recorded_at DESC, rowid DESC LIMIT 1",
            SNAPSHOT_COLUMNS
        );
        self.conn
            .query_row(&sql, [user_id], snapshot_row)
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// Up to `limit` snapshots for a user, newest first.
    pub fn list_snapshots(&self, user_id: &str, limit: u32) -> DbResult<Vec<HealthScoreSnapshot>> {
        let sql = format!(
            "SELECT {} FROM health_score_snapshots WHERE user_id = ?1 \
             ORDER BY recorded_at DESC, rowid DESC LIMIT ?2",
            SNAPSHOT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, limit], snapshot_row)?;

        let mut snapshots = Vec::new();
        for row in rows {
            snapshots.push(row?.try_into()?);
        }
        Ok(snapshots)
    }
}

struct SnapshotRow {
    id: String,
    user_id: String,
    breakdown: String,
    tables_fingerprint: String,
    recorded_at: String,
}

fn snapshot_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SnapshotRow> {
    Ok(SnapshotRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        breakdown: row.get(2)?,
        tables_fingerprint: row.get(3)?,
        recorded_at: row.get(4)?,
    })
}

impl TryFrom<SnapshotRow> for HealthScoreSnapshot {
    type Error = DbError;

    fn try_from(row: SnapshotRow) -> Result<Self, Self::Error> {
        let result: HealthScoreResult = serde_json::from_str(&row.breakdown)?;
        Ok(HealthScoreSnapshot {
            id: row.id,
            user_id: row.user_id,
            result,
            tables_fingerprint: row.tables_fingerprint,
            recorded_at: row.recorded_at,
        })
    }
}
