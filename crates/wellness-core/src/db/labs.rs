//! Biomarker and genetic variant database operations.

use rusqlite::params;

use super::{parse_timestamp, Database, DbError, DbResult};
use crate::models::{BiomarkerRecord, GeneticVariantRecord};

impl Database {
    /// Append one lab result for a user.
    ///
    /// Results are never overwritten; repeated draws of the same marker are
    /// kept and deduplicated at scoring time.
    pub fn insert_biomarker(&self, user_id: &str, record: &BiomarkerRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO biomarker_results (
                user_id, biomarker_name, biomarker_value, unit,
                measurement_date, normal_range_low, normal_range_high
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                user_id,
                record.biomarker_name,
                record.biomarker_value,
                record.unit,
                record.measurement_date.to_rfc3339(),
                record.normal_range_low,
                record.normal_range_high,
            ],
        )?;
        Ok(())
    }

    /// List every lab result for a user in insertion order.
    pub fn list_biomarkers(&self, user_id: &str) -> DbResult<Vec<BiomarkerRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT biomarker_name, biomarker_value, unit, measurement_date,
                   normal_range_low, normal_range_high
            FROM biomarker_results
            WHERE user_id = ?
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([user_id], |row| {
            Ok(BiomarkerRow {
                biomarker_name: row.get(0)?,
                biomarker_value: row.get(1)?,
                unit: row.get(2)?,
                measurement_date: row.get(3)?,
                normal_range_low: row.get(4)?,
                normal_range_high: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }

    /// Append one reported genotype for a user.
    pub fn insert_genetic_variant(&self, user_id: &str, variant: &GeneticVariantRecord) -> DbResult<()> {
        self.conn.execute(
            "INSERT INTO genetic_variants (user_id, gene, genotype, rsid) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, variant.gene, variant.genotype, variant.rsid],
        )?;
        Ok(())
    }

    /// List every reported genotype for a user in insertion order.
    pub fn list_genetic_variants(&self, user_id: &str) -> DbResult<Vec<GeneticVariantRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT gene, genotype, rsid FROM genetic_variants WHERE user_id = ? ORDER BY id",
        )?;

        let variants = stmt
            .query_map([user_id], |row| {
                Ok(GeneticVariantRecord {
                    gene: row.get(0)?,
                    genotype: row.get(1)?,
                    rsid: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(variants)
    }
}

struct BiomarkerRow {
    biomarker_name: String,
    biomarker_value: f64,
    unit: Option<String>,
    measurement_date: String,
    normal_range_low: Option<f64>,
    normal_range_high: Option<f64>,
}

impl TryFrom<BiomarkerRow> for BiomarkerRecord {
    type Error = DbError;

    fn try_from(row: BiomarkerRow) -> Result<Self, Self::Error> {
        Ok(BiomarkerRecord {
            biomarker_name: row.biomarker_name,
            biomarker_value: row.biomarker_value,
            unit: row.unit,
            measurement_date: parse_timestamp(&row.measurement_date)?,
            normal_range_low: row.normal_range_low,
            normal_range_high: row.normal_range_high,
        })
    }
}
