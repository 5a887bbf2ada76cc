//! Lookup tables that drive scoring and recommendation.
//!
//! Every table is a JSON document. Defaults are compiled in from `data/`,
//! and any of them can be replaced at runtime from a directory:
//!
//! | File                      | Contents                                  |
//! |---------------------------|-------------------------------------------|
//! | `gene_impacts.json`       | gene → genotype → impact in [-1, 1]       |
//! | `lifestyle_scores.json`   | diet/activity/stress/smoking/alcohol      |
//! | `tips.json`               | biomarker, gene and lifestyle tip text    |
//! | `supplement_catalog.json` | recommendation catalog                    |

mod lookup;
mod tips;

pub use lookup::*;
pub use tips::*;

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::models::SupplementCatalogEntry;

pub const GENE_IMPACTS_FILE: &str = "gene_impacts.json";
pub const LIFESTYLE_SCORES_FILE: &str = "lifestyle_scores.json";
pub const TIPS_FILE: &str = "tips.json";
pub const CATALOG_FILE: &str = "supplement_catalog.json";

const EMBEDDED_GENE_IMPACTS: &str = include_str!("../../data/gene_impacts.json");
const EMBEDDED_LIFESTYLE_SCORES: &str = include_str!("../../data/lifestyle_scores.json");
const EMBEDDED_TIPS: &str = include_str!("../../data/tips.json");
const EMBEDDED_CATALOG: &str = include_str!("../../data/supplement_catalog.json");

/// Table loading errors.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid table {file}: {reason}")]
    Invalid { file: String, reason: String },
}

pub type TableResult<T> = Result<T, TableError>;

/// Lifestyle answer → score tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleTables {
    pub diet: CategoryTable,
    pub activity: CategoryTable,
    pub stress: CategoryTable,
    pub smoking: CategoryTable,
    pub alcohol: CategoryTable,
}

/// The full set of tables used by one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringTables {
    pub gene_impacts: GeneImpactTable,
    pub lifestyle: LifestyleTables,
    pub tips: TipTables,
    pub catalog: Vec<SupplementCatalogEntry>,
}

impl ScoringTables {
    /// Parse the compiled-in tables.
    pub fn embedded() -> TableResult<Self> {
        let tables = Self {
            gene_impacts: parse(GENE_IMPACTS_FILE, EMBEDDED_GENE_IMPACTS)?,
            lifestyle: parse(LIFESTYLE_SCORES_FILE, EMBEDDED_LIFESTYLE_SCORES)?,
            tips: parse(TIPS_FILE, EMBEDDED_TIPS)?,
            catalog: parse(CATALOG_FILE, EMBEDDED_CATALOG)?,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Shared copy of the compiled-in tables.
    ///
    /// # Panics
    ///
    /// Panics if the compiled-in tables fail to parse or validate. Use
    /// [`ScoringTables::embedded`] to get the error instead.
    pub fn builtin() -> &'static ScoringTables {
        static BUILTIN: OnceLock<ScoringTables> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::embedded().expect("embedded tables are valid"))
    }

    /// Load tables from a directory. Files that are absent keep the embedded default.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> TableResult<Self> {
        let dir = dir.as_ref();
        let mut tables = Self::embedded()?;

        if let Some(t) = read_optional(dir, GENE_IMPACTS_FILE)? {
            tables.gene_impacts = t;
        }
        if let Some(t) = read_optional(dir, LIFESTYLE_SCORES_FILE)? {
            tables.lifestyle = t;
        }
        if let Some(t) = read_optional(dir, TIPS_FILE)? {
            tables.tips = t;
        }
        if let Some(t) = read_optional(dir, CATALOG_FILE)? {
            tables.catalog = t;
        }

        tables.validate()?;
        log::info!(
            "Loaded scoring tables from {} (fingerprint {})",
            dir.display(),
            tables.fingerprint()
        );
        Ok(tables)
    }

    /// Check value ranges and catalog id uniqueness.
    pub fn validate(&self) -> TableResult<()> {
        for (gene, genotype, impact) in self.gene_impacts.impacts() {
            if !(-1.0..=1.0).contains(&impact) {
                return Err(invalid(
                    GENE_IMPACTS_FILE,
                    format!("impact {} for {} {} is outside [-1, 1]", impact, gene, genotype),
                ));
            }
        }

        let categories = [
            ("diet", &self.lifestyle.diet),
            ("activity", &self.lifestyle.activity),
            ("stress", &self.lifestyle.stress),
            ("smoking", &self.lifestyle.smoking),
            ("alcohol", &self.lifestyle.alcohol),
        ];
        for (name, table) in categories {
            if table.max_value().is_some_and(|v| v > 100) {
                return Err(invalid(
                    LIFESTYLE_SCORES_FILE,
                    format!("{} scores must be within 0-100", name),
                ));
            }
        }

        let mut ids = HashSet::new();
        for entry in &self.catalog {
            if !ids.insert(entry.id.as_str()) {
                return Err(invalid(CATALOG_FILE, format!("duplicate id {}", entry.id)));
            }
            if !entry.price.is_finite() || entry.price < 0.0 {
                return Err(invalid(
                    CATALOG_FILE,
                    format!("price for {} must be a non-negative number", entry.id),
                ));
            }
        }

        Ok(())
    }

    /// SHA-256 hex digest of the canonical JSON form of every table.
    pub fn fingerprint(&self) -> String {
        // BTreeMap-backed tables serialize in key order, so the digest is stable.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&canonical))
    }

    /// Look up a catalog entry by id.
    pub fn catalog_entry(&self, id: &str) -> Option<&SupplementCatalogEntry> {
        self.catalog.iter().find(|e| e.id == id)
    }
}

fn parse<T: DeserializeOwned>(file: &str, json: &str) -> TableResult<T> {
    serde_json::from_str(json).map_err(|source| TableError::Json {
        file: file.to_string(),
        source,
    })
}

fn read_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> TableResult<Option<T>> {
    let path = dir.join(file);
    if !path.exists() {
        log::debug!("{} not found, using embedded default", path.display());
        return Ok(None);
    }
    let json = std::fs::read_to_string(&path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse(file, &json).map(Some)
}

fn invalid(file: &str, reason: String) -> TableError {
    TableError::Invalid {
        file: file.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_tables_parse() {
        let tables = ScoringTables::embedded().unwrap();
        assert_eq!(tables.catalog.len(), 8);
        assert_eq!(tables.gene_impacts.impact("MTHFR", "C677T"), -0.5);
        assert_eq!(tables.lifestyle.diet.lookup("mediterranean"), Some(90));
        assert_eq!(tables.lifestyle.stress.lookup("low"), Some(80));
        assert!(tables.tips.genes.contains_key("APOE"));
    }

    #[test]
    fn test_builtin_matches_embedded() {
        let embedded = ScoringTables::embedded().unwrap();
        assert_eq!(ScoringTables::builtin().fingerprint(), embedded.fingerprint());
    }

    #[test]
    fn test_fingerprint_is_stable_and_sensitive() {
        let a = ScoringTables::embedded().unwrap();
        let mut b = ScoringTables::embedded().unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);

        b.lifestyle.diet.insert("carnivore", 35);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_validate_rejects_out_of_range_impact() {
        let mut tables = ScoringTables::embedded().unwrap();
        tables.gene_impacts.insert("MTHFR", "C677T", -1.5);
        assert!(matches!(tables.validate(), Err(TableError::Invalid { .. })));
    }

    #[test]
    fn test_validate_rejects_duplicate_catalog_id() {
        let mut tables = ScoringTables::embedded().unwrap();
        let dup = tables.catalog[0].clone();
        tables.catalog.push(dup);
        assert!(matches!(tables.validate(), Err(TableError::Invalid { .. })));
    }

    #[test]
    fn test_load_dir_overrides_present_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(GENE_IMPACTS_FILE),
            r#"{"BRCA1": {"185delAG": -1.0}}"#,
        )
        .unwrap();

        let tables = ScoringTables::load_dir(dir.path()).unwrap();
        assert_eq!(tables.gene_impacts.impact("BRCA1", "185delAG"), -1.0);
        // Replaced wholesale, not merged
        assert_eq!(tables.gene_impacts.impact("MTHFR", "C677T"), 0.0);
        // Untouched tables keep defaults
        assert_eq!(tables.catalog.len(), 8);
    }

    #[test]
    fn test_load_dir_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CATALOG_FILE), "[{").unwrap();

        let err = ScoringTables::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, TableError::Json { ref file, .. } if file == CATALOG_FILE));
    }
}
