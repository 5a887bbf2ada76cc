//! Genetic variant models.

use serde::{Deserialize, Serialize};

/// A reported genotype for one gene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneticVariantRecord {
    /// Gene symbol (e.g., "MTHFR")
    pub gene: String,
    /// Reported genotype (e.g., "C677T", "e3/e4")
    pub genotype: String,
    /// dbSNP identifier when the source provides one
    #[serde(default)]
    pub rsid: Option<String>,
}

impl GeneticVariantRecord {
    pub fn new(gene: impl Into<String>, genotype: impl Into<String>) -> Self {
        Self {
            gene: gene.into(),
            genotype: genotype.into(),
            rsid: None,
        }
    }
}
