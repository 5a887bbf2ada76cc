//! Keyed lookup tables with neutral defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::GeneticVariantRecord;

/// Table lookup with a caller-supplied default.
///
/// Scoring code only ever asks "what is the value for this key, or the
/// neutral default", so tables can be swapped without touching the scorer.
pub trait Lookup<K: ?Sized> {
    type Value: Copy;

    /// Value for `key`, if the table has one.
    fn lookup(&self, key: &K) -> Option<Self::Value>;

    /// Value for `key`, or `default` when the key is absent or unknown.
    fn lookup_or(&self, key: Option<&K>, default: Self::Value) -> Self::Value {
        key.and_then(|k| self.lookup(k)).unwrap_or(default)
    }
}

/// Canonical form of a categorical answer: lowercase, `_`/`-` as spaces,
/// single-spaced.
pub fn normalize_key(raw: &str) -> String {
    raw.to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Canonical genotype form: lowercase, no whitespace, `ε` spelled `e`.
pub fn normalize_genotype(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .map(|c| if c == 'ε' { 'e' } else { c })
        .collect()
}

/// Canonical gene symbol form: uppercase, trimmed.
pub fn normalize_gene(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Categorical answer → 0..=100 score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct CategoryTable {
    entries: BTreeMap<String, u32>,
}

impl From<BTreeMap<String, u32>> for CategoryTable {
    fn from(raw: BTreeMap<String, u32>) -> Self {
        Self {
            entries: raw
                .into_iter()
                .map(|(k, v)| (normalize_key(&k), v))
                .collect(),
        }
    }
}

impl From<CategoryTable> for BTreeMap<String, u32> {
    fn from(table: CategoryTable) -> Self {
        table.entries
    }
}

impl CategoryTable {
    /// Add or replace an entry.
    pub fn insert(&mut self, key: &str, score: u32) {
        self.entries.insert(normalize_key(key), score);
    }

    pub(crate) fn max_value(&self) -> Option<u32> {
        self.entries.values().copied().max()
    }
}

impl Lookup<str> for CategoryTable {
    type Value = u32;

    fn lookup(&self, key: &str) -> Option<u32> {
        self.entries.get(&normalize_key(key)).copied()
    }
}

/// Gene → genotype → impact in [-1, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, BTreeMap<String, f64>>",
    into = "BTreeMap<String, BTreeMap<String, f64>>"
)]
pub struct GeneImpactTable {
    genes: BTreeMap<String, BTreeMap<String, f64>>,
}

impl From<BTreeMap<String, BTreeMap<String, f64>>> for GeneImpactTable {
    fn from(raw: BTreeMap<String, BTreeMap<String, f64>>) -> Self {
        Self {
            genes: raw
                .into_iter()
                .map(|(gene, genotypes)| {
                    let genotypes = genotypes
                        .into_iter()
                        .map(|(g, impact)| (normalize_genotype(&g), impact))
                        .collect();
                    (normalize_gene(&gene), genotypes)
                })
                .collect(),
        }
    }
}

impl From<GeneImpactTable> for BTreeMap<String, BTreeMap<String, f64>> {
    fn from(table: GeneImpactTable) -> Self {
        table.genes
    }
}

impl GeneImpactTable {
    /// Add or replace the impact of one genotype.
    pub fn insert(&mut self, gene: &str, genotype: &str, impact: f64) {
        self.genes
            .entry(normalize_gene(gene))
            .or_default()
            .insert(normalize_genotype(genotype), impact);
    }

    /// Impact of a gene/genotype pair, 0 when unknown.
    pub fn impact(&self, gene: &str, genotype: &str) -> f64 {
        self.genes
            .get(&normalize_gene(gene))
            .and_then(|g| g.get(&normalize_genotype(genotype)))
            .copied()
            .unwrap_or(0.0)
    }

    pub(crate) fn impacts(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.genes.iter().flat_map(|(gene, genotypes)| {
            genotypes
                .iter()
                .map(move |(genotype, impact)| (gene.as_str(), genotype.as_str(), *impact))
        })
    }
}

impl Lookup<GeneticVariantRecord> for GeneImpactTable {
    type Value = f64;

    fn lookup(&self, variant: &GeneticVariantRecord) -> Option<f64> {
        self.genes
            .get(&normalize_gene(&variant.gene))
            .and_then(|g| g.get(&normalize_genotype(&variant.genotype)))
            .copied()
    }
}
