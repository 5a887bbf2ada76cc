//! Improvement tip tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;

use super::lookup::{normalize_gene, normalize_key};
use crate::models::BiomarkerStatus;

/// Minimum Jaro-Winkler similarity for a misspelled marker name to use a rule.
const MARKER_SIMILARITY_THRESHOLD: f64 = 0.92;

/// All tip text used by the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipTables {
    /// Marker rules, most specific first (e.g., "ldl" before "cholesterol")
    pub biomarkers: Vec<BiomarkerTipRule>,
    /// Template for markers without a rule; `{marker}` and `{status}` are substituted
    pub biomarker_fallback: String,
    /// Gene symbol → tip for negative-impact variants
    pub genes: BTreeMap<String, String>,
    /// Template for genes without a tip; `{gene}` is substituted. `None` skips them.
    #[serde(default)]
    pub gene_fallback: Option<String>,
    pub lifestyle: LifestyleTips,
}

/// Tip text for one marker, per direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomarkerTipRule {
    /// Marker key, matched against the normalized record name
    pub marker: String,
    #[serde(default)]
    pub low: Option<String>,
    #[serde(default)]
    pub high: Option<String>,
}

/// One fixed tip per lifestyle factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifestyleTips {
    pub sleep: String,
    pub diet: String,
    pub exercise: String,
    pub stress: String,
    pub smoking: String,
    pub alcohol: String,
}

impl BiomarkerTipRule {
    fn tip_for(&self, status: BiomarkerStatus) -> Option<&str> {
        match status {
            BiomarkerStatus::Low => self.low.as_deref(),
            BiomarkerStatus::High => self.high.as_deref(),
            BiomarkerStatus::Normal => None,
        }
    }
}

impl TipTables {
    /// Find the rule for a marker name.
    ///
    /// Tries an exact key, then the first rule whose key appears inside the
    /// name ("Vitamin D, 25-OH" → "vitamin d"), then the closest key by
    /// Jaro-Winkler to absorb typos in all but the last word.
    pub fn find_biomarker_rule(&self, marker_name: &str) -> Option<&BiomarkerTipRule> {
        let name = normalize_key(marker_name);
        if name.is_empty() {
            return None;
        }

        if let Some(rule) = self
            .biomarkers
            .iter()
            .find(|r| normalize_key(&r.marker) == name)
        {
            return Some(rule);
        }

        if let Some(rule) = self
            .biomarkers
            .iter()
            .find(|r| name.contains(&normalize_key(&r.marker)))
        {
            return Some(rule);
        }

        self.biomarkers
            .iter()
            .filter_map(|r| marker_similarity(&name, &normalize_key(&r.marker)).map(|sim| (r, sim)))
            .filter(|(_, similarity)| *similarity >= MARKER_SIMILARITY_THRESHOLD)
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(r, _)| r)
    }

    /// Tip for an out-of-range marker.
    pub fn biomarker_tip(&self, marker_name: &str, status: BiomarkerStatus) -> String {
        self.find_biomarker_rule(marker_name)
            .and_then(|rule| rule.tip_for(status))
            .map(String::from)
            .unwrap_or_else(|| {
                self.biomarker_fallback
                    .replace("{marker}", marker_name)
                    .replace("{status}", status.as_str())
            })
    }

    /// Tip for a negative-impact variant, if any.
    pub fn gene_tip(&self, gene: &str) -> Option<String> {
        let symbol = normalize_gene(gene);
        self.genes
            .iter()
            .find(|(key, _)| normalize_gene(key) == symbol)
            .map(|(_, tip)| tip.clone())
            .or_else(|| {
                self.gene_fallback
                    .as_ref()
                    .map(|template| template.replace("{gene}", gene.trim()))
            })
    }
}

/// Jaro-Winkler similarity of two normalized marker names.
///
/// Multi-word names must agree on word count and on the last word, which
/// carries the distinction between "vitamin d" and "vitamin c". Only the
/// leading words may differ by a typo.
fn marker_similarity(name: &str, key: &str) -> Option<f64> {
    let name_words: Vec<&str> = name.split(' ').collect();
    let key_words: Vec<&str> = key.split(' ').collect();
    if name_words.len() != key_words.len() {
        return None;
    }
    if key_words.len() > 1 && name_words.last() != key_words.last() {
        return None;
    }
    Some(jaro_winkler(name, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tables() -> TipTables {
        TipTables {
            biomarkers: vec![
                BiomarkerTipRule {
                    marker: "vitamin d".into(),
                    low: Some("get sun".into()),
                    high: None,
                },
                BiomarkerTipRule {
                    marker: "hdl".into(),
                    low: Some("raise hdl".into()),
                    high: None,
                },
                BiomarkerTipRule {
                    marker: "cholesterol".into(),
                    low: None,
                    high: Some("lower cholesterol".into()),
                },
            ],
            biomarker_fallback: "{marker} is {status}".into(),
            genes: BTreeMap::from([("MTHFR".to_string(), "methylfolate".to_string())]),
            gene_fallback: None,
            lifestyle: LifestyleTips {
                sleep: "sleep".into(),
                diet: "diet".into(),
                exercise: "exercise".into(),
                stress: "stress".into(),
                smoking: "smoking".into(),
                alcohol: "alcohol".into(),
            },
        }
    }

    #[test]
    fn test_exact_and_contained_rules() {
        let tips = tables();
        assert_eq!(tips.biomarker_tip("Vitamin D", BiomarkerStatus::Low), "get sun");
        assert_eq!(
            tips.biomarker_tip("Vitamin D, 25-Hydroxy", BiomarkerStatus::Low),
            "get sun"
        );
        // Specific rule listed first wins over the generic one
        assert_eq!(tips.biomarker_tip("HDL Cholesterol", BiomarkerStatus::Low), "raise hdl");
        assert_eq!(
            tips.biomarker_tip("Total Cholesterol", BiomarkerStatus::High),
            "lower cholesterol"
        );
    }

    #[test]
    fn test_typo_uses_similar_rule() {
        let tips = tables();
        assert_eq!(tips.biomarker_tip("Vitamn D", BiomarkerStatus::Low), "get sun");
    }

    #[test]
    fn test_fallback_for_unmapped_marker_or_direction() {
        let tips = tables();
        assert_eq!(tips.biomarker_tip("Zinc", BiomarkerStatus::Low), "Zinc is low");
        // Rule exists but has no "high" text
        assert_eq!(
            tips.biomarker_tip("Vitamin D", BiomarkerStatus::High),
            "Vitamin D is high"
        );
    }

    #[test]
    fn test_sibling_markers_use_fallback() {
        let tips = tables();
        assert_eq!(tips.biomarker_tip("Vitamin C", BiomarkerStatus::Low), "Vitamin C is low");
        assert_eq!(tips.biomarker_tip("Vitamin A", BiomarkerStatus::Low), "Vitamin A is low");
        assert!(tips.find_biomarker_rule("Vitamin K").is_none());
    }

    #[test]
    fn test_builtin_sibling_markers_use_fallback() {
        let tables = crate::tables::ScoringTables::embedded().unwrap();
        let tips = &tables.tips;
        for name in ["Vitamin A", "Vitamin C", "Vitamin E", "Vitamin K", "Vitamin B6"] {
            let expected = tips
                .biomarker_fallback
                .replace("{marker}", name)
                .replace("{status}", "low");
            assert_eq!(tips.biomarker_tip(name, BiomarkerStatus::Low), expected, "{}", name);
        }
        assert!(tips
            .biomarker_tip("Vitamin D", BiomarkerStatus::Low)
            .contains("vitamin D3"));
    }

    #[test]
    fn test_gene_tip() {
        let mut tips = tables();
        assert_eq!(tips.gene_tip("mthfr"), Some("methylfolate".to_string()));
        assert_eq!(tips.gene_tip("FTO"), None);

        tips.gene_fallback = Some("check {gene}".into());
        assert_eq!(tips.gene_tip("FTO"), Some("check FTO".to_string()));
    }
}
