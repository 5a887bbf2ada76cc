//! Genetic sub-score.

use crate::models::{GeneticDetails, GeneticVariantRecord, VariantImpact};
use crate::tables::{GeneImpactTable, Lookup};

/// Map the summed impact from `[-max, +max]` onto `[0, 100]`,
/// where `max` is the sum of absolute impacts.
///
/// Returns `neutral` when there are no variants or all are neutral.
pub fn score_genetics(
    table: &GeneImpactTable,
    variants: &[GeneticVariantRecord],
    neutral: u32,
) -> (u32, GeneticDetails) {
    let mut details = GeneticDetails::default();
    let mut total_impact = 0.0;
    let mut max_possible_impact = 0.0;

    for variant in variants {
        let impact = table.lookup_or(Some(variant), 0.0);
        total_impact += impact;
        max_possible_impact += f64::abs(impact);

        if impact < 0.0 {
            details.actionable_count += 1;
        } else if impact > 0.0 {
            details.protective_count += 1;
        }

        details.variants.push(VariantImpact {
            gene: variant.gene.clone(),
            genotype: variant.genotype.clone(),
            impact,
        });
    }

    let score = if max_possible_impact > 0.0 {
        let scaled = 100.0 * (total_impact + max_possible_impact) / (2.0 * max_possible_impact);
        scaled.round().clamp(0.0, 100.0) as u32
    } else {
        neutral
    };

    (score, details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> GeneImpactTable {
        let mut t = GeneImpactTable::default();
        t.insert("MTHFR", "C677T", -0.5);
        t.insert("APOE", "e4/e4", -1.0);
        t.insert("ACTN3", "RR", 1.0);
        t.insert("SOD2", "Ala/Ala", 0.3);
        t.insert("APOE", "e3/e3", 0.0);
        t
    }

    #[test]
    fn test_no_variants_is_neutral() {
        assert_eq!(score_genetics(&table(), &[], 50).0, 50);
    }

    #[test]
    fn test_all_neutral_or_unknown_is_neutral() {
        let variants = vec![
            GeneticVariantRecord::new("APOE", "e3/e3"),
            GeneticVariantRecord::new("BRCA2", "unknown"),
        ];
        let (score, details) = score_genetics(&table(), &variants, 50);
        assert_eq!(score, 50);
        assert_eq!(details.actionable_count, 0);
        assert_eq!(details.protective_count, 0);
        assert_eq!(details.variants.len(), 2);
    }

    #[test]
    fn test_single_variant_extremes() {
        let t = table();
        assert_eq!(score_genetics(&t, &[GeneticVariantRecord::new("APOE", "e4/e4")], 50).0, 0);
        assert_eq!(score_genetics(&t, &[GeneticVariantRecord::new("ACTN3", "RR")], 50).0, 100);
        assert_eq!(score_genetics(&t, &[GeneticVariantRecord::new("MTHFR", "C677T")], 50).0, 0);
    }

    #[test]
    fn test_mixed_variants() {
        // total = -0.5 + 1.0 = 0.5, max = 1.5 → 100 * 2.0 / 3.0 → 67
        let variants = vec![
            GeneticVariantRecord::new("MTHFR", "C677T"),
            GeneticVariantRecord::new("ACTN3", "RR"),
        ];
        let (score, details) = score_genetics(&table(), &variants, 50);
        assert_eq!(score, 67);
        assert_eq!(details.actionable_count, 1);
        assert_eq!(details.protective_count, 1);
    }
}
