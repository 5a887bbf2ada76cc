//! Biomarker sub-score.

use crate::models::{latest_per_biomarker, BiomarkerRecord, BiomarkerDetails, BiomarkerStatus, MarkerStatus};

use super::round_div;

/// Percentage of latest-per-name markers inside their reference range.
///
/// Returns `neutral` when there are no records.
pub fn score_biomarkers(records: &[BiomarkerRecord], neutral: u32) -> (u32, BiomarkerDetails) {
    let markers: Vec<MarkerStatus> = latest_per_biomarker(records)
        .into_iter()
        .map(|r| MarkerStatus {
            name: r.biomarker_name.clone(),
            value: r.biomarker_value,
            status: r.status(),
            measured_at: r.measurement_date,
        })
        .collect();

    let total_count = markers.len() as u32;
    let normal_count = markers
        .iter()
        .filter(|m| m.status == BiomarkerStatus::Normal)
        .count() as u32;

    let score = if total_count == 0 {
        neutral
    } else {
        round_div(100 * u64::from(normal_count), u64::from(total_count))
    };

    (
        score,
        BiomarkerDetails {
            normal_count,
            total_count,
            markers,
        },
    )
}
