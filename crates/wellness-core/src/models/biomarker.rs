//! Lab biomarker models.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One lab result for one biomarker on one draw date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BiomarkerRecord {
    /// Biomarker key (e.g., "Vitamin D")
    pub biomarker_name: String,
    /// Measured value
    pub biomarker_value: f64,
    /// Measurement unit (e.g., "ng/mL")
    #[serde(default)]
    pub unit: Option<String>,
    /// Draw date; only the latest record per name is scored
    pub measurement_date: DateTime<Utc>,
    /// Lower bound of the reference range, `None` means unbounded
    #[serde(default)]
    pub normal_range_low: Option<f64>,
    /// Upper bound of the reference range, `None` means unbounded
    #[serde(default)]
    pub normal_range_high: Option<f64>,
}

/// Classification of a value against its reference range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BiomarkerStatus {
    Low,
    Normal,
    High,
}

impl BiomarkerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BiomarkerStatus::Low => "low",
            BiomarkerStatus::Normal => "normal",
            BiomarkerStatus::High => "high",
        }
    }
}

impl std::fmt::Display for BiomarkerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BiomarkerRecord {
    /// Create a record with no reference range.
    pub fn new(name: impl Into<String>, value: f64, measurement_date: DateTime<Utc>) -> Self {
        Self {
            biomarker_name: name.into(),
            biomarker_value: value,
            unit: None,
            measurement_date,
            normal_range_low: None,
            normal_range_high: None,
        }
    }

    /// Set the reference range.
    pub fn with_range(mut self, low: Option<f64>, high: Option<f64>) -> Self {
        self.normal_range_low = low;
        self.normal_range_high = high;
        self
    }

    /// Classify the value. A missing bound never triggers.
    pub fn status(&self) -> BiomarkerStatus {
        match (self.normal_range_low, self.normal_range_high) {
            (Some(low), _) if self.biomarker_value < low => BiomarkerStatus::Low,
            (_, Some(high)) if self.biomarker_value > high => BiomarkerStatus::High,
            _ => BiomarkerStatus::Normal,
        }
    }
}

/// Keep only the most recent record per biomarker name.
///
/// Output follows the order in which each name first appears. On equal
/// dates the earlier record in the input wins.
pub fn latest_per_biomarker(records: &[BiomarkerRecord]) -> Vec<&BiomarkerRecord> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut latest: Vec<&BiomarkerRecord> = Vec::new();

    for record in records {
        match index.get(record.biomarker_name.as_str()) {
            Some(&slot) => {
                if record.measurement_date > latest[slot].measurement_date {
                    latest[slot] = record;
                }
            }
            None => {
                index.insert(&record.biomarker_name, latest.len());
                latest.push(record);
            }
        }
    }

    latest
}
