//! Wellness profile models.

use serde::{Deserialize, Deserializer, Serialize};

/// Monthly budget applied when a profile does not state one.
pub const DEFAULT_MONTHLY_BUDGET: f64 = 100.0;

/// A user's onboarding profile, as loaded from the data store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WellnessProfile {
    /// Owning user identity
    pub user_id: String,
    /// Age in years (not range-checked)
    #[serde(default)]
    pub age: u32,
    /// Free-form gender string, only used as a weak scoring signal
    #[serde(default)]
    pub gender: String,
    /// Health goals and complaints (e.g., ["sleep", "energy"])
    #[serde(default, deserialize_with = "deserialize_text_list")]
    pub wellness_considerations: Vec<String>,
    /// Allergies and contraindication triggers (e.g., ["fish allergy"])
    #[serde(default, deserialize_with = "deserialize_text_list")]
    pub wellness_sensitivities: Vec<String>,
    /// Monthly supplement budget in USD
    #[serde(default = "default_monthly_budget")]
    pub monthly_budget: f64,
    /// Self-reported lifestyle answers
    #[serde(default)]
    pub lifestyle: LifestyleProfile,
}

/// Self-reported lifestyle answers. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LifestyleProfile {
    /// Average nightly sleep in hours
    pub sleep_hours: Option<f64>,
    /// Dietary pattern (e.g., "mediterranean", "vegan")
    pub dietary_pattern: Option<String>,
    /// Activity level (e.g., "sedentary", "athlete")
    pub activity_level: Option<String>,
    /// Self-reported stress level (e.g., "low", "very high")
    pub stress_level: Option<String>,
    /// Smoking status ("current", "former", "never")
    pub smoking_status: Option<String>,
    /// Alcohol frequency ("daily" .. "never")
    pub alcohol_frequency: Option<String>,
}

fn default_monthly_budget() -> f64 {
    DEFAULT_MONTHLY_BUDGET
}

impl WellnessProfile {
    /// Create a profile with required fields and the default budget.
    pub fn new(user_id: String, age: u32, gender: String) -> Self {
        Self {
            user_id,
            age,
            gender,
            wellness_considerations: Vec::new(),
            wellness_sensitivities: Vec::new(),
            monthly_budget: DEFAULT_MONTHLY_BUDGET,
            lifestyle: LifestyleProfile::default(),
        }
    }

    /// Set considerations from a comma-delimited string.
    pub fn with_considerations(mut self, raw: &str) -> Self {
        self.wellness_considerations = split_text_list(raw);
        self
    }

    /// Set sensitivities from a comma-delimited string.
    pub fn with_sensitivities(mut self, raw: &str) -> Self {
        self.wellness_sensitivities = split_text_list(raw);
        self
    }

    /// Whether the gender field reads as female.
    pub fn is_female(&self) -> bool {
        matches!(self.gender.trim().to_lowercase().as_str(), "female" | "f" | "woman")
    }
}

/// Split a comma-delimited string into trimmed, non-empty items.
pub fn split_text_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Trim items and drop empty ones.
pub fn normalize_text_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Accepts either a JSON array of strings or a single comma-delimited string.
fn deserialize_text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextList {
        List(Vec<String>),
        Delimited(String),
        Missing(Option<()>),
    }

    Ok(match TextList::deserialize(deserializer)? {
        TextList::List(items) => normalize_text_list(items),
        TextList::Delimited(raw) => split_text_list(&raw),
        TextList::Missing(_) => Vec::new(),
    })
}
