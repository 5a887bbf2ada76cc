//! Recommendation prompts.
//!
//! Written for instruction-tuned chat models with JSON output mode.

use serde::{Deserialize, Serialize};
use wellness_core::models::{SupplementCatalogEntry, WellnessProfile};

/// System prompt for supplement selection.
pub const SYSTEM_PROMPT: &str = r#"You are a careful wellness assistant that selects dietary supplements from a fixed catalog.

Rules:
- Only choose ids that appear in the catalog.
- Never choose a supplement whose contraindications overlap the user's sensitivities.
- Prefer supplements whose goals match the user's considerations.
- Keep the combined monthly price within the user's budget.
- Choose at most five supplements, best first.

You do not diagnose or treat conditions. Output JSON only."#;

/// Expected response shape, included in every user prompt.
pub const RESPONSE_FORMAT: &str = r#"{"recommendations":[{"id":"<catalog id>","reason":"<one sentence>"}]}"#;

/// One chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

/// User prompt describing the profile and the catalog.
pub fn make_recommendation_prompt(profile: &WellnessProfile, catalog: &[SupplementCatalogEntry]) -> String {
    let mut prompt = String::from("User profile:\n");
    prompt.push_str(&format!("- age: {}\n", profile.age));
    prompt.push_str(&format!("- gender: {}\n", or_unknown(&profile.gender)));
    prompt.push_str(&format!(
        "- considerations: {}\n",
        join_or_none(&profile.wellness_considerations)
    ));
    prompt.push_str(&format!(
        "- sensitivities: {}\n",
        join_or_none(&profile.wellness_sensitivities)
    ));
    prompt.push_str(&format!("- monthly budget: ${:.2}\n", profile.monthly_budget));

    prompt.push_str("\nCatalog (id | name | price per month | evidence | goals | contraindications):\n");
    for entry in catalog {
        prompt.push_str(&format!(
            "- {} | {} | ${:.2} | {} | {} | {}\n",
            entry.id,
            entry.name,
            entry.price,
            entry.evidence_level.as_str(),
            join_or_none(&entry.wellness_goals),
            join_or_none(&entry.contraindications),
        ));
    }

    prompt.push_str("\nReturn a JSON object in exactly this shape:\n");
    prompt.push_str(RESPONSE_FORMAT);
    prompt
}

/// Full message list for one request.
pub fn build_messages(profile: &WellnessProfile, catalog: &[SupplementCatalogEntry]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(make_recommendation_prompt(profile, catalog)),
    ]
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn or_unknown(s: &str) -> &str {
    if s.trim().is_empty() {
        "unknown"
    } else {
        s
    }
}
