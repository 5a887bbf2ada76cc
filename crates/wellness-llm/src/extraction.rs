//! Supplement selection parsing from LLM output.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wellness_core::models::{SupplementCatalogEntry, SupplementRecommendation};

/// Extraction errors.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

/// Raw selection returned by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmSelection {
    pub recommendations: Vec<LlmPick>,
}

/// One selected catalog id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmPick {
    pub id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Parse model output into a selection.
///
/// Models sometimes wrap the JSON in prose or code fences, so the outermost
/// `{ ... }` span is parsed.
pub fn parse_recommendation_output(text: &str) -> ExtractionResult<LlmSelection> {
    let json_start = text.find('{').ok_or_else(|| {
        ExtractionError::InvalidFormat("No JSON object found in response".into())
    })?;
    let json_end = text.rfind('}').ok_or_else(|| {
        ExtractionError::InvalidFormat("No closing brace found in response".into())
    })?;
    if json_end < json_start {
        return Err(ExtractionError::InvalidFormat(
            "Closing brace precedes opening brace".into(),
        ));
    }

    let selection: LlmSelection = serde_json::from_str(&text[json_start..=json_end])?;
    Ok(selection)
}

/// Map picks onto catalog entries, keeping the model's order.
///
/// Ids are matched case-insensitively. Unknown and repeated ids are dropped.
pub fn resolve_picks(selection: &LlmSelection, catalog: &[SupplementCatalogEntry]) -> Vec<SupplementRecommendation> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for pick in &selection.recommendations {
        let id = pick.id.trim();
        let Some(entry) = catalog.iter().find(|e| e.id.eq_ignore_ascii_case(id)) else {
            log::debug!("Dropping unknown catalog id from model output: {:?}", pick.id);
            continue;
        };
        if !seen.insert(entry.id.as_str()) {
            continue;
        }

        let rationale = pick
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from);
        resolved.push(SupplementRecommendation {
            entry: entry.clone(),
            score: 0,
            rationale,
        });
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use wellness_core::ScoringTables;

    #[test]
    fn test_parse_plain_json() {
        let json = r#"{"recommendations":[{"id":"magnesium","reason":"Supports sleep."}]}"#;
        let selection = parse_recommendation_output(json).unwrap();
        assert_eq!(selection.recommendations.len(), 1);
        assert_eq!(selection.recommendations[0].id, "magnesium");
        assert_eq!(selection.recommendations[0].reason.as_deref(), Some("Supports sleep."));
    }

    #[test]
    fn test_parse_with_prose_and_fences() {
        let text = "Here are my picks:\n```json\n{\"recommendations\":[{\"id\":\"zinc\"}]}\n```\nHope this helps!";
        let selection = parse_recommendation_output(text).unwrap();
        assert_eq!(selection.recommendations[0].id, "zinc");
        assert!(selection.recommendations[0].reason.is_none());
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(
            parse_recommendation_output("I cannot help with that."),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_recommendation_output("} backwards {"),
            Err(ExtractionError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_recommendation_output(r#"{"picks": []}"#),
            Err(ExtractionError::JsonParse(_))
        ));
    }

    #[test]
    fn test_resolve_drops_unknown_and_duplicates() {
        let tables = ScoringTables::embedded().unwrap();
        let selection = LlmSelection {
            recommendations: vec![
                LlmPick { id: "Magnesium".into(), reason: Some("  sleep ".into()) },
                LlmPick { id: "unicorn-dust".into(), reason: None },
                LlmPick { id: "zinc".into(), reason: Some("   ".into()) },
                LlmPick { id: "magnesium".into(), reason: None },
            ],
        };

        let resolved = resolve_picks(&selection, &tables.catalog);
        let ids: Vec<_> = resolved.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["magnesium", "zinc"]);
        assert_eq!(resolved[0].rationale.as_deref(), Some("sleep"));
        assert!(resolved[1].rationale.is_none());
    }

    proptest! {
        #[test]
        fn prop_parse_never_panics(text in "\\PC*") {
            let _ = parse_recommendation_output(&text);
        }

        #[test]
        fn prop_resolved_ids_are_unique_catalog_ids(
            ids in prop::collection::vec(
                prop_oneof![
                    "[a-z0-9-]{1,12}",
                    prop::sample::select(vec!["zinc", "Magnesium", "omega3", "coq10"]).prop_map(String::from),
                ],
                0..12,
            )
        ) {
            let tables = ScoringTables::builtin();
            let selection = LlmSelection {
                recommendations: ids.into_iter().map(|id| LlmPick { id, reason: None }).collect(),
            };
            let resolved = resolve_picks(&selection, &tables.catalog);
            let mut seen = HashSet::new();
            for rec in &resolved {
                prop_assert!(tables.catalog_entry(rec.id()).is_some());
                prop_assert!(seen.insert(rec.id().to_string()));
            }
        }
    }
}
