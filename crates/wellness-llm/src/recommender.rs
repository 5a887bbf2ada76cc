//! LLM recommender plugged into the core's fallback orchestrator.

use wellness_core::models::{SupplementCatalogEntry, WellnessProfile};
use wellness_core::{ExternalOutcome, ExternalRecommender};

use crate::client::CompletionClient;
use crate::extraction::{parse_recommendation_output, resolve_picks};
use crate::prompts::build_messages;

/// Asks a completion model to pick from the catalog.
///
/// Every failure becomes [`ExternalOutcome::Unavailable`]; the core decides
/// what to do about it.
pub struct LlmRecommender<C> {
    client: C,
    name: String,
}

impl<C: CompletionClient> LlmRecommender<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            name: "llm".to_string(),
        }
    }

    /// Override the name used in fallback reasons.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: CompletionClient> ExternalRecommender for LlmRecommender<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn recommend(&self, profile: &WellnessProfile, catalog: &[SupplementCatalogEntry]) -> ExternalOutcome {
        if catalog.is_empty() {
            return ExternalOutcome::Unavailable("catalog is empty".into());
        }

        let messages = build_messages(profile, catalog);
        let reply = match self.client.complete(&messages) {
            Ok(reply) => reply,
            Err(e) => return ExternalOutcome::Unavailable(e.to_string()),
        };

        let selection = match parse_recommendation_output(&reply) {
            Ok(selection) => selection,
            Err(e) => return ExternalOutcome::Unavailable(e.to_string()),
        };

        let picks = resolve_picks(&selection, catalog);
        if picks.is_empty() {
            return ExternalOutcome::Unavailable("response named no catalog entries".into());
        }
        log::debug!("{} picked {} of {} suggestions", self.name, picks.len(), selection.recommendations.len());
        ExternalOutcome::Success(picks)
    }
}
