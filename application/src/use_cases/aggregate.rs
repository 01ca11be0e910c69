//! Fan-out/merge aggregator
//!
//! Reconciles N candidate outputs for the same task into one artifact
//! through a single merge completion. Candidates are advisory input:
//! the aggregator embeds them verbatim and trusts the backend's
//! textual synthesis, with no parsing or validation of its own.

use crate::ports::completion::{
    CompletionError, CompletionRequest, CompletionService, complete_one,
};
use concord_domain::{Model, PromptTemplate};
use std::sync::Arc;
use tracing::debug;

/// Merges candidate drafts into one unified artifact
pub struct Aggregator {
    service: Arc<dyn CompletionService>,
    moderator: Model,
}

impl Aggregator {
    pub fn new(service: Arc<dyn CompletionService>, moderator: Model) -> Self {
        Self { service, moderator }
    }

    /// Merge `candidates` into a single text.
    ///
    /// A single candidate is returned verbatim without a backend call:
    /// merge of one is identity. Two or more candidates cost exactly
    /// one completion call with `candidate_count = 1`.
    pub async fn aggregate(
        &self,
        candidates: Vec<String>,
        instructions: Option<&str>,
    ) -> Result<String, CompletionError> {
        match candidates.len() {
            0 => Err(CompletionError::Service(
                "nothing to aggregate: empty candidate set".to_string(),
            )),
            1 => Ok(candidates.into_iter().next().expect("length checked")),
            n => {
                debug!("Merging {} candidates", n);
                let instructions =
                    instructions.unwrap_or_else(|| PromptTemplate::merge_default_instructions());
                let prompt = PromptTemplate::merge(&candidates, instructions);
                let request = CompletionRequest::new(
                    self.moderator.clone(),
                    PromptTemplate::merge_system(),
                    prompt,
                );
                complete_one(self.service.as_ref(), request).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Scripted, ScriptedService};

    fn aggregator(service: Arc<ScriptedService>) -> Aggregator {
        Aggregator::new(service, Model::default())
    }

    #[tokio::test]
    async fn test_merge_of_one_is_identity_without_a_call() {
        let service = Arc::new(ScriptedService::new(vec![]));
        let result = aggregator(Arc::clone(&service))
            .aggregate(vec!["only draft".to_string()], None)
            .await
            .unwrap();

        assert_eq!(result, "only draft");
        assert_eq!(service.complete_count(), 0);
    }

    #[tokio::test]
    async fn test_merge_embeds_all_candidates_in_one_call() {
        let service = Arc::new(ScriptedService::new(vec![Scripted::Text(
            "merged".to_string(),
        )]));
        let result = aggregator(Arc::clone(&service))
            .aggregate(vec!["alpha".to_string(), "beta".to_string()], None)
            .await
            .unwrap();

        assert_eq!(result, "merged");
        assert_eq!(service.complete_count(), 1);

        let prompts = service.complete_prompts.lock().unwrap();
        assert!(prompts[0].contains("--- Candidate 1 ---"));
        assert!(prompts[0].contains("alpha"));
        assert!(prompts[0].contains("beta"));
    }

    #[tokio::test]
    async fn test_empty_candidate_set_is_an_error() {
        let service = Arc::new(ScriptedService::new(vec![]));
        let result = aggregator(service).aggregate(vec![], None).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_custom_instructions_are_used() {
        let service = Arc::new(ScriptedService::new(vec![Scripted::Text(
            "merged".to_string(),
        )]));
        aggregator(Arc::clone(&service))
            .aggregate(
                vec!["a".to_string(), "b".to_string()],
                Some("prefer the shorter phrasing"),
            )
            .await
            .unwrap();

        let prompts = service.complete_prompts.lock().unwrap();
        assert!(prompts[0].contains("prefer the shorter phrasing"));
    }
}
