//! Prompt templates for the pipeline flow

use crate::orchestration::phase::Phase;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt shared by all panel agents
    pub fn panel_system() -> &'static str {
        "You are an intelligent agent participating in a group to solve a complex problem. \
         Work carefully, show your reasoning, and be precise."
    }

    /// User prompt for an agent's first draft of a phase artifact
    pub fn initial(phase: Phase, problem: &str, prior: Option<&str>) -> String {
        let mut prompt = format!(
            "Current stage: {}.\nGoal: {}\n\nProblem:\n{}\n",
            phase.display_name(),
            phase.goal(),
            problem
        );

        if let Some(prior) = prior {
            prompt.push_str(&format!(
                "\nOutput of the previous stage, to build on:\n{}\n",
                prior
            ));
        }

        prompt.push_str("\nProduce your draft for this stage.");
        prompt
    }

    /// System prompt for the critique operation
    pub fn critique_system() -> &'static str {
        "You are a critical reviewer on a problem-solving panel. Assess whether the \
         shared working draft fully serves the stage goal. Be fair but demanding: \
         accept only drafts you would stand behind."
    }

    /// User prompt for a structured critique of the shared artifact
    pub fn critique(phase: Phase, problem: &str, artifact: &str) -> String {
        format!(
            "Current stage: {}.\nGoal: {}\n\nProblem:\n{}\n\nShared draft under review:\n{}\n\n\
             Decide whether this draft is acceptable for the stage goal.\n\
             Respond with a JSON object: {{\"accepted\": true|false, \"feedback\": \"...\"}}.\n\
             When rejecting, make the feedback concrete enough to act on.",
            phase.display_name(),
            phase.goal(),
            problem,
            artifact
        )
    }

    /// User prompt for revising the shared artifact against feedback
    pub fn revise(phase: Phase, problem: &str, artifact: &str, feedback: &str) -> String {
        format!(
            "Current stage: {}.\nGoal: {}\n\nProblem:\n{}\n\nCurrent draft:\n{}\n\n\
             Reviewer feedback:\n{}\n\n\
             Rewrite the draft so it addresses the feedback while keeping everything \
             that was already right. Return only the revised draft.",
            phase.display_name(),
            phase.goal(),
            problem,
            artifact,
            feedback
        )
    }

    /// System prompt for the merge completion
    pub fn merge_system() -> &'static str {
        "You are reconciling several candidate drafts of the same document into one. \
         Merge overlapping content, keep points unique to any candidate, and resolve \
         contradictions in favor of the better-supported position."
    }

    /// Default merge instructions when the caller supplies none
    pub fn merge_default_instructions() -> &'static str {
        "Produce a single unified draft that all candidate authors could accept."
    }

    /// User prompt embedding all candidates verbatim between delimiters
    pub fn merge(candidates: &[String], instructions: &str) -> String {
        let mut prompt = format!("{}\n\nCandidates to reconcile:\n", instructions);

        for (i, candidate) in candidates.iter().enumerate() {
            prompt.push_str(&format!("\n--- Candidate {} ---\n{}\n", i + 1, candidate));
        }

        prompt.push_str("\n--- End of candidates ---\n\nReturn only the unified draft.");
        prompt
    }

    /// User prompt for the structured planning completion
    pub fn plan_request(problem: &str, representation: &str) -> String {
        format!(
            "Problem:\n{}\n\nWorking representation:\n{}\n\n\
             Produce an ordered execution plan as a JSON object of the form\n\
             {{\"steps\": [{{\"description\": \"...\", \"method\": \"...\", \
             \"required_input\": \"...\", \"expected_output\": \"...\"}}]}}.\n\
             Keep each step small enough to execute and verify on its own.",
            problem, representation
        )
    }

    // ==================== Role-play conversation variant ====================

    /// System prompt for one named participant in the two-agent variant
    pub fn conversation_system(name: &str, counterpart: &str) -> String {
        format!(
            "You are {}, working through a problem together with {}. \
             Respond to your partner's latest message, advance the current stage, \
             and use the available tools when they help.",
            name, counterpart
        )
    }

    /// Opening user message seeding a conversation phase
    pub fn conversation_opening(phase: Phase, problem: &str) -> String {
        format!(
            "Current stage: {}.\nGoal: {}\n\nProblem:\n{}\n\nBegin the discussion.",
            phase.display_name(),
            phase.goal(),
            problem
        )
    }

    /// Structured probe asking whether the current phase is done
    pub fn phase_done_probe(phase: Phase, transcript: &str) -> String {
        format!(
            "Stage under assessment: {}.\nGoal: {}\n\nConversation so far:\n{}\n\n\
             Has this stage's goal been met? Respond with a JSON object: \
             {{\"done\": true|false, \"reason\": \"...\"}}.",
            phase.display_name(),
            phase.goal(),
            transcript
        )
    }
}
