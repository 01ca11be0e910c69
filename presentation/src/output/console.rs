//! Console output formatter for run results

use colored::Colorize;
use concord_application::ConversationResult;
use concord_domain::{PipelineResult, Role};

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete pipeline result, phase by phase
    pub fn format(result: &PipelineResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Concord Results"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Problem:".cyan().bold(),
            result.problem
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Panel:".cyan().bold(),
            result.agents.join(", ")
        ));

        for outcome in &result.phases {
            output.push_str(&Self::section_header(&format!(
                "Phase {}: {}",
                outcome.phase.number(),
                outcome.phase.display_name()
            )));

            let status = if outcome.consensus_reached {
                format!("consensus after {} iteration(s)", outcome.iterations)
                    .green()
                    .to_string()
            } else if outcome.iterations == 0 {
                "no critique (iterations disabled)".dimmed().to_string()
            } else {
                format!("forced advance after {} iteration(s)", outcome.iterations)
                    .yellow()
                    .to_string()
            };
            output.push_str(&format!("{}\n\n", status));
            output.push_str(&outcome.artifact.render());
            output.push('\n');
        }

        output.push_str(&Self::section_header("Final Answer"));
        output.push_str(&result.final_artifact);
        output.push('\n');

        output
    }

    /// Format only the final compiled answer
    pub fn format_final(result: &PipelineResult) -> String {
        format!("{}\n", result.final_artifact)
    }

    /// Format as JSON
    pub fn format_json(result: &PipelineResult) -> String {
        serde_json::to_string_pretty(result)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    /// Format a conversation run, transcript last
    pub fn format_conversation(result: &ConversationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Concord Conversation"));
        output.push('\n');
        output.push_str(&format!(
            "{} {}\n",
            "Problem:".cyan().bold(),
            result.problem
        ));

        output.push_str(&Self::section_header("Phases"));
        for outcome in &result.phases {
            let status = if outcome.completed {
                format!("done in {} turn(s)", outcome.turns).green()
            } else {
                format!("turn budget spent ({} turn(s))", outcome.turns).yellow()
            };
            output.push_str(&format!(
                "{} {} - {}\n",
                format!("{}.", outcome.phase.number()).bold(),
                outcome.phase.display_name(),
                status
            ));
            if !outcome.reason.is_empty() {
                output.push_str(&format!("   {}\n", outcome.reason.dimmed()));
            }
        }

        output.push_str(&Self::section_header("Transcript"));
        for message in &result.transcript {
            if message.role == Role::System {
                continue;
            }
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", message.role.as_str()).yellow().bold(),
                message.content
            ));
        }

        output
    }

    /// The conversation's last assistant reply only
    pub fn format_conversation_final(result: &ConversationResult) -> String {
        format!("{}\n", result.final_reply().unwrap_or_default())
    }

    /// Conversation result as JSON
    pub fn format_conversation_json(result: &ConversationResult) -> String {
        serde_json::to_string_pretty(result)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn header(title: &str) -> String {
        format!("{}\n{}\n", "=".repeat(60).blue(), title.bold())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", "-".repeat(60).blue(), title.cyan().bold())
    }
}
