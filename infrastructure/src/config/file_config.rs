//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config
//! file. They are deserialized directly; model strings parse through
//! the domain's infallible `Model::from_str`, so validation here only
//! catches values that would silently misbehave (empty names, zero
//! budgets).

use concord_domain::Model;
use serde::{Deserialize, Serialize};

/// How serious a configuration problem is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Configuration cannot be used as-is
    Error,
    /// Suspicious but usable; a default is substituted
    Warning,
}

/// A single problem detected while validating the configuration
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub field: String,
    pub message: String,
}

impl ConfigIssue {
    fn error(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.to_string(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Panel and moderator model selection
    pub models: FileModelsConfig,
    /// Pipeline loop settings
    pub pipeline: FilePipelineConfig,
    /// Completion backend settings
    pub service: FileServiceConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected
    /// issues. Loading never fails on these; the caller decides what
    /// severity it tolerates.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if let Some(agents) = &self.models.agents {
            if agents.is_empty() {
                issues.push(ConfigIssue::error(
                    "models.agents",
                    "agent list cannot be empty",
                ));
            }
            for (i, name) in agents.iter().enumerate() {
                if name.trim().is_empty() {
                    issues.push(ConfigIssue::error(
                        "models.agents",
                        format!("agent {} has an empty model name", i),
                    ));
                }
            }
        }

        if let Some(moderator) = &self.models.moderator
            && moderator.trim().is_empty()
        {
            issues.push(ConfigIssue::error(
                "models.moderator",
                "model name cannot be empty",
            ));
        }

        if self.pipeline.candidate_count == Some(0) {
            issues.push(ConfigIssue::warning(
                "pipeline.candidate_count",
                "candidate count 0 is treated as 1",
            ));
        }

        if self.pipeline.turn_budget == Some(0) {
            issues.push(ConfigIssue::warning(
                "pipeline.turn_budget",
                "turn budget 0 is treated as 1",
            ));
        }

        if let Some(format) = &self.output.format {
            let valid = ["full", "final", "json"];
            if !valid.contains(&format.to_lowercase().as_str()) {
                issues.push(ConfigIssue::warning(
                    "output.format",
                    format!("unknown value '{}', falling back to 'full'", format),
                ));
            }
        }

        issues
    }

    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|i| i.severity == Severity::Error)
    }
}

/// Model configuration from TOML (`[models]` section)
///
/// # Example
///
/// ```toml
/// [models]
/// agents = ["gpt-4o", "gpt-4o-mini", "o3-mini"]
/// moderator = "gpt-4o"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// One model per panel agent, in fixed panel order
    pub agents: Option<Vec<String>>,
    /// Model used for merge completions
    pub moderator: Option<String>,
}

impl FileModelsConfig {
    /// Panel models, falling back to the default panel when unset.
    /// Unknown names become `Model::Custom` and are passed through to
    /// the backend verbatim.
    pub fn agent_models(&self) -> Vec<Model> {
        match &self.agents {
            Some(agents) if !agents.is_empty() => agents
                .iter()
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.parse().unwrap_or_default())
                .collect(),
            _ => Model::default_panel(),
        }
    }

    pub fn moderator_model(&self) -> Option<Model> {
        self.moderator
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.parse().unwrap_or_default())
    }
}

/// Pipeline loop configuration from TOML (`[pipeline]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePipelineConfig {
    /// Consensus sweep ceiling per phase
    pub max_iterations: Option<usize>,
    /// Candidates requested per initial-draft completion
    pub candidate_count: Option<usize>,
    /// Chat turns per phase in conversation mode
    pub turn_budget: Option<usize>,
}

/// Backend configuration from TOML (`[service]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServiceConfig {
    /// Endpoint root for the chat/completions API
    pub base_url: Option<String>,
    /// Whole-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Output configuration from TOML (`[output]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// "full", "final", or "json"
    pub format: Option<String>,
    /// Disable colored output when false
    pub color: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert!(!config.has_errors());
    }

    #[test]
    fn test_parses_full_toml() {
        let raw = r#"
            [models]
            agents = ["gpt-4o", "o3-mini"]
            moderator = "gpt-4o"

            [pipeline]
            max_iterations = 5
            candidate_count = 2

            [service]
            base_url = "http://localhost:8080/v1"
            timeout_secs = 30

            [output]
            format = "json"
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();

        assert_eq!(
            config.models.agent_models(),
            vec![Model::Gpt4o, Model::O3Mini]
        );
        assert_eq!(config.models.moderator_model(), Some(Model::Gpt4o));
        assert_eq!(config.pipeline.max_iterations, Some(5));
        assert_eq!(config.service.timeout_secs, Some(30));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_empty_agent_name_is_an_error() {
        let raw = r#"
            [models]
            agents = ["gpt-4o", "  "]
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();
        assert!(config.has_errors());
    }

    #[test]
    fn test_unknown_output_format_is_a_warning() {
        let raw = r#"
            [output]
            format = "yaml"
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(!config.has_errors());
    }

    #[test]
    fn test_unset_agents_fall_back_to_default_panel() {
        let config = FileConfig::default();
        assert_eq!(config.models.agent_models(), Model::default_panel());
    }

    #[test]
    fn test_unknown_model_name_becomes_custom() {
        let raw = r#"
            [models]
            agents = ["my-local-model"]
        "#;
        let config: FileConfig = toml::from_str(raw).unwrap();
        assert_eq!(
            config.models.agent_models(),
            vec![Model::Custom("my-local-model".to_string())]
        );
    }
}
