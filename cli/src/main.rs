//! CLI entrypoint for concord
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use concord_application::{
    RunConversationInput, RunConversationUseCase, RunPipelineInput, RunPipelineUseCase,
};
use concord_domain::Model;
use concord_infrastructure::{
    ConfigLoader, FileConfig, LocalToolExecutor, OpenAiCompletionService, OpenAiConfig, Severity,
};
use concord_presentation::{Cli, ConsoleFormatter, OutputFormat, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting concord");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!(e))
            .context("Failed to load configuration")?
    };

    let mut config_errors = false;
    for issue in config.validate() {
        match issue.severity {
            Severity::Error => {
                config_errors = true;
                eprintln!("config error: {}: {}", issue.field, issue.message);
            }
            Severity::Warning => warn!("config: {}: {}", issue.field, issue.message),
        }
    }
    if config_errors {
        bail!("Configuration is invalid; fix the errors above or pass --no-config.");
    }

    let problem = match cli.problem.clone() {
        Some(p) if !p.trim().is_empty() => p,
        _ => bail!("A problem statement is required."),
    };

    let models = resolve_models(&cli, &config);
    let service = Arc::new(
        OpenAiCompletionService::new(backend_config(&config))
            .context("Failed to create completion backend")?,
    );

    // Ctrl-C requests a cooperative stop at the next loop boundary.
    let token = CancellationToken::new();
    {
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling run");
                token.cancel();
            }
        });
    }

    if cli.conversation {
        return run_conversation(&cli, &config, problem, models, service, token).await;
    }
    run_pipeline(&cli, &config, problem, models, service, token).await
}

async fn run_pipeline(
    cli: &Cli,
    config: &FileConfig,
    problem: String,
    models: Vec<Model>,
    service: Arc<OpenAiCompletionService>,
    token: CancellationToken,
) -> Result<()> {
    let mut input = RunPipelineInput::new(problem, models);

    if let Some(model) = moderator(cli, config) {
        input = input.with_moderator(model);
    }
    if let Some(n) = cli.max_iterations.or(config.pipeline.max_iterations) {
        input = input.with_max_iterations(n);
    }
    if let Some(n) = cli.candidates.or(config.pipeline.candidate_count) {
        input = input.with_candidate_count(n);
    }

    let use_case = RunPipelineUseCase::new(service).with_cancellation_token(token);

    let result = if cli.quiet {
        use_case.execute(input).await?
    } else if std::io::stderr().is_terminal() {
        let progress = ProgressReporter::new();
        use_case.execute_with_progress(input, &progress).await?
    } else {
        // Spinners garble piped or redirected output; fall back to plain lines.
        let progress = SimpleProgress;
        use_case.execute_with_progress(input, &progress).await?
    };

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        OutputFormat::Final => ConsoleFormatter::format_final(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", output);

    Ok(())
}

async fn run_conversation(
    cli: &Cli,
    config: &FileConfig,
    problem: String,
    models: Vec<Model>,
    service: Arc<OpenAiCompletionService>,
    token: CancellationToken,
) -> Result<()> {
    // The pair: first two panel models, or the first model twice.
    let lead = models.first().cloned().unwrap_or_default();
    let partner = models.get(1).cloned().unwrap_or_else(|| lead.clone());

    let mut input = RunConversationInput::new(problem, lead, partner);
    if let Some(budget) = cli.turn_budget.or(config.pipeline.turn_budget) {
        input = input.with_turn_budget(budget);
    }

    let tools = Arc::new(LocalToolExecutor::new());
    let use_case =
        RunConversationUseCase::new(service, tools).with_cancellation_token(token);
    let result = use_case.execute(input).await?;

    let output = match cli.output {
        OutputFormat::Full => ConsoleFormatter::format_conversation(&result),
        OutputFormat::Final => ConsoleFormatter::format_conversation_final(&result),
        OutputFormat::Json => ConsoleFormatter::format_conversation_json(&result),
    };
    println!("{}", output);

    Ok(())
}

fn resolve_models(cli: &Cli, config: &FileConfig) -> Vec<Model> {
    if !cli.model.is_empty() {
        return cli
            .model
            .iter()
            .map(|s| s.parse().unwrap_or_default())
            .collect();
    }
    if let Some(n) = cli.agents {
        return vec![Model::default(); n.max(1)];
    }
    config.models.agent_models()
}

fn moderator(cli: &Cli, config: &FileConfig) -> Option<Model> {
    cli.moderator
        .as_deref()
        .map(|s| s.parse().unwrap_or_default())
        .or_else(|| config.models.moderator_model())
}

fn backend_config(config: &FileConfig) -> OpenAiConfig {
    let mut backend = OpenAiConfig::default();
    if let Some(base_url) = &config.service.base_url {
        backend = backend.with_base_url(base_url);
    }
    if let Some(secs) = config.service.timeout_secs {
        backend = backend.with_timeout_secs(secs);
    }
    backend
}
