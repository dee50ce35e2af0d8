//! Explorer agent: registers actions, asks Gemini for suggestions, stores and
//! recalls memories, then runs its actions.
//!
//! Requires `GEMINI_API_KEY`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use recall_agents::Agent;
use recall_agents::config::AgentConfig;
use recall_agents::kernel::gemini_oracle;
use recall_agents::oracle::GenerationOptions;
use recall_agents::telemetry::{LogFormat, TelemetryConfig, init_tracing};
use tracing::{info, warn};

const CONTEXT: &str = "We are exploring a new digital environment with the goal of \
                       understanding its structure and potential resources.";
const RECALL_QUERY: &str = "What security-related information have we discovered?";
const STRATEGY_QUERY: &str = "Provide a strategic approach for exploring an unknown digital \
                              environment, focusing on safety and efficiency.";
const STORY_PROMPT: &str = "Write a story about a magic backpack that helps students learn.";

#[derive(Debug, Parser)]
#[command(about = "Run the Gemini explorer agent")]
struct Args {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Memory capacity.
    #[arg(long)]
    capacity: Option<usize>,

    /// Gemini model identifier.
    #[arg(long)]
    model: Option<String>,

    /// Log line format: pretty, compact or json.
    #[arg(long, env = "RECALL_AGENT_LOG_FORMAT", default_value_t = LogFormat::Compact)]
    log_format: LogFormat,
}

impl Args {
    fn agent_config(&self) -> Result<AgentConfig> {
        let config = match &self.config {
            Some(path) => AgentConfig::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => {
                let mut config = AgentConfig::default();
                config.name = "GeminiExplorer".to_owned();
                config.memory.capacity = 10;
                config
            }
        };

        let mut config = config.with_env_overrides()?;
        if let Some(capacity) = self.capacity {
            config.memory.capacity = capacity;
        }
        if let Some(model) = &self.model {
            config.oracle.model.clone_from(model);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&TelemetryConfig::default().with_format(args.log_format))?;

    let config = args.agent_config()?;
    let oracle = gemini_oracle(&config.oracle).context("configuring Gemini")?;
    let mut agent = Agent::from_config(&config, Arc::new(oracle));
    info!(agent = agent.name(), capacity = config.memory.capacity, "agent ready");

    agent.register_action("explore", || info!("Exploring the environment..."));
    agent.register_action("collect_data", || info!("Collecting data..."));
    agent.register_action("analyze", || info!("Analyzing collected information..."));

    match agent.generate_possible_actions(CONTEXT).await {
        Ok(actions) => {
            for action in actions {
                info!(%action, "suggested action");
            }
        }
        Err(err) => warn!(error = %err, "no action suggestions"),
    }

    agent.add_memory("Discovered a network vulnerability", 0.9);
    agent.add_memory("Mapped initial network topology", 0.7);
    agent.add_memory("Identified potential security risks", 0.8);
    agent.add_memory("Observed unusual network traffic pattern", 0.6);
    agent.log_memories();

    for memory in agent.recall(RECALL_QUERY).await {
        info!(query = RECALL_QUERY, %memory, "relevant memory");
    }

    match agent.query_oracle(STRATEGY_QUERY).await {
        Ok(strategy) => info!("Strategy from Gemini:\n{strategy}"),
        Err(err) => warn!(error = %err, "strategy query failed"),
    }

    let options = GenerationOptions::default()
        .with_safety_setting("HARM_CATEGORY_DANGEROUS_CONTENT", "BLOCK_ONLY_HIGH")
        .with_safety_setting("HARM_CATEGORY_HATE_SPEECH", "BLOCK_MEDIUM_AND_ABOVE")
        .with_temperature(0.7)
        .with_max_output_tokens(500)
        .with_top_p(0.9)
        .with_top_k(15)
        .with_stop_sequence("The End");
    match agent.generate_content_with_config(STORY_PROMPT, &options).await {
        Ok(story) => info!("--- Magic Backpack Story ---\n{story}"),
        Err(err) => warn!(error = %err, "story generation failed"),
    }

    for name in ["explore", "collect_data", "analyze"] {
        agent.execute_action(name)?;
    }

    Ok(())
}
