use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use debate_protocol::{SessionConfig, DEFAULT_ROUNDS, DEFAULT_TEMPERATURE};

#[derive(Debug, Parser)]
#[command(name = "debate")]
#[command(version)]
#[command(about = "Stream a two-party debate to the terminal, or replay an exported record")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start a live debate and render turns as they stream
    Run(RunArgs),
    /// Display an exported debate record without connecting
    Replay(ReplayArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Debate topic
    #[arg(long)]
    pub topic: String,

    /// Number of rounds; one round is one pro and one con turn
    #[arg(long, default_value_t = DEFAULT_ROUNDS)]
    pub rounds: u32,

    /// Sampling temperature, between 0 and 2
    #[arg(long, default_value_t = DEFAULT_TEMPERATURE)]
    pub temperature: f64,

    /// Extra instructions for the pro side
    #[arg(long, default_value = "")]
    pub pro_system: String,

    /// Extra instructions for the con side
    #[arg(long, default_value = "")]
    pub con_system: String,

    #[arg(long)]
    pub pro_model: Option<String>,

    #[arg(long)]
    pub con_model: Option<String>,

    /// Render turns as markdown
    #[arg(long)]
    pub markdown: bool,

    /// Debate service base URL (overrides DEBATE_API_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Directory for /export (overrides DEBATE_EXPORT_DIR)
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

impl RunArgs {
    pub fn session_config(&self) -> SessionConfig {
        let mut config = SessionConfig::new(self.topic.clone())
            .with_pro_system(self.pro_system.clone())
            .with_con_system(self.con_system.clone())
            .with_rounds(self.rounds)
            .with_temperature(self.temperature);
        if let Some(model) = &self.pro_model {
            config = config.with_pro_model(model.clone());
        }
        if let Some(model) = &self.con_model {
            config = config.with_con_model(model.clone());
        }
        config
    }
}

#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Exported JSON record, or `-` for stdin
    pub file: PathBuf,

    /// Render turns as markdown
    #[arg(long)]
    pub markdown: bool,

    /// Re-export the normalized record to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}

impl ReplayArgs {
    pub fn reads_stdin(&self) -> bool {
        self.file.as_os_str() == "-"
    }
}
