use std::process::ExitCode;

use clap::Parser;
use debate_cli::app::{run_live, run_replay};
use debate_cli::cli::{Cli, Command};
use debate_stream::logging::init_logging;
use debate_stream::{EnvConfig, SessionState};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    init_logging();

    let cli = Cli::parse();
    let env = EnvConfig::from_env();

    let success = match cli.command {
        Command::Run(args) => {
            let state = run_live(args, &env).await?;
            tracing::debug!(%state, "session ended");
            matches!(state, SessionState::Done | SessionState::Stopped)
        }
        Command::Replay(args) => run_replay(args, &env)?,
    };

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
