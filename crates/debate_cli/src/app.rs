use std::io::{self, IsTerminal, Read};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use debate_api::{DebateApiClient, DebateTransport};
use debate_stream::render::{TerminalSink, DEFAULT_WIDTH};
use debate_stream::{
    ArchiveViewer, EnvConfig, RenderMode, SessionController, SessionSink, SessionState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{ReplayArgs, RunArgs};
use crate::commands::{parse_slash_command, SlashCommand, HELP_LINES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Runs a live session until it ends and stdin is exhausted, or `/quit`.
pub async fn run_live(args: RunArgs, env: &EnvConfig) -> anyhow::Result<SessionState> {
    let client = DebateApiClient::new(env.api_config(args.url.as_deref()))
        .context("failed to build debate client")?;
    tracing::info!(endpoint = %client.normalized_endpoint(), "using debate service");

    let transport: Arc<dyn DebateTransport> = Arc::new(client);
    let mode = if args.markdown {
        RenderMode::Markdown
    } else {
        env.render_mode()
    };
    let export_dir = args.export_dir.clone().unwrap_or_else(|| env.export_dir());

    let mut controller =
        SessionController::new(transport, stdout_sink()).with_render_mode(mode);
    if controller.start(args.session_config()).is_err() {
        return Ok(controller.state());
    }

    let interactive = io::stdin().is_terminal();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut interrupts = interrupt_listener().context("failed to listen for Ctrl-C")?;

    loop {
        tokio::select! {
            _ = controller.pump(), if controller.is_streaming() => {}
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if handle_line(&mut controller, &line, &export_dir) == LoopControl::Quit {
                        break;
                    }
                }
                Ok(None) => stdin_open = false,
                Err(error) => {
                    tracing::warn!(%error, "stdin read failed; ignoring further input");
                    stdin_open = false;
                }
            },
            Some(()) = interrupts.recv() => {
                if !controller.stop() {
                    break;
                }
            }
        }

        if !controller.is_streaming() && (!stdin_open || !interactive) {
            break;
        }
    }

    Ok(controller.state())
}

/// Applies one line of user input to the session.
pub fn handle_line<S: SessionSink>(
    controller: &mut SessionController<S>,
    line: &str,
    export_dir: &Path,
) -> LoopControl {
    match parse_slash_command(line) {
        Some(command) => handle_command(controller, command, export_dir),
        None => {
            if !line.trim().is_empty() {
                controller
                    .sink_mut()
                    .report_status("Commands start with /. Type /help for a list.", None);
            }
            LoopControl::Continue
        }
    }
}

pub fn handle_command<S: SessionSink>(
    controller: &mut SessionController<S>,
    command: SlashCommand,
    export_dir: &Path,
) -> LoopControl {
    match command {
        SlashCommand::Stop => {
            controller.stop();
        }
        SlashCommand::Continue => {
            if let Err(error) = controller.continue_session() {
                tracing::debug!(%error, "continue rejected");
            }
        }
        SlashCommand::Export(path) => {
            let result = match path {
                Some(path) => controller.export_to_file(&path).map(|()| path),
                None => controller.export_to_dir(export_dir),
            };
            if let Ok(path) = result {
                let text = format!("Saved to {}", path.display());
                controller.sink_mut().report_status(&text, None);
            }
        }
        SlashCommand::Markdown => {
            let mode = controller.render_mode().toggled();
            controller.set_render_mode(mode);
            let text = if mode.is_markdown() {
                "Markdown rendering on"
            } else {
                "Markdown rendering off"
            };
            controller.sink_mut().report_status(text, None);
        }
        SlashCommand::Status => {
            let text = format!(
                "State: {}, {} turns",
                controller.state(),
                controller.transcript().len()
            );
            controller.sink_mut().report_status(&text, None);
        }
        SlashCommand::Help => {
            for line in HELP_LINES {
                controller.sink_mut().report_status(line, None);
            }
        }
        SlashCommand::Quit => {
            controller.stop();
            return LoopControl::Quit;
        }
        SlashCommand::Unknown(command) => {
            let text = format!("Unknown command: {command}");
            controller.sink_mut().report_status(&text, None);
        }
    }
    LoopControl::Continue
}

/// Loads and renders an exported record. Returns `false` when nothing could
/// be displayed.
pub fn run_replay(args: ReplayArgs, env: &EnvConfig) -> anyhow::Result<bool> {
    let text = if args.reads_stdin() {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read record from stdin")?;
        Some(text)
    } else {
        None
    };
    let mode = if args.markdown {
        RenderMode::Markdown
    } else {
        env.render_mode()
    };

    replay(&args, text.as_deref(), mode, stdout_sink())
}

/// Replay against an explicit sink. `text` replaces reading `args.file`.
pub fn replay<S: SessionSink>(
    args: &ReplayArgs,
    text: Option<&str>,
    mode: RenderMode,
    sink: S,
) -> anyhow::Result<bool> {
    let mut viewer = ArchiveViewer::new(sink).with_render_mode(mode);
    let loaded = match text {
        Some(text) => viewer.load_text(text).map(|summary| summary.lines()),
        None => viewer.load_file(&args.file).map(|summary| summary.lines()),
    };
    let Ok(lines) = loaded else {
        return Ok(false);
    };

    for (label, value) in lines {
        viewer
            .sink_mut()
            .report_status(&format!("{label}: {value}"), None);
    }

    if let Some(path) = &args.export {
        viewer
            .export_to_file(path)
            .with_context(|| format!("failed to export to {}", path.display()))?;
    }
    Ok(true)
}

/// Ctrl-C listener registered once per session. Interrupts that arrive while
/// a command is being handled are queued until the next `recv`.
#[cfg(unix)]
pub fn interrupt_listener() -> io::Result<tokio::signal::unix::Signal> {
    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
}

#[cfg(windows)]
pub fn interrupt_listener() -> io::Result<tokio::signal::windows::CtrlC> {
    tokio::signal::windows::ctrl_c()
}

fn stdout_sink() -> TerminalSink<io::Stdout> {
    let stdout = io::stdout();
    let color = stdout.is_terminal() && std::env::var_os("NO_COLOR").is_none();
    TerminalSink::new(stdout)
        .with_width(terminal_width())
        .with_color(color)
}

fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|width| *width > 0)
        .unwrap_or(DEFAULT_WIDTH)
}
