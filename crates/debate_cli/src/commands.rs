use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Stop,
    Continue,
    Export(Option<PathBuf>),
    Markdown,
    Status,
    Help,
    Quit,
    Unknown(String),
}

pub const HELP_LINES: [&str; 7] = [
    "/stop             stop the current stream",
    "/continue         resume from the last turn",
    "/export [path]    save the transcript as JSON",
    "/markdown         toggle markdown rendering",
    "/status           show session state",
    "/help             show this help",
    "/quit             stop and exit",
];

pub fn parse_slash_command(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };

    let parsed = match command {
        "/stop" => SlashCommand::Stop,
        "/continue" => SlashCommand::Continue,
        "/export" => SlashCommand::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "/markdown" => SlashCommand::Markdown,
        "/status" => SlashCommand::Status,
        "/help" => SlashCommand::Help,
        "/quit" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(command.to_string()),
    };

    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::{parse_slash_command, SlashCommand};
    use std::path::PathBuf;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_slash_command("hello"), None);
        assert_eq!(parse_slash_command("   "), None);
    }

    #[test]
    fn known_commands_parse() {
        assert_eq!(parse_slash_command(" /stop "), Some(SlashCommand::Stop));
        assert_eq!(parse_slash_command("/continue"), Some(SlashCommand::Continue));
        assert_eq!(parse_slash_command("/markdown"), Some(SlashCommand::Markdown));
        assert_eq!(parse_slash_command("/quit"), Some(SlashCommand::Quit));
    }

    #[test]
    fn export_takes_an_optional_path() {
        assert_eq!(parse_slash_command("/export"), Some(SlashCommand::Export(None)));
        assert_eq!(
            parse_slash_command("/export  out/debate.json "),
            Some(SlashCommand::Export(Some(PathBuf::from("out/debate.json"))))
        );
    }

    #[test]
    fn unknown_commands_keep_their_name() {
        assert_eq!(
            parse_slash_command("/clear all"),
            Some(SlashCommand::Unknown("/clear".to_string()))
        );
    }
}
