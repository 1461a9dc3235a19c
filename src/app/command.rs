//! Command parsing for the command line

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Save reading progress: :w
    Write,
    /// Quit the application: :q or :quit
    Quit,
    /// Save and quit: :wq or :x
    WriteQuit,
    /// Jump to a chapter (1-based): :goto <n>
    Goto(usize),
    /// Toggle the bookmark on the current chapter: :bookmark
    Bookmark,
    /// Edit notes for this subtopic: :notes
    Notes,
    /// Start counting study time: :start
    Start,
    /// Stop counting study time: :pause
    Pause,
    /// Mark the current chapter complete: :complete
    Complete,
    /// Submit the quiz attempt: :submit
    Submit,
    /// Show help: :help or :h
    Help,
    /// Clear message: (empty command)
    Nop,
}

/// Result of parsing a command
#[derive(Debug, PartialEq, Eq)]
pub enum ParseResult {
    /// Successfully parsed command
    Ok(Command),
    /// Unknown command
    UnknownCommand(String),
    /// Command needs an argument
    MissingArgument(String),
    /// Argument could not be parsed
    InvalidArgument { command: String, argument: String },
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> ParseResult {
    let input = input.trim();

    if input.is_empty() {
        return ParseResult::Ok(Command::Nop);
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).unwrap_or("");

    match cmd.to_lowercase().as_str() {
        "w" | "write" => ParseResult::Ok(Command::Write),
        "q" | "quit" => ParseResult::Ok(Command::Quit),
        "wq" | "x" => ParseResult::Ok(Command::WriteQuit),
        "goto" | "g" => {
            if args.is_empty() {
                return ParseResult::MissingArgument("goto".to_string());
            }
            match args.parse::<usize>() {
                Ok(n) if n > 0 => ParseResult::Ok(Command::Goto(n)),
                _ => ParseResult::InvalidArgument {
                    command: "goto".to_string(),
                    argument: args.to_string(),
                },
            }
        }
        "bookmark" | "b" => ParseResult::Ok(Command::Bookmark),
        "notes" | "n" => ParseResult::Ok(Command::Notes),
        "start" => ParseResult::Ok(Command::Start),
        "pause" => ParseResult::Ok(Command::Pause),
        "complete" | "done" => ParseResult::Ok(Command::Complete),
        "submit" => ParseResult::Ok(Command::Submit),
        "help" | "h" | "?" => ParseResult::Ok(Command::Help),
        _ => ParseResult::UnknownCommand(cmd.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_command() {
        assert_eq!(parse_command("q"), ParseResult::Ok(Command::Quit));
        assert_eq!(parse_command("quit"), ParseResult::Ok(Command::Quit));
        assert_eq!(parse_command("Q"), ParseResult::Ok(Command::Quit));
    }

    #[test]
    fn parse_write_commands() {
        assert_eq!(parse_command("w"), ParseResult::Ok(Command::Write));
        assert_eq!(parse_command("wq"), ParseResult::Ok(Command::WriteQuit));
        assert_eq!(parse_command("x"), ParseResult::Ok(Command::WriteQuit));
    }

    #[test]
    fn parse_goto_command() {
        assert_eq!(parse_command("goto 3"), ParseResult::Ok(Command::Goto(3)));
        assert_eq!(parse_command("g 1"), ParseResult::Ok(Command::Goto(1)));
    }

    #[test]
    fn parse_goto_rejects_bad_numbers() {
        assert!(matches!(parse_command("goto"), ParseResult::MissingArgument(_)));
        assert!(matches!(parse_command("goto 0"), ParseResult::InvalidArgument { .. }));
        assert!(matches!(parse_command("goto two"), ParseResult::InvalidArgument { .. }));
    }

    #[test]
    fn parse_reader_commands() {
        assert_eq!(parse_command("bookmark"), ParseResult::Ok(Command::Bookmark));
        assert_eq!(parse_command("notes"), ParseResult::Ok(Command::Notes));
        assert_eq!(parse_command("start"), ParseResult::Ok(Command::Start));
        assert_eq!(parse_command("pause"), ParseResult::Ok(Command::Pause));
        assert_eq!(parse_command("done"), ParseResult::Ok(Command::Complete));
        assert_eq!(parse_command("submit"), ParseResult::Ok(Command::Submit));
    }

    #[test]
    fn parse_unknown_command() {
        assert_eq!(parse_command("unknown"), ParseResult::UnknownCommand("unknown".into()));
    }

    #[test]
    fn parse_empty_is_nop() {
        assert_eq!(parse_command(""), ParseResult::Ok(Command::Nop));
        assert_eq!(parse_command("   "), ParseResult::Ok(Command::Nop));
    }
}
