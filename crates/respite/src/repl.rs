//! Line commands accepted during a break session

use respite_api::ActivityType;

pub const HELP: &str = "\
Commands:
  start <type>   start the countdown for an activity (e.g. start breathing)
  stop           stop the running activity without completing it
  done <type>    mark an activity as completed
  status         show the session
  new [mood]     end this break and check in again, optionally saying how you feel now
  help           show this help
  quit           leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Start(ActivityType),
    Stop,
    Done(ActivityType),
    Status,
    New(Option<String>),
    Help,
    Quit,
    /// Free text describing how the user feels
    Text(String),
}

impl ReplCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Result<Self, String>> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "start" | "done" if rest.is_empty() => {
                return Some(Err(format!("usage: {} <type>", word.to_ascii_lowercase())));
            }
            "start" => Self::Start(ActivityType::from(rest)),
            "done" => Self::Done(ActivityType::from(rest)),
            "stop" if rest.is_empty() => Self::Stop,
            "status" if rest.is_empty() => Self::Status,
            "new" => Self::New((!rest.is_empty()).then(|| rest.to_string())),
            "help" | "?" if rest.is_empty() => Self::Help,
            "quit" | "exit" if rest.is_empty() => Self::Quit,
            _ => Self::Text(line.to_string()),
        };

        Some(Ok(command))
    }
}
